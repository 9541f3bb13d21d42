// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Execution Gateway Contributors

//! Read-only EVM client for signer-balance queries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use alloy::{
    network::Ethereum,
    primitives::{Address, U256},
    providers::{
        fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
        Identity, Provider, ProviderBuilder, RootProvider,
    },
};
use async_trait::async_trait;

use crate::chains::Chain;
use crate::execution::{BalanceError, BalanceProvider};

/// HTTP provider type (with all default fillers).
type HttpProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<Ethereum>,
>;

/// Read-only client bound to one chain's RPC endpoint.
pub struct ChainClient {
    chain: Chain,
    provider: HttpProvider,
}

impl ChainClient {
    /// Create a client for the given chain.
    pub fn new(chain: Chain) -> Result<Self, BalanceError> {
        let url: url::Url = chain
            .rpc_url
            .parse()
            .map_err(|e: url::ParseError| BalanceError::InvalidRpcUrl(e.to_string()))?;

        let provider = ProviderBuilder::new().connect_http(url);

        Ok(Self { chain, provider })
    }

    /// Native balance of an address, in wei.
    pub async fn native_balance(&self, address: Address) -> Result<U256, BalanceError> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| BalanceError::Rpc(e.to_string()))
    }

    /// Current block number.
    pub async fn block_number(&self) -> Result<u64, BalanceError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| BalanceError::Rpc(e.to_string()))
    }

    /// The chain this client is bound to.
    pub fn chain(&self) -> &Chain {
        &self.chain
    }
}

/// [`BalanceProvider`] backed by per-chain RPC endpoints.
///
/// Holds one long-lived [`ChainClient`] per chain, created on first use.
pub struct RpcBalanceProvider {
    clients: Mutex<HashMap<u64, Arc<ChainClient>>>,
}

impl RpcBalanceProvider {
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
        }
    }

    fn client(&self, chain: &Chain) -> Result<Arc<ChainClient>, BalanceError> {
        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = clients.get(&chain.chain_id) {
            return Ok(client.clone());
        }
        let client = Arc::new(ChainClient::new(chain.clone())?);
        clients.insert(chain.chain_id, client.clone());
        Ok(client)
    }
}

impl Default for RpcBalanceProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BalanceProvider for RpcBalanceProvider {
    async fn native_balance(&self, chain: &Chain, address: Address) -> Result<U256, BalanceError> {
        let client = self.client(chain)?;
        client.native_balance(address).await
    }
}

#[cfg(test)]
mod tests {
    use crate::chains::{ETHEREUM, SEPOLIA};

    use super::*;

    #[test]
    fn client_builds_for_known_chains() {
        assert!(ChainClient::new(ETHEREUM).is_ok());
        let client = ChainClient::new(SEPOLIA).unwrap();
        assert_eq!(client.chain().chain_id, SEPOLIA.chain_id);
    }

    #[test]
    fn provider_reuses_one_client_per_chain() {
        let provider = RpcBalanceProvider::new();
        let first = provider.client(&ETHEREUM).unwrap();
        let again = provider.client(&ETHEREUM).unwrap();
        assert!(Arc::ptr_eq(&first, &again));

        let other = provider.client(&SEPOLIA).unwrap();
        assert!(!Arc::ptr_eq(&first, &other));
    }
}
