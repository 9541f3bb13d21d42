// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Execution Gateway Contributors

//! Supported chain configurations and feature flags.
//!
//! A [`Chain`] carries everything the execution flow needs to know about a
//! network: where to query balances, whether the relay service covers it,
//! and how to format native-currency amounts for display.

/// Capabilities a chain advertises to the execution flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainFeature {
    /// The relay service sponsors gas on this chain.
    Relaying,
    /// EIP-1559 fee market (maxFeePerGas / maxPriorityFeePerGas).
    Eip1559,
}

/// Native currency metadata, used for display formatting.
#[derive(Debug, Clone)]
pub struct NativeCurrency {
    pub symbol: &'static str,
    pub decimals: u8,
}

/// Chain configuration.
#[derive(Debug, Clone)]
pub struct Chain {
    /// Network name for display
    pub name: &'static str,
    /// Chain ID
    pub chain_id: u64,
    /// RPC endpoint URL
    pub rpc_url: &'static str,
    /// Block explorer URL
    pub explorer_url: &'static str,
    /// Features this chain advertises
    pub features: &'static [ChainFeature],
    /// Native currency metadata
    pub native_currency: NativeCurrency,
}

impl Chain {
    /// Whether this chain advertises the given feature.
    pub fn supports(&self, feature: ChainFeature) -> bool {
        self.features.contains(&feature)
    }

    /// Whether the relay service covers this chain.
    pub fn supports_relaying(&self) -> bool {
        self.supports(ChainFeature::Relaying)
    }
}

/// Ethereum mainnet configuration.
pub const ETHEREUM: Chain = Chain {
    name: "Ethereum",
    chain_id: 1,
    rpc_url: "https://eth.merkle.io",
    explorer_url: "https://etherscan.io",
    features: &[ChainFeature::Eip1559, ChainFeature::Relaying],
    native_currency: NativeCurrency {
        symbol: "ETH",
        decimals: 18,
    },
};

/// Gnosis Chain configuration.
pub const GNOSIS: Chain = Chain {
    name: "Gnosis Chain",
    chain_id: 100,
    rpc_url: "https://rpc.gnosischain.com",
    explorer_url: "https://gnosisscan.io",
    features: &[ChainFeature::Eip1559, ChainFeature::Relaying],
    native_currency: NativeCurrency {
        symbol: "xDAI",
        decimals: 18,
    },
};

/// Sepolia testnet configuration. No relay coverage.
pub const SEPOLIA: Chain = Chain {
    name: "Sepolia",
    chain_id: 11_155_111,
    rpc_url: "https://rpc.sepolia.org",
    explorer_url: "https://sepolia.etherscan.io",
    features: &[ChainFeature::Eip1559],
    native_currency: NativeCurrency {
        symbol: "ETH",
        decimals: 18,
    },
};

/// Lookup table of chains this deployment serves.
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    chains: Vec<Chain>,
}

impl ChainRegistry {
    /// Registry with an explicit chain list.
    pub fn new(chains: Vec<Chain>) -> Self {
        Self { chains }
    }

    /// Look up a chain by its chain ID.
    pub fn get(&self, chain_id: u64) -> Option<&Chain> {
        self.chains.iter().find(|c| c.chain_id == chain_id)
    }

    /// All registered chains.
    pub fn all(&self) -> &[Chain] {
        &self.chains
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::new(vec![ETHEREUM, GNOSIS, SEPOLIA])
    }
}
