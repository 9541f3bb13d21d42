// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Execution Gateway Contributors

//! Relay-service quota client.
//!
//! The relay sponsors gas for relayed executions, with a per-account quota.
//! `WITH_RELAY` is only honored while the account has remaining capacity, so
//! the resolver consults this client on every relay request. Quota lookup
//! failures degrade to "relay unavailable": the resolver falls back silently
//! rather than surfacing an error for an optional optimization.

use alloy::primitives::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::ToSchema;

use crate::chains::Chain;

/// Remaining sponsorship quota for an account on a chain.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RelayQuota {
    /// Executions left in the current window.
    pub remaining: u32,
    /// Window size, when the relay reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Errors from the relay service.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("relay request failed: {0}")]
    Http(String),

    #[error("relay responded with status {0}")]
    Status(u16),

    #[error("invalid relay URL: {0}")]
    InvalidUrl(String),
}

/// Seam for relay availability, so handlers can be exercised without a live
/// relay service. Relaying is possible while the reported quota has
/// `remaining > 0`.
#[async_trait]
pub trait RelayAvailability: Send + Sync {
    /// The quota, when the relay could be reached and covers the chain.
    async fn quota(&self, chain: &Chain, account: Address) -> Option<RelayQuota>;
}

/// HTTP client for the relay service.
pub struct RelayClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RelayClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Fetch the remaining quota for an account on a chain.
    pub async fn remaining_quota(
        &self,
        chain_id: u64,
        account: Address,
    ) -> Result<RelayQuota, RelayError> {
        let url = self
            .base_url
            .join(&format!("v1/chains/{chain_id}/relay/{account}"))
            .map_err(|e| RelayError::InvalidUrl(e.to_string()))?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| RelayError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RelayError::Status(response.status().as_u16()));
        }

        response
            .json::<RelayQuota>()
            .await
            .map_err(|e| RelayError::Http(e.to_string()))
    }
}

#[async_trait]
impl RelayAvailability for RelayClient {
    async fn quota(&self, chain: &Chain, account: Address) -> Option<RelayQuota> {
        if !chain.supports_relaying() {
            return None;
        }
        match self.remaining_quota(chain.chain_id, account).await {
            Ok(quota) => Some(quota),
            Err(e) => {
                tracing::warn!(
                    chain_id = chain.chain_id,
                    account = %account,
                    error = %e,
                    "Relay quota lookup failed, treating relay as unavailable"
                );
                None
            }
        }
    }
}
