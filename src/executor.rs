// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Execution Gateway Contributors

//! Upstream signing/broadcast client.
//!
//! Signing and broadcast are owned by a separate service; this gateway only
//! forwards the execute call and maps the result into what the failure
//! screen can display.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::execution::{ExecuteError, ExecuteRequest, TransactionExecutor};

/// Successful submission response from the upstream service.
#[derive(Debug, Deserialize)]
struct ExecuteResponseBody {
    tx_hash: String,
}

/// Error body shape the upstream service uses. Either field may carry the
/// human-readable message.
#[derive(Debug, Default, Deserialize)]
struct UpstreamErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Map an upstream error body to an [`ExecuteError`].
///
/// A usable message is surfaced verbatim; anything else falls back to the
/// fixed display text.
fn map_upstream_error(body: &str) -> ExecuteError {
    let parsed: UpstreamErrorBody = serde_json::from_str(body).unwrap_or_default();
    match parsed.error.or(parsed.message).filter(|m| !m.is_empty()) {
        Some(message) => ExecuteError::Rejected(message),
        None => ExecuteError::Unknown,
    }
}

/// [`TransactionExecutor`] backed by the upstream signing/broadcast service.
pub struct GatewayExecutor {
    http: reqwest::Client,
    base_url: Url,
}

impl GatewayExecutor {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl TransactionExecutor for GatewayExecutor {
    async fn execute(&self, request: ExecuteRequest) -> Result<String, ExecuteError> {
        let url = self
            .base_url
            .join(&format!(
                "v1/chains/{}/transactions/{}/execute",
                request.chain_id, request.tx_id
            ))
            .map_err(|e| ExecuteError::Rejected(e.to_string()))?;

        let response = self
            .http
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ExecuteError::Rejected(e.to_string()))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_upstream_error(&body));
        }

        let body: ExecuteResponseBody = response
            .json()
            .await
            .map_err(|e| ExecuteError::Rejected(e.to_string()))?;

        Ok(body.tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_message_is_surfaced() {
        let err = map_upstream_error(r#"{"error":"insufficient funds for gas"}"#);
        assert_eq!(err.to_string(), "insufficient funds for gas");

        let err = map_upstream_error(r#"{"message":"nonce too low"}"#);
        assert_eq!(err.to_string(), "nonce too low");
    }

    #[test]
    fn unusable_error_body_falls_back() {
        let err = map_upstream_error("");
        assert_eq!(err.to_string(), "Failed to execute transaction");

        let err = map_upstream_error(r#"{"error":""}"#);
        assert_eq!(err.to_string(), "Failed to execute transaction");

        let err = map_upstream_error("<html>bad gateway</html>");
        assert_eq!(err.to_string(), "Failed to execute transaction");
    }
}
