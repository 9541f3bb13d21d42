// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Execution Gateway Contributors

//! Client navigation routes.
//!
//! The orchestrator's output is a navigation instruction for the client: a
//! pathname plus flattened string params. Bigints are flattened to decimal
//! strings; absent fields are simply omitted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::types::FeeParams;

/// Hardware-signer connection screen.
pub const LEDGER_CONNECT_PATH: &str = "/sign-transaction/ledger-connect";

/// Biometric opt-in screen, shown before the first locally signed execution.
pub const BIOMETRICS_OPT_IN_PATH: &str = "/biometrics-opt-in";

/// Post-execution success screen.
pub const EXECUTION_SUCCESS_PATH: &str = "/transaction-success";

/// Post-execution failure screen.
pub const EXECUTION_FAILURE_PATH: &str = "/transaction-failed";

/// A navigation instruction for the client router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Route {
    /// Screen pathname.
    pub pathname: String,
    /// Flattened string params (bigints as decimal strings).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

impl Route {
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_params(mut self, params: BTreeMap<String, String>) -> Self {
        self.params.extend(params);
        self
    }
}

/// Flatten fee params into route params.
///
/// Keys match what the confirmation screens read back out of the router.
pub fn fee_route_params(fee: &FeeParams) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    if let Some(v) = fee.max_fee_per_gas {
        params.insert("maxFeePerGas".to_string(), v.to_string());
    }
    if let Some(v) = fee.max_priority_fee_per_gas {
        params.insert("maxPriorityFeePerGas".to_string(), v.to_string());
    }
    if let Some(v) = fee.gas_limit {
        params.insert("gasLimit".to_string(), v.to_string());
    }
    if let Some(v) = fee.nonce {
        params.insert("nonce".to_string(), v.to_string());
    }
    params
}
