// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Execution Gateway Contributors

//! Execution endpoints: method resolution, funds checks, and the
//! confirm/execute flow.

use std::str::FromStr;

use alloy::primitives::{Address, U256};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    blockchain::format_amount,
    error::ApiError,
    execution::{
        resolve_execution_method, ConfirmContext, ExecutionMethod, FeeParams, FlowOutcome,
        FundsCheck, Route, Signer,
    },
    relay::RelayQuota,
    state::AppState,
};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Fee estimate as it arrives over the wire: bigints as decimal strings.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct FeeParamsBody {
    /// Max fee per gas in wei (decimal string).
    pub max_fee_per_gas: Option<String>,
    /// Max priority fee per gas in wei (decimal string).
    pub max_priority_fee_per_gas: Option<String>,
    /// Gas limit (decimal string).
    pub gas_limit: Option<String>,
    /// Transaction nonce.
    pub nonce: Option<u64>,
    /// Whether the fee estimator is still fetching gas prices.
    #[serde(default)]
    pub is_loading_gas_price: bool,
    /// Whether the gas limit estimate is still in flight.
    #[serde(default)]
    pub gas_limit_loading: bool,
    /// Gas limit estimation error, if the estimator reported one.
    pub gas_limit_error: Option<String>,
}

impl FeeParamsBody {
    /// Parse the wire shape into domain fee params.
    pub fn parse(&self) -> Result<FeeParams, ApiError> {
        Ok(FeeParams {
            max_fee_per_gas: parse_wei(self.max_fee_per_gas.as_deref(), "max_fee_per_gas")?,
            max_priority_fee_per_gas: parse_wei(
                self.max_priority_fee_per_gas.as_deref(),
                "max_priority_fee_per_gas",
            )?,
            gas_limit: parse_wei(self.gas_limit.as_deref(), "gas_limit")?,
            nonce: self.nonce,
            is_loading_gas_price: self.is_loading_gas_price,
            gas_limit_loading: self.gas_limit_loading,
            gas_limit_error: self.gas_limit_error.clone(),
        })
    }
}

fn parse_wei(value: Option<&str>, field: &str) -> Result<Option<U256>, ApiError> {
    value
        .map(|s| U256::from_str(s).map_err(|_| ApiError::bad_request(format!("Invalid {field}"))))
        .transpose()
}

/// Request to resolve the execution method for a confirmation attempt.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ResolveMethodRequest {
    /// The method the client asked for.
    pub requested_method: ExecutionMethod,
    /// The active signer, if one is selected.
    pub signer: Option<Signer>,
    /// The multisig account, needed for the relay quota lookup.
    #[schema(value_type = Option<String>)]
    pub safe_address: Option<Address>,
}

/// Resolved execution method.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResolveMethodResponse {
    /// The method that will actually be used.
    pub method: ExecutionMethod,
    /// Relay quota, when relay was requested and the relay could be reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relay: Option<RelayQuota>,
}

/// Request to check whether the signer can afford the estimated fee.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FundsCheckRequest {
    /// The active signer's address.
    #[schema(value_type = Option<String>)]
    pub signer_address: Option<Address>,
    /// The resolved execution method for this attempt.
    pub execution_method: ExecutionMethod,
    /// The fee estimate.
    #[serde(default)]
    pub fee: FeeParamsBody,
}

/// Funds sufficiency result.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FundsCheckResponse {
    /// Whether the signer can cover the total fee.
    pub has_sufficient_funds: bool,
    /// Whether the result is an interim one (fee data still loading).
    pub is_checking: bool,
    /// Signer balance in wei, when one was fetched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer_balance: Option<String>,
    /// Total fee in wei.
    pub total_fee: String,
    /// Total fee formatted in the chain's native currency.
    pub total_fee_formatted: String,
}

impl FundsCheckResponse {
    fn from_check(check: FundsCheck, total_fee: U256, decimals: u8) -> Self {
        Self {
            has_sufficient_funds: check.has_sufficient_funds,
            is_checking: check.is_checking,
            signer_balance: check.signer_balance.map(|b| b.to_string()),
            total_fee: total_fee.to_string(),
            total_fee_formatted: format_amount(total_fee, decimals),
        }
    }
}

/// Request to run the confirm/execute flow.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ConfirmRequest {
    /// Multisig transaction identifier known to the signing service.
    pub tx_id: String,
    /// The method the client asked for.
    pub requested_method: ExecutionMethod,
    /// The active signer, if one is selected.
    pub signer: Option<Signer>,
    /// The multisig account, needed for the relay quota lookup.
    #[schema(value_type = Option<String>)]
    pub safe_address: Option<Address>,
    /// Whether the user has already opted into biometric signing.
    #[serde(default)]
    pub biometrics_enabled: bool,
    /// Identifier of the screen that initiated the flow.
    pub caller: Option<String>,
    /// The fee estimate.
    #[serde(default)]
    pub fee: FeeParamsBody,
}

/// Terminal state of a confirm attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmStatus {
    RoutedToLedger,
    RoutedToBiometricsOptIn,
    Success,
    Failed,
    InFlight,
}

/// Result of a confirm attempt.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConfirmResponse {
    /// Identifier for this confirmation attempt (for log correlation).
    pub attempt_id: String,
    /// What happened.
    pub status: ConfirmStatus,
    /// The method that was resolved for this attempt.
    pub method: ExecutionMethod,
    /// Where the client should navigate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,
    /// Transaction hash on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    /// Human-readable failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Funds check result computed alongside the flow (display-only; an
    /// insufficient result does not block execution).
    pub funds: FundsCheckResponse,
}

// =============================================================================
// Handlers
// =============================================================================

/// Resolve the execution method for a confirmation attempt.
///
/// Relay requests are only honored when the chain is covered and the account
/// has remaining sponsorship quota; everything else falls back silently.
#[utoipa::path(
    post,
    path = "/v1/chains/{chain_id}/execution/resolve",
    tag = "Execution",
    params(
        ("chain_id" = u64, Path, description = "Chain ID")
    ),
    request_body = ResolveMethodRequest,
    responses(
        (status = 200, description = "Resolved execution method", body = ResolveMethodResponse),
        (status = 404, description = "Unknown chain")
    )
)]
pub async fn resolve_method(
    State(state): State<AppState>,
    Path(chain_id): Path<u64>,
    Json(request): Json<ResolveMethodRequest>,
) -> Result<Json<ResolveMethodResponse>, ApiError> {
    let chain = state
        .chains
        .get(chain_id)
        .ok_or_else(|| ApiError::not_found("Chain not found"))?;

    let quota = relay_quota(&state, chain, &request.requested_method, request.safe_address).await;
    let relay_available = quota.as_ref().is_some_and(|q| q.remaining > 0);

    let method = resolve_execution_method(
        request.requested_method,
        relay_available,
        chain,
        request.signer.as_ref(),
    );

    Ok(Json(ResolveMethodResponse {
        method,
        relay: quota,
    }))
}

/// Check whether the signer can afford the estimated fee.
#[utoipa::path(
    post,
    path = "/v1/chains/{chain_id}/execution/funds-check",
    tag = "Execution",
    params(
        ("chain_id" = u64, Path, description = "Chain ID")
    ),
    request_body = FundsCheckRequest,
    responses(
        (status = 200, description = "Funds check result", body = FundsCheckResponse),
        (status = 400, description = "Invalid fee params"),
        (status = 404, description = "Unknown chain")
    )
)]
pub async fn check_funds(
    State(state): State<AppState>,
    Path(chain_id): Path<u64>,
    Json(request): Json<FundsCheckRequest>,
) -> Result<Json<FundsCheckResponse>, ApiError> {
    let chain = state
        .chains
        .get(chain_id)
        .ok_or_else(|| ApiError::not_found("Chain not found"))?;

    let fee = request.fee.parse()?;
    let check = state
        .funds
        .check(
            request.signer_address,
            &fee,
            request.execution_method,
            Some(chain),
        )
        .await;

    Ok(Json(FundsCheckResponse::from_check(
        check,
        fee.total_fee(),
        chain.native_currency.decimals,
    )))
}

/// Run the confirm/execute flow.
///
/// Resolves the method, computes the funds check for display, then either
/// hands back a redirect (ledger connect, biometrics opt-in) or forwards the
/// execution to the signing service and reports the outcome.
#[utoipa::path(
    post,
    path = "/v1/chains/{chain_id}/execution/confirm",
    tag = "Execution",
    params(
        ("chain_id" = u64, Path, description = "Chain ID")
    ),
    request_body = ConfirmRequest,
    responses(
        (status = 200, description = "Confirm flow outcome", body = ConfirmResponse),
        (status = 400, description = "Invalid fee params"),
        (status = 404, description = "Unknown chain")
    )
)]
pub async fn confirm(
    State(state): State<AppState>,
    Path(chain_id): Path<u64>,
    Json(request): Json<ConfirmRequest>,
) -> Result<Json<ConfirmResponse>, ApiError> {
    let chain = state
        .chains
        .get(chain_id)
        .ok_or_else(|| ApiError::not_found("Chain not found"))?;

    let attempt_id = uuid::Uuid::new_v4().to_string();
    let fee = request.fee.parse()?;

    let quota = relay_quota(&state, chain, &request.requested_method, request.safe_address).await;
    let relay_available = quota.as_ref().is_some_and(|q| q.remaining > 0);

    let method = resolve_execution_method(
        request.requested_method,
        relay_available,
        chain,
        request.signer.as_ref(),
    );

    let funds = state
        .funds
        .check(
            request.signer.as_ref().map(|s| s.value),
            &fee,
            method,
            Some(chain),
        )
        .await;

    tracing::info!(
        attempt_id = %attempt_id,
        chain_id,
        tx_id = %request.tx_id,
        method = ?method,
        sufficient_funds = funds.has_sufficient_funds,
        "Confirm attempt"
    );

    let (flow, navigator) = state.flows.obtain(chain_id, &request.tx_id);

    let outcome = flow
        .confirm(ConfirmContext {
            chain_id,
            tx_id: request.tx_id.clone(),
            method,
            signer: request.signer.clone(),
            biometrics_enabled: request.biometrics_enabled,
            caller: request.caller.unwrap_or_else(|| "confirm".to_string()),
            fee: fee.clone(),
        })
        .await;

    match &outcome {
        FlowOutcome::RoutedToLedger(_)
        | FlowOutcome::RoutedToBiometricsOptIn(_)
        | FlowOutcome::Failed { .. } => state.flows.release(chain_id, &request.tx_id),
        FlowOutcome::Success { .. } => {
            // Gas just left the signer's account; the cached balance is
            // stale.
            if method != ExecutionMethod::WithRelay {
                if let Some(signer) = &request.signer {
                    state.funds.invalidate(chain_id, signer.value);
                }
            }
        }
        FlowOutcome::InFlight => {}
    }

    let funds =
        FundsCheckResponse::from_check(funds, fee.total_fee(), chain.native_currency.decimals);

    let (status, route, tx_hash, description) = match outcome {
        FlowOutcome::RoutedToLedger(route) => (ConfirmStatus::RoutedToLedger, Some(route), None, None),
        FlowOutcome::RoutedToBiometricsOptIn(route) => {
            (ConfirmStatus::RoutedToBiometricsOptIn, Some(route), None, None)
        }
        FlowOutcome::Success { tx_hash } => {
            (ConfirmStatus::Success, navigator.last(), Some(tx_hash), None)
        }
        FlowOutcome::Failed { description } => {
            (ConfirmStatus::Failed, navigator.last(), None, Some(description))
        }
        FlowOutcome::InFlight => (ConfirmStatus::InFlight, None, None, None),
    };

    Ok(Json(ConfirmResponse {
        attempt_id,
        status,
        method,
        route,
        tx_hash,
        description,
        funds,
    }))
}

// =============================================================================
// Helpers
// =============================================================================

/// Quota lookup, only issued when the client actually asked for relay.
async fn relay_quota(
    state: &AppState,
    chain: &crate::chains::Chain,
    requested: &ExecutionMethod,
    safe_address: Option<Address>,
) -> Option<RelayQuota> {
    if *requested != ExecutionMethod::WithRelay {
        return None;
    }
    let account = safe_address?;
    state.relay.quota(chain, account).await
}
