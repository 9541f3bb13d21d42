// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Execution Gateway Contributors

//! Core execution-flow types shared across the resolver, funds checker,
//! path classifier and orchestrator.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How a transaction will be submitted on-chain.
///
/// Selected once per confirmation attempt and immutable for the duration of
/// that attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionMethod {
    /// The relay service pays gas and broadcasts.
    WithRelay,
    /// Sign locally with the active signer's private key.
    WithPk,
    /// Sign on a connected Ledger device.
    WithLedger,
}

/// Which confirmation flow the client routes through.
///
/// Derived, never persisted. A one-shot routing decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionPath {
    /// Hardware-signer connection flow.
    Ledger,
    /// Biometric opt-in screen before local signing.
    Biometrics,
    /// Direct execution.
    Standard,
}

/// Kind of key material behind a signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SignerKind {
    PrivateKey,
    Ledger,
}

/// An entry from the wallet's signer registry.
///
/// Owned by the registry (external); read-only to this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Signer {
    /// The signer's address.
    #[schema(value_type = String)]
    pub value: Address,
    /// User-facing label, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// What kind of key material backs this signer.
    #[serde(rename = "type")]
    pub kind: SignerKind,
    /// BIP-44 derivation path for hardware signers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derivation_path: Option<String>,
}

impl Signer {
    pub fn is_ledger(&self) -> bool {
        self.kind == SignerKind::Ledger
    }
}

/// Fee estimate for a confirmation attempt.
///
/// Produced by the fee-estimation collaborator; consumed to compute the total
/// fee the signer must be able to cover. The loading flags carry the
/// estimator's in-flight state so the funds check can report an optimistic
/// interim result instead of blocking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeParams {
    pub max_fee_per_gas: Option<U256>,
    pub max_priority_fee_per_gas: Option<U256>,
    pub gas_limit: Option<U256>,
    pub nonce: Option<u64>,
    pub is_loading_gas_price: bool,
    pub gas_limit_loading: bool,
    pub gas_limit_error: Option<String>,
}

impl FeeParams {
    /// Total fee in wei: `max_fee_per_gas * gas_limit`, zero when either
    /// component is absent.
    pub fn total_fee(&self) -> U256 {
        match (self.max_fee_per_gas, self.gas_limit) {
            (Some(fee), Some(limit)) => fee.saturating_mul(limit),
            _ => U256::ZERO,
        }
    }

    /// Whether the fee estimator is still producing either component.
    pub fn is_loading(&self) -> bool {
        self.is_loading_gas_price || self.gas_limit_loading
    }
}
