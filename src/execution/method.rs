// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Execution Gateway Contributors

//! Execution-method resolution.
//!
//! Maps what the client asked for onto what the deployment can actually do.
//! A relay request only sticks when the chain is covered by the relay service
//! and the account still has sponsorship quota; everything else falls back to
//! the signer's own capabilities without surfacing an error.

use crate::chains::Chain;

use super::types::{ExecutionMethod, Signer};

/// Resolve the execution method for a confirmation attempt.
///
/// Priority order, first match wins:
/// 1. Relay was requested, the quota check passed, and the chain advertises
///    relaying.
/// 2. The active signer is a Ledger device.
/// 3. Local private-key signing (also the default when no signer is active).
///
/// Total over its inputs; no error can come out of resolution.
pub fn resolve_execution_method(
    requested: ExecutionMethod,
    relay_available: bool,
    chain: &Chain,
    signer: Option<&Signer>,
) -> ExecutionMethod {
    if requested == ExecutionMethod::WithRelay && relay_available && chain.supports_relaying() {
        return ExecutionMethod::WithRelay;
    }
    if signer.is_some_and(Signer::is_ledger) {
        return ExecutionMethod::WithLedger;
    }
    ExecutionMethod::WithPk
}
