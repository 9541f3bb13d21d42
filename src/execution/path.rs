// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Execution Gateway Contributors

//! Execution-path classification.
//!
//! Maps (resolved method, signer kind, biometrics setting) onto the screen
//! flow the client routes through. Encoded as an explicit priority table over
//! (method, signer) rather than a chain of if/else, because the precedence
//! between a relay request and a Ledger signer is subtle: relay wins. The
//! relay holds custody of gas, so neither the hardware-signer flow nor the
//! biometric gate applies to a relayed execution.

use super::types::{ExecutionMethod, ExecutionPath, Signer, SignerKind};

/// Classify which confirmation flow a confirm press routes through.
///
/// Priority table, highest first:
///
/// | method       | signer kind | path         |
/// |--------------|-------------|--------------|
/// | `WITH_RELAY` | any         | `standard`   |
/// | any other    | ledger      | `ledger`     |
/// | any other    | non-ledger  | `biometrics` when biometrics is not yet enabled, else `standard` |
pub fn classify_execution_path(
    signer: Option<&Signer>,
    biometrics_enabled: bool,
    method: Option<ExecutionMethod>,
) -> ExecutionPath {
    match (method, signer.map(|s| s.kind)) {
        (Some(ExecutionMethod::WithRelay), _) => ExecutionPath::Standard,
        (_, Some(SignerKind::Ledger)) => ExecutionPath::Ledger,
        _ if !biometrics_enabled => ExecutionPath::Biometrics,
        _ => ExecutionPath::Standard,
    }
}
