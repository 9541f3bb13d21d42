// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Execution Gateway Contributors

//! Execution flow: method resolution, funds checks, path classification and
//! the confirm/execute orchestrator.

mod funds;
mod method;
mod orchestrator;
mod path;
mod route;
mod types;

pub use funds::{BalanceError, BalanceProvider, FundsCheck, FundsChecker};
pub use method::resolve_execution_method;
pub use orchestrator::{
    ConfirmContext, ExecuteError, ExecuteRequest, ExecutionFlow, FlowOutcome, FlowRegistry,
    Navigator, RouteRecorder, TransactionExecutor,
};
pub use path::classify_execution_path;
pub use route::{
    fee_route_params, Route, BIOMETRICS_OPT_IN_PATH, EXECUTION_FAILURE_PATH,
    EXECUTION_SUCCESS_PATH, LEDGER_CONNECT_PATH,
};
pub use types::{ExecutionMethod, ExecutionPath, FeeParams, Signer, SignerKind};
