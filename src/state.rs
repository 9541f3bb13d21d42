// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Execution Gateway Contributors

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::chains::ChainRegistry;
use crate::execution::{FlowRegistry, FundsChecker, TransactionExecutor};
use crate::relay::RelayAvailability;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub chains: Arc<ChainRegistry>,
    pub relay: Arc<dyn RelayAvailability>,
    pub funds: Arc<FundsChecker>,
    /// In-flight confirm flows, shared across requests so concurrent
    /// confirms for the same transaction hit one reentrancy guard.
    pub flows: Arc<FlowRegistry>,
}

impl AppState {
    pub fn new(
        chains: ChainRegistry,
        relay: Arc<dyn RelayAvailability>,
        funds: FundsChecker,
        executor: Arc<dyn TransactionExecutor>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            chains: Arc::new(chains),
            relay,
            funds: Arc::new(funds),
            flows: Arc::new(FlowRegistry::new(executor, shutdown)),
        }
    }
}
