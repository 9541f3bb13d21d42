// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Execution Gateway Contributors

//! Confirm/execute flow orchestration.
//!
//! Small state machine sequencing a confirm press: classify the path, either
//! hand the client a redirect (ledger connect, biometrics opt-in) or run the
//! actual submission through the injected executor, then route to the
//! success or failure screen.
//!
//! Concurrency model: entry to the standard path claims the `executing`
//! guard with a single compare-exchange, so at most one `execute()` is in
//! flight per flow instance even when the flow is shared across tasks. The
//! cancellation token gates every post-await mutation and navigation (the
//! owning screen may have gone away); the in-flight `execute()` future itself
//! is not aborted.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use alloy::primitives::Address;
use async_trait::async_trait;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::path::classify_execution_path;
use super::route::{
    fee_route_params, Route, BIOMETRICS_OPT_IN_PATH, EXECUTION_FAILURE_PATH,
    EXECUTION_SUCCESS_PATH, LEDGER_CONNECT_PATH,
};
use super::types::{ExecutionMethod, FeeParams, Signer};

/// Errors surfaced by the execute collaborator.
///
/// The `Display` output is what the failure screen shows, so variants carry
/// either the upstream message verbatim or the fixed fallback text.
#[derive(Debug, thiserror::Error)]
pub enum ExecuteError {
    /// Upstream rejected the submission with a message worth surfacing.
    #[error("{0}")]
    Rejected(String),

    /// The submission failed without a usable message.
    #[error("Failed to execute transaction")]
    Unknown,
}

/// What the executor needs to sign and broadcast a confirmed transaction.
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteRequest {
    pub chain_id: u64,
    /// Multisig transaction identifier known to the upstream service.
    pub tx_id: String,
    pub method: ExecutionMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer_address: Option<Address>,
    /// Fee params flattened to decimal strings.
    pub fee_params: BTreeMap<String, String>,
}

/// The actual signing + broadcast collaborator. External to this service.
#[async_trait]
pub trait TransactionExecutor: Send + Sync {
    /// Submit the transaction on-chain; returns the transaction hash.
    async fn execute(&self, request: ExecuteRequest) -> Result<String, ExecuteError>;
}

/// Navigation sink for the client router.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &Route);
}

/// Records the last navigated route; used by the API layer to hand the
/// decision back to the client.
#[derive(Default)]
pub struct RouteRecorder {
    last: Mutex<Option<Route>>,
}

impl RouteRecorder {
    pub fn last(&self) -> Option<Route> {
        self.last.lock().ok().and_then(|guard| guard.clone())
    }
}

impl Navigator for RouteRecorder {
    fn navigate(&self, route: &Route) {
        if let Ok(mut guard) = self.last.lock() {
            *guard = Some(route.clone());
        }
    }
}

/// Everything a confirm press carries into the flow.
#[derive(Debug, Clone)]
pub struct ConfirmContext {
    pub chain_id: u64,
    pub tx_id: String,
    /// Resolved execution method for this attempt.
    pub method: ExecutionMethod,
    pub signer: Option<Signer>,
    pub biometrics_enabled: bool,
    /// Identifier of the screen that initiated the flow, threaded through the
    /// biometrics opt-in redirect so it can return.
    pub caller: String,
    pub fee: FeeParams,
}

/// Terminal result of a confirm press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// A previous confirm is still executing; this press was ignored.
    InFlight,
    /// Redirected to the hardware-signer connection flow.
    RoutedToLedger(Route),
    /// Redirected to the biometric opt-in flow.
    RoutedToBiometricsOptIn(Route),
    /// Submission succeeded.
    Success { tx_hash: String },
    /// Submission failed; the user may confirm again.
    Failed { description: String },
}

/// Confirm/execute flow state machine.
pub struct ExecutionFlow {
    executor: Arc<dyn TransactionExecutor>,
    navigator: Arc<dyn Navigator>,
    cancel: CancellationToken,
    executing: AtomicBool,
}

impl ExecutionFlow {
    pub fn new(
        executor: Arc<dyn TransactionExecutor>,
        navigator: Arc<dyn Navigator>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            executor,
            navigator,
            cancel,
            executing: AtomicBool::new(false),
        }
    }

    /// Whether an execution is currently in flight (or finished successfully;
    /// the flag is deliberately left set after success, the owning screen
    /// unmounts on the success redirect).
    pub fn is_executing(&self) -> bool {
        self.executing.load(Ordering::SeqCst)
    }

    /// Handle a confirm press.
    pub async fn confirm(&self, ctx: ConfirmContext) -> FlowOutcome {
        if self.executing.load(Ordering::SeqCst) {
            return FlowOutcome::InFlight;
        }

        let route_params = fee_route_params(&ctx.fee);

        match classify_execution_path(ctx.signer.as_ref(), ctx.biometrics_enabled, Some(ctx.method))
        {
            super::types::ExecutionPath::Ledger => {
                let route = Route::new(LEDGER_CONNECT_PATH).with_params(route_params);
                self.navigator.navigate(&route);
                FlowOutcome::RoutedToLedger(route)
            }
            super::types::ExecutionPath::Biometrics => {
                let route = Route::new(BIOMETRICS_OPT_IN_PATH)
                    .with_params(route_params)
                    .with_param("caller", ctx.caller.clone());
                self.navigator.navigate(&route);
                FlowOutcome::RoutedToBiometricsOptIn(route)
            }
            super::types::ExecutionPath::Standard => self.execute(ctx, route_params).await,
        }
    }

    async fn execute(
        &self,
        ctx: ConfirmContext,
        fee_params: BTreeMap<String, String>,
    ) -> FlowOutcome {
        // Claim the guard atomically; losing the race means another task's
        // execute() is already in flight.
        if self
            .executing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return FlowOutcome::InFlight;
        }

        let request = ExecuteRequest {
            chain_id: ctx.chain_id,
            tx_id: ctx.tx_id.clone(),
            method: ctx.method,
            signer_address: ctx.signer.as_ref().map(|s| s.value),
            fee_params,
        };

        tracing::info!(
            chain_id = ctx.chain_id,
            tx_id = %ctx.tx_id,
            method = ?ctx.method,
            "Executing transaction"
        );

        match self.executor.execute(request).await {
            Ok(tx_hash) => {
                // `executing` stays set: nothing runs after the success
                // redirect, the owning screen unmounts there.
                if !self.cancel.is_cancelled() {
                    self.navigator
                        .navigate(&Route::new(EXECUTION_SUCCESS_PATH).with_param("txId", &tx_hash));
                }
                FlowOutcome::Success { tx_hash }
            }
            Err(e) => {
                let description = e.to_string();
                tracing::warn!(
                    tx_id = %ctx.tx_id,
                    error = %description,
                    "Transaction execution failed"
                );
                if !self.cancel.is_cancelled() {
                    self.executing.store(false, Ordering::SeqCst);
                    self.navigator.navigate(
                        &Route::new(EXECUTION_FAILURE_PATH).with_param("description", &description),
                    );
                }
                FlowOutcome::Failed { description }
            }
        }
    }
}

/// In-flight confirm flows keyed by `(chain_id, tx_id)`.
///
/// Concurrent confirms for the same transaction share one [`ExecutionFlow`],
/// so the reentrancy guard holds across requests. The caller releases
/// entries that ended in a redirect or a failure; a successful flow stays
/// registered, and a repeat confirm for an already-executed transaction
/// reports in-flight instead of re-submitting.
pub struct FlowRegistry {
    executor: Arc<dyn TransactionExecutor>,
    shutdown: CancellationToken,
    flows: Mutex<HashMap<(u64, String), FlowEntry>>,
}

struct FlowEntry {
    flow: Arc<ExecutionFlow>,
    recorder: Arc<RouteRecorder>,
}

impl FlowRegistry {
    pub fn new(executor: Arc<dyn TransactionExecutor>, shutdown: CancellationToken) -> Self {
        Self {
            executor,
            shutdown,
            flows: Mutex::new(HashMap::new()),
        }
    }

    /// The flow (and its route recorder) for a transaction, created on first
    /// use. The lock is never held across an await.
    pub fn obtain(&self, chain_id: u64, tx_id: &str) -> (Arc<ExecutionFlow>, Arc<RouteRecorder>) {
        let mut flows = self.flows.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = flows
            .entry((chain_id, tx_id.to_string()))
            .or_insert_with(|| {
                let recorder = Arc::new(RouteRecorder::default());
                FlowEntry {
                    flow: Arc::new(ExecutionFlow::new(
                        self.executor.clone(),
                        recorder.clone(),
                        self.shutdown.child_token(),
                    )),
                    recorder,
                }
            });
        (entry.flow.clone(), entry.recorder.clone())
    }

    /// Drop the flow for a transaction so the next confirm starts fresh.
    pub fn release(&self, chain_id: u64, tx_id: &str) {
        let mut flows = self.flows.lock().unwrap_or_else(PoisonError::into_inner);
        flows.remove(&(chain_id, tx_id.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use alloy::primitives::{Address, U256};
    use tokio::sync::Notify;

    use crate::execution::types::SignerKind;

    use super::*;

    struct StubExecutor {
        result: fn() -> Result<String, ExecuteError>,
        calls: AtomicUsize,
        /// When set, execution blocks until notified.
        gate: Option<Arc<Notify>>,
    }

    impl StubExecutor {
        fn ok() -> Self {
            Self {
                result: || Ok("0xhash".to_string()),
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }

        fn failing() -> Self {
            Self {
                result: || Err(ExecuteError::Rejected("Network error".to_string())),
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }

        fn gated(gate: Arc<Notify>) -> Self {
            Self {
                result: || Ok("0xhash".to_string()),
                calls: AtomicUsize::new(0),
                gate: Some(gate),
            }
        }
    }

    #[async_trait]
    impl TransactionExecutor for StubExecutor {
        async fn execute(&self, _request: ExecuteRequest) -> Result<String, ExecuteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            (self.result)()
        }
    }

    fn pk_signer() -> Signer {
        Signer {
            value: Address::ZERO,
            name: None,
            kind: SignerKind::PrivateKey,
            derivation_path: None,
        }
    }

    fn ledger_signer() -> Signer {
        Signer {
            value: Address::ZERO,
            name: None,
            kind: SignerKind::Ledger,
            derivation_path: Some("m/44'/60'/0'/0/0".to_string()),
        }
    }

    fn ctx(method: ExecutionMethod, signer: Option<Signer>, biometrics: bool) -> ConfirmContext {
        ConfirmContext {
            chain_id: 100,
            tx_id: "multisig_0xabc_0xdef".to_string(),
            method,
            signer,
            biometrics_enabled: biometrics,
            caller: "confirm-screen".to_string(),
            fee: FeeParams {
                max_fee_per_gas: Some(U256::from(30_000_000_000u64)),
                gas_limit: Some(U256::from(21_000u64)),
                nonce: Some(3),
                ..Default::default()
            },
        }
    }

    fn flow(executor: Arc<dyn TransactionExecutor>) -> (Arc<ExecutionFlow>, Arc<RouteRecorder>) {
        let recorder = Arc::new(RouteRecorder::default());
        let flow = Arc::new(ExecutionFlow::new(
            executor,
            recorder.clone(),
            CancellationToken::new(),
        ));
        (flow, recorder)
    }

    #[tokio::test]
    async fn ledger_path_redirects_without_executing() {
        let executor = Arc::new(StubExecutor::ok());
        let (flow, recorder) = flow(executor.clone());

        let outcome = flow
            .confirm(ctx(ExecutionMethod::WithLedger, Some(ledger_signer()), true))
            .await;

        let FlowOutcome::RoutedToLedger(route) = outcome else {
            panic!("expected ledger redirect, got {outcome:?}");
        };
        assert_eq!(route.pathname, LEDGER_CONNECT_PATH);
        assert_eq!(route.params["maxFeePerGas"], "30000000000");
        assert_eq!(recorder.last(), Some(route));
        assert_eq!(executor.calls.load(Ordering::SeqCst), 0);
        assert!(!flow.is_executing());
    }

    #[tokio::test]
    async fn biometrics_path_carries_caller() {
        let executor = Arc::new(StubExecutor::ok());
        let (flow, _) = flow(executor.clone());

        let outcome = flow
            .confirm(ctx(ExecutionMethod::WithPk, Some(pk_signer()), false))
            .await;

        let FlowOutcome::RoutedToBiometricsOptIn(route) = outcome else {
            panic!("expected biometrics redirect, got {outcome:?}");
        };
        assert_eq!(route.pathname, BIOMETRICS_OPT_IN_PATH);
        assert_eq!(route.params["caller"], "confirm-screen");
        assert_eq!(executor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn standard_path_executes_and_routes_to_success() {
        let executor = Arc::new(StubExecutor::ok());
        let (flow, recorder) = flow(executor.clone());

        let outcome = flow
            .confirm(ctx(ExecutionMethod::WithPk, Some(pk_signer()), true))
            .await;

        assert_eq!(
            outcome,
            FlowOutcome::Success {
                tx_hash: "0xhash".to_string()
            }
        );
        let route = recorder.last().unwrap();
        assert_eq!(route.pathname, EXECUTION_SUCCESS_PATH);
        assert_eq!(route.params["txId"], "0xhash");
        // Deliberately left set after success.
        assert!(flow.is_executing());
    }

    #[tokio::test]
    async fn failure_resets_guard_and_routes_to_error_screen() {
        let executor = Arc::new(StubExecutor::failing());
        let (flow, recorder) = flow(executor.clone());

        let outcome = flow
            .confirm(ctx(ExecutionMethod::WithPk, Some(pk_signer()), true))
            .await;

        assert_eq!(
            outcome,
            FlowOutcome::Failed {
                description: "Network error".to_string()
            }
        );
        let route = recorder.last().unwrap();
        assert_eq!(route.pathname, EXECUTION_FAILURE_PATH);
        assert_eq!(route.params["description"], "Network error");
        assert!(!flow.is_executing());
    }

    #[tokio::test]
    async fn unknown_error_uses_fixed_fallback_text() {
        assert_eq!(
            ExecuteError::Unknown.to_string(),
            "Failed to execute transaction"
        );
    }

    #[tokio::test]
    async fn second_confirm_while_executing_is_ignored() {
        let gate = Arc::new(Notify::new());
        let executor = Arc::new(StubExecutor::gated(gate.clone()));
        let (flow, _) = flow(executor.clone());

        let first = {
            let flow = flow.clone();
            tokio::spawn(async move {
                flow.confirm(ctx(ExecutionMethod::WithPk, Some(pk_signer()), true))
                    .await
            })
        };

        // Wait until the first confirm is inside execute().
        while executor.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let second = flow
            .confirm(ctx(ExecutionMethod::WithPk, Some(pk_signer()), true))
            .await;
        assert_eq!(second, FlowOutcome::InFlight);

        gate.notify_one();
        let first = first.await.unwrap();
        assert!(matches!(first, FlowOutcome::Success { .. }));
        assert_eq!(executor.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_confirms_claim_the_guard_once() {
        let gate = Arc::new(Notify::new());
        let executor = Arc::new(StubExecutor::gated(gate.clone()));
        let (flow, _) = flow(executor.clone());

        let mut set = tokio::task::JoinSet::new();
        for _ in 0..4 {
            let flow = flow.clone();
            set.spawn(async move {
                flow.confirm(ctx(ExecutionMethod::WithPk, Some(pk_signer()), true))
                    .await
            });
        }

        // The winner is parked on the gate, so the first three results are
        // the losers.
        for _ in 0..3 {
            let outcome = set.join_next().await.unwrap().unwrap();
            assert_eq!(outcome, FlowOutcome::InFlight);
        }

        gate.notify_one();
        let winner = set.join_next().await.unwrap().unwrap();
        assert!(matches!(winner, FlowOutcome::Success { .. }));
        assert_eq!(executor.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn registry_shares_one_flow_per_transaction() {
        let registry = FlowRegistry::new(Arc::new(StubExecutor::ok()), CancellationToken::new());

        let (a, _) = registry.obtain(1, "multisig_0xabc_0xdef");
        let (b, _) = registry.obtain(1, "multisig_0xabc_0xdef");
        assert!(Arc::ptr_eq(&a, &b));

        // Same tx id on another chain is a different flow.
        let (c, _) = registry.obtain(100, "multisig_0xabc_0xdef");
        assert!(!Arc::ptr_eq(&a, &c));

        registry.release(1, "multisig_0xabc_0xdef");
        let (d, _) = registry.obtain(1, "multisig_0xabc_0xdef");
        assert!(!Arc::ptr_eq(&a, &d));
    }

    #[tokio::test]
    async fn cancellation_suppresses_navigation_but_not_outcome() {
        let gate = Arc::new(Notify::new());
        let executor = Arc::new(StubExecutor::gated(gate.clone()));
        let recorder = Arc::new(RouteRecorder::default());
        let cancel = CancellationToken::new();
        let flow = Arc::new(ExecutionFlow::new(
            executor.clone(),
            recorder.clone(),
            cancel.clone(),
        ));

        let handle = {
            let flow = flow.clone();
            tokio::spawn(async move {
                flow.confirm(ctx(ExecutionMethod::WithPk, Some(pk_signer()), true))
                    .await
            })
        };

        while executor.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        // The owning screen goes away mid-flight.
        cancel.cancel();
        gate.notify_one();

        let outcome = handle.await.unwrap();
        assert!(matches!(outcome, FlowOutcome::Success { .. }));
        assert_eq!(recorder.last(), None);
    }
}
