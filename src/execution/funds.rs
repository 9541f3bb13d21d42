// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Execution Gateway Contributors

//! Funds sufficiency checking.
//!
//! Decides whether the active signer can afford the estimated total fee.
//! Under relay the signer's balance is irrelevant and no query is issued.
//! When the inputs needed for a real check are missing (no signer, no chain,
//! fee still being estimated, or a failed balance query) the check reports
//! "sufficient" rather than blocking the user; whether that optimistic
//! default is the right call for failed queries is an open question recorded
//! in DESIGN.md.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::blockchain::cache::BalanceCache;
use crate::chains::Chain;

use super::types::{ExecutionMethod, FeeParams};

/// Result of a funds sufficiency check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundsCheck {
    /// Whether the signer can cover the total fee. Optimistically `true`
    /// whenever no concrete balance is known.
    pub has_sufficient_funds: bool,
    /// Whether the result is still an interim one (fee data in flight).
    pub is_checking: bool,
    /// The signer balance backing the decision, when one was fetched.
    pub signer_balance: Option<U256>,
}

impl FundsCheck {
    /// No data to evaluate; assume sufficient rather than block the user.
    pub fn optimistic() -> Self {
        Self {
            has_sufficient_funds: true,
            is_checking: false,
            signer_balance: None,
        }
    }

    /// Fee data still in flight; interim optimistic result.
    pub fn checking() -> Self {
        Self {
            has_sufficient_funds: true,
            is_checking: true,
            signer_balance: None,
        }
    }

    /// Concrete comparison. Equality counts as sufficient.
    pub fn resolved(balance: U256, total_fee: U256) -> Self {
        Self {
            has_sufficient_funds: balance >= total_fee,
            is_checking: false,
            signer_balance: Some(balance),
        }
    }
}

/// Errors from the balance-query collaborator.
#[derive(Debug, thiserror::Error)]
pub enum BalanceError {
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),
}

/// Seam for the native-balance query, so the checker can be exercised
/// without a live RPC endpoint.
#[async_trait]
pub trait BalanceProvider: Send + Sync {
    /// The signer's native balance on the given chain, in wei.
    async fn native_balance(&self, chain: &Chain, address: Address) -> Result<U256, BalanceError>;
}

/// Funds sufficiency checker with an in-process balance cache.
pub struct FundsChecker {
    provider: Arc<dyn BalanceProvider>,
    cache: BalanceCache,
}

impl FundsChecker {
    pub fn new(provider: Arc<dyn BalanceProvider>, cache: BalanceCache) -> Self {
        Self { provider, cache }
    }

    /// Drop the cached balance for a signer, forcing the next check to
    /// requery. Called after an execution that spent the signer's gas.
    pub fn invalidate(&self, chain_id: u64, address: Address) {
        self.cache.invalidate(chain_id, address);
    }

    /// Check whether `signer_address` can afford `fee.total_fee()`.
    ///
    /// Relayed executions short-circuit to sufficient without touching the
    /// provider. Missing signer or chain also short-circuits; a fee estimate
    /// still in flight reports an interim `is_checking` result.
    pub async fn check(
        &self,
        signer_address: Option<Address>,
        fee: &FeeParams,
        method: ExecutionMethod,
        chain: Option<&Chain>,
    ) -> FundsCheck {
        if method == ExecutionMethod::WithRelay {
            return FundsCheck::optimistic();
        }

        let (Some(address), Some(chain)) = (signer_address, chain) else {
            return FundsCheck::optimistic();
        };

        if fee.is_loading() {
            return FundsCheck::checking();
        }

        let total_fee = fee.total_fee();

        if let Some(balance) = self.cache.get(chain.chain_id, address) {
            return FundsCheck::resolved(balance, total_fee);
        }

        match self.provider.native_balance(chain, address).await {
            Ok(balance) => {
                self.cache.put(chain.chain_id, address, balance);
                FundsCheck::resolved(balance, total_fee)
            }
            Err(e) => {
                tracing::warn!(
                    chain_id = chain.chain_id,
                    signer = %address,
                    error = %e,
                    "Balance query failed, assuming sufficient funds"
                );
                FundsCheck::optimistic()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::chains::GNOSIS;

    use super::*;

    /// Provider returning a fixed balance and counting queries.
    struct FixedBalance {
        balance: U256,
        calls: AtomicUsize,
    }

    impl FixedBalance {
        fn new(balance: U256) -> Self {
            Self {
                balance,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl BalanceProvider for FixedBalance {
        async fn native_balance(
            &self,
            _chain: &Chain,
            _address: Address,
        ) -> Result<U256, BalanceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.balance)
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl BalanceProvider for FailingProvider {
        async fn native_balance(
            &self,
            _chain: &Chain,
            _address: Address,
        ) -> Result<U256, BalanceError> {
            Err(BalanceError::Rpc("connection refused".into()))
        }
    }

    fn checker(provider: Arc<dyn BalanceProvider>) -> FundsChecker {
        FundsChecker::new(provider, BalanceCache::new(16, Duration::from_secs(60)))
    }

    fn fee(total_fee_wei: u64) -> FeeParams {
        FeeParams {
            max_fee_per_gas: Some(U256::from(total_fee_wei)),
            gas_limit: Some(U256::from(1u64)),
            ..Default::default()
        }
    }

    fn addr() -> Address {
        "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12"
            .parse()
            .unwrap()
    }

    #[tokio::test]
    async fn relay_short_circuits_without_query() {
        let provider = Arc::new(FixedBalance::new(U256::ZERO));
        let result = checker(provider.clone())
            .check(
                Some(addr()),
                &fee(1_000),
                ExecutionMethod::WithRelay,
                Some(&GNOSIS),
            )
            .await;

        assert_eq!(result, FundsCheck::optimistic());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_signer_or_chain_is_optimistic() {
        let provider = Arc::new(FixedBalance::new(U256::ZERO));
        let checker = checker(provider.clone());

        let no_signer = checker
            .check(None, &fee(1_000), ExecutionMethod::WithPk, Some(&GNOSIS))
            .await;
        let no_chain = checker
            .check(Some(addr()), &fee(1_000), ExecutionMethod::WithPk, None)
            .await;

        assert_eq!(no_signer, FundsCheck::optimistic());
        assert_eq!(no_chain, FundsCheck::optimistic());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn loading_fee_reports_interim_checking() {
        let provider = Arc::new(FixedBalance::new(U256::from(1u64)));
        let mut loading = fee(1_000);
        loading.gas_limit_loading = true;

        let result = checker(provider.clone())
            .check(Some(addr()), &loading, ExecutionMethod::WithPk, Some(&GNOSIS))
            .await;

        assert_eq!(result, FundsCheck::checking());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn equal_balance_counts_as_sufficient() {
        let provider = Arc::new(FixedBalance::new(U256::from(1_000u64)));
        let result = checker(provider)
            .check(Some(addr()), &fee(1_000), ExecutionMethod::WithPk, Some(&GNOSIS))
            .await;

        assert!(result.has_sufficient_funds);
        assert!(!result.is_checking);
        assert_eq!(result.signer_balance, Some(U256::from(1_000u64)));
    }

    #[tokio::test]
    async fn lower_balance_is_insufficient() {
        let provider = Arc::new(FixedBalance::new(U256::from(999u64)));
        let result = checker(provider)
            .check(Some(addr()), &fee(1_000), ExecutionMethod::WithPk, Some(&GNOSIS))
            .await;

        assert!(!result.has_sufficient_funds);
        assert!(!result.is_checking);
    }

    #[tokio::test]
    async fn provider_failure_defaults_to_sufficient() {
        let result = checker(Arc::new(FailingProvider))
            .check(Some(addr()), &fee(1_000), ExecutionMethod::WithPk, Some(&GNOSIS))
            .await;

        assert_eq!(result, FundsCheck::optimistic());
    }

    #[tokio::test]
    async fn invalidate_forces_a_fresh_query() {
        let provider = Arc::new(FixedBalance::new(U256::from(5_000u64)));
        let checker = checker(provider.clone());

        checker
            .check(Some(addr()), &fee(1_000), ExecutionMethod::WithPk, Some(&GNOSIS))
            .await;
        checker.invalidate(GNOSIS.chain_id, addr());
        checker
            .check(Some(addr()), &fee(1_000), ExecutionMethod::WithPk, Some(&GNOSIS))
            .await;

        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn second_check_hits_the_cache() {
        let provider = Arc::new(FixedBalance::new(U256::from(5_000u64)));
        let checker = checker(provider.clone());

        let first = checker
            .check(Some(addr()), &fee(1_000), ExecutionMethod::WithPk, Some(&GNOSIS))
            .await;
        let second = checker
            .check(Some(addr()), &fee(1_000), ExecutionMethod::WithPk, Some(&GNOSIS))
            .await;

        assert_eq!(first, second);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }
}
