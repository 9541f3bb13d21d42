// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Execution Gateway Contributors

//! Blockchain integration: native-balance queries over alloy HTTP providers
//! and the in-process balance cache in front of them.

pub mod cache;
pub mod client;

pub use cache::BalanceCache;
pub use client::{ChainClient, RpcBalanceProvider};

use alloy::primitives::U256;

/// Format wei (or token units) to a human-readable amount.
///
/// Truncates to at most 6 decimal places for display.
pub fn format_amount(amount: U256, decimals: u8) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder.is_zero() {
        whole.to_string()
    } else {
        let decimal_str = format!("{:0>width$}", remainder, width = decimals as usize);
        let trimmed = decimal_str.trim_end_matches('0');
        if trimmed.is_empty() {
            whole.to_string()
        } else {
            format!("{}.{}", whole, &trimmed[..trimmed.len().min(6)])
        }
    }
}
