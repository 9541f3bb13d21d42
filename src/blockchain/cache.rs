// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Execution Gateway Contributors

//! LRU cache for signer balance lookups.
//!
//! A confirmation screen re-checks funds on every fee re-estimate; caching
//! the balance per (chain, signer) for a short TTL avoids hammering the RPC
//! endpoint with identical queries.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use alloy::primitives::{Address, U256};
use lru::LruCache;

/// Cached entry: balance + insertion timestamp.
struct CacheEntry {
    balance: U256,
    inserted_at: Instant,
}

/// In-process LRU cache for hot signer-balance lookups.
pub struct BalanceCache {
    cache: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl BalanceCache {
    /// Create a new cache with the given capacity and TTL.
    ///
    /// - `capacity`: Max number of (chain, signer) pairs to cache.
    /// - `ttl`: Time-to-live for each cache entry.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap()),
            )),
            ttl,
        }
    }

    fn key(chain_id: u64, address: Address) -> String {
        format!("{chain_id}:{}", address.to_string().to_lowercase())
    }

    /// Get the cached balance for a signer on a chain.
    ///
    /// Returns `None` if not cached or expired.
    pub fn get(&self, chain_id: u64, address: Address) -> Option<U256> {
        let key = Self::key(chain_id, address);
        let mut cache = self.cache.lock().ok()?;
        if let Some(entry) = cache.get(&key) {
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(entry.balance);
            }
            // Expired — remove it
            cache.pop(&key);
        }
        None
    }

    /// Store a balance for a signer on a chain.
    pub fn put(&self, chain_id: u64, address: Address, balance: U256) {
        let key = Self::key(chain_id, address);
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(
                key,
                CacheEntry {
                    balance,
                    inserted_at: Instant::now(),
                },
            );
        }
    }

    /// Drop the cached balance for a signer on a chain.
    pub fn invalidate(&self, chain_id: u64, address: Address) {
        let key = Self::key(chain_id, address);
        if let Ok(mut cache) = self.cache.lock() {
            cache.pop(&key);
        }
    }
}
