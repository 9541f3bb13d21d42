// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Execution Gateway Contributors

//! Execution Gateway - Multisig Wallet Transaction Execution Service
//!
//! This crate decides how a confirmed multisig transaction gets submitted
//! on-chain and which confirmation flow the client must route through:
//! relay-sponsored submission, local private-key signing, or a hardware
//! signer, with an optional biometric gate in front of local signing.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `execution` - Method resolution, funds checks, path classification,
//!   and the confirm/execute flow orchestrator
//! - `blockchain` - EVM balance queries (alloy) and the in-process cache
//! - `chains` - Supported chain configurations and feature flags
//! - `relay` - Relay-service quota client

pub mod api;
pub mod blockchain;
pub mod chains;
pub mod config;
pub mod error;
pub mod execution;
pub mod executor;
pub mod relay;
pub mod state;
