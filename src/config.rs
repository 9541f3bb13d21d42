// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Execution Gateway Contributors

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `RELAY_BASE_URL` | Relay service base URL for quota checks | `http://localhost:8081/` |
//! | `EXECUTOR_BASE_URL` | Signing/broadcast service base URL | `http://localhost:8082/` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the relay service base URL.
///
/// The relay service sponsors gas for relayed executions and exposes the
/// per-account quota endpoint consulted before choosing `WITH_RELAY`.
pub const RELAY_BASE_URL_ENV: &str = "RELAY_BASE_URL";

/// Environment variable name for the signing/broadcast service base URL.
///
/// Signing and broadcast are owned by an upstream service; this gateway only
/// sequences the confirm flow and forwards the execute call.
pub const EXECUTOR_BASE_URL_ENV: &str = "EXECUTOR_BASE_URL";

/// Environment variable name for the log output format (`json` or `pretty`).
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default server bind address.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server bind port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default relay service base URL (local development).
pub const DEFAULT_RELAY_BASE_URL: &str = "http://localhost:8081/";

/// Default signing/broadcast service base URL (local development).
pub const DEFAULT_EXECUTOR_BASE_URL: &str = "http://localhost:8082/";
