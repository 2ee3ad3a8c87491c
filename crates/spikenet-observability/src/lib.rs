// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikenet-observability
//!
//! Logging setup shared by the spikenet binaries, with per-crate debug flag
//! support.
//!
//! ## Features
//! - `file-logging`: timestamped file logs next to the console output

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Known spikenet crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "spikenet",
    "spikenet-config",
    "spikenet-npu-neural",
    "spikenet-npu-messaging",
    "spikenet-npu-network",
    "spikenet-npu-plasticity",
    "spikenet-npu-burst-engine",
];
