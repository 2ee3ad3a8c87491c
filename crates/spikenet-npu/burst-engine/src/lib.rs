// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # spikenet Burst Engine
//!
//! Executes the per-step pipeline over a loaded network:
//!
//! ```text
//! step():
//!   1. populations   unload impacts → pre-impact → impact → post-impact → send spikes
//!   2. route         bus delivers spikes, backend endpoint receives
//!   3. projections   unload spikes → impacts into delay queue (+ plasticity) → send due impacts
//!   4. route         bus delivers impacts
//!   5. advance step counter
//! ```
//!
//! Two backends implement [`Backend`]: [`SingleThreadedBackend`] runs every
//! phase on the calling thread, [`MultiThreadedBackend`] splits populations
//! and projections into fixed-size parts and runs them on a [`ThreadPool`].
//! Part results are merged in part order after each join, so both backends
//! produce identical spike sequences.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod backend;
pub mod executor;
pub mod population_dynamics;
pub mod synaptic_propagation;
pub mod thread_pool;

pub use backend::{
    create_backend, Backend, BackendCore, MultiThreadedBackend, NetworkData, SingleThreadedBackend,
};
pub use executor::Executor;
pub use synaptic_propagation::DelayQueue;
pub use thread_pool::{TaskBatch, ThreadPool, ThreadPoolError};
