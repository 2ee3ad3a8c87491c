// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikenet Network Model
//!
//! Typed containers for the simulated graph:
//! - [`Population`]: a fixed-size vector of neurons of one model
//! - [`Projection`]: a fixed-size vector of synapses of one model, from an
//!   optional presynaptic source to a postsynaptic population
//! - [`PopulationVariant`] / [`ProjectionVariant`]: closed sets of the
//!   supported models
//! - [`Network`]: populations and projections addressed by [`Uid`]
//!
//! Entities are built with the helpers in [`generators`].
//!
//! [`Uid`]: spikenet_npu_neural::Uid

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod generators;
pub mod network;
pub mod population;
pub mod projection;
pub mod variants;

pub use network::Network;
pub use population::Population;
pub use projection::Projection;
pub use variants::{PopulationModel, PopulationVariant, ProjectionModel, ProjectionVariant};
