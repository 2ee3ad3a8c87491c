// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for spikenet operations

use super::ids::Uid;

/// Error types for network construction and simulation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpikenetError {
    #[error("Population not found: {0}")]
    PopulationNotFound(Uid),

    #[error("Projection not found: {0}")]
    ProjectionNotFound(Uid),

    #[error("Entity {uid} does not hold the requested model {expected}")]
    ModelMismatch { uid: Uid, expected: &'static str },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Invalid network: {0}")]
    InvalidNetwork(String),

    #[error("Projection {projection}: neuron index {index} out of range for population of size {size}")]
    NeuronIndexOutOfRange {
        projection: Uid,
        index: u32,
        size: usize,
    },

    #[error("Backend error: {0}")]
    Backend(String),
}

pub type Result<T> = core::result::Result<T, SpikenetError>;
