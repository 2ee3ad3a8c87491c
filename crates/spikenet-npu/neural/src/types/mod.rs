// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Core type definitions shared by every spikenet crate

pub mod error;
pub mod ids;
pub mod output;

pub use error::{Result, SpikenetError};
pub use ids::{Step, Uid};
pub use output::OutputType;
