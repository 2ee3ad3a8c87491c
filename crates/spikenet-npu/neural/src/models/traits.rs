// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::types::{OutputType, Step};

/// Per-neuron state machine driven once per step by a backend.
///
/// Implementations are plain data so populations can be split into
/// disjoint chunks and updated from worker threads.
pub trait NeuronModel: Clone + Send + Sync + 'static {
    /// Human-readable model name for logging and error messages
    const MODEL_NAME: &'static str;

    /// First phase of a step, before any impact is applied
    fn pre_impact_update(&mut self);

    /// Integrate a single synaptic impact
    fn apply_impact(&mut self, amplitude: f32, output_type: OutputType);

    /// Spike detection. Returns `true` when the neuron fires at `step`.
    fn post_impact_update(&mut self, step: Step) -> bool;

    fn potential(&self) -> f32;

    /// Dopamine accumulated during the current step
    fn dopamine_value(&self) -> f32;
}
