// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # BLIFAT Neuron Model
//!
//! Leaky integrate-and-fire neuron with an adaptive threshold and support for
//! blocking and dopamine impacts.
//!
//! ## Model Dynamics
//!
//! ```text
//! Pre-impact:
//!     V = V_rest + (V - V_rest) × potential_decay
//!     θ_dyn = θ_dyn × threshold_decay
//!
//! Impact (per synaptic impact of amplitude a):
//!     Excitatory  V += a
//!     Inhibitory  V -= a
//!     Blocking    blocked_steps = max(blocked_steps, a)
//!     Dopamine    dopamine += a
//!
//! Post-impact:
//!     if blocked_steps > 0:
//!         blocked_steps -= 1, no spike
//!     else if steps_since_last_firing > refractory and V ≥ θ + θ_dyn:
//!         FIRE: V = V_reset, θ_dyn += threshold_increment
//!     V = max(V, V_min)
//! ```

use serde::{Deserialize, Serialize};

use super::traits::NeuronModel;
use crate::types::{OutputType, Step};

/// BLIFAT neuron state and parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlifatNeuron {
    pub potential: f32,
    /// Additive offset over `activation_threshold`
    pub dynamic_threshold: f32,
    pub threshold_decay: f32,
    pub threshold_increment: f32,
    /// Fraction of `(V - V_rest)` kept per step
    pub potential_decay: f32,
    pub resting_potential: f32,
    pub potential_reset_value: f32,
    pub min_potential: f32,
    pub activation_threshold: f32,
    pub absolute_refractory_period: u32,
    pub steps_since_last_firing: u64,
    pub blocked_steps: u32,
    pub dopamine_value: f32,
}

impl BlifatNeuron {
    pub fn new() -> Self {
        Self::default()
    }

    /// Neuron with the given firing threshold and default parameters
    pub fn with_threshold(activation_threshold: f32) -> Self {
        Self {
            activation_threshold,
            ..Self::default()
        }
    }

    /// Effective firing threshold for the current step
    #[inline]
    pub fn firing_threshold(&self) -> f32 {
        self.activation_threshold + self.dynamic_threshold
    }

    #[inline]
    pub fn is_refractory(&self) -> bool {
        self.steps_since_last_firing <= u64::from(self.absolute_refractory_period)
    }
}

impl Default for BlifatNeuron {
    fn default() -> Self {
        Self {
            potential: 0.0,
            dynamic_threshold: 0.0,
            threshold_decay: 0.0,
            threshold_increment: 0.0,
            potential_decay: 0.0,
            resting_potential: 0.0,
            potential_reset_value: 0.0,
            min_potential: -1.0e9,
            activation_threshold: 1.0,
            absolute_refractory_period: 0,
            // Never fired: far outside any refractory window
            steps_since_last_firing: u64::MAX / 2,
            blocked_steps: 0,
            dopamine_value: 0.0,
        }
    }
}

impl NeuronModel for BlifatNeuron {
    const MODEL_NAME: &'static str = "BLIFAT";

    #[inline]
    fn pre_impact_update(&mut self) {
        self.steps_since_last_firing = self.steps_since_last_firing.saturating_add(1);
        self.potential =
            self.resting_potential + (self.potential - self.resting_potential) * self.potential_decay;
        self.dynamic_threshold *= self.threshold_decay;
        self.dopamine_value = 0.0;
    }

    #[inline]
    fn apply_impact(&mut self, amplitude: f32, output_type: OutputType) {
        match output_type {
            OutputType::Excitatory => self.potential += amplitude,
            OutputType::Inhibitory => self.potential -= amplitude,
            OutputType::Blocking => {
                let steps = amplitude.max(0.0).round() as u32;
                self.blocked_steps = self.blocked_steps.max(steps);
            }
            OutputType::Dopamine => self.dopamine_value += amplitude,
        }
    }

    #[inline]
    fn post_impact_update(&mut self, _step: Step) -> bool {
        let mut fired = false;
        if self.blocked_steps > 0 {
            self.blocked_steps -= 1;
        } else if !self.is_refractory() && self.potential >= self.firing_threshold() {
            fired = true;
            self.potential = self.potential_reset_value;
            self.dynamic_threshold += self.threshold_increment;
            self.steps_since_last_firing = 0;
        }
        self.potential = self.potential.max(self.min_potential);
        fired
    }

    fn potential(&self) -> f32 {
        self.potential
    }

    fn dopamine_value(&self) -> f32 {
        self.dopamine_value
    }
}
