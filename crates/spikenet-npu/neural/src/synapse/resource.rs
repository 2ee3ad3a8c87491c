// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Synaptic Resource
//!
//! A plastic synapse stores its strength as an unbounded resource `r`; the
//! weight is a saturating function of it:
//!
//! ```text
//! w(r) = w_min + (w_max - w_min) × r / (w_max - w_min + r),   r ≥ 0
//! r(w) = (w - w_min)(w_max - w_min) / (w_max - w)
//! ```
//!
//! `r(w)` is `-∞` below `w_min` and `+∞` at or above `w_max`; `w(r)` maps
//! `+∞` back to `w_max` and never yields NaN.

use serde::{Deserialize, Serialize};

use super::delta::DeltaSynapse;
use super::SynapseModel;
use crate::types::{OutputType, Step};

/// Initial weights are clamped to this fraction of `w_max` so the derived
/// resource stays finite.
pub const MAX_WEIGHT_FRACTION: f32 = 0.96875;

/// Resource equivalent of `weight` in `[w_min, w_max)`
pub fn resource_from_weight(weight: f32, w_min: f32, w_max: f32) -> f32 {
    if weight < w_min {
        return f32::NEG_INFINITY;
    }
    if weight >= w_max {
        return f32::INFINITY;
    }
    (weight - w_min) * (w_max - w_min) / (w_max - weight)
}

/// Weight equivalent of `resource`
pub fn weight_from_resource(resource: f32, w_min: f32, w_max: f32) -> f32 {
    let range = w_max - w_min;
    if range <= 0.0 || resource.is_nan() {
        return w_min;
    }
    let resource = resource.max(0.0);
    if resource.is_infinite() {
        return w_max;
    }
    w_min + range * resource / (range + resource)
}

/// Learning state of one synaptic-resource synapse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynapticResourceRule {
    pub synaptic_resource: f32,
    pub w_min: f32,
    pub w_max: f32,
    /// Unconditional resource change per presynaptic spike
    pub d_u: f32,
    /// Step at which the rule was last evaluated
    pub last_spike_step: Option<Step>,
    pub dopamine_plasticity_period: u64,
}

impl SynapticResourceRule {
    /// Add `delta` to the resource, saturating at `±f32::MAX`
    pub fn add_resource(&mut self, delta: f32) {
        let sum = self.synaptic_resource + delta;
        self.synaptic_resource = if sum.is_nan() {
            0.0
        } else {
            sum.clamp(-f32::MAX, f32::MAX)
        };
    }

    pub fn weight(&self) -> f32 {
        weight_from_resource(self.synaptic_resource, self.w_min, self.w_max)
    }

    /// Steps since the last evaluation, 0 if never evaluated
    pub fn elapsed(&self, step: Step) -> u64 {
        self.last_spike_step
            .map(|last| step.saturating_sub(last))
            .unwrap_or(0)
    }

    /// Whether fewer than `dopamine_plasticity_period` steps passed since
    /// the last evaluation. Never true for a period of 0.
    pub fn within_dopamine_period(&self, step: Step) -> bool {
        match self.last_spike_step {
            Some(last) => step.saturating_sub(last) < self.dopamine_plasticity_period,
            None => false,
        }
    }
}

/// Delta synapse whose weight is driven by a [`SynapticResourceRule`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceStdpDeltaSynapse {
    pub delta: DeltaSynapse,
    pub rule: SynapticResourceRule,
}

impl ResourceStdpDeltaSynapse {
    /// Build a plastic synapse. The weight is clamped into
    /// `[w_min, MAX_WEIGHT_FRACTION × w_max]` before the resource is derived.
    pub fn new(
        weight: f32,
        delay: u32,
        output_type: OutputType,
        w_min: f32,
        w_max: f32,
        d_u: f32,
        dopamine_plasticity_period: u64,
    ) -> Self {
        let upper = (MAX_WEIGHT_FRACTION * w_max).max(w_min);
        let weight = weight.max(w_min).min(upper);
        let rule = SynapticResourceRule {
            synaptic_resource: resource_from_weight(weight, w_min, w_max),
            w_min,
            w_max,
            d_u,
            last_spike_step: None,
            dopamine_plasticity_period,
        };
        Self {
            delta: DeltaSynapse::new(weight, delay, output_type),
            rule,
        }
    }

    /// Re-derive the transmitted weight from the current resource
    pub fn sync_weight(&mut self) {
        self.delta.weight = self.rule.weight();
    }
}

impl SynapseModel for ResourceStdpDeltaSynapse {
    const MODEL_NAME: &'static str = "SynapticResourceSTDPDelta";

    #[inline]
    fn weight(&self) -> f32 {
        self.delta.weight
    }

    #[inline]
    fn delay(&self) -> u32 {
        self.delta.delay
    }

    #[inline]
    fn output_type(&self) -> OutputType {
        self.delta.output_type
    }
}
