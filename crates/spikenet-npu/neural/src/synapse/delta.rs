// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use super::SynapseModel;
use crate::types::OutputType;

/// Delta synapse: transmits its weight unchanged after `delay` steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaSynapse {
    pub weight: f32,
    pub delay: u32,
    pub output_type: OutputType,
}

impl DeltaSynapse {
    pub fn new(weight: f32, delay: u32, output_type: OutputType) -> Self {
        Self {
            weight,
            delay,
            output_type,
        }
    }

    pub fn excitatory(weight: f32, delay: u32) -> Self {
        Self::new(weight, delay, OutputType::Excitatory)
    }
}

impl Default for DeltaSynapse {
    fn default() -> Self {
        Self::excitatory(0.0, 1)
    }
}

impl SynapseModel for DeltaSynapse {
    const MODEL_NAME: &'static str = "Delta";

    #[inline]
    fn weight(&self) -> f32 {
        self.weight
    }

    #[inline]
    fn delay(&self) -> u32 {
        self.delay
    }

    #[inline]
    fn output_type(&self) -> OutputType {
        self.output_type
    }
}
