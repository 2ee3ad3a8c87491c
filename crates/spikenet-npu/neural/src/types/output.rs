// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// How a synaptic impact acts on its postsynaptic neuron
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OutputType {
    /// Adds the amplitude to the membrane potential
    #[default]
    Excitatory,
    /// Subtracts the amplitude from the membrane potential
    Inhibitory,
    /// Feeds the neuron's dopamine value, read by plasticity
    Dopamine,
    /// Blocks firing for `amplitude` steps
    Blocking,
}
