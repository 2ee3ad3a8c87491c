// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Neuron Model Architecture
//!
//! Neuron models implement [`NeuronModel`], which splits one simulation step
//! into the three phases the backends schedule separately:
//!
//! 1. `pre_impact_update` - leak toward rest, decay the dynamic threshold
//! 2. `apply_impact` - integrate each synaptic impact addressed to the neuron
//! 3. `post_impact_update` - spike detection and reset
//!
//! ## Adding a New Neuron Model
//!
//! 1. Create `src/models/your_model.rs`
//! 2. Implement `NeuronModel`
//! 3. Add a population variant for it in `spikenet-npu-network`

pub mod blifat;
pub mod synaptic_resource;
pub mod traits;

pub use blifat::BlifatNeuron;
pub use synaptic_resource::SynapticResourceNeuron;
pub use traits::NeuronModel;
