// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Closed sets of supported population and projection models.
//!
//! Every operation on a variant dispatches with an exhaustive `match`, so
//! adding a model is a compile error at each site that must handle it.

use serde::{Deserialize, Serialize};
use spikenet_npu_neural::{
    BlifatNeuron, DeltaSynapse, NeuronModel, ResourceStdpDeltaSynapse, SynapseModel,
    SynapticResourceNeuron, Uid,
};

use crate::population::Population;
use crate::projection::Projection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PopulationVariant {
    Blifat(Population<BlifatNeuron>),
    SynapticResourceBlifat(Population<SynapticResourceNeuron>),
}

impl PopulationVariant {
    pub fn uid(&self) -> Uid {
        match self {
            PopulationVariant::Blifat(p) => p.uid(),
            PopulationVariant::SynapticResourceBlifat(p) => p.uid(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PopulationVariant::Blifat(p) => p.len(),
            PopulationVariant::SynapticResourceBlifat(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn model_name(&self) -> &'static str {
        match self {
            PopulationVariant::Blifat(_) => BlifatNeuron::MODEL_NAME,
            PopulationVariant::SynapticResourceBlifat(_) => SynapticResourceNeuron::MODEL_NAME,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProjectionVariant {
    Delta(Projection<DeltaSynapse>),
    SynapticResourceDelta(Projection<ResourceStdpDeltaSynapse>),
}

impl ProjectionVariant {
    pub fn uid(&self) -> Uid {
        match self {
            ProjectionVariant::Delta(p) => p.uid(),
            ProjectionVariant::SynapticResourceDelta(p) => p.uid(),
        }
    }

    pub fn presynaptic_uid(&self) -> Option<Uid> {
        match self {
            ProjectionVariant::Delta(p) => p.presynaptic_uid(),
            ProjectionVariant::SynapticResourceDelta(p) => p.presynaptic_uid(),
        }
    }

    pub fn postsynaptic_uid(&self) -> Uid {
        match self {
            ProjectionVariant::Delta(p) => p.postsynaptic_uid(),
            ProjectionVariant::SynapticResourceDelta(p) => p.postsynaptic_uid(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ProjectionVariant::Delta(p) => p.len(),
            ProjectionVariant::SynapticResourceDelta(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_plastic(&self) -> bool {
        matches!(self, ProjectionVariant::SynapticResourceDelta(_))
    }

    pub fn model_name(&self) -> &'static str {
        match self {
            ProjectionVariant::Delta(_) => DeltaSynapse::MODEL_NAME,
            ProjectionVariant::SynapticResourceDelta(_) => ResourceStdpDeltaSynapse::MODEL_NAME,
        }
    }

    /// Index of the first synapse with a delay of 0, if any
    pub fn zero_delay_synapse(&self) -> Option<usize> {
        match self {
            ProjectionVariant::Delta(p) => p.synapses().iter().position(|s| s.params.delay() == 0),
            ProjectionVariant::SynapticResourceDelta(p) => {
                p.synapses().iter().position(|s| s.params.delay() == 0)
            }
        }
    }

    /// `(source, target)` of every synapse, in synapse order
    pub fn endpoints(&self) -> Vec<(u32, u32)> {
        match self {
            ProjectionVariant::Delta(p) => p.synapses().iter().map(|s| (s.source, s.target)).collect(),
            ProjectionVariant::SynapticResourceDelta(p) => {
                p.synapses().iter().map(|s| (s.source, s.target)).collect()
            }
        }
    }
}

/// Neuron models that have a [`PopulationVariant`] alternative
pub trait PopulationModel: NeuronModel {
    fn wrap(population: Population<Self>) -> PopulationVariant;

    fn extract(variant: &PopulationVariant) -> Option<&Population<Self>>;

    fn extract_mut(variant: &mut PopulationVariant) -> Option<&mut Population<Self>>;
}

/// Synapse models that have a [`ProjectionVariant`] alternative
pub trait ProjectionModel: SynapseModel {
    fn wrap(projection: Projection<Self>) -> ProjectionVariant;

    fn extract(variant: &ProjectionVariant) -> Option<&Projection<Self>>;

    fn extract_mut(variant: &mut ProjectionVariant) -> Option<&mut Projection<Self>>;
}

macro_rules! impl_variant_model {
    ($trait:ident, $variant_enum:ident, $container:ident, $model:ty, $alternative:ident) => {
        impl $trait for $model {
            fn wrap(inner: $container<Self>) -> $variant_enum {
                $variant_enum::$alternative(inner)
            }

            fn extract(variant: &$variant_enum) -> Option<&$container<Self>> {
                match variant {
                    $variant_enum::$alternative(inner) => Some(inner),
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }

            fn extract_mut(variant: &mut $variant_enum) -> Option<&mut $container<Self>> {
                match variant {
                    $variant_enum::$alternative(inner) => Some(inner),
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }
        }

        impl From<$container<$model>> for $variant_enum {
            fn from(inner: $container<$model>) -> Self {
                $variant_enum::$alternative(inner)
            }
        }
    };
}

impl_variant_model!(PopulationModel, PopulationVariant, Population, BlifatNeuron, Blifat);
impl_variant_model!(
    PopulationModel,
    PopulationVariant,
    Population,
    SynapticResourceNeuron,
    SynapticResourceBlifat
);
impl_variant_model!(ProjectionModel, ProjectionVariant, Projection, DeltaSynapse, Delta);
impl_variant_model!(
    ProjectionModel,
    ProjectionVariant,
    Projection,
    ResourceStdpDeltaSynapse,
    SynapticResourceDelta
);
