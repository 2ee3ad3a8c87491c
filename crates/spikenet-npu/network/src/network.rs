// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Network container
//!
//! Holds populations and projections in insertion order. References between
//! projections and populations are not checked here; backends validate them
//! when a network is loaded.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use spikenet_npu_neural::{Result, SpikenetError, Uid};
use tracing::debug;

use crate::population::Population;
use crate::projection::Projection;
use crate::variants::{PopulationModel, PopulationVariant, ProjectionModel, ProjectionVariant};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    uid: Uid,
    /// Free-form annotations, e.g. the generator that built the network
    #[serde(default)]
    tags: BTreeMap<String, String>,
    populations: Vec<PopulationVariant>,
    projections: Vec<ProjectionVariant>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_uid(uid: Uid) -> Self {
        Self {
            uid,
            ..Self::default()
        }
    }

    pub fn uid(&self) -> Uid {
        self.uid
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    pub fn tags_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.tags
    }

    /// Add a population, replacing any population with the same uid.
    /// Returns the population uid.
    pub fn add_population(&mut self, population: impl Into<PopulationVariant>) -> Uid {
        let population = population.into();
        let uid = population.uid();
        match self.populations.iter_mut().find(|p| p.uid() == uid) {
            Some(existing) => *existing = population,
            None => self.populations.push(population),
        }
        debug!("[NETWORK] Added population {}", uid);
        uid
    }

    /// Add a projection, replacing any projection with the same uid.
    /// Returns the projection uid.
    pub fn add_projection(&mut self, projection: impl Into<ProjectionVariant>) -> Uid {
        let projection = projection.into();
        let uid = projection.uid();
        match self.projections.iter_mut().find(|p| p.uid() == uid) {
            Some(existing) => *existing = projection,
            None => self.projections.push(projection),
        }
        debug!("[NETWORK] Added projection {}", uid);
        uid
    }

    pub fn population(&self, uid: Uid) -> Result<&PopulationVariant> {
        self.populations
            .iter()
            .find(|p| p.uid() == uid)
            .ok_or(SpikenetError::PopulationNotFound(uid))
    }

    pub fn projection(&self, uid: Uid) -> Result<&ProjectionVariant> {
        self.projections
            .iter()
            .find(|p| p.uid() == uid)
            .ok_or(SpikenetError::ProjectionNotFound(uid))
    }

    /// Typed population lookup
    pub fn get_population<N: PopulationModel>(&self, uid: Uid) -> Result<&Population<N>> {
        N::extract(self.population(uid)?).ok_or(SpikenetError::ModelMismatch {
            uid,
            expected: N::MODEL_NAME,
        })
    }

    pub fn get_population_mut<N: PopulationModel>(&mut self, uid: Uid) -> Result<&mut Population<N>> {
        let variant = self
            .populations
            .iter_mut()
            .find(|p| p.uid() == uid)
            .ok_or(SpikenetError::PopulationNotFound(uid))?;
        N::extract_mut(variant).ok_or(SpikenetError::ModelMismatch {
            uid,
            expected: N::MODEL_NAME,
        })
    }

    /// Typed projection lookup
    pub fn get_projection<S: ProjectionModel>(&self, uid: Uid) -> Result<&Projection<S>> {
        S::extract(self.projection(uid)?).ok_or(SpikenetError::ModelMismatch {
            uid,
            expected: S::MODEL_NAME,
        })
    }

    pub fn get_projection_mut<S: ProjectionModel>(&mut self, uid: Uid) -> Result<&mut Projection<S>> {
        let variant = self
            .projections
            .iter_mut()
            .find(|p| p.uid() == uid)
            .ok_or(SpikenetError::ProjectionNotFound(uid))?;
        S::extract_mut(variant).ok_or(SpikenetError::ModelMismatch {
            uid,
            expected: S::MODEL_NAME,
        })
    }

    pub fn remove_population(&mut self, uid: Uid) -> Result<PopulationVariant> {
        let index = self
            .populations
            .iter()
            .position(|p| p.uid() == uid)
            .ok_or(SpikenetError::PopulationNotFound(uid))?;
        Ok(self.populations.remove(index))
    }

    pub fn remove_projection(&mut self, uid: Uid) -> Result<ProjectionVariant> {
        let index = self
            .projections
            .iter()
            .position(|p| p.uid() == uid)
            .ok_or(SpikenetError::ProjectionNotFound(uid))?;
        Ok(self.projections.remove(index))
    }

    pub fn populations(&self) -> &[PopulationVariant] {
        &self.populations
    }

    pub fn projections(&self) -> &[ProjectionVariant] {
        &self.projections
    }

    pub fn population_count(&self) -> usize {
        self.populations.len()
    }

    pub fn projection_count(&self) -> usize {
        self.projections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.populations.is_empty() && self.projections.is_empty()
    }

    /// Split into populations and projections, in insertion order
    pub fn into_parts(self) -> (Vec<PopulationVariant>, Vec<ProjectionVariant>) {
        (self.populations, self.projections)
    }

    /// Assemble a network with a fresh uid and no tags
    pub fn from_parts(populations: Vec<PopulationVariant>, projections: Vec<ProjectionVariant>) -> Self {
        Self {
            populations,
            projections,
            ..Self::default()
        }
    }
}
