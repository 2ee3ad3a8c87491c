// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Backend that splits populations and projections into parts and runs the
//! parts of each phase on a worker pool

use spikenet_npu_neural::{Result, SpikenetError, Step};
use tracing::info;

use super::{Backend, BackendCore};
use crate::executor::Executor;
use crate::thread_pool::ThreadPool;

pub const DEFAULT_POPULATION_PART_SIZE: usize = 1000;
pub const DEFAULT_PROJECTION_PART_SIZE: usize = 1000;

#[derive(Debug)]
pub struct MultiThreadedBackend {
    core: BackendCore,
    pool: ThreadPool,
    population_part_size: usize,
    projection_part_size: usize,
}

impl MultiThreadedBackend {
    /// `thread_count` 0 uses the available parallelism
    pub fn new(thread_count: usize) -> Result<Self> {
        Self::with_part_sizes(
            thread_count,
            DEFAULT_POPULATION_PART_SIZE,
            DEFAULT_PROJECTION_PART_SIZE,
        )
    }

    pub fn with_part_sizes(
        thread_count: usize,
        population_part_size: usize,
        projection_part_size: usize,
    ) -> Result<Self> {
        if population_part_size == 0 || projection_part_size == 0 {
            return Err(SpikenetError::Backend(
                "part sizes must be greater than zero".to_string(),
            ));
        }
        let pool = ThreadPool::new(thread_count).map_err(|e| SpikenetError::Backend(e.to_string()))?;
        info!(
            "[BACKEND] Multi-threaded backend: {} thread(s), parts of {} neurons / {} synapses",
            pool.thread_count(),
            population_part_size,
            projection_part_size
        );
        Ok(Self {
            core: BackendCore::new(),
            pool,
            population_part_size,
            projection_part_size,
        })
    }

    pub fn thread_count(&self) -> usize {
        self.pool.thread_count()
    }

    pub fn population_part_size(&self) -> usize {
        self.population_part_size
    }

    pub fn projection_part_size(&self) -> usize {
        self.projection_part_size
    }
}

impl Backend for MultiThreadedBackend {
    fn backend_name(&self) -> &'static str {
        "multi-threaded"
    }

    fn core(&self) -> &BackendCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BackendCore {
        &mut self.core
    }

    fn step(&mut self) -> Result<Step> {
        self.core.run_step(
            &Executor::Pool(&self.pool),
            self.population_part_size,
            self.projection_part_size,
        )
    }
}
