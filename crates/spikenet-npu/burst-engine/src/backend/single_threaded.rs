// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Backend that runs every phase on the calling thread

use spikenet_npu_neural::{Result, Step};

use super::{Backend, BackendCore};
use crate::executor::Executor;

#[derive(Debug, Default)]
pub struct SingleThreadedBackend {
    core: BackendCore,
}

impl SingleThreadedBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for SingleThreadedBackend {
    fn backend_name(&self) -> &'static str {
        "single-threaded"
    }

    fn core(&self) -> &BackendCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BackendCore {
        &mut self.core
    }

    fn step(&mut self) -> Result<Step> {
        self.core.run_step(&Executor::Sequential, usize::MAX, usize::MAX)
    }
}
