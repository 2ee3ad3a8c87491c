// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Thread Pool
//!
//! Fixed-size worker pool over a dedicated `rayon::ThreadPool`, with a
//! wait-group barrier:
//!
//! - `post` + `join`: fire-and-forget `'static` tasks, then block until every
//!   posted task has finished
//! - `scope`: tasks that borrow from the caller, barrier on return
//!
//! Tasks are leaf work units. A task must not join on the pool it runs on.

use std::sync::Arc;

use parking_lot::{Condvar, Mutex};
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
pub enum ThreadPoolError {
    #[error("Failed to build worker pool: {0}")]
    Build(#[from] rayon::ThreadPoolBuildError),
}

/// Count of posted tasks that have not finished yet
#[derive(Debug, Default)]
struct PendingTasks {
    count: Mutex<usize>,
    all_done: Condvar,
}

impl PendingTasks {
    fn add(&self) {
        *self.count.lock() += 1;
    }

    fn done(&self) {
        let mut count = self.count.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.all_done.notify_all();
        }
    }

    fn wait(&self) {
        let mut count = self.count.lock();
        while *count > 0 {
            self.all_done.wait(&mut count);
        }
    }
}

/// Marks a task finished even if it panics
struct TaskGuard(Arc<PendingTasks>);

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.0.done();
    }
}

pub struct ThreadPool {
    pool: rayon::ThreadPool,
    pending: Arc<PendingTasks>,
    thread_count: usize,
}

impl ThreadPool {
    /// Build a pool with `thread_count` workers (0 = available parallelism)
    pub fn new(thread_count: usize) -> Result<Self, ThreadPoolError> {
        let thread_count = if thread_count == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            thread_count
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(thread_count)
            .thread_name(|index| format!("spikenet-worker-{}", index))
            .panic_handler(|_| error!("[THREAD-POOL] Worker task panicked"))
            .build()?;

        info!("[THREAD-POOL] Started {} worker thread(s)", thread_count);
        Ok(Self {
            pool,
            pending: Arc::new(PendingTasks::default()),
            thread_count,
        })
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// Enqueue a task. Returns immediately.
    pub fn post<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.pending.add();
        let guard = TaskGuard(Arc::clone(&self.pending));
        self.pool.spawn(move || {
            let _guard = guard;
            task();
        });
    }

    /// Block until every task posted so far has completed
    pub fn join(&self) {
        self.pending.wait();
    }

    /// Run `f` with a [`TaskBatch`] whose tasks may borrow from the caller.
    /// Returns once `f` and every task it posted have completed.
    pub fn scope<'scope, F, R>(&self, f: F) -> R
    where
        F: FnOnce(&TaskBatch<'_, 'scope>) -> R + Send,
        R: Send,
    {
        self.pool.scope(|scope| f(&TaskBatch { scope }))
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.join();
    }
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("thread_count", &self.thread_count)
            .finish()
    }
}

/// Task sink handed out by [`ThreadPool::scope`]
pub struct TaskBatch<'a, 'scope> {
    scope: &'a rayon::Scope<'scope>,
}

impl<'a, 'scope> TaskBatch<'a, 'scope> {
    pub fn post<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'scope,
    {
        self.scope.spawn(move |_| task());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_join_waits_for_all_posted_tasks() {
        let pool = ThreadPool::new(4).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..100 {
            let counter = Arc::clone(&counter);
            pool.post(move || {
                std::thread::sleep(std::time::Duration::from_micros(50));
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        pool.join();
        assert_eq!(counter.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn test_pool_is_reusable_across_phases() {
        let pool = ThreadPool::new(2).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        for phase in 1..=3 {
            for _ in 0..10 {
                let counter = Arc::clone(&counter);
                pool.post(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                });
            }
            pool.join();
            assert_eq!(counter.load(Ordering::SeqCst), phase * 10);
        }
    }

    #[test]
    fn test_join_without_tasks_returns() {
        let pool = ThreadPool::new(1).unwrap();
        pool.join();
        assert_eq!(pool.thread_count(), 1);
    }

    #[test]
    fn test_zero_threads_uses_available_parallelism() {
        let pool = ThreadPool::new(0).unwrap();
        assert!(pool.thread_count() >= 1);
    }

    #[test]
    fn test_scope_tasks_write_disjoint_chunks() {
        let pool = ThreadPool::new(3).unwrap();
        let mut values = vec![0u32; 64];
        pool.scope(|batch| {
            for (index, chunk) in values.chunks_mut(10).enumerate() {
                batch.post(move || {
                    for value in chunk.iter_mut() {
                        *value = index as u32;
                    }
                });
            }
        });
        assert_eq!(values[0], 0);
        assert_eq!(values[15], 1);
        assert_eq!(values[63], 6);
    }

    #[test]
    fn test_drop_joins_outstanding_tasks() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let pool = ThreadPool::new(2).unwrap();
            for _ in 0..20 {
                let counter = Arc::clone(&counter);
                pool.post(move || {
                    std::thread::sleep(std::time::Duration::from_micros(100));
                    counter.fetch_add(1, Ordering::SeqCst);
                });
            }
        }
        assert_eq!(counter.load(Ordering::SeqCst), 20);
    }
}
