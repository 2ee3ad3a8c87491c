// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Where a phase's parts run: inline, or fanned out over a [`ThreadPool`].

use crate::thread_pool::ThreadPool;

#[derive(Debug, Clone, Copy)]
pub enum Executor<'p> {
    Sequential,
    Pool(&'p ThreadPool),
}

impl Executor<'_> {
    /// Split `items` into parts of `part_size` and run `task(offset, part)` on
    /// each, where `offset` is the index of the part's first item. Returns the
    /// per-part results in part order, after every part has finished.
    pub fn run_chunks<T, R, F>(&self, items: &mut [T], part_size: usize, task: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(usize, &mut [T]) -> R + Sync,
    {
        let part_size = part_size.max(1);
        match self {
            Executor::Sequential => items
                .chunks_mut(part_size)
                .enumerate()
                .map(|(index, part)| task(index * part_size, part))
                .collect(),
            Executor::Pool(pool) => {
                let parts: Vec<&mut [T]> = items.chunks_mut(part_size).collect();
                let mut results: Vec<Option<R>> = parts.iter().map(|_| None).collect();
                let task = &task;
                pool.scope(|batch| {
                    for (index, (part, slot)) in parts.into_iter().zip(results.iter_mut()).enumerate() {
                        batch.post(move || {
                            *slot = Some(task(index * part_size, part));
                        });
                    }
                });
                results.into_iter().flatten().collect()
            }
        }
    }
}
