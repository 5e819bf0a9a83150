//
// Licensed to the Apache Software Foundation (ASF) under one or more
// contributor license agreements.  See the NOTICE file distributed with
// this work for additional information regarding copyright ownership.
// The ASF licenses this file to You under the Apache License, Version 2.0
// (the "License"); you may not use this file except in compliance with
// the License.  You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Host-parallel baseline: contiguous chunks on a fixed-size rayon pool, joined once.

use std::ops::Range;

use rayon::{ThreadPool, ThreadPoolBuilder};
use vecbench_kernels::Element;

use crate::error::{Result, VecBenchError};

/// Worker count used when the requested count is 0 or hardware concurrency is unknown.
pub const DEFAULT_WORKERS: usize = 4;

/// Split `[0, len)` into `workers` contiguous ranges of `len / workers` elements;
/// the last range also takes the remainder. Ranges may be empty when `len < workers`.
pub fn partition(len: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let chunk = len / workers;
    (0..workers)
        .map(|i| {
            let start = i * chunk;
            let end = if i + 1 == workers { len } else { start + chunk };
            start..end
        })
        .collect()
}

/// `Some(0)` and unknown hardware concurrency fall back to [`DEFAULT_WORKERS`].
pub fn resolve_worker_count(requested: Option<usize>) -> usize {
    match requested {
        Some(0) => {
            log::warn!("Worker count 0 requested, using {DEFAULT_WORKERS}");
            DEFAULT_WORKERS
        }
        Some(n) => n,
        None => match std::thread::available_parallelism() {
            Ok(n) => n.get(),
            Err(e) => {
                log::warn!("Hardware concurrency unavailable ({e}), using {DEFAULT_WORKERS}");
                DEFAULT_WORKERS
            }
        },
    }
}

/// Fixed pool of host workers. `run` spawns one task per non-empty chunk and
/// returns after all of them have finished.
pub struct HostParallelExecutor {
    pool: ThreadPool,
    workers: usize,
}

impl HostParallelExecutor {
    pub fn new(requested: Option<usize>) -> Result<Self> {
        let workers = resolve_worker_count(requested);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("vecbench-host-{i}"))
            .build()
            .map_err(|e| {
                VecBenchError::Resource(format!("Couldn't start {workers} host workers: {e}"))
            })?;
        log::debug!("Host pool ready with {workers} workers");
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// `out[i] = a[i] + b[i]` across the pool.
    pub fn run(&self, a: &[Element], b: &[Element], out: &mut [Element]) -> Result<()> {
        crate::profile_scope!("Host::VectorAdd");

        if a.len() != out.len() || b.len() != out.len() {
            return Err(VecBenchError::InvalidInput(format!(
                "host inputs of {} and {} elements for an output of {}",
                a.len(),
                b.len(),
                out.len()
            )));
        }

        let ranges = partition(out.len(), self.workers);
        self.pool.scope(|s| {
            let mut rest = out;
            for range in ranges {
                let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
                rest = tail;
                if chunk.is_empty() {
                    continue;
                }
                let (a, b) = (&a[range.clone()], &b[range]);
                s.spawn(move |_| vecbench_kernels::vector_add_host(a, b, chunk));
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(len: usize, workers: usize) {
        let ranges = partition(len, workers);
        assert_eq!(ranges.len(), workers.max(1));
        let mut next = 0;
        for r in &ranges {
            assert_eq!(r.start, next, "gap or overlap at {next} (len={len}, workers={workers})");
            assert!(r.end >= r.start);
            next = r.end;
        }
        assert_eq!(next, len);
    }

    #[test]
    fn partition_total_and_disjoint() {
        for len in [0, 1, 2, 3, 7, 8, 15, 16, 1000, 1_000_003] {
            for workers in 1..=17 {
                assert_covers(len, workers);
            }
        }
    }

    #[test]
    fn last_chunk_absorbs_remainder() {
        let ranges = partition(10, 4);
        let sizes: Vec<usize> = ranges.iter().map(|r| r.len()).collect();
        assert_eq!(sizes, vec![2, 2, 2, 4]);

        let sizes: Vec<usize> = partition(9, 4).iter().map(|r| r.len()).collect();
        assert_eq!(sizes, vec![2, 2, 2, 3]);

        let ranges = partition(3, 4);
        let sizes: Vec<usize> = ranges.iter().map(|r| r.len()).collect();
        assert_eq!(sizes, vec![0, 0, 0, 3]);
    }

    #[test]
    fn zero_workers_falls_back() {
        assert_eq!(resolve_worker_count(Some(0)), DEFAULT_WORKERS);
        assert_eq!(resolve_worker_count(Some(3)), 3);
        assert!(resolve_worker_count(None) >= 1);
        assert_covers(1000, resolve_worker_count(Some(0)));
    }

    #[test]
    fn run_matches_reference() {
        let exec = HostParallelExecutor::new(Some(0)).unwrap();
        assert_eq!(exec.workers(), DEFAULT_WORKERS);

        let a: Vec<Element> = (0..1000).map(|i| i % 100).collect();
        let b: Vec<Element> = (0..1000).map(|i| (i * 31) % 100).collect();
        let mut out = vec![0; 1000];
        exec.run(&a, &b, &mut out).unwrap();
        assert_eq!(out, vecbench_kernels::elementwise_sum(&a, &b));
    }

    #[test]
    fn run_with_more_workers_than_elements() {
        let exec = HostParallelExecutor::new(Some(8)).unwrap();
        let mut out = vec![0; 3];
        exec.run(&[1, 2, 3], &[4, 5, 6], &mut out).unwrap();
        assert_eq!(out, vec![5, 7, 9]);
    }

    #[test]
    fn run_rejects_mismatched_lengths() {
        let exec = HostParallelExecutor::new(Some(2)).unwrap();
        let mut out = vec![0; 3];
        assert!(matches!(
            exec.run(&[1, 2], &[1, 2, 3], &mut out),
            Err(VecBenchError::InvalidInput(_))
        ));
    }
}
