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

//! Benchmark configuration: defaults, env overrides, validation.
//!
//! **Env:** `VECBENCH_LEN`, `VECBENCH_WORKERS`, `VECBENCH_KERNEL_PATH`, `VECBENCH_SEED`,
//! `VECBENCH_PREVIEW_LIMIT`. Parse failure leaves the default in place. Command-line
//! values are applied on top by the binary.

use std::path::PathBuf;

use crate::error::{Result, VecBenchError};

pub const DEFAULT_VECTOR_LEN: usize = 1_000_000;
pub const DEFAULT_SEED: u64 = 42;
/// Vectors up to this length are printed in full.
pub const DEFAULT_PREVIEW_LIMIT: usize = 15;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchConfig {
    pub vector_len: usize,
    /// Requested host workers. `None` means hardware concurrency; `Some(0)` falls back to 4.
    pub worker_count: Option<usize>,
    pub kernel_path: PathBuf,
    pub seed: u64,
    pub preview_limit: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            vector_len: DEFAULT_VECTOR_LEN,
            worker_count: None,
            kernel_path: vecbench_kernels::default_source_path(),
            seed: DEFAULT_SEED,
            preview_limit: DEFAULT_PREVIEW_LIMIT,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

impl BenchConfig {
    /// Defaults overridden by whichever `VECBENCH_*` variables are set and parse.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(len) = env_parse("VECBENCH_LEN") {
            config.vector_len = len;
        }
        if let Some(workers) = env_parse("VECBENCH_WORKERS") {
            config.worker_count = Some(workers);
        }
        if let Ok(path) = std::env::var("VECBENCH_KERNEL_PATH")
            && !path.trim().is_empty()
        {
            config.kernel_path = PathBuf::from(path);
        }
        if let Some(seed) = env_parse("VECBENCH_SEED") {
            config.seed = seed;
        }
        if let Some(limit) = env_parse("VECBENCH_PREVIEW_LIMIT") {
            config.preview_limit = limit;
        }
        config
    }

    pub fn with_vector_len(mut self, vector_len: usize) -> Self {
        self.vector_len = vector_len;
        self
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = Some(worker_count);
        self
    }

    pub fn with_kernel_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.kernel_path = path.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Length must be 1..=i32::MAX (the kernels take the size as `int`); preview limit ≥ 1.
    pub fn validate(&self) -> Result<()> {
        if self.vector_len == 0 {
            return Err(VecBenchError::InvalidInput(
                "vector length must be at least 1".to_string(),
            ));
        }
        if self.vector_len > i32::MAX as usize {
            return Err(VecBenchError::InvalidInput(format!(
                "vector length {} exceeds kernel size limit {}",
                self.vector_len,
                i32::MAX
            )));
        }
        if self.preview_limit == 0 {
            return Err(VecBenchError::InvalidInput(
                "preview limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
