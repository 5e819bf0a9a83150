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

// Host path and harness pieces that need no device.

use vecbench_core::harness::{Comparison, generate_inputs, preview};
use vecbench_core::host::{DEFAULT_WORKERS, HostParallelExecutor, partition, resolve_worker_count};
use vecbench_kernels::{Element, elementwise_sum};

#[test]
fn host_path_equals_elementwise_sum() {
    for (len, workers) in [(1, 1), (8, 3), (1000, 7), (4099, 16)] {
        let inputs = generate_inputs(42, len);
        let exec = HostParallelExecutor::new(Some(workers)).unwrap();
        let mut out = vec![0; len];
        exec.run(&inputs.a, &inputs.b, &mut out).unwrap();
        assert!(Comparison::of(&elementwise_sum(&inputs.a, &inputs.b), &out).matches);
    }
}

#[test]
fn partition_covers_every_index_once() {
    for len in [0usize, 1, 5, 999, 1000, 1001] {
        for workers in [1usize, 2, 4, 7, 64] {
            let mut hits = vec![0u8; len];
            for range in partition(len, workers) {
                for i in range {
                    hits[i] += 1;
                }
            }
            assert!(hits.iter().all(|&h| h == 1), "len={len} workers={workers}");
        }
    }
}

#[test]
fn zero_workers_run_with_default_pool() {
    assert_eq!(resolve_worker_count(Some(0)), DEFAULT_WORKERS);
    let exec = HostParallelExecutor::new(Some(0)).unwrap();
    let inputs = generate_inputs(1, 1000);
    let mut out = vec![0; 1000];
    exec.run(&inputs.a, &inputs.b, &mut out).unwrap();
    assert_eq!(out, elementwise_sum(&inputs.a, &inputs.b));
}

#[test]
fn preview_of_long_result() {
    let v: Vec<Element> = (0..1_000).collect();
    assert_eq!(preview(&v, 15), "0 1 2 3 4 ..... 995 996 997 998 999");
}
