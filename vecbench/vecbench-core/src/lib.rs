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

// Device-vs-host vector benchmark core.
// The device path drives one OpenCL device through a single in-order queue;
// the host path splits the same work across a rayon pool. The harness runs both
// and compares them element by element.

#[doc(hidden)]
#[macro_use]
pub mod profiling;
pub mod config;
pub mod device;
pub mod error;
pub mod harness;
pub mod host;

pub use config::BenchConfig;
pub use device::{
    DeviceHandle, DeviceKind, DeviceOperation, ExecutionContext, get_operation, select_device,
};
pub use error::{ErrorCategory, Result, VecBenchError, cl_error_to_string};
pub use harness::{BenchReport, run_benchmark};
pub use host::HostParallelExecutor;
pub use vecbench_kernels::Element;
