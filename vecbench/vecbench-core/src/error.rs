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

use std::path::PathBuf;

use thiserror::Error;

/// Error type for vecbench operations.
///
/// Every variant is fatal for a benchmark run. A pointwise mismatch between the
/// device and host results is not an error; it is carried by the report.
#[derive(Error, Debug)]
pub enum VecBenchError {
    #[error("No OpenCL platform available: {0}")]
    PlatformNotFound(String),

    #[error("No usable OpenCL device: {0}")]
    DeviceNotFound(String),

    #[error("Couldn't find the program file {}: {source}", path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Kernel build failed for {}", path.display())]
    Compile { path: PathBuf, log: String },

    #[error("Device resource error: {0}")]
    Resource(String),

    #[error("Kernel argument error: {0}")]
    Binding(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Coarse classification used for diagnostics and exit status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    Environment,
    Artifact,
    Compile,
    Resource,
    Binding,
    Input,
}

impl VecBenchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            VecBenchError::PlatformNotFound(_) | VecBenchError::DeviceNotFound(_) => {
                ErrorCategory::Environment
            }
            VecBenchError::Artifact { .. } => ErrorCategory::Artifact,
            VecBenchError::Compile { .. } => ErrorCategory::Compile,
            VecBenchError::Resource(_) => ErrorCategory::Resource,
            VecBenchError::Binding(_) => ErrorCategory::Binding,
            VecBenchError::InvalidInput(_) => ErrorCategory::Input,
        }
    }

    /// Compiler diagnostic log, present only for build failures.
    pub fn build_log(&self) -> Option<&str> {
        match self {
            VecBenchError::Compile { log, .. } => Some(log.as_str()),
            _ => None,
        }
    }

    /// Process exit status for a run that failed with this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// Result type alias for vecbench operations
pub type Result<T> = std::result::Result<T, VecBenchError>;

/// Convert OpenCL status codes to human-readable names.
pub fn cl_error_to_string(code: i32) -> &'static str {
    match code {
        0 => "CL_SUCCESS",
        -1 => "CL_DEVICE_NOT_FOUND",
        -2 => "CL_DEVICE_NOT_AVAILABLE",
        -3 => "CL_COMPILER_NOT_AVAILABLE",
        -4 => "CL_MEM_OBJECT_ALLOCATION_FAILURE",
        -5 => "CL_OUT_OF_RESOURCES",
        -6 => "CL_OUT_OF_HOST_MEMORY",
        -11 => "CL_BUILD_PROGRAM_FAILURE",
        -30 => "CL_INVALID_VALUE",
        -32 => "CL_INVALID_PLATFORM",
        -33 => "CL_INVALID_DEVICE",
        -34 => "CL_INVALID_CONTEXT",
        -36 => "CL_INVALID_COMMAND_QUEUE",
        -38 => "CL_INVALID_MEM_OBJECT",
        -44 => "CL_INVALID_PROGRAM",
        -45 => "CL_INVALID_PROGRAM_EXECUTABLE",
        -46 => "CL_INVALID_KERNEL_NAME",
        -48 => "CL_INVALID_KERNEL",
        -49 => "CL_INVALID_ARG_INDEX",
        -50 => "CL_INVALID_ARG_VALUE",
        -51 => "CL_INVALID_ARG_SIZE",
        -52 => "CL_INVALID_KERNEL_ARGS",
        -53 => "CL_INVALID_WORK_DIMENSION",
        -54 => "CL_INVALID_WORK_GROUP_SIZE",
        -61 => "CL_INVALID_BUFFER_SIZE",
        -63 => "CL_INVALID_GLOBAL_WORK_SIZE",
        -1001 => "CL_PLATFORM_NOT_FOUND_KHR",
        // reported by the dynamic ICD loader binding when no OpenCL library can be loaded
        -2000 => "OpenCL runtime library not loaded",
        _ => "Unknown OpenCL error",
    }
}

/// Formats an `opencl3` status as `what: CODE_NAME (code)`.
pub(crate) fn describe_cl(what: &str, err: opencl3::error_codes::ClError) -> String {
    format!("{what}: {} ({})", cl_error_to_string(err.0), err.0)
}
