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

// Kernel program loading and compilation.

use std::path::Path;

use opencl3::context::Context;
use opencl3::error_codes::{CL_BUILD_PROGRAM_FAILURE, ClError};
use opencl3::kernel::Kernel;
use opencl3::program::Program;

use crate::device::selector::DeviceHandle;
use crate::error::{Result, VecBenchError, describe_cl};

/// Read the whole kernel source artifact into memory.
pub fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| VecBenchError::Artifact {
        path: path.to_path_buf(),
        source,
    })
}

/// Read `source_path` and compile it for `device`.
///
/// On a compiler rejection the returned [`VecBenchError::Compile`] carries the
/// device compiler's log verbatim.
pub fn build(context: &Context, device: &DeviceHandle, source_path: &Path) -> Result<Program> {
    crate::profile_scope!("Program::Build");

    let source = read_source(source_path)?;
    log::debug!(
        "Compiling {} ({} bytes) for '{}'",
        source_path.display(),
        source.len(),
        device.name()
    );

    let mut program = Program::create_from_source(context, &source)
        .map_err(|e| VecBenchError::Resource(describe_cl("Couldn't create the program", e)))?;

    if let Err(err) = program.build(&[device.id()], "") {
        return Err(compile_failure(&program, device, source_path, err));
    }
    Ok(program)
}

fn compile_failure(
    program: &Program,
    device: &DeviceHandle,
    source_path: &Path,
    err: ClError,
) -> VecBenchError {
    let log = program.get_build_log(device.id()).unwrap_or_default();
    if err.0 == CL_BUILD_PROGRAM_FAILURE || !log.trim().is_empty() {
        VecBenchError::Compile {
            path: source_path.to_path_buf(),
            log,
        }
    } else {
        VecBenchError::Resource(describe_cl("Couldn't build the program", err))
    }
}

/// Materialize a named entry point. An absent name is fatal.
pub fn get_kernel(program: &Program, name: &str) -> Result<Kernel> {
    Kernel::create(program, name).map_err(|e| {
        VecBenchError::Resource(describe_cl(&format!("Couldn't create kernel '{name}'"), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn read_source_missing_file_is_artifact_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.cl");
        let err = read_source(&path).unwrap_err();
        match err {
            VecBenchError::Artifact { path: p, source } => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn read_source_returns_full_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let text = "__kernel void noop() {}\n// trailing\n";
        file.write_all(text.as_bytes()).unwrap();
        assert_eq!(read_source(file.path()).unwrap(), text);
    }
}
