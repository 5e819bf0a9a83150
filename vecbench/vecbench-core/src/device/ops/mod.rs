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

// Device operations (strategy pattern over the kernel entry points).

use std::time::Duration;

use vecbench_kernels::{Element, KernelSignature};

use crate::device::context::ExecutionContext;
use crate::error::{Result, VecBenchError};

pub mod square_magnitude;
pub mod vector_add;

pub use square_magnitude::SquareMagnitude;
pub use vector_add::VectorAdd;

/// Output of one device run.
#[derive(Clone, Debug)]
pub struct DeviceRun {
    pub output: Vec<Element>,
    /// First upload through completed read-back.
    pub elapsed: Duration,
}

/// One kernel entry point driven through allocate, upload, bind, dispatch, wait and read-back.
/// Implemented by: VectorAdd, SquareMagnitude
pub trait DeviceOperation: Send + Sync {
    /// Run on the device. All inputs must have the same non-zero length.
    fn execute(&self, ctx: &ExecutionContext, inputs: &[&[Element]]) -> Result<DeviceRun>;

    /// Same computation on the host, used as the reference.
    fn host_reference(&self, inputs: &[&[Element]]) -> Result<Vec<Element>>;

    fn signature(&self) -> &'static KernelSignature;

    /// Number of host input vectors.
    fn input_count(&self) -> usize;

    fn name(&self) -> &'static str {
        self.signature().name
    }

    /// Checks count and lengths of `inputs`; returns the common length.
    fn validate_inputs(&self, inputs: &[&[Element]]) -> Result<usize> {
        if inputs.len() != self.input_count() {
            return Err(VecBenchError::InvalidInput(format!(
                "{} takes {} input vectors, got {}",
                self.name(),
                self.input_count(),
                inputs.len()
            )));
        }
        let len = inputs.first().map_or(0, |v| v.len());
        if len == 0 {
            return Err(VecBenchError::InvalidInput(format!(
                "{} requires a non-empty input",
                self.name()
            )));
        }
        if inputs.iter().any(|v| v.len() != len) {
            return Err(VecBenchError::InvalidInput(format!(
                "{} inputs differ in length",
                self.name()
            )));
        }
        if len > i32::MAX as usize {
            return Err(VecBenchError::InvalidInput(format!(
                "{} input of {len} elements exceeds the kernel size limit",
                self.name()
            )));
        }
        Ok(len)
    }
}

/// Create an operation by entry-point name: "vector_add" or "square_magnitude".
pub fn get_operation(name: &str) -> Result<Box<dyn DeviceOperation>> {
    match name.to_lowercase().as_str() {
        "vector_add" => Ok(Box::new(VectorAdd)),
        "square_magnitude" => Ok(Box::new(SquareMagnitude)),
        _ => Err(VecBenchError::InvalidInput(format!(
            "Unknown operation: {}. Available: vector_add, square_magnitude",
            name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_resolves_by_entry_point() {
        assert_eq!(get_operation("vector_add").unwrap().name(), "vector_add");
        assert_eq!(
            get_operation("Square_Magnitude").unwrap().name(),
            "square_magnitude"
        );
        let err = get_operation("vector_sub").err().unwrap();
        assert!(matches!(err, VecBenchError::InvalidInput(_)));
    }

    #[test]
    fn input_validation() {
        let add = VectorAdd;
        let a: &[Element] = &[1, 2, 3];
        let b: &[Element] = &[4, 5, 6];
        let empty: &[Element] = &[];
        assert_eq!(add.validate_inputs(&[a, b]).unwrap(), 3);
        assert!(add.validate_inputs(&[a]).is_err());
        assert!(add.validate_inputs(&[a, &b[..2]]).is_err());
        assert!(add.validate_inputs(&[empty, empty]).is_err());
        assert_eq!(SquareMagnitude.validate_inputs(&[a]).unwrap(), 3);
    }
}
