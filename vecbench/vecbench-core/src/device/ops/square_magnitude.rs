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

// In-place square: v[i] = v[i] * v[i]

use std::time::Instant;

use vecbench_kernels::{Element, KernelSignature, SQUARE_MAGNITUDE};

use super::{DeviceOperation, DeviceRun};
use crate::device::binding::{KernelArg, KernelBinding};
use crate::device::buffer::{AccessMode, DeviceBuffer};
use crate::device::context::ExecutionContext;
use crate::device::dispatch::{dispatch, read_back};
use crate::error::Result;

/// One read-write buffer, squared in place on the device.
pub struct SquareMagnitude;

impl DeviceOperation for SquareMagnitude {
    fn execute(&self, ctx: &ExecutionContext, inputs: &[&[Element]]) -> Result<DeviceRun> {
        let len = self.validate_inputs(inputs)?;

        let kernel = ctx.kernel(self.name())?;
        let mut v_buf = {
            crate::profile_scope!("SquareMagnitude::Alloc");
            DeviceBuffer::with_len(ctx, AccessMode::ReadWrite, len)?
        };

        let start = Instant::now();
        {
            crate::profile_scope!("SquareMagnitude::Upload");
            v_buf.upload(inputs[0])?;
        }

        let mut binding = KernelBinding::new(&kernel);
        binding.bind(0, KernelArg::Scalar(len as Element))?;
        binding.bind(1, KernelArg::Buffer(&v_buf))?;

        {
            crate::profile_scope!("SquareMagnitude::Kernel");
            dispatch(&binding, len)?.wait()?;
        }

        let mut output = vec![0; len];
        {
            crate::profile_scope!("SquareMagnitude::ReadBack");
            read_back(&v_buf, &mut output)?;
        }

        Ok(DeviceRun {
            output,
            elapsed: start.elapsed(),
        })
    }

    fn host_reference(&self, inputs: &[&[Element]]) -> Result<Vec<Element>> {
        self.validate_inputs(inputs)?;
        let mut v = inputs[0].to_vec();
        vecbench_kernels::square_magnitude_host(&mut v);
        Ok(v)
    }

    fn signature(&self) -> &'static KernelSignature {
        &SQUARE_MAGNITUDE
    }

    fn input_count(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_reference_squares() {
        let v: &[Element] = &[0, 3, -4, 99];
        assert_eq!(
            SquareMagnitude.host_reference(&[v]).unwrap(),
            vec![0, 9, 16, 9801]
        );
    }

    #[test]
    fn device_matches_host() {
        let ctx = match ExecutionContext::open(&vecbench_kernels::default_source_path()) {
            Ok(ctx) => ctx,
            Err(_) => return,
        };
        let v: Vec<Element> = (0..257).map(|i| i % 100).collect();
        let run = SquareMagnitude.execute(&ctx, &[&v]).unwrap();
        assert_eq!(run.output, SquareMagnitude.host_reference(&[&v]).unwrap());
        // the host input is untouched; only the device buffer is squared
        assert_eq!(v[9], 9);
    }
}
