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

// Elementwise addition: out[i] = a[i] + b[i]

use std::time::Instant;

use vecbench_kernels::{Element, KernelSignature, VECTOR_ADD};

use super::{DeviceOperation, DeviceRun};
use crate::device::binding::{KernelArg, KernelBinding};
use crate::device::buffer::{AccessMode, DeviceBuffer};
use crate::device::context::ExecutionContext;
use crate::device::dispatch::{dispatch, read_back};
use crate::error::Result;

/// Two read-only inputs, one write-only output, one work-item per element.
pub struct VectorAdd;

impl DeviceOperation for VectorAdd {
    fn execute(&self, ctx: &ExecutionContext, inputs: &[&[Element]]) -> Result<DeviceRun> {
        let len = self.validate_inputs(inputs)?;
        let (a, b) = (inputs[0], inputs[1]);

        // 1. Kernel, then buffers (dropped in reverse: buffers first)
        let kernel = ctx.kernel(self.name())?;
        let (mut a_buf, mut b_buf, out_buf) = {
            crate::profile_scope!("VectorAdd::Alloc");
            (
                DeviceBuffer::with_len(ctx, AccessMode::ReadOnly, len)?,
                DeviceBuffer::with_len(ctx, AccessMode::ReadOnly, len)?,
                DeviceBuffer::with_len(ctx, AccessMode::WriteOnly, len)?,
            )
        };

        let start = Instant::now();

        // 2. H2D
        {
            crate::profile_scope!("VectorAdd::Upload");
            a_buf.upload(a)?;
            b_buf.upload(b)?;
        }

        // 3. Bind size, v1, v2, v_out
        let mut binding = KernelBinding::new(&kernel);
        binding.bind(0, KernelArg::Scalar(len as Element))?;
        binding.bind(1, KernelArg::Buffer(&a_buf))?;
        binding.bind(2, KernelArg::Buffer(&b_buf))?;
        binding.bind(3, KernelArg::Buffer(&out_buf))?;

        // 4. Launch and wait
        {
            crate::profile_scope!("VectorAdd::Kernel");
            dispatch(&binding, len)?.wait()?;
        }

        // 5. D2H
        let mut output = vec![0; len];
        {
            crate::profile_scope!("VectorAdd::ReadBack");
            read_back(&out_buf, &mut output)?;
        }

        Ok(DeviceRun {
            output,
            elapsed: start.elapsed(),
        })
    }

    fn host_reference(&self, inputs: &[&[Element]]) -> Result<Vec<Element>> {
        self.validate_inputs(inputs)?;
        Ok(vecbench_kernels::elementwise_sum(inputs[0], inputs[1]))
    }

    fn signature(&self) -> &'static KernelSignature {
        &VECTOR_ADD
    }

    fn input_count(&self) -> usize {
        2
    }
}
