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

// One-dimensional kernel launch and synchronization.

use std::ptr;

use opencl3::event::Event;
use vecbench_kernels::Element;

use crate::device::binding::KernelBinding;
use crate::device::buffer::DeviceBuffer;
use crate::error::{Result, VecBenchError, describe_cl};

/// Outstanding kernel launch. Consumed by [`CompletionToken::wait`].
#[must_use = "a dispatched kernel must be waited on before its results are read"]
pub struct CompletionToken {
    event: Event,
    kernel: &'static str,
    extent: usize,
}

impl CompletionToken {
    /// Block until the kernel has finished.
    pub fn wait(self) -> Result<()> {
        self.event.wait().map_err(|e| {
            VecBenchError::Resource(describe_cl(
                &format!("Kernel '{}' did not complete", self.kernel),
                e,
            ))
        })?;
        log::debug!("Kernel '{}' completed over {} work-items", self.kernel, self.extent);
        Ok(())
    }
}

/// Enqueue the bound kernel over `extent` work-items; the runtime picks the work-group size.
pub fn dispatch(binding: &KernelBinding<'_, '_>, extent: usize) -> Result<CompletionToken> {
    crate::profile_scope!("Kernel::Dispatch");

    let kernel = binding.kernel();
    if extent == 0 {
        return Err(VecBenchError::InvalidInput(format!(
            "kernel '{}' dispatched with an empty global extent",
            kernel.name()
        )));
    }
    binding.slots().ensure_complete()?;
    binding.slots().check_extent(extent)?;

    let global = [extent];
    let queue = kernel.execution_context().queue();
    let event = unsafe {
        queue.enqueue_nd_range_kernel(
            kernel.raw().get(),
            1,
            ptr::null(),
            global.as_ptr(),
            ptr::null(),
            &[],
        )
    }
    .map_err(|e| {
        VecBenchError::Resource(describe_cl(
            &format!("Couldn't enqueue kernel '{}'", kernel.name()),
            e,
        ))
    })?;

    Ok(CompletionToken {
        event,
        kernel: kernel.name(),
        extent,
    })
}

/// Blocking read of `buffer` into `dest`. Call only after the producing kernel's token was waited on.
pub fn read_back(buffer: &DeviceBuffer<'_>, dest: &mut [Element]) -> Result<()> {
    buffer.read_into(dest)
}
