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

use std::path::Path;

use opencl3::command_queue::CommandQueue;
use opencl3::context::Context;
use opencl3::kernel::Kernel;
use opencl3::program::Program;
use vecbench_kernels::KernelSignature;

use crate::device::program;
use crate::device::selector::{DeviceHandle, DeviceKind, select_device};
use crate::error::{Result, VecBenchError, describe_cl};

/// One device, its context, one in-order command queue and the compiled program.
///
/// Buffers and kernels borrow the context, so they are always released first.
/// The remaining handles drop in field order: queue, program, context.
pub struct ExecutionContext {
    queue: CommandQueue,
    program: Option<Program>,
    context: Context,
    device: DeviceHandle,
}

impl ExecutionContext {
    /// Create the context and its single command queue on `device`.
    pub fn create(device: DeviceHandle) -> Result<Self> {
        crate::profile_scope!("Context::Create");

        let context = Context::from_device(device.device())
            .map_err(|e| VecBenchError::Resource(describe_cl("Couldn't create a context", e)))?;

        // OpenCL 1.2 entry point; some platforms never shipped 2.0 queues.
        #[allow(deprecated)]
        let queue = CommandQueue::create_default(&context, 0).map_err(|e| {
            VecBenchError::Resource(describe_cl("Couldn't create a command queue", e))
        })?;

        log::debug!("Context and queue ready on '{}'", device.name());
        Ok(Self {
            queue,
            program: None,
            context,
            device,
        })
    }

    /// Select a device, create the context and compile the kernel artifact.
    pub fn open(source_path: &Path) -> Result<Self> {
        let mut ctx = Self::create(select_device()?)?;
        ctx.build_program(source_path)?;
        Ok(ctx)
    }

    /// Compile the kernel artifact. Replaces any previously built program.
    pub fn build_program(&mut self, source_path: &Path) -> Result<()> {
        let built = program::build(&self.context, &self.device, source_path)?;
        self.program = Some(built);
        Ok(())
    }

    /// Materialize `name` from the built program and check its parameter count
    /// against the declared layout.
    pub fn kernel(&self, name: &str) -> Result<KernelHandle<'_>> {
        let program = self.program.as_ref().ok_or_else(|| {
            VecBenchError::InvalidInput(format!(
                "kernel '{name}' requested before the program was built"
            ))
        })?;
        let signature = vecbench_kernels::signature(name).ok_or_else(|| {
            VecBenchError::Binding(format!("no argument layout declared for kernel '{name}'"))
        })?;
        let kernel = program::get_kernel(program, name)?;

        let declared = kernel
            .num_args()
            .map_err(|e| VecBenchError::Resource(describe_cl("Couldn't query kernel arguments", e)))?
            as usize;
        if declared != signature.arity() {
            return Err(VecBenchError::Binding(format!(
                "kernel '{name}' takes {declared} arguments, expected {}",
                signature.arity()
            )));
        }

        Ok(KernelHandle {
            kernel,
            signature,
            ctx: self,
        })
    }

    pub fn device(&self) -> &DeviceHandle {
        &self.device
    }

    pub fn device_kind(&self) -> DeviceKind {
        self.device.device_kind()
    }

    pub fn is_program_built(&self) -> bool {
        self.program.is_some()
    }

    pub(crate) fn context(&self) -> &Context {
        &self.context
    }

    pub(crate) fn queue(&self) -> &CommandQueue {
        &self.queue
    }
}

impl Drop for ExecutionContext {
    fn drop(&mut self) {
        log::debug!("Releasing queue, program and context on '{}'", self.device.name());
    }
}

/// A compiled entry point scoped to its [`ExecutionContext`].
pub struct KernelHandle<'ctx> {
    kernel: Kernel,
    signature: &'static KernelSignature,
    ctx: &'ctx ExecutionContext,
}

impl<'ctx> KernelHandle<'ctx> {
    pub fn name(&self) -> &'static str {
        self.signature.name
    }

    pub fn signature(&self) -> &'static KernelSignature {
        self.signature
    }

    pub(crate) fn raw(&self) -> &Kernel {
        &self.kernel
    }

    pub(crate) fn execution_context(&self) -> &'ctx ExecutionContext {
        self.ctx
    }
}
