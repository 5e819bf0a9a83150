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

use std::ptr;

use opencl3::memory::{Buffer, CL_MEM_READ_ONLY, CL_MEM_READ_WRITE, CL_MEM_WRITE_ONLY, ClMem};
use opencl3::types::{CL_BLOCKING, cl_int, cl_mem, cl_mem_flags};
use vecbench_kernels::{ArgKind, ELEMENT_SIZE, Element};

use crate::device::context::ExecutionContext;
use crate::error::{Result, VecBenchError, describe_cl};

/// How the kernel may touch a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl AccessMode {
    pub fn mem_flags(self) -> cl_mem_flags {
        match self {
            AccessMode::ReadOnly => CL_MEM_READ_ONLY,
            AccessMode::WriteOnly => CL_MEM_WRITE_ONLY,
            AccessMode::ReadWrite => CL_MEM_READ_WRITE,
        }
    }

    /// Whether a buffer in this mode may fill a parameter of kind `kind`.
    pub fn satisfies(self, kind: ArgKind) -> bool {
        match kind {
            ArgKind::Scalar => false,
            ArgKind::InputBuffer => matches!(self, AccessMode::ReadOnly | AccessMode::ReadWrite),
            ArgKind::OutputBuffer => matches!(self, AccessMode::WriteOnly | AccessMode::ReadWrite),
            ArgKind::InOutBuffer => self == AccessMode::ReadWrite,
        }
    }
}

/// Device-resident array of [`Element`]s, released on drop.
///
/// Byte length is always `len * ELEMENT_SIZE`.
pub struct DeviceBuffer<'ctx> {
    buffer: Buffer<cl_int>,
    access: AccessMode,
    len: usize,
    ctx: &'ctx ExecutionContext,
}

impl<'ctx> DeviceBuffer<'ctx> {
    /// Allocate `size_in_bytes` on the device. The size must be a non-zero
    /// multiple of the element size.
    pub fn allocate(
        ctx: &'ctx ExecutionContext,
        access: AccessMode,
        size_in_bytes: usize,
    ) -> Result<Self> {
        if size_in_bytes == 0 || size_in_bytes % ELEMENT_SIZE != 0 {
            return Err(VecBenchError::InvalidInput(format!(
                "buffer size {size_in_bytes} is not a positive multiple of {ELEMENT_SIZE} bytes"
            )));
        }
        let len = size_in_bytes / ELEMENT_SIZE;

        let buffer = unsafe {
            Buffer::<cl_int>::create(ctx.context(), access.mem_flags(), len, ptr::null_mut())
        }
        .map_err(|e| {
            VecBenchError::Resource(describe_cl(
                &format!("Couldn't create a {size_in_bytes}-byte {access:?} buffer"),
                e,
            ))
        })?;

        log::debug!("Allocated {access:?} buffer of {len} elements");
        Ok(Self {
            buffer,
            access,
            len,
            ctx,
        })
    }

    /// Allocate a buffer holding exactly `len` elements.
    pub fn with_len(ctx: &'ctx ExecutionContext, access: AccessMode, len: usize) -> Result<Self> {
        let bytes = len.checked_mul(ELEMENT_SIZE).ok_or_else(|| {
            VecBenchError::InvalidInput(format!("buffer of {len} elements overflows usize"))
        })?;
        Self::allocate(ctx, access, bytes)
    }

    /// Blocking copy of `host` into the buffer. `host` must cover the buffer exactly.
    pub fn upload(&mut self, host: &[Element]) -> Result<()> {
        check_exact_len("upload", self.len, host.len())?;
        let event = unsafe {
            self.ctx
                .queue()
                .enqueue_write_buffer(&mut self.buffer, CL_BLOCKING, 0, host, &[])
        }
        .map_err(|e| VecBenchError::Resource(describe_cl("Couldn't write to the buffer", e)))?;
        event
            .wait()
            .map_err(|e| VecBenchError::Resource(describe_cl("Buffer write did not complete", e)))
    }

    /// Blocking copy of the buffer into `dest`. `dest` must cover the buffer exactly.
    pub fn read_into(&self, dest: &mut [Element]) -> Result<()> {
        check_exact_len("read-back", self.len, dest.len())?;
        let event = unsafe {
            self.ctx
                .queue()
                .enqueue_read_buffer(&self.buffer, CL_BLOCKING, 0, dest, &[])
        }
        .map_err(|e| VecBenchError::Resource(describe_cl("Couldn't read the buffer", e)))?;
        event
            .wait()
            .map_err(|e| VecBenchError::Resource(describe_cl("Buffer read did not complete", e)))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn size_in_bytes(&self) -> usize {
        self.len * ELEMENT_SIZE
    }

    pub fn access(&self) -> AccessMode {
        self.access
    }

    pub(crate) fn raw_mem(&self) -> cl_mem {
        self.buffer.get()
    }
}

impl Drop for DeviceBuffer<'_> {
    fn drop(&mut self) {
        log::debug!("Releasing {:?} buffer of {} elements", self.access, self.len);
    }
}

/// Release the buffer held in `slot`, if any. An empty slot is a no-op.
pub fn release(slot: &mut Option<DeviceBuffer<'_>>) {
    if let Some(buffer) = slot.take() {
        drop(buffer);
    }
}

fn check_exact_len(what: &str, buffer_len: usize, host_len: usize) -> Result<()> {
    if buffer_len != host_len {
        return Err(VecBenchError::InvalidInput(format!(
            "{what} of {host_len} elements into a buffer of {buffer_len} elements"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_modes_map_to_flags() {
        assert_eq!(AccessMode::ReadOnly.mem_flags(), CL_MEM_READ_ONLY);
        assert_eq!(AccessMode::WriteOnly.mem_flags(), CL_MEM_WRITE_ONLY);
        assert_eq!(AccessMode::ReadWrite.mem_flags(), CL_MEM_READ_WRITE);
    }

    #[test]
    fn access_mode_compatibility() {
        assert!(AccessMode::ReadOnly.satisfies(ArgKind::InputBuffer));
        assert!(!AccessMode::ReadOnly.satisfies(ArgKind::OutputBuffer));
        assert!(AccessMode::WriteOnly.satisfies(ArgKind::OutputBuffer));
        assert!(!AccessMode::WriteOnly.satisfies(ArgKind::InOutBuffer));
        assert!(AccessMode::ReadWrite.satisfies(ArgKind::InOutBuffer));
        assert!(AccessMode::ReadWrite.satisfies(ArgKind::InputBuffer));
        assert!(!AccessMode::ReadWrite.satisfies(ArgKind::Scalar));
    }

    #[test]
    fn short_transfers_are_rejected() {
        assert!(check_exact_len("upload", 8, 8).is_ok());
        assert!(matches!(
            check_exact_len("upload", 8, 7),
            Err(VecBenchError::InvalidInput(_))
        ));
        assert!(check_exact_len("read-back", 8, 9).is_err());
    }

    #[test]
    fn release_empty_slot_is_noop() {
        let mut slot: Option<DeviceBuffer<'_>> = None;
        release(&mut slot);
        release(&mut slot);
        assert!(slot.is_none());
    }

    #[test]
    fn buffer_lifecycle_on_device() {
        let ctx = match crate::device::select_device().and_then(ExecutionContext::create) {
            Ok(ctx) => ctx,
            Err(_) => return,
        };

        assert!(matches!(
            DeviceBuffer::allocate(&ctx, AccessMode::ReadOnly, 0),
            Err(VecBenchError::InvalidInput(_))
        ));
        assert!(DeviceBuffer::allocate(&ctx, AccessMode::ReadOnly, ELEMENT_SIZE * 2 + 1).is_err());

        let mut slot = Some(DeviceBuffer::with_len(&ctx, AccessMode::ReadWrite, 4).unwrap());
        let data = [3, 1, 4, 1];
        if let Some(buf) = slot.as_mut() {
            assert_eq!(buf.size_in_bytes(), 4 * ELEMENT_SIZE);
            buf.upload(&data).unwrap();
            assert!(buf.upload(&data[..3]).is_err());
            let mut back = [0; 4];
            buf.read_into(&mut back).unwrap();
            assert_eq!(back, data);
        }
        release(&mut slot);
        assert!(slot.is_none());
        release(&mut slot);
    }
}
