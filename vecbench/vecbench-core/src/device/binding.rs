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

// Positional kernel argument binding.
//
// `ArgSlots` is the bookkeeping half: it knows the declared layout, records
// what was bound where, and refuses to dispatch until every slot is filled.
// `KernelBinding` pairs it with a live kernel and pushes values to the driver.

use std::marker::PhantomData;

use opencl3::types::cl_uint;
use vecbench_kernels::{ArgKind, Element, KernelSignature};

use crate::device::buffer::{AccessMode, DeviceBuffer};
use crate::device::context::KernelHandle;
use crate::error::{Result, VecBenchError, describe_cl};

/// What currently occupies a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotValue {
    Scalar(Element),
    Buffer { access: AccessMode, len: usize },
}

/// Bound-state of every positional parameter of one kernel.
#[derive(Clone, Debug)]
pub struct ArgSlots {
    signature: &'static KernelSignature,
    slots: Vec<Option<SlotValue>>,
}

impl ArgSlots {
    pub fn new(signature: &'static KernelSignature) -> Self {
        Self {
            signature,
            slots: vec![None; signature.arity()],
        }
    }

    /// Record `value` in slot `index`. Rebinding a slot replaces the earlier value.
    pub fn record(&mut self, index: usize, value: SlotValue) -> Result<()> {
        let name = self.signature.name;
        let kind = *self.signature.args.get(index).ok_or_else(|| {
            VecBenchError::Binding(format!(
                "kernel '{name}' has no argument slot {index} (arity {})",
                self.signature.arity()
            ))
        })?;

        let fits = match value {
            SlotValue::Scalar(_) => kind == ArgKind::Scalar,
            SlotValue::Buffer { access, .. } => access.satisfies(kind),
        };
        if !fits {
            return Err(VecBenchError::Binding(format!(
                "kernel '{name}' slot {index} expects {kind:?}, got {value:?}"
            )));
        }

        self.slots[index] = Some(value);
        Ok(())
    }

    pub fn is_bound(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Some(_)))
    }

    /// Every declared slot must be bound.
    pub fn ensure_complete(&self) -> Result<()> {
        let missing: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.is_none().then_some(i))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(VecBenchError::Binding(format!(
                "kernel '{}' dispatched with unbound argument slots {missing:?}",
                self.signature.name
            )))
        }
    }

    /// Every bound buffer must hold at least `extent` elements.
    pub fn check_extent(&self, extent: usize) -> Result<()> {
        for (index, slot) in self.slots.iter().enumerate() {
            if let Some(SlotValue::Buffer { len, .. }) = slot
                && *len < extent
            {
                return Err(VecBenchError::Binding(format!(
                    "kernel '{}' slot {index} holds {len} elements, extent is {extent}",
                    self.signature.name
                )));
            }
        }
        Ok(())
    }
}

/// A value for one kernel parameter.
#[derive(Clone, Copy)]
pub enum KernelArg<'a> {
    Scalar(Element),
    Buffer(&'a DeviceBuffer<'a>),
}

/// A kernel together with the arguments bound to it so far.
///
/// `'b` covers every buffer bound through [`KernelBinding::bind`]: the driver
/// keeps the raw handles, so each buffer must outlive every dispatch of the binding.
///
/// ```no_run
/// use vecbench_core::device::{
///     AccessMode, DeviceBuffer, ExecutionContext, KernelArg, KernelBinding, dispatch,
/// };
///
/// fn square(ctx: &ExecutionContext) -> vecbench_core::Result<()> {
///     let kernel = ctx.kernel("square_magnitude")?;
///     let v = DeviceBuffer::with_len(ctx, AccessMode::ReadWrite, 4)?;
///     let mut binding = KernelBinding::new(&kernel);
///     binding.bind(0, KernelArg::Scalar(4))?;
///     binding.bind(1, KernelArg::Buffer(&v))?;
///     dispatch(&binding, 4)?.wait()
/// }
/// ```
///
/// Dropping a bound buffer before dispatch does not compile:
///
/// ```compile_fail
/// use vecbench_core::device::{
///     AccessMode, DeviceBuffer, ExecutionContext, KernelArg, KernelBinding, dispatch,
/// };
///
/// fn square(ctx: &ExecutionContext) -> vecbench_core::Result<()> {
///     let kernel = ctx.kernel("square_magnitude")?;
///     let mut binding = KernelBinding::new(&kernel);
///     binding.bind(0, KernelArg::Scalar(4))?;
///     {
///         let v = DeviceBuffer::with_len(ctx, AccessMode::ReadWrite, 4)?;
///         binding.bind(1, KernelArg::Buffer(&v))?;
///     }
///     dispatch(&binding, 4)?.wait()
/// }
/// ```
pub struct KernelBinding<'k, 'b> {
    kernel: &'k KernelHandle<'k>,
    slots: ArgSlots,
    buffers: PhantomData<&'b DeviceBuffer<'b>>,
}

impl<'k, 'b> KernelBinding<'k, 'b> {
    pub fn new(kernel: &'k KernelHandle<'k>) -> Self {
        Self {
            kernel,
            slots: ArgSlots::new(kernel.signature()),
            buffers: PhantomData,
        }
    }

    /// Bind `arg` to positional slot `index`.
    pub fn bind(&mut self, index: usize, arg: KernelArg<'b>) -> Result<()> {
        let value = match arg {
            KernelArg::Scalar(v) => SlotValue::Scalar(v),
            KernelArg::Buffer(b) => SlotValue::Buffer {
                access: b.access(),
                len: b.len(),
            },
        };
        self.slots.record(index, value)?;

        let arg_index = index as cl_uint;
        let raw = self.kernel.raw();
        let status = match arg {
            KernelArg::Scalar(v) => unsafe { raw.set_arg(arg_index, &v) },
            KernelArg::Buffer(b) => unsafe { raw.set_arg(arg_index, &b.raw_mem()) },
        };
        status.map_err(|e| {
            VecBenchError::Binding(describe_cl(
                &format!("Couldn't set argument {index} of '{}'", self.kernel.name()),
                e,
            ))
        })
    }

    pub fn kernel(&self) -> &'k KernelHandle<'k> {
        self.kernel
    }

    pub fn slots(&self) -> &ArgSlots {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vecbench_kernels::{SQUARE_MAGNITUDE, VECTOR_ADD};

    fn buf(access: AccessMode, len: usize) -> SlotValue {
        SlotValue::Buffer { access, len }
    }

    #[test]
    fn full_binding_is_complete() {
        let mut slots = ArgSlots::new(&VECTOR_ADD);
        assert!(slots.ensure_complete().is_err());
        slots.record(0, SlotValue::Scalar(8)).unwrap();
        slots.record(1, buf(AccessMode::ReadOnly, 8)).unwrap();
        slots.record(2, buf(AccessMode::ReadOnly, 8)).unwrap();
        assert!(slots.ensure_complete().is_err());
        slots.record(3, buf(AccessMode::WriteOnly, 8)).unwrap();
        assert!(slots.ensure_complete().is_ok());
        assert!(slots.check_extent(8).is_ok());
    }

    #[test]
    fn unknown_slot_is_binding_error() {
        let mut slots = ArgSlots::new(&SQUARE_MAGNITUDE);
        let err = slots.record(2, SlotValue::Scalar(1)).unwrap_err();
        assert!(matches!(err, VecBenchError::Binding(_)));
        assert!(err.to_string().contains("no argument slot 2"));
    }

    #[test]
    fn kind_mismatch_is_binding_error() {
        let mut slots = ArgSlots::new(&VECTOR_ADD);
        assert!(slots.record(0, buf(AccessMode::ReadOnly, 8)).is_err());
        assert!(slots.record(1, SlotValue::Scalar(8)).is_err());
        assert!(slots.record(3, buf(AccessMode::ReadOnly, 8)).is_err());

        let mut sq = ArgSlots::new(&SQUARE_MAGNITUDE);
        assert!(sq.record(1, buf(AccessMode::ReadOnly, 8)).is_err());
        assert!(sq.record(1, buf(AccessMode::ReadWrite, 8)).is_ok());
    }

    #[test]
    fn rebinding_replaces_value() {
        let mut slots = ArgSlots::new(&SQUARE_MAGNITUDE);
        slots.record(0, SlotValue::Scalar(4)).unwrap();
        slots.record(0, SlotValue::Scalar(4)).unwrap();
        slots.record(1, buf(AccessMode::ReadWrite, 2)).unwrap();
        assert!(slots.check_extent(4).is_err());
        slots.record(1, buf(AccessMode::ReadWrite, 4)).unwrap();
        assert!(slots.ensure_complete().is_ok());
        assert!(slots.check_extent(4).is_ok());
        assert!(slots.is_bound(1));
        assert!(!slots.is_bound(2));
    }
}
