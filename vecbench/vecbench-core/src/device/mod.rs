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

//! Device path: selection, program build, context, buffers, binding, dispatch.
//!
//! Lifecycle of one run:
//! `select_device` → `ExecutionContext::create` → `build_program` → `kernel`
//! → `DeviceBuffer::allocate` / `upload` → `KernelBinding::bind` → `dispatch`
//! → `CompletionToken::wait` → `read_back`. Buffers and kernel handles borrow the
//! context and are released before it.

pub mod binding;
pub mod buffer;
pub mod context;
pub mod dispatch;
pub mod ops;
pub mod program;
pub mod selector;

pub use binding::{ArgSlots, KernelArg, KernelBinding, SlotValue};
pub use buffer::{AccessMode, DeviceBuffer, release};
pub use context::{ExecutionContext, KernelHandle};
pub use dispatch::{CompletionToken, dispatch, read_back};
pub use ops::{DeviceOperation, DeviceRun, SquareMagnitude, VectorAdd, get_operation};
pub use selector::{DeviceHandle, DeviceKind, select_device};
