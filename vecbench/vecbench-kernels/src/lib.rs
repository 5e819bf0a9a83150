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

// Kernel declarations for the device path.
// The OpenCL C source ships as kernels/vector_ops.cl and is compiled at run time
// by the device driver; this crate only describes the entry points it exports
// and provides host reference implementations with identical integer semantics.

use std::path::{Path, PathBuf};

/// Element type shared by host vectors and device buffers (OpenCL `int`).
pub type Element = i32;

/// Size in bytes of one [`Element`] on host and device.
pub const ELEMENT_SIZE: usize = std::mem::size_of::<Element>();

/// File name of the kernel source artifact.
pub const KERNEL_SOURCE_FILE: &str = "vector_ops.cl";

/// Path of the kernel source artifact shipped with this crate.
pub fn default_source_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("kernels")
        .join(KERNEL_SOURCE_FILE)
}

/// Kind of one positional kernel parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgKind {
    /// `const int` passed by value.
    Scalar,
    /// `__global const int *`
    InputBuffer,
    /// `__global int *`, written only.
    OutputBuffer,
    /// `__global int *`, read and written in place.
    InOutBuffer,
}

impl ArgKind {
    pub fn is_buffer(self) -> bool {
        !matches!(self, ArgKind::Scalar)
    }
}

/// Entry point name and positional parameter layout of one kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KernelSignature {
    pub name: &'static str,
    pub args: &'static [ArgKind],
}

impl KernelSignature {
    /// Number of parameters that must be bound before dispatch.
    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

/// `vector_add(const int size, const int *v1, const int *v2, int *v_out)`
pub const VECTOR_ADD: KernelSignature = KernelSignature {
    name: "vector_add",
    args: &[
        ArgKind::Scalar,
        ArgKind::InputBuffer,
        ArgKind::InputBuffer,
        ArgKind::OutputBuffer,
    ],
};

/// `square_magnitude(const int size, int *v)`, squares `v` in place.
pub const SQUARE_MAGNITUDE: KernelSignature = KernelSignature {
    name: "square_magnitude",
    args: &[ArgKind::Scalar, ArgKind::InOutBuffer],
};

/// Every entry point exported by the kernel source artifact.
pub const ALL_KERNELS: [KernelSignature; 2] = [VECTOR_ADD, SQUARE_MAGNITUDE];

/// Look up an entry point by name.
pub fn signature(name: &str) -> Option<&'static KernelSignature> {
    ALL_KERNELS.iter().find(|k| k.name == name)
}

// === Host reference implementations ===
// The kernels add and multiply as `uint` and reinterpret the bits as `int`,
// which is what `wrapping_add` / `wrapping_mul` compute here.

/// `out[i] = a[i] + b[i]` over the common length of the three slices.
pub fn vector_add_host(a: &[Element], b: &[Element], out: &mut [Element]) {
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = x.wrapping_add(y);
    }
}

/// `v[i] = v[i] * v[i]`
pub fn square_magnitude_host(v: &mut [Element]) {
    for x in v.iter_mut() {
        *x = x.wrapping_mul(*x);
    }
}

/// Elementwise sum as a freshly allocated vector.
pub fn elementwise_sum(a: &[Element], b: &[Element]) -> Vec<Element> {
    let mut out = vec![0; a.len().min(b.len())];
    vector_add_host(a, b, &mut out);
    out
}
