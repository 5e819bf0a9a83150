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

//! Device discovery: first platform, GPU preferred, CPU on `CL_DEVICE_NOT_FOUND`.

use std::fmt;

use opencl3::device::{CL_DEVICE_TYPE_CPU, CL_DEVICE_TYPE_GPU, Device};
use opencl3::error_codes::{CL_DEVICE_NOT_FOUND, ClError};
use opencl3::platform::get_platforms;
use opencl3::types::{cl_device_id, cl_device_type};

use crate::error::{Result, VecBenchError, describe_cl};

/// Device class that was acquired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceKind {
    Gpu,
    Cpu,
}

impl DeviceKind {
    pub fn cl_device_type(self) -> cl_device_type {
        match self {
            DeviceKind::Gpu => CL_DEVICE_TYPE_GPU,
            DeviceKind::Cpu => CL_DEVICE_TYPE_CPU,
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Gpu => f.write_str("GPU"),
            DeviceKind::Cpu => f.write_str("CPU"),
        }
    }
}

/// The one compute device chosen for a run. Immutable once selected.
pub struct DeviceHandle {
    device: Device,
    kind: DeviceKind,
    name: String,
    vendor: String,
    platform_name: String,
}

impl DeviceHandle {
    pub fn id(&self) -> cl_device_id {
        self.device.id()
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn device_kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn platform_name(&self) -> &str {
        &self.platform_name
    }
}

impl fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("vendor", &self.vendor)
            .field("platform", &self.platform_name)
            .finish()
    }
}

/// Enumerate platforms and pick one device on the first of them.
///
/// # Errors
/// * [`VecBenchError::PlatformNotFound`] if no OpenCL runtime or platform is present.
/// * [`VecBenchError::DeviceNotFound`] if neither a GPU nor a CPU device can be acquired,
///   or if the GPU query fails for any reason other than "not found".
pub fn select_device() -> Result<DeviceHandle> {
    crate::profile_scope!("Device::Select");

    let platforms = get_platforms().map_err(|e| {
        VecBenchError::PlatformNotFound(describe_cl("Couldn't identify a platform", e))
    })?;
    let platform = platforms.first().ok_or_else(|| {
        VecBenchError::PlatformNotFound("Couldn't identify a platform: none reported".to_string())
    })?;
    let platform_name = platform.name().unwrap_or_default().trim().to_string();

    let (id, kind) = acquire_device(|device_type| platform.get_devices(device_type))?;

    let device = Device::new(id);
    let name = device.name().unwrap_or_default().trim().to_string();
    let vendor = device.vendor().unwrap_or_default().trim().to_string();
    log::debug!(
        "Selected {} device '{}' ({}) on platform '{}'",
        kind,
        name,
        vendor,
        platform_name
    );

    Ok(DeviceHandle {
        device,
        kind,
        name,
        vendor,
        platform_name,
    })
}

/// GPU first; only `CL_DEVICE_NOT_FOUND` (or an empty list) falls through to CPU.
pub(crate) fn acquire_device<F>(mut query: F) -> Result<(cl_device_id, DeviceKind)>
where
    F: FnMut(cl_device_type) -> std::result::Result<Vec<cl_device_id>, ClError>,
{
    match first_device(query(CL_DEVICE_TYPE_GPU)) {
        Ok(id) => return Ok((id, DeviceKind::Gpu)),
        Err(ClError(CL_DEVICE_NOT_FOUND)) => log::warn!("GPU not found, using CPU"),
        Err(e) => {
            return Err(VecBenchError::DeviceNotFound(describe_cl(
                "Couldn't access any devices",
                e,
            )));
        }
    }

    first_device(query(CL_DEVICE_TYPE_CPU))
        .map(|id| (id, DeviceKind::Cpu))
        .map_err(|e| VecBenchError::DeviceNotFound(describe_cl("Couldn't access any devices", e)))
}

fn first_device(
    ids: std::result::Result<Vec<cl_device_id>, ClError>,
) -> std::result::Result<cl_device_id, ClError> {
    ids.and_then(|ids| ids.first().copied().ok_or(ClError(CL_DEVICE_NOT_FOUND)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_id(n: usize) -> cl_device_id {
        n as cl_device_id
    }

    #[test]
    fn gpu_is_preferred() {
        let mut asked = Vec::new();
        let (id, kind) = acquire_device(|t| {
            asked.push(t);
            Ok(vec![fake_id(0x10), fake_id(0x20)])
        })
        .unwrap();
        assert_eq!(kind, DeviceKind::Gpu);
        assert_eq!(id, fake_id(0x10));
        assert_eq!(asked, vec![CL_DEVICE_TYPE_GPU]);
    }

    #[test]
    fn falls_back_to_cpu_when_gpu_not_found() {
        let mut asked = Vec::new();
        let (id, kind) = acquire_device(|t| {
            asked.push(t);
            if t == CL_DEVICE_TYPE_GPU {
                Err(ClError(CL_DEVICE_NOT_FOUND))
            } else {
                Ok(vec![fake_id(0x30)])
            }
        })
        .unwrap();
        assert_eq!(kind, DeviceKind::Cpu);
        assert_eq!(id, fake_id(0x30));
        assert_eq!(asked, vec![CL_DEVICE_TYPE_GPU, CL_DEVICE_TYPE_CPU]);
    }

    #[test]
    fn empty_gpu_list_counts_as_not_found() {
        let (_, kind) = acquire_device(|t| {
            if t == CL_DEVICE_TYPE_GPU {
                Ok(Vec::new())
            } else {
                Ok(vec![fake_id(0x40)])
            }
        })
        .unwrap();
        assert_eq!(kind, DeviceKind::Cpu);
    }

    #[test]
    fn other_gpu_failures_are_fatal_without_cpu_attempt() {
        let mut asked = Vec::new();
        let err = acquire_device(|t| {
            asked.push(t);
            Err(ClError(-32)) // CL_INVALID_PLATFORM
        })
        .unwrap_err();
        assert!(matches!(err, VecBenchError::DeviceNotFound(_)));
        assert!(err.to_string().contains("CL_INVALID_PLATFORM"));
        assert_eq!(asked, vec![CL_DEVICE_TYPE_GPU]);
    }

    #[test]
    fn no_gpu_and_no_cpu_is_fatal() {
        let err = acquire_device(|_| Err(ClError(CL_DEVICE_NOT_FOUND))).unwrap_err();
        assert!(matches!(err, VecBenchError::DeviceNotFound(_)));
    }

    #[test]
    fn kind_maps_to_cl_type() {
        assert_eq!(DeviceKind::Gpu.cl_device_type(), CL_DEVICE_TYPE_GPU);
        assert_eq!(DeviceKind::Cpu.cl_device_type(), CL_DEVICE_TYPE_CPU);
        assert_eq!(DeviceKind::Cpu.to_string(), "CPU");
    }
}
