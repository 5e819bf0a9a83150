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

use std::fmt;
use std::time::Duration;

use crate::device::DeviceKind;
use crate::harness::compare::Comparison;

/// A labelled preview line, e.g. `A: 1 2 3`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preview {
    pub label: &'static str,
    pub values: String,
}

/// Outcome of one benchmark run. Mismatches are recorded here, not raised as errors.
#[derive(Clone, Debug)]
pub struct BenchReport {
    pub vector_len: usize,
    pub device_name: String,
    pub device_kind: DeviceKind,
    pub workers: usize,
    pub device_elapsed: Duration,
    pub host_elapsed: Duration,
    /// Device sum against host sum.
    pub comparison: Comparison,
    /// Device square against host square.
    pub square_check: Comparison,
    pub previews: Vec<Preview>,
}

impl BenchReport {
    /// `host / device`; `None` when the device time rounds to zero.
    pub fn speedup(&self) -> Option<f64> {
        let device = self.device_elapsed.as_secs_f64();
        (device > 0.0).then(|| self.host_elapsed.as_secs_f64() / device)
    }

    pub fn matches(&self) -> bool {
        self.comparison.matches
    }
}

fn ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1e3
}

fn check(c: &Comparison) -> String {
    match (c.matches, c.first_mismatch) {
        (true, _) => "OK".to_string(),
        (false, Some(i)) => format!("MISMATCH ({} differing, first at index {i})", c.mismatches),
        (false, None) => format!("MISMATCH ({} differing)", c.mismatches),
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Vector Addition Performance Comparison")?;
        writeln!(f, "Vector Size: {}", self.vector_len)?;
        writeln!(f, "Device: {} ({})", self.device_name, self.device_kind)?;
        writeln!(f, "========================================")?;
        writeln!(f, "Square magnitude check: {}", check(&self.square_check))?;
        writeln!(f, "Vector add check: {}", check(&self.comparison))?;
        writeln!(f, "OpenCL add time: {:.3} ms", ms(self.device_elapsed))?;
        writeln!(
            f,
            "Threads add time: {:.3} ms (threads={})",
            ms(self.host_elapsed),
            self.workers
        )?;
        match self.speedup() {
            Some(s) => writeln!(f, "OpenCL Speedup: {s:.2}x")?,
            None => writeln!(f, "OpenCL Speedup: n/a")?,
        }
        writeln!(
            f,
            "Results Match: {}",
            if self.matches() { "Yes" } else { "No" }
        )?;
        for p in &self.previews {
            writeln!(f, "{}: {}", p.label, p.values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(device: Duration, host: Duration) -> BenchReport {
        let ok = Comparison {
            matches: true,
            first_mismatch: None,
            mismatches: 0,
        };
        BenchReport {
            vector_len: 8,
            device_name: "Test Device".to_string(),
            device_kind: DeviceKind::Cpu,
            workers: 4,
            device_elapsed: device,
            host_elapsed: host,
            comparison: ok,
            square_check: ok,
            previews: vec![Preview {
                label: "A",
                values: "1 2 3".to_string(),
            }],
        }
    }

    #[test]
    fn speedup_is_host_over_device() {
        let r = report(Duration::from_millis(2), Duration::from_millis(5));
        assert!((r.speedup().unwrap() - 2.5).abs() < 1e-9);
        assert!(report(Duration::ZERO, Duration::from_millis(5)).speedup().is_none());
    }

    #[test]
    fn display_summary() {
        let text = report(Duration::from_micros(1500), Duration::from_millis(3)).to_string();
        assert!(text.contains("Vector Size: 8"));
        assert!(text.contains("Device: Test Device (CPU)"));
        assert!(text.contains("OpenCL add time: 1.500 ms"));
        assert!(text.contains("Threads add time: 3.000 ms (threads=4)"));
        assert!(text.contains("OpenCL Speedup: 2.00x"));
        assert!(text.contains("Results Match: Yes"));
        assert!(text.contains("A: 1 2 3"));
    }

    #[test]
    fn display_mismatch() {
        let mut r = report(Duration::from_millis(1), Duration::from_millis(1));
        r.comparison = Comparison {
            matches: false,
            first_mismatch: Some(3),
            mismatches: 2,
        };
        let text = r.to_string();
        assert!(text.contains("Vector add check: MISMATCH (2 differing, first at index 3)"));
        assert!(text.contains("Results Match: No"));
    }
}
