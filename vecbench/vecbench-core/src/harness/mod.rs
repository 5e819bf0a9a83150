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

//! Comparison harness: runs the device and host paths on the same seeded inputs
//! and reports timing and pointwise agreement.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vecbench_kernels::{Element, SQUARE_MAGNITUDE, VECTOR_ADD};

use crate::config::BenchConfig;
use crate::device::{DeviceOperation, ExecutionContext, get_operation};
use crate::error::Result;
use crate::host::HostParallelExecutor;

pub mod compare;
pub mod report;

pub use compare::{Comparison, compare, count_mismatches, first_mismatch, preview};
pub use report::{BenchReport, Preview};

/// Exclusive upper bound of generated input values.
pub const INPUT_RANGE: Element = 100;

/// Host vectors for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchInputs {
    /// Squared in place by `square_magnitude`.
    pub v: Vec<Element>,
    pub a: Vec<Element>,
    pub b: Vec<Element>,
}

/// Values in `[0, 100)`, reproducible for a given seed.
pub fn generate_inputs(seed: u64, len: usize) -> BenchInputs {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut fill = || -> Vec<Element> { (0..len).map(|_| rng.gen_range(0..INPUT_RANGE)).collect() };
    let v = fill();
    let a = fill();
    let b = fill();
    BenchInputs { v, a, b }
}

/// Compare a device output against the operation's host reference.
pub fn check_reference(
    op: &dyn DeviceOperation,
    inputs: &[&[Element]],
    device_output: &[Element],
) -> Result<Comparison> {
    let expected = op.host_reference(inputs)?;
    Ok(Comparison::of(&expected, device_output))
}

/// Run both paths once and compare them.
///
/// Setup failures (device, artifact, compile, resources) abort the run; a
/// mismatch does not, it is reported in the returned [`BenchReport`].
pub fn run_benchmark(config: &BenchConfig) -> Result<BenchReport> {
    crate::profile_scope!("Bench::Run");
    config.validate()?;
    let len = config.vector_len;

    let setup = Instant::now();
    let ctx = ExecutionContext::open(&config.kernel_path)?;
    log::debug!(
        "Device setup took {:.3} ms",
        setup.elapsed().as_secs_f64() * 1e3
    );

    let inputs = generate_inputs(config.seed, len);

    // Square magnitude
    let square = get_operation(SQUARE_MAGNITUDE.name)?;
    let squared_device = square.execute(&ctx, &[&inputs.v])?;
    let square_check = check_reference(square.as_ref(), &[&inputs.v], &squared_device.output)?;

    // Vector add, device path
    let add = get_operation(VECTOR_ADD.name)?;
    let device_run = add.execute(&ctx, &[&inputs.a, &inputs.b])?;

    // Vector add, host path: pool spawn through join
    let host_start = Instant::now();
    let executor = HostParallelExecutor::new(config.worker_count)?;
    let mut host_out = vec![0; len];
    executor.run(&inputs.a, &inputs.b, &mut host_out)?;
    let host_elapsed = host_start.elapsed();

    let comparison = Comparison::of(&host_out, &device_run.output);
    if !comparison.matches {
        log::warn!(
            "Device and host results differ at {} positions (first at {:?})",
            comparison.mismatches,
            comparison.first_mismatch
        );
    }

    let limit = config.preview_limit;
    let previews = [
        ("V", &inputs.v),
        ("V^2(OpenCL)", &squared_device.output),
        ("A", &inputs.a),
        ("B", &inputs.b),
        ("C(OpenCL)", &device_run.output),
        ("C(Threads)", &host_out),
    ]
    .into_iter()
    .map(|(label, values)| Preview {
        label,
        values: preview(values, limit),
    })
    .collect();

    Ok(BenchReport {
        vector_len: len,
        device_name: ctx.device().name().to_string(),
        device_kind: ctx.device_kind(),
        workers: executor.workers(),
        device_elapsed: device_run.elapsed,
        host_elapsed,
        comparison,
        square_check,
        previews,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inputs_are_seeded_and_bounded() {
        let x = generate_inputs(42, 1000);
        assert_eq!(x, generate_inputs(42, 1000));
        assert_ne!(x.a, generate_inputs(43, 1000).a);
        for v in [&x.v, &x.a, &x.b] {
            assert_eq!(v.len(), 1000);
            assert!(v.iter().all(|&e| (0..INPUT_RANGE).contains(&e)));
        }
    }

    #[test]
    fn square_check_uses_host_reference() {
        let square = get_operation(SQUARE_MAGNITUDE.name).unwrap();
        let v: &[Element] = &[2, 3, 99];
        let ok = check_reference(square.as_ref(), &[v], &[4, 9, 9801]).unwrap();
        assert!(ok.matches);

        let bad = check_reference(square.as_ref(), &[v], &[4, 3, 9801]).unwrap();
        assert!(!bad.matches);
        assert_eq!(bad.first_mismatch, Some(1));
        assert_eq!(bad.mismatches, 1);

        let add = get_operation(VECTOR_ADD.name).unwrap();
        assert!(check_reference(add.as_ref(), &[v], &[0, 0, 0]).is_err());
    }

    #[test]
    fn invalid_config_fails_before_device_work() {
        let config = BenchConfig::default().with_vector_len(0);
        assert!(matches!(
            run_benchmark(&config),
            Err(crate::error::VecBenchError::InvalidInput(_))
        ));
    }
}
