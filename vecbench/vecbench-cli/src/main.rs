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

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use vecbench_core::{BenchConfig, VecBenchError, run_benchmark};

/// Device-offloaded vs. host-parallel vector addition benchmark.
#[derive(Parser, Debug)]
#[command(name = "vecbench")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Vector length (default 1000000, or VECBENCH_LEN)
    #[arg(value_name = "LEN")]
    len: Option<usize>,

    /// Kernel source file
    #[arg(short, long, value_name = "PATH")]
    kernel: Option<PathBuf>,

    /// Host worker count; 0 falls back to 4
    #[arg(short, long, value_name = "N")]
    workers: Option<usize>,

    /// Input generator seed
    #[arg(short, long, value_name = "S")]
    seed: Option<u64>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> BenchConfig {
        let mut config = BenchConfig::from_env();
        if let Some(len) = self.len {
            config = config.with_vector_len(len);
        }
        if let Some(path) = &self.kernel {
            config = config.with_kernel_path(path);
        }
        if let Some(workers) = self.workers {
            config = config.with_worker_count(workers);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Ref: https://docs.rs/env_logger/latest/env_logger/
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .try_init();
}

/// `error: <message>`, then the full compiler log for build failures.
fn report_error(out: &mut impl Write, err: &VecBenchError) -> io::Result<()> {
    writeln!(out, "error: {err}")?;
    if let Some(log) = err.build_log() {
        writeln!(out, "{}", log.trim_end())?;
    }
    out.flush()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config();
    log::info!("Running with {config:?}");

    match run_benchmark(&config) {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::debug!("Run failed ({:?})", err.category());
            let _ = report_error(&mut io::stderr().lock(), &err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
