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

// Scope timing behind the `profiling` feature.
// Enabled: `profile_scope!("Name")` logs the scope's wall time at trace level on drop.
// Disabled: the macro expands to nothing.

#[cfg(feature = "profiling")]
pub struct ScopeTimer {
    name: &'static str,
    start: std::time::Instant,
}

#[cfg(feature = "profiling")]
impl ScopeTimer {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "profiling")]
impl Drop for ScopeTimer {
    fn drop(&mut self) {
        log::trace!(
            "[profile] {}: {:.3} ms",
            self.name,
            self.start.elapsed().as_secs_f64() * 1e3
        );
    }
}

#[cfg(feature = "profiling")]
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        let _profile_scope_guard = $crate::profiling::ScopeTimer::new($name);
    };
}

#[cfg(not(feature = "profiling"))]
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {};
}
