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

use vecbench_kernels::Element;

/// Number of leading and trailing values shown in a truncated preview.
pub const PREVIEW_EDGE: usize = 5;
const PREVIEW_SEPARATOR: &str = " ..... ";

/// Strict pointwise equality over the first `len` elements; stops at the first mismatch.
/// Either slice being shorter than `len` is a mismatch.
pub fn compare(expected: &[Element], actual: &[Element], len: usize) -> bool {
    expected.len() >= len
        && actual.len() >= len
        && expected[..len].iter().zip(&actual[..len]).all(|(x, y)| x == y)
}

/// Index of the first differing element, or of the end of the shorter slice
/// when the lengths differ.
pub fn first_mismatch(expected: &[Element], actual: &[Element]) -> Option<usize> {
    expected
        .iter()
        .zip(actual)
        .position(|(x, y)| x != y)
        .or_else(|| (expected.len() != actual.len()).then(|| expected.len().min(actual.len())))
}

/// Differing positions plus the length difference.
pub fn count_mismatches(expected: &[Element], actual: &[Element]) -> usize {
    let differing = expected.iter().zip(actual).filter(|(x, y)| x != y).count();
    differing + expected.len().abs_diff(actual.len())
}

/// Result of checking one vector against another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Comparison {
    pub matches: bool,
    pub first_mismatch: Option<usize>,
    pub mismatches: usize,
}

impl Comparison {
    pub fn of(expected: &[Element], actual: &[Element]) -> Self {
        let matches = expected.len() == actual.len() && compare(expected, actual, expected.len());
        if matches {
            return Self {
                matches,
                first_mismatch: None,
                mismatches: 0,
            };
        }
        Self {
            matches,
            first_mismatch: first_mismatch(expected, actual),
            mismatches: count_mismatches(expected, actual),
        }
    }
}

/// All values when `values.len() <= limit`, otherwise the first and last
/// [`PREVIEW_EDGE`] around `" ..... "`.
pub fn preview(values: &[Element], limit: usize) -> String {
    let join = |vs: &[Element]| {
        vs.iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    };
    if values.len() <= limit || values.len() <= 2 * PREVIEW_EDGE {
        return join(values);
    }
    let head = join(&values[..PREVIEW_EDGE]);
    let tail = join(&values[values.len() - PREVIEW_EDGE..]);
    format!("{head}{PREVIEW_SEPARATOR}{tail}")
}
