// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shape of the mold/oven telemetry feed shown beside the timeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-bucket counts, one series per size class.
///
/// `series[size][i]` is the count for `buckets[i]`; every series has the
/// same length as `buckets`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetrySeries {
    pub buckets: Vec<String>,
    pub sizes: Vec<String>,
    pub series: BTreeMap<String, Vec<u64>>,
}

impl TelemetrySeries {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
