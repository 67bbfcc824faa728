//! Wire types for the summary endpoint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::RegionSummary;

/// Body of a `POST /api/telemetry` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRequest {
    /// Regions to summarize. Keys are normalized server-side, so callers may
    /// send any casing or surrounding whitespace.
    pub regions: Vec<String>,

    /// Latency threshold in milliseconds for breach counting. A sample
    /// exactly at the threshold is not a breach.
    pub threshold_ms: f64,
}

impl SummaryRequest {
    /// Convenience constructor for tests and client code.
    pub fn new<S: Into<String>>(regions: impl IntoIterator<Item = S>, threshold_ms: f64) -> Self {
        Self {
            regions: regions.into_iter().map(Into::into).collect(),
            threshold_ms,
        }
    }
}

/// Body of a successful summary response: one entry per distinct normalized
/// requested region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub regions: BTreeMap<String, RegionSummary>,
}

impl SummaryResponse {
    /// Wrap a computed summary map.
    pub fn new(regions: BTreeMap<String, RegionSummary>) -> Self {
        Self { regions }
    }
}
