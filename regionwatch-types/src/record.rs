//! Normalized telemetry samples.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A single telemetry sample after normalization.
///
/// Raw snapshots carry these fields under a handful of alias names and in
/// mixed types; the loader resolves aliases and parses values, then builds
/// one of these. The region key is canonical (trimmed, lower-cased) so that
/// grouping and lookup reduce to exact string equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// Canonical region key, e.g. `"us-east"`.
    pub region: String,

    /// Request latency in milliseconds.
    pub latency_ms: f64,

    /// Uptime fraction observed for the request window.
    pub uptime: f64,
}

impl TelemetryRecord {
    /// Create a record, normalizing the region key.
    pub fn new(region: impl AsRef<str>, latency_ms: f64, uptime: f64) -> Self {
        Self {
            region: normalize_region(region.as_ref()),
            latency_ms,
            uptime,
        }
    }
}

/// Canonical form of a region key: surrounding whitespace stripped, then
/// lower-cased.
pub fn normalize_region(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalize a caller-supplied region list into a deduplicated set.
///
/// Entries that trim to the empty string are discarded. The returned set may
/// be empty; callers decide whether that is an error.
pub fn normalize_region_set<S: AsRef<str>>(raw: &[S]) -> BTreeSet<String> {
    raw.iter()
        .map(|r| normalize_region(r.as_ref()))
        .filter(|r| !r.is_empty())
        .collect()
}
