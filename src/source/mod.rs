//! Telemetry snapshot loading.
//!
//! This module locates the snapshot file under a data directory and parses
//! it into normalized records. JSON and CSV sources feed one shared
//! alias-resolution and normalization path, so both formats tolerate the
//! same field-name variants and drop the same malformed rows.

mod cache;
mod csv;
mod json;

pub use cache::CachedLoader;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use regionwatch_types::TelemetryRecord;

use crate::error::Error;

/// Snapshot file names probed in priority order under the data directory.
///
/// The primary dataset comes first; operators can override it by dropping a
/// file with an earlier name into the directory, and the fixed order keeps
/// precedence deterministic when several candidates coexist.
pub const CANDIDATES: [&str; 3] = ["q-vercel-latency.json", "telemetry.json", "telemetry.csv"];

/// Field-name variants for the region key, first present non-null wins.
const REGION_ALIASES: [&str; 2] = ["region", "Region"];

/// Field-name variants for latency in milliseconds.
const LATENCY_ALIASES: [&str; 4] = ["latency_ms", "latency", "latencyMs", "Latency"];

/// Field-name variants for the uptime fraction.
const UPTIME_ALIASES: [&str; 4] = ["uptime", "uptime_pct", "uptimePercent", "Uptime"];

/// Loads and normalizes the telemetry snapshot.
///
/// Every call to [`Loader::load`] is a full file parse; wrap the loader in a
/// [`CachedLoader`] to reuse the parse while the file is unchanged.
#[derive(Debug, Clone)]
pub struct Loader {
    data_dir: PathBuf,
}

impl Loader {
    /// Create a loader probing the given data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The directory probed for snapshot files.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Resolve the snapshot path: first existing candidate wins.
    pub fn resolve(&self) -> Result<PathBuf, Error> {
        for name in CANDIDATES {
            let path = self.data_dir.join(name);
            if path.exists() {
                return Ok(path);
            }
        }
        Err(Error::DataSourceNotFound(
            self.data_dir.display().to_string(),
        ))
    }

    /// Load the snapshot into normalized records.
    ///
    /// Rows missing a logical field or carrying an unparsable number are
    /// dropped without failing the load. Returned order is source row order.
    pub fn load(&self) -> Result<Vec<TelemetryRecord>, Error> {
        let path = self.resolve()?;
        debug!(path = %path.display(), "loading telemetry snapshot");

        let content = fs::read_to_string(&path)?;
        if path.extension().is_some_and(|ext| ext == "csv") {
            Ok(csv::parse(&content))
        } else {
            json::parse(&content)
        }
    }
}

/// Resolve the first alias present in `row` with a non-null value.
fn first_field<'a>(row: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|name| row.get(*name))
        .find(|value| !value.is_null())
}

/// Interpret a raw value as a number.
///
/// JSON numbers pass through; strings are parsed after trimming, which
/// covers CSV cells and quoted numbers in JSON.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Normalize one raw row into a record. `None` drops the row.
pub(crate) fn normalize_row(row: &Map<String, Value>) -> Option<TelemetryRecord> {
    let region = match first_field(row, &REGION_ALIASES)? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let latency_ms = numeric(first_field(row, &LATENCY_ALIASES)?)?;
    let uptime = numeric(first_field(row, &UPTIME_ALIASES)?)?;

    Some(TelemetryRecord::new(region, latency_ms, uptime))
}
