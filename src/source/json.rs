//! JSON snapshot parsing.

use serde_json::Value;
use tracing::debug;

use regionwatch_types::TelemetryRecord;

use super::normalize_row;
use crate::error::Error;

/// Parse a JSON snapshot document.
///
/// Accepts either a top-level array of row objects, or an object exposing a
/// `records` array. Any other top-level shape is unsupported. Rows that are
/// not objects, or that fail normalization, are skipped.
pub(super) fn parse(content: &str) -> Result<Vec<TelemetryRecord>, Error> {
    let document: Value = serde_json::from_str(content)?;

    let rows = match &document {
        Value::Array(rows) => rows.as_slice(),
        Value::Object(map) => match map.get("records") {
            Some(Value::Array(rows)) => rows.as_slice(),
            _ => {
                return Err(Error::UnsupportedFormat(
                    "top-level object has no `records` array".into(),
                ))
            }
        },
        _ => {
            return Err(Error::UnsupportedFormat(
                "expected an array of records or an object with a `records` array".into(),
            ))
        }
    };

    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let Some(row) = row.as_object() else {
            debug!(index, "skipping non-object telemetry row");
            continue;
        };
        match normalize_row(row) {
            Some(record) => records.push(record),
            None => debug!(index, "dropping malformed telemetry row"),
        }
    }

    Ok(records)
}
