//! CSV snapshot parsing.
//!
//! Minimal header-row CSV: cells are split on commas with no quoting rules,
//! which matches the telemetry exports this service ingests. Rows flow
//! through the same alias resolution as JSON rows.

use serde_json::{Map, Value};
use tracing::debug;

use regionwatch_types::TelemetryRecord;

use super::normalize_row;

/// Parse a CSV snapshot: one header row, then data rows.
///
/// A UTF-8 BOM on the header is stripped. Rows shorter than the header lose
/// their tail fields and drop out during normalization like any other
/// incomplete row; blank lines are ignored. Parsing never fails: a
/// malformed row is dropped, not escalated.
pub(super) fn parse(content: &str) -> Vec<TelemetryRecord> {
    let mut lines = content.lines();
    let Some(header_line) = lines.next() else {
        return Vec::new();
    };

    let headers: Vec<&str> = header_line.trim_start_matches('\u{feff}').split(',').collect();

    let mut records = Vec::new();
    for (index, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let row: Map<String, Value> = headers
            .iter()
            .zip(line.split(','))
            .map(|(header, cell)| ((*header).to_string(), Value::String(cell.to_string())))
            .collect();

        match normalize_row(&row) {
            Some(record) => records.push(record),
            None => debug!(row = index + 1, "dropping malformed csv row"),
        }
    }

    records
}
