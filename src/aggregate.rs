//! Statistical aggregation over normalized records.
//!
//! Pure functions: given records, a requested region set, and a latency
//! threshold, compute one [`RegionSummary`] per requested region. Nothing
//! here touches the filesystem or mutates its inputs, so aggregation runs
//! concurrently across requests without coordination.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use regionwatch_types::{
    normalize_region_set, round_to, RegionSummary, TelemetryRecord, LATENCY_DECIMALS,
    UPTIME_DECIMALS,
};

use crate::error::Error;

/// Arithmetic mean. Defined as 0.0 for empty input so callers can reuse it
/// without guarding.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Interpolated 95th percentile. 0.0 for empty input.
///
/// Sorts ascending and linearly interpolates between the two bracketing
/// order statistics, the convention statistical libraries default to.
pub fn p95(values: &[f64]) -> f64 {
    percentile(values, 0.95)
}

fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    if values.len() == 1 {
        return values[0];
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let n = sorted.len();
    let pos = (n - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = (pos.ceil() as usize).min(n - 1);
    let frac = pos - lo as f64;

    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Samples accumulated for one requested region during the partition pass.
#[derive(Debug, Default)]
struct RegionSamples {
    latencies: Vec<f64>,
    uptimes: Vec<f64>,
    breaches: u64,
}

impl RegionSamples {
    fn into_summary(self) -> RegionSummary {
        if self.latencies.is_empty() {
            return RegionSummary::zero();
        }
        RegionSummary {
            avg_latency: round_to(mean(&self.latencies), LATENCY_DECIMALS),
            p95_latency: round_to(p95(&self.latencies), LATENCY_DECIMALS),
            avg_uptime: round_to(mean(&self.uptimes), UPTIME_DECIMALS),
            breaches: self.breaches,
        }
    }
}

/// Compute summaries for every requested region.
///
/// Requested keys are trimmed, lower-cased, and deduplicated; entries that
/// trim to empty are discarded, and an empty resulting set is
/// [`Error::EmptyRegionSet`]. Every surviving key appears in the result,
/// with [`RegionSummary::zero`] standing in for regions without samples.
/// A sample exactly at the threshold does not count as a breach.
pub fn summarize<S: AsRef<str>>(
    records: &[TelemetryRecord],
    regions: &[S],
    threshold_ms: f64,
) -> Result<BTreeMap<String, RegionSummary>, Error> {
    let requested = normalize_region_set(regions);
    if requested.is_empty() {
        return Err(Error::EmptyRegionSet);
    }

    // Single pass over the records; non-requested regions are skipped.
    let mut groups: BTreeMap<&str, RegionSamples> = requested
        .iter()
        .map(|region| (region.as_str(), RegionSamples::default()))
        .collect();

    for record in records {
        if let Some(group) = groups.get_mut(record.region.as_str()) {
            group.latencies.push(record.latency_ms);
            group.uptimes.push(record.uptime);
            if record.latency_ms > threshold_ms {
                group.breaches += 1;
            }
        }
    }

    Ok(groups
        .into_iter()
        .map(|(region, samples)| (region.to_string(), samples.into_summary()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(region: &str, latency_ms: f64, uptime: f64) -> TelemetryRecord {
        TelemetryRecord::new(region, latency_ms, uptime)
    }

    // ========================================================================
    // Primitives
    // ========================================================================

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn mean_of_values() {
        assert_eq!(mean(&[100.0, 200.0, 300.0]), 200.0);
        assert_eq!(mean(&[1.5]), 1.5);
    }

    #[test]
    fn p95_of_empty_is_zero() {
        assert_eq!(p95(&[]), 0.0);
    }

    #[test]
    fn p95_of_single_value_is_that_value() {
        assert_eq!(p95(&[42.0]), 42.0);
        assert_eq!(p95(&[0.0]), 0.0);
    }

    #[test]
    fn p95_interpolates_between_order_statistics() {
        // pos = 2 * 0.95 = 1.9 -> 200 + (300 - 200) * 0.9
        assert_eq!(p95(&[100.0, 200.0, 300.0]), 290.0);
    }

    #[test]
    fn p95_is_order_insensitive() {
        assert_eq!(p95(&[300.0, 100.0, 200.0]), p95(&[100.0, 200.0, 300.0]));
    }

    #[test]
    fn p95_stays_within_sample_bounds() {
        let samples: Vec<f64> = (0..97).map(|i| (i * 7 % 53) as f64).collect();
        let value = p95(&samples);
        let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert!(value >= min && value <= max);
    }

    #[test]
    fn p95_of_uniform_values_is_that_value() {
        assert_eq!(p95(&[5.0; 20]), 5.0);
    }

    // ========================================================================
    // summarize
    // ========================================================================

    #[test]
    fn summarize_single_region() {
        let records = vec![
            record("us-east", 100.0, 0.99),
            record("us-east", 200.0, 0.995),
            record("us-east", 300.0, 0.98),
        ];

        let result = summarize(&records, &["us-east"], 150.0).unwrap();
        let summary = &result["us-east"];

        assert_eq!(summary.avg_latency, 200.0);
        assert_eq!(summary.p95_latency, 290.0);
        assert_eq!(summary.avg_uptime, 0.988333);
        assert_eq!(summary.breaches, 2);
    }

    #[test]
    fn requested_region_without_samples_gets_zero_summary() {
        let records = vec![record("us-east", 100.0, 0.99)];

        let result = summarize(&records, &["us-east", "eu-west"], 150.0).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result["eu-west"], RegionSummary::zero());
    }

    #[test]
    fn sample_at_threshold_is_not_a_breach() {
        let records = vec![
            record("us-east", 150.0, 0.99),
            record("us-east", 150.1, 0.99),
        ];

        let result = summarize(&records, &["us-east"], 150.0).unwrap();
        assert_eq!(result["us-east"].breaches, 1);
    }

    #[test]
    fn region_matching_is_case_and_trim_insensitive() {
        let records = vec![record("us-east", 100.0, 0.99)];

        let result = summarize(&records, &[" US-East "], 150.0).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result["us-east"].avg_latency, 100.0);
    }

    #[test]
    fn duplicate_requested_regions_collapse() {
        let records = vec![record("us-east", 100.0, 0.99)];

        let result = summarize(&records, &["us-east", "US-EAST", " us-east"], 150.0).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn empty_region_set_is_an_error() {
        let records = vec![record("us-east", 100.0, 0.99)];

        let empty: [&str; 0] = [];
        assert!(matches!(
            summarize(&records, &empty, 150.0),
            Err(Error::EmptyRegionSet)
        ));
        assert!(matches!(
            summarize(&records, &[" ", ""], 150.0),
            Err(Error::EmptyRegionSet)
        ));
    }

    #[test]
    fn non_requested_regions_are_ignored() {
        let records = vec![
            record("us-east", 100.0, 0.99),
            record("eu-west", 9000.0, 0.1),
        ];

        let result = summarize(&records, &["us-east"], 150.0).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result["us-east"].avg_latency, 100.0);
    }

    #[test]
    fn latency_rounds_to_two_decimals() {
        let records = vec![
            record("us-east", 100.0, 0.99),
            record("us-east", 100.333, 0.99),
        ];

        let result = summarize(&records, &["us-east"], 500.0).unwrap();
        assert_eq!(result["us-east"].avg_latency, 100.17);
    }

    #[test]
    fn summarize_does_not_mutate_inputs() {
        let records = vec![
            record("us-east", 300.0, 0.99),
            record("us-east", 100.0, 0.98),
        ];
        let before = records.clone();

        let _ = summarize(&records, &["us-east"], 150.0).unwrap();
        assert_eq!(records, before);
    }

    #[test]
    fn summarize_is_deterministic() {
        let records: Vec<TelemetryRecord> = (0..50)
            .map(|i| record("us-east", (i * 13 % 97) as f64, 0.9 + (i as f64) / 1000.0))
            .collect();

        let a = summarize(&records, &["us-east", "eu-west"], 40.0).unwrap();
        let b = summarize(&records, &["us-east", "eu-west"], 40.0).unwrap();
        assert_eq!(a, b);
    }
}
