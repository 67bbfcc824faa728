//! Per-region summary statistics.

use serde::{Deserialize, Serialize};

/// Decimal places kept for latency statistics.
pub const LATENCY_DECIMALS: u32 = 2;

/// Decimal places kept for uptime statistics, which sit in a narrow band
/// near 1.0 and need finer resolution.
pub const UPTIME_DECIMALS: u32 = 6;

/// Summary statistics for one requested region.
///
/// Every region the caller asks for gets one of these, even when the
/// snapshot holds no samples for it, so consumers index into the response
/// without existence checks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RegionSummary {
    /// Mean latency in milliseconds, rounded to [`LATENCY_DECIMALS`].
    pub avg_latency: f64,

    /// Interpolated 95th-percentile latency in milliseconds, rounded to
    /// [`LATENCY_DECIMALS`].
    pub p95_latency: f64,

    /// Mean uptime fraction, rounded to [`UPTIME_DECIMALS`].
    pub avg_uptime: f64,

    /// Number of samples whose latency strictly exceeded the caller's
    /// threshold.
    pub breaches: u64,
}

impl RegionSummary {
    /// The summary emitted for a requested region with no matching samples.
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Round `value` to `decimals` decimal places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_summary_is_all_zero() {
        let s = RegionSummary::zero();
        assert_eq!(s.avg_latency, 0.0);
        assert_eq!(s.p95_latency, 0.0);
        assert_eq!(s.avg_uptime, 0.0);
        assert_eq!(s.breaches, 0);
    }

    #[test]
    fn round_to_two_decimals() {
        assert_eq!(round_to(200.006, 2), 200.01);
        assert_eq!(round_to(290.0, 2), 290.0);
        assert_eq!(round_to(123.456, 2), 123.46);
    }

    #[test]
    fn round_to_six_decimals() {
        assert_eq!(round_to(0.98833333333, 6), 0.988333);
        assert_eq!(round_to(1.0, 6), 1.0);
    }

    #[test]
    fn round_to_zero_decimals() {
        assert_eq!(round_to(12.5, 0), 13.0);
        assert_eq!(round_to(12.4, 0), 12.0);
    }

    #[test]
    fn summary_serializes_breaches_as_integer() {
        let s = RegionSummary {
            avg_latency: 200.0,
            p95_latency: 290.0,
            avg_uptime: 0.988333,
            breaches: 2,
        };
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"breaches\":2"));
        assert!(json.contains("\"avg_latency\":200.0"));
    }

    #[test]
    fn summary_roundtrips_through_json() {
        let s = RegionSummary {
            avg_latency: 123.45,
            p95_latency: 180.0,
            avg_uptime: 0.999999,
            breaches: 7,
        };
        let json = serde_json::to_string(&s).unwrap();
        let back: RegionSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
