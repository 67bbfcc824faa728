//! # regionwatch-types
//!
//! Core types for region telemetry summaries. This crate defines the schema
//! shared by the regionwatch service and anything else that produces or
//! consumes its data: normalized telemetry samples, per-region summary
//! statistics, and the request/response wire types.
//!
//! ## Design Goals
//!
//! - **One normalization rule**: region keys are trimmed and lower-cased in
//!   exactly one place, so loaders and aggregators always compare equal keys
//! - **Wire-first**: every type serializes with serde, matching the JSON the
//!   HTTP endpoint speaks
//! - **No behavior**: statistics live in the service crate; this crate only
//!   carries data and the normalization/rounding helpers both sides share
//!
//! ## Example
//!
//! ```rust
//! use regionwatch_types::{normalize_region, RegionSummary, TelemetryRecord};
//!
//! let record = TelemetryRecord::new(" US-East ", 182.0, 0.993);
//! assert_eq!(record.region, "us-east");
//! assert_eq!(normalize_region(" US-East "), record.region);
//!
//! // Regions without samples still get a summary.
//! let empty = RegionSummary::zero();
//! assert_eq!(empty.breaches, 0);
//! ```

mod record;
mod request;
mod summary;

pub use record::*;
pub use request::*;
pub use summary::*;
