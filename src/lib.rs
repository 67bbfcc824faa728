//! # regionwatch
//!
//! A stateless HTTP service that summarizes per-region latency and uptime
//! telemetry. It reads a static snapshot (JSON or CSV) from a data
//! directory and, per request, computes four statistics for each requested
//! region: mean latency, interpolated 95th-percentile latency, mean uptime,
//! and the number of samples breaching a caller-supplied latency threshold.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        Service                             │
//! │  ┌─────────┐     ┌──────────────┐     ┌─────────────────┐  │
//! │  │  http   │────▶│    source    │────▶│    aggregate    │  │
//! │  │ (hyper) │     │ (load+cache) │     │ (mean/p95/...)  │  │
//! │  └─────────┘     └──────────────┘     └─────────────────┘  │
//! │       │                  │                                 │
//! │       ▼                  ▼                                 │
//! │  wire types      TelemetryRecord        RegionSummary      │
//! │  (regionwatch-types: the shared schema)                    │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: snapshot loading: candidate-file probing, JSON/CSV
//!   parsing, field-alias resolution, and an mtime-keyed [`CachedLoader`]
//! - **[`aggregate`]**: the pure statistics engine over normalized records
//! - **[`http`]**: hyper server wiring the two together, with CORS for
//!   browser dashboards
//! - **[`error`]**: the failure taxonomy the HTTP layer maps to status codes
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! regionwatch --data-dir data --listen 0.0.0.0:8000
//! ```
//!
//! ### As a library
//!
//! ```
//! use regionwatch::summarize;
//! use regionwatch_types::TelemetryRecord;
//!
//! let records = vec![
//!     TelemetryRecord::new("us-east", 100.0, 0.99),
//!     TelemetryRecord::new("us-east", 200.0, 0.995),
//! ];
//!
//! let summaries = summarize(&records, &["us-east"], 150.0).unwrap();
//! assert_eq!(summaries["us-east"].breaches, 1);
//! ```

pub mod aggregate;
pub mod error;
pub mod http;
pub mod source;

// Re-export main types for convenience
pub use aggregate::{mean, p95, summarize};
pub use error::Error;
pub use http::{run_server, ServerConfig, SummaryService};
pub use source::{CachedLoader, Loader};
