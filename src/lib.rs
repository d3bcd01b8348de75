//! Time-bucketed statistics over network measurement logs.
//!
//! Measurement records (timestamp, duration, throughput, optional error
//! message) are folded into one accumulator per time bucket, where the
//! bucket is the record's timestamp floored to a granularity (second,
//! minute, hour or day) in the record's own UTC offset.
//!
//! Each bucket tracks extrema, counters and sums while folding, and derives
//! averages, error rates and a sampling-density ratio ("fitness") on demand.
//! Accumulators for the same bucket merge associatively, so partial runs
//! over slices of a dataset can be consolidated in any order.
//!
//! Values are f32s by default, but can be switched to f64 using the
//! `high_precision` feature flag.
//!
//! ```
//! use grana::{analyze, Granularity, Record, Timestamp};
//!
//! let ts = |s| Timestamp::parse_from_rfc3339(s).unwrap();
//!
//! let records = [
//!     Record::new(ts("2024-05-01T10:15:00+02:00"), 120, 10.5, None),
//!     Record::new(ts("2024-05-01T10:45:30+02:00"), 95, 12.5, None),
//!     Record::new(
//!         ts("2024-05-01T11:02:00+02:00"),
//!         340,
//!         -1.0,
//!         Some("connection reset".into()),
//!     ),
//! ];
//!
//! // one accumulator per distinct hour
//! let buckets = analyze(&records, Granularity::Hour)?;
//! assert_eq!(2, buckets.len());
//!
//! for stats in buckets.values() {
//!     println!(
//!         "{}: {} ok, {} failed, avg {} mbps",
//!         stats.bucket(),
//!         stats.success_count(),
//!         stats.error_count(),
//!         stats.avg_throughput(),
//!     );
//! }
//!
//! # Ok::<(), grana::Error>(())
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::all, missing_docs, clippy::cargo)]
#![deny(clippy::unwrap_used)]
#![warn(clippy::indexing_slicing)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(clippy::expect_used)]
#![allow(clippy::missing_const_for_fn)]
#![warn(clippy::multiple_crate_versions)]
#![warn(clippy::result_unit_err)]

mod engine;
mod error;
mod granularity;

pub mod ingest;

mod record;

pub mod report;

mod stats;

type HashMap<K, V> = std::collections::HashMap<K, V, rustc_hash::FxBuildHasher>;

pub use engine::{analyze, merge, BucketMap};
pub use error::{Error, Result};
pub use granularity::Granularity;
pub use record::{Outcome, Record, RecordError};
pub use stats::BucketStats;

/// Timestamp of a measurement, carrying the UTC offset it was recorded in.
pub type Timestamp = chrono::DateTime<chrono::FixedOffset>;

/// Value used for throughput measurements
#[cfg(feature = "high_precision")]
pub type Value = f64;

/// Value used for throughput measurements
#[cfg(not(feature = "high_precision"))]
pub type Value = f32;
