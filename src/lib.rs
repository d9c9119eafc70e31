//! otel-adapter - Legacy plugin metrics to OpenTelemetry translation.
//!
//! This crate is the metric-model translation layer of a telemetry agent.
//! It accepts measurements in the legacy plugin shape (a name, string tags,
//! dynamically typed fields, a timestamp, and a coarse value kind) and
//! accumulates them as standardized OTLP metrics
//! (resource → instrumentation scope → metric → datapoint), ready for export.
//!
//! # Features
//!
//! - **Per-field expansion**: every supported field of a measurement becomes
//!   its own metric, named `<measurement>_<field>`
//! - **Type normalization**: booleans and integers of any width coerce to
//!   64-bit integers, floats stay doubles, unsupported types are dropped
//!   without failing the rest of the call
//! - **Histogram reconstruction**: distribution-backed fields turn into
//!   histogram datapoints carrying min/max/sum/count
//! - **Immutable snapshots**: exported metrics are deep copies, never
//!   affected by later ingestion
//! - **Pluggable grouping**: container assignment per call by default, with
//!   a policy hook for grouping by logical source
//!
//! # Architecture
//!
//! - `adapter`: the accumulator pipeline (normalize → build → group)
//! - `core`: domain models, configuration, and errors
//! - `distribution`: the streaming distribution-summary boundary
//!
//! # Example
//!
//! ```
//! use otel_adapter::{Fields, OtelAccumulator, Tags};
//! use std::time::SystemTime;
//!
//! let acc = OtelAccumulator::new();
//! let mut fields = Fields::new();
//! fields.insert("usage".to_owned(), 42.5.into());
//! acc.add_gauge("cpu", fields, Tags::new(), SystemTime::now());
//!
//! let snapshot = acc.get_otel_metrics();
//! assert_eq!(snapshot.resource_metrics.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod adapter;
pub mod core;
pub mod distribution;

// Re-export core types for convenience
pub use crate::adapter::{GroupingPolicy, OtelAccumulator};
pub use crate::core::{
    AdapterConfig, Error, FieldValue, Fields, GroupingMode, Measurement, Result, Tags, ValueKind,
};
pub use crate::distribution::{DistributionSummary, StreamingDistribution};
