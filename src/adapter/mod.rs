//! The accumulator pipeline: normalize → build → group.
//!
//! Each accepted measurement call runs through three stages:
//! - [`convert`]: per-field type normalization into a closed tagged union
//! - [`builder`]: one OTLP metric plus datapoint per supported field
//! - [`grouper`]: assignment into resource/scope containers
//!
//! [`accumulator::OtelAccumulator`] orchestrates the stages under a single
//! critical section and serves immutable snapshots.

pub mod accumulator;
pub mod builder;
pub mod convert;
pub mod grouper;

pub use accumulator::OtelAccumulator;
pub use convert::{normalize, normalize_measurement, NormalizedValue, NumberValue};
pub use grouper::{BySource, CallContext, GroupingPolicy, PerCall};
