//! Type normalization for dynamically typed field values.
//!
//! Pure functions, no side effects, no failures: every input maps to a
//! number, a set of histogram statistics, or the `Unsupported` marker.

use crate::core::types::{FieldValue, Measurement};

/// Result of normalizing one field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormalizedValue {
    /// A numeric value, integer-derived or floating point
    Number(NumberValue),
    /// Aggregate statistics read from a distribution summary
    HistogramStats {
        /// Smallest observed value
        min: f64,
        /// Largest observed value
        max: f64,
        /// Weighted sum of observed values
        sum: f64,
        /// Total weight, rounded to a whole sample count
        count: u64,
    },
    /// The field type has no metric representation
    Unsupported,
}

/// Normalized numeric value preserving whether the original was an integer.
///
/// The variant drives the OTLP datapoint representation: `Int` becomes
/// `AsInt`, `Double` becomes `AsDouble`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberValue {
    /// Integer-derived value (booleans and all integer widths)
    Int(i64),
    /// Floating point value
    Double(f64),
}

/// Maps one field value into its normalized representation.
///
/// Booleans coerce to 0/1, integers widen to signed 64-bit, floats pass
/// through, distribution summaries collapse to their four statistics.
/// Text and anything without a mapping normalizes to `Unsupported`.
pub fn normalize(value: &FieldValue) -> NormalizedValue {
    match value {
        FieldValue::Bool(v) => NormalizedValue::Number(NumberValue::Int(i64::from(*v))),
        FieldValue::I64(v) => NormalizedValue::Number(NumberValue::Int(*v)),
        // Inputs are assumed to fit the signed range
        FieldValue::U64(v) => NormalizedValue::Number(NumberValue::Int(*v as i64)),
        FieldValue::F64(v) => NormalizedValue::Number(NumberValue::Double(*v)),
        FieldValue::Distribution(dist) => NormalizedValue::HistogramStats {
            min: dist.minimum(),
            max: dist.maximum(),
            sum: dist.sum(),
            count: dist.sample_count().round() as u64,
        },
        FieldValue::Text(_) => NormalizedValue::Unsupported,
    }
}

/// Rewrites a measurement's fields into their normalized representation.
///
/// Integer-derived fields become `I64`, floats stay `F64`, distribution
/// fields are kept as-is, and unsupported fields are removed. The harness
/// uses this when a pre-typed measurement must be repaired before further
/// routing.
pub fn normalize_measurement(mut measurement: Measurement) -> Measurement {
    let fields = std::mem::take(&mut measurement.fields);
    measurement.fields = fields
        .into_iter()
        .filter_map(|(name, value)| {
            let rewritten = match normalize(&value) {
                NormalizedValue::Number(NumberValue::Int(v)) => FieldValue::I64(v),
                NormalizedValue::Number(NumberValue::Double(v)) => FieldValue::F64(v),
                NormalizedValue::HistogramStats { .. } => value,
                NormalizedValue::Unsupported => return None,
            };
            Some((name, rewritten))
        })
        .collect();
    measurement
}
