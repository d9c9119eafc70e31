//! The legacy measurement model ingested by the accumulator.
//!
//! A measurement is one record from a plugin source: a name, unique string
//! tags, dynamically typed named fields, a timestamp, and a coarse value
//! kind. Fields use a closed value enum rather than trait-object downcasting
//! so unsupported types are a variant, not a runtime surprise.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use crate::distribution::DistributionSummary;

/// Tag mapping of a measurement. Keys are unique; iteration is key-ordered.
pub type Tags = BTreeMap<String, String>;

/// Field mapping of a measurement. Keys are unique; iteration is key-ordered.
pub type Fields = BTreeMap<String, FieldValue>;

/// Legacy classification of a measurement, used to choose the output
/// metric type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Monotonically increasing value (requests, errors)
    Counter,
    /// Point-in-time value (CPU usage, memory)
    Gauge,
    /// Untyped field bag; treated as a gauge for output purposes
    Untyped,
    /// Distribution-backed measurement producing a histogram
    HistogramDistribution,
    /// Quantile summary; permanently unsupported, calls are dropped
    Summary,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Counter => "counter",
            Self::Gauge => "gauge",
            Self::Untyped => "untyped",
            Self::HistogramDistribution => "histogram",
            Self::Summary => "summary",
        };
        write!(f, "{name}")
    }
}

/// A single dynamically typed field value.
///
/// Narrow integers widen into `I64` via the `From` conversions below; `u64`
/// values are assumed to fit in a signed 64-bit range.
#[derive(Clone)]
pub enum FieldValue {
    /// Boolean flag; coerces to 0/1
    Bool(bool),
    /// Signed integer, any source width
    I64(i64),
    /// Unsigned integer that did not fit a smaller width
    U64(u64),
    /// Floating point value
    F64(f64),
    /// Text value; unsupported by the translation and dropped
    Text(String),
    /// Streaming distribution summary backing a histogram metric
    Distribution(Arc<dyn DistributionSummary>),
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "Bool({v})"),
            Self::I64(v) => write!(f, "I64({v})"),
            Self::U64(v) => write!(f, "U64({v})"),
            Self::F64(v) => write!(f, "F64({v})"),
            Self::Text(v) => write!(f, "Text({v:?})"),
            Self::Distribution(d) => write!(
                f,
                "Distribution(min={}, max={}, sum={}, count={})",
                d.minimum(),
                d.maximum(),
                d.sum(),
                d.sample_count()
            ),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i8> for FieldValue {
    fn from(v: i8) -> Self {
        Self::I64(i64::from(v))
    }
}

impl From<i16> for FieldValue {
    fn from(v: i16) -> Self {
        Self::I64(i64::from(v))
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::I64(i64::from(v))
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<u8> for FieldValue {
    fn from(v: u8) -> Self {
        Self::I64(i64::from(v))
    }
}

impl From<u16> for FieldValue {
    fn from(v: u16) -> Self {
        Self::I64(i64::from(v))
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        Self::I64(i64::from(v))
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        Self::U64(v)
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        Self::F64(f64::from(v))
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Arc<dyn DistributionSummary>> for FieldValue {
    fn from(v: Arc<dyn DistributionSummary>) -> Self {
        Self::Distribution(v)
    }
}

/// One ingested record from a plugin source.
///
/// Ephemeral: owned by the caller and consumed synchronously by the
/// accumulator.
#[derive(Debug, Clone)]
pub struct Measurement {
    /// Measurement name, prefixes every produced metric name
    pub name: String,
    /// Tag mapping, copied into datapoint attributes
    pub tags: Tags,
    /// Named field values, one output metric per supported field
    pub fields: Fields,
    /// Collection time, truncated to the configured precision on output
    pub timestamp: SystemTime,
    /// Coarse value kind
    pub kind: ValueKind,
}

impl Measurement {
    /// Creates an empty measurement of the given kind
    pub fn new<S: Into<String>>(name: S, kind: ValueKind, timestamp: SystemTime) -> Self {
        Self {
            name: name.into(),
            tags: Tags::new(),
            fields: Fields::new(),
            timestamp,
            kind,
        }
    }

    /// Adds one tag
    #[must_use]
    pub fn with_tag<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Adds one field
    #[must_use]
    pub fn with_field<K: Into<String>, V: Into<FieldValue>>(mut self, key: K, value: V) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns the field with the given name, if present
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Checks the structural contract the harness must uphold
    pub fn validate(&self) -> crate::core::Result<()> {
        if self.name.is_empty() {
            return Err(crate::core::Error::invalid_measurement(
                "measurement name cannot be empty",
            ));
        }
        Ok(())
    }
}
