//! The accumulator: orchestrates translation and serves snapshots.
//!
//! One instance owns all accumulated state behind a single mutex. Every
//! `add_*` call normalizes, builds, and registers under one critical
//! section, so a snapshot never observes a partially applied call. No
//! operation performs I/O or blocks beyond the lock.

use crate::adapter::builder::build_metric;
use crate::adapter::convert::{normalize, NormalizedValue};
use crate::adapter::grouper::{BySource, CallContext, Grouper, GroupingPolicy, PerCall};
use crate::core::config::{AdapterConfig, GroupingMode};
use crate::core::types::{Fields, Measurement, Tags, ValueKind};
use crate::core::{Error, Result};
use opentelemetry_proto::tonic::metrics::v1::MetricsData;
use parking_lot::Mutex;
use std::time::{Duration, SystemTime};

/// Accumulates legacy measurements as OTLP metrics.
///
/// All operations take `&self`; concurrent producers from independent
/// worker tasks are safe. Snapshots taken with [`get_otel_metrics`] are
/// deep copies and never change after being returned.
///
/// [`get_otel_metrics`]: OtelAccumulator::get_otel_metrics
pub struct OtelAccumulator {
    inner: Mutex<State>,
}

struct State {
    data: MetricsData,
    grouper: Grouper,
    precision: Duration,
    error_count: u64,
}

impl OtelAccumulator {
    /// Creates an accumulator with default configuration
    pub fn new() -> Self {
        Self::with_policy(Box::new(PerCall), &AdapterConfig::default())
    }

    /// Creates an accumulator from a validated configuration
    pub fn from_config(config: &AdapterConfig) -> Result<Self> {
        config.validate()?;
        let policy: Box<dyn GroupingPolicy> = match config.grouping {
            GroupingMode::PerCall => Box::new(PerCall),
            GroupingMode::BySource => Box::new(BySource),
        };
        Ok(Self::with_policy(policy, config))
    }

    /// Creates an accumulator with a custom container-assignment policy
    pub fn with_policy(policy: Box<dyn GroupingPolicy>, config: &AdapterConfig) -> Self {
        Self {
            inner: Mutex::new(State {
                data: MetricsData::default(),
                grouper: Grouper::new(
                    policy,
                    config.scope_name.clone(),
                    config.scope_version.clone(),
                ),
                precision: config.precision,
                error_count: 0,
            }),
        }
    }

    /// Ingests a counter measurement; supported fields become Sum metrics
    pub fn add_counter(&self, name: &str, fields: Fields, tags: Tags, timestamp: SystemTime) {
        self.add_measurement(&Measurement {
            name: name.to_owned(),
            tags,
            fields,
            timestamp,
            kind: ValueKind::Counter,
        });
    }

    /// Ingests a gauge measurement; supported fields become Gauge metrics
    pub fn add_gauge(&self, name: &str, fields: Fields, tags: Tags, timestamp: SystemTime) {
        self.add_measurement(&Measurement {
            name: name.to_owned(),
            tags,
            fields,
            timestamp,
            kind: ValueKind::Gauge,
        });
    }

    /// Ingests an untyped measurement; treated as a gauge on output
    pub fn add_fields(&self, name: &str, fields: Fields, tags: Tags, timestamp: SystemTime) {
        self.add_measurement(&Measurement {
            name: name.to_owned(),
            tags,
            fields,
            timestamp,
            kind: ValueKind::Untyped,
        });
    }

    /// Ingests a distribution measurement.
    ///
    /// Expects exactly one distribution-bearing field; when present, one
    /// Histogram metric named `<measurement>_<field>` is produced from the
    /// distribution's min/max/sum/count.
    pub fn add_histogram(&self, name: &str, fields: Fields, tags: Tags, timestamp: SystemTime) {
        self.add_measurement(&Measurement {
            name: name.to_owned(),
            tags,
            fields,
            timestamp,
            kind: ValueKind::HistogramDistribution,
        });
    }

    /// Accepts and drops a summary measurement.
    ///
    /// Summary ingestion is a permanent limitation; the call has no effect
    /// on the data model.
    pub fn add_summary(&self, name: &str, fields: Fields, tags: Tags, timestamp: SystemTime) {
        self.add_measurement(&Measurement {
            name: name.to_owned(),
            tags,
            fields,
            timestamp,
            kind: ValueKind::Summary,
        });
    }

    /// Ingests an already-typed measurement, dispatching on its own kind.
    ///
    /// A measurement that fails [`Measurement::validate`] is dropped and
    /// counted through the error sink.
    pub fn add_metric(&self, measurement: Measurement) {
        self.add_measurement(&measurement);
    }

    /// Records an adapter-level error from the surrounding harness.
    ///
    /// `None` is a tolerated no-op. Errors are logged and counted, never
    /// stored in the data model and never escalated.
    pub fn add_error(&self, err: Option<Error>) {
        let Some(err) = err else { return };
        tracing::error!(error = %err, category = err.category(), "adapter error");
        self.inner.lock().error_count += 1;
    }

    /// Returns how many adapter-level errors have been recorded
    pub fn error_count(&self) -> u64 {
        self.inner.lock().error_count
    }

    /// Sets the truncation unit for subsequently built datapoints.
    ///
    /// Already-stored datapoints keep their timestamps.
    pub fn set_precision(&self, precision: Duration) {
        self.inner.lock().precision = precision;
    }

    /// Returns an immutable point-in-time copy of everything accumulated.
    ///
    /// When nothing has been accepted, this is the canonical empty data
    /// model.
    pub fn get_otel_metrics(&self) -> MetricsData {
        self.inner.lock().data.clone()
    }

    /// Discards every accumulated container.
    ///
    /// The harness calls this after a successful export flush. Snapshots
    /// taken earlier are unaffected; the error counter is retained.
    pub fn reset(&self) {
        let mut state = self.inner.lock();
        state.data = MetricsData::default();
        state.grouper.reset();
    }

    /// Normalizes, builds, and registers one measurement under a single
    /// critical section.
    ///
    /// Unsupported fields are skipped individually; a call producing zero
    /// metrics leaves the data model untouched. A structurally invalid
    /// measurement is reported through the error sink and dropped.
    fn add_measurement(&self, measurement: &Measurement) {
        if let Err(err) = measurement.validate() {
            self.add_error(Some(err));
            return;
        }
        if measurement.kind == ValueKind::Summary {
            tracing::debug!(
                measurement = %measurement.name,
                "dropping unsupported summary measurement"
            );
            return;
        }

        let mut state = self.inner.lock();
        let precision = state.precision;

        let mut metrics = Vec::with_capacity(measurement.fields.len());
        for (field_name, value) in &measurement.fields {
            let normalized = normalize(value);
            if normalized == NormalizedValue::Unsupported {
                tracing::trace!(
                    measurement = %measurement.name,
                    field = %field_name,
                    "skipping field with unsupported type"
                );
                continue;
            }
            if let Some(metric) = build_metric(
                &measurement.name,
                field_name,
                measurement.kind,
                normalized,
                &measurement.tags,
                measurement.timestamp,
                precision,
            ) {
                metrics.push(metric);
            }
        }

        let call = CallContext {
            measurement_name: &measurement.name,
            tags: &measurement.tags,
            kind: measurement.kind,
        };
        let state = &mut *state;
        state.grouper.register(&mut state.data, &call, metrics);
    }
}

impl Default for OtelAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry_proto::tonic::metrics::v1::metric;

    fn fields_from(entries: &[(&str, f64)]) -> Fields {
        entries
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).into()))
            .collect()
    }

    #[test]
    fn test_summary_call_is_a_no_op() {
        let acc = OtelAccumulator::new();
        acc.add_summary(
            "acc_summary_test",
            fields_from(&[("usage", 20.0)]),
            Tags::new(),
            SystemTime::now(),
        );

        assert_eq!(acc.get_otel_metrics(), MetricsData::default());
    }

    #[test]
    fn test_counter_produces_sum_container() {
        let acc = OtelAccumulator::new();
        acc.add_counter(
            "net",
            fields_from(&[("rx", 1.0), ("tx", 2.0)]),
            Tags::new(),
            SystemTime::now(),
        );

        let snapshot = acc.get_otel_metrics();
        assert_eq!(snapshot.resource_metrics.len(), 1);
        let metrics = &snapshot.resource_metrics[0].scope_metrics[0].metrics;
        assert_eq!(metrics.len(), 2);
        for metric in metrics {
            assert!(matches!(metric.data, Some(metric::Data::Sum(_))));
        }
    }

    #[test]
    fn test_snapshot_is_independent_of_later_calls() {
        let acc = OtelAccumulator::new();
        acc.add_gauge("cpu", fields_from(&[("usage", 1.0)]), Tags::new(), SystemTime::now());

        let before = acc.get_otel_metrics();
        acc.add_gauge("cpu", fields_from(&[("usage", 2.0)]), Tags::new(), SystemTime::now());

        assert_eq!(before.resource_metrics.len(), 1);
        assert_eq!(acc.get_otel_metrics().resource_metrics.len(), 2);
    }

    #[test]
    fn test_error_sink_counts_and_tolerates_none() {
        let acc = OtelAccumulator::new();
        acc.add_error(None);
        acc.add_error(None);
        assert_eq!(acc.error_count(), 0);

        acc.add_error(Some(Error::source("foo")));
        acc.add_error(Some(Error::source("bar")));
        assert_eq!(acc.error_count(), 2);
        assert_eq!(acc.get_otel_metrics(), MetricsData::default());
    }

    #[test]
    fn test_reset_clears_containers_but_keeps_errors() {
        let acc = OtelAccumulator::new();
        acc.add_gauge("cpu", fields_from(&[("usage", 1.0)]), Tags::new(), SystemTime::now());
        acc.add_error(Some(Error::source("boom")));

        let snapshot = acc.get_otel_metrics();
        acc.reset();

        assert_eq!(acc.get_otel_metrics(), MetricsData::default());
        assert_eq!(snapshot.resource_metrics.len(), 1);
        assert_eq!(acc.error_count(), 1);
    }

    #[test]
    fn test_invalid_measurement_reported_through_error_sink() {
        let acc = OtelAccumulator::new();
        let measurement = Measurement::new("", ValueKind::Gauge, SystemTime::now())
            .with_field("usage", 1.0f64);

        acc.add_metric(measurement);
        acc.add_gauge("", fields_from(&[("usage", 1.0)]), Tags::new(), SystemTime::now());

        assert_eq!(acc.get_otel_metrics(), MetricsData::default());
        assert_eq!(acc.error_count(), 2);
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let mut config = AdapterConfig::default();
        config.precision = Duration::ZERO;
        assert!(OtelAccumulator::from_config(&config).is_err());
    }
}
