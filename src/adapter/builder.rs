//! Builds one OTLP metric plus datapoint from a normalized field.
//!
//! Name composition uses one fixed separator on every platform. Only the
//! kind/value pairings with a defined mapping produce a metric; everything
//! else returns `None` and the caller skips the field.

use crate::adapter::convert::{NormalizedValue, NumberValue};
use crate::core::types::{Tags, ValueKind};
use opentelemetry_proto::tonic::common::v1::{any_value, AnyValue, KeyValue};
use opentelemetry_proto::tonic::metrics::v1::{
    metric, number_data_point, AggregationTemporality, Gauge, Histogram, HistogramDataPoint,
    Metric, NumberDataPoint, Sum,
};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Fixed joiner between measurement name and field name
const NAME_SEPARATOR: char = '_';

/// Builds the metric for one normalized field, or `None` when the
/// kind/value pairing has no OTLP mapping.
///
/// Mappings: Counter → monotonic cumulative Sum; Gauge and Untyped → Gauge;
/// HistogramDistribution → Histogram carrying min/max/sum/count and no
/// bucket boundaries. Summary never reaches this layer.
pub fn build_metric(
    measurement_name: &str,
    field_name: &str,
    kind: ValueKind,
    normalized: NormalizedValue,
    tags: &Tags,
    timestamp: SystemTime,
    precision: Duration,
) -> Option<Metric> {
    let time_unix_nano = truncate_nanos(to_unix_nanos(timestamp), precision);
    let attributes = tags_to_attributes(tags);

    let data = match (kind, normalized) {
        (ValueKind::Counter, NormalizedValue::Number(value)) => metric::Data::Sum(Sum {
            data_points: vec![build_number_point(value, attributes, time_unix_nano)],
            aggregation_temporality: AggregationTemporality::Cumulative as i32,
            is_monotonic: true,
        }),
        (ValueKind::Gauge | ValueKind::Untyped, NormalizedValue::Number(value)) => {
            metric::Data::Gauge(Gauge {
                data_points: vec![build_number_point(value, attributes, time_unix_nano)],
            })
        },
        (
            ValueKind::HistogramDistribution,
            NormalizedValue::HistogramStats { min, max, sum, count },
        ) => metric::Data::Histogram(Histogram {
            data_points: vec![HistogramDataPoint {
                attributes,
                start_time_unix_nano: 0,
                time_unix_nano,
                count,
                sum: Some(sum),
                bucket_counts: vec![],
                explicit_bounds: vec![],
                exemplars: vec![],
                flags: 0,
                min: Some(min),
                max: Some(max),
            }],
            aggregation_temporality: AggregationTemporality::Cumulative as i32,
        }),
        _ => return None,
    };

    Some(Metric {
        name: compose_name(measurement_name, field_name),
        description: String::new(),
        unit: String::new(),
        metadata: vec![],
        data: Some(data),
    })
}

/// Joins measurement and field names with the fixed separator
pub fn compose_name(measurement_name: &str, field_name: &str) -> String {
    format!("{measurement_name}{NAME_SEPARATOR}{field_name}")
}

fn build_number_point(
    value: NumberValue,
    attributes: Vec<KeyValue>,
    time_unix_nano: u64,
) -> NumberDataPoint {
    let value = match value {
        NumberValue::Int(v) => number_data_point::Value::AsInt(v),
        NumberValue::Double(v) => number_data_point::Value::AsDouble(v),
    };
    NumberDataPoint {
        attributes,
        start_time_unix_nano: 0,
        time_unix_nano,
        exemplars: vec![],
        flags: 0,
        value: Some(value),
    }
}

/// Copies the tag mapping into key-ordered OTLP attributes
fn tags_to_attributes(tags: &Tags) -> Vec<KeyValue> {
    tags.iter()
        .map(|(key, value)| KeyValue {
            key: key.clone(),
            value: Some(AnyValue {
                value: Some(any_value::Value::StringValue(value.clone())),
            }),
        })
        .collect()
}

fn to_unix_nanos(timestamp: SystemTime) -> u64 {
    // Pre-epoch timestamps clamp to zero
    timestamp
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64)
}

fn truncate_nanos(nanos: u64, precision: Duration) -> u64 {
    // A precision beyond the u64 nanosecond range saturates rather than
    // wrapping into a garbage modulus
    let unit = u64::try_from(precision.as_nanos()).unwrap_or(u64::MAX);
    if unit <= 1 {
        return nanos;
    }
    nanos - nanos % unit
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags() -> Tags {
        Tags::from([("instance_id".to_owned(), "mock".to_owned())])
    }

    #[test]
    fn test_counter_maps_to_monotonic_sum() {
        let metric = build_metric(
            "net",
            "packets",
            ValueKind::Counter,
            NormalizedValue::Number(NumberValue::Int(12)),
            &tags(),
            SystemTime::now(),
            Duration::from_nanos(1),
        )
        .unwrap();

        assert_eq!(metric.name, "net_packets");
        let Some(metric::Data::Sum(sum)) = metric.data else {
            panic!("expected sum data");
        };
        assert!(sum.is_monotonic);
        assert_eq!(sum.aggregation_temporality, AggregationTemporality::Cumulative as i32);
        assert_eq!(
            sum.data_points[0].value,
            Some(number_data_point::Value::AsInt(12))
        );
    }

    #[test]
    fn test_untyped_maps_to_gauge() {
        let metric = build_metric(
            "cpu",
            "usage",
            ValueKind::Untyped,
            NormalizedValue::Number(NumberValue::Double(3.5)),
            &tags(),
            SystemTime::now(),
            Duration::from_nanos(1),
        )
        .unwrap();

        let Some(metric::Data::Gauge(gauge)) = metric.data else {
            panic!("expected gauge data");
        };
        assert_eq!(
            gauge.data_points[0].value,
            Some(number_data_point::Value::AsDouble(3.5))
        );
    }

    #[test]
    fn test_histogram_stats_populate_datapoint() {
        let metric = build_metric(
            "banana",
            "peel",
            ValueKind::HistogramDistribution,
            NormalizedValue::HistogramStats {
                min: 1.0,
                max: 9.0,
                sum: 40.0,
                count: 6,
            },
            &tags(),
            SystemTime::now(),
            Duration::from_nanos(1),
        )
        .unwrap();

        assert_eq!(metric.name, "banana_peel");
        let Some(metric::Data::Histogram(histogram)) = metric.data else {
            panic!("expected histogram data");
        };
        let dp = &histogram.data_points[0];
        assert_eq!(dp.min, Some(1.0));
        assert_eq!(dp.max, Some(9.0));
        assert_eq!(dp.sum, Some(40.0));
        assert_eq!(dp.count, 6);
        assert!(dp.explicit_bounds.is_empty());
        assert!(dp.bucket_counts.is_empty());
    }

    #[test]
    fn test_mismatched_kind_and_value() {
        // A distribution under a gauge kind has no mapping
        let metric = build_metric(
            "cpu",
            "usage",
            ValueKind::Gauge,
            NormalizedValue::HistogramStats {
                min: 0.0,
                max: 1.0,
                sum: 1.0,
                count: 1,
            },
            &tags(),
            SystemTime::now(),
            Duration::from_nanos(1),
        );
        assert!(metric.is_none());

        // A scalar under a histogram kind has no mapping either
        let metric = build_metric(
            "cpu",
            "usage",
            ValueKind::HistogramDistribution,
            NormalizedValue::Number(NumberValue::Double(1.0)),
            &tags(),
            SystemTime::now(),
            Duration::from_nanos(1),
        );
        assert!(metric.is_none());
    }

    #[test]
    fn test_unsupported_value_builds_nothing() {
        let metric = build_metric(
            "cpu",
            "client",
            ValueKind::Gauge,
            NormalizedValue::Unsupported,
            &tags(),
            SystemTime::now(),
            Duration::from_nanos(1),
        );
        assert!(metric.is_none());
    }

    #[test]
    fn test_timestamp_truncation() {
        let timestamp = UNIX_EPOCH + Duration::from_nanos(1_234_567_891);
        let metric = build_metric(
            "cpu",
            "usage",
            ValueKind::Gauge,
            NormalizedValue::Number(NumberValue::Double(1.0)),
            &Tags::new(),
            timestamp,
            Duration::from_secs(1),
        )
        .unwrap();

        let Some(metric::Data::Gauge(gauge)) = metric.data else {
            panic!("expected gauge data");
        };
        assert_eq!(gauge.data_points[0].time_unix_nano, 1_000_000_000);
    }

    #[test]
    fn test_oversized_precision_truncates_to_zero() {
        // Duration::MAX does not fit u64 nanoseconds; the unit must
        // saturate, truncating every representable timestamp down to zero
        let timestamp = UNIX_EPOCH + Duration::from_nanos(1_234_567_891);
        let metric = build_metric(
            "cpu",
            "usage",
            ValueKind::Gauge,
            NormalizedValue::Number(NumberValue::Double(1.0)),
            &Tags::new(),
            timestamp,
            Duration::MAX,
        )
        .unwrap();

        let Some(metric::Data::Gauge(gauge)) = metric.data else {
            panic!("expected gauge data");
        };
        assert_eq!(gauge.data_points[0].time_unix_nano, 0);
    }

    #[test]
    fn test_attributes_are_key_ordered() {
        let tags = Tags::from([
            ("zone".to_owned(), "b".to_owned()),
            ("host".to_owned(), "a".to_owned()),
        ]);
        let attributes = tags_to_attributes(&tags);
        assert_eq!(attributes[0].key, "host");
        assert_eq!(attributes[1].key, "zone");
    }
}
