//! Mapping of device-reported state onto metric samples

use serde_json::{Map, Value};

use crate::domain::{MetricName, MetricSample, TelemetryRecord};
use crate::validators::{require_number, require_present, ValidationError};

pub const DEVICE_ID_FIELD: &str = "device_id";

/// Result of mapping one report
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryOutcome {
    /// Report came from the accepted device; samples are ready to ingest
    Accepted {
        record: TelemetryRecord,
        samples: Vec<MetricSample>,
    },
    /// Report came from some other (test) device and is discarded
    Rejected { device_id: Value },
}

impl TelemetryOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, TelemetryOutcome::Rejected { .. })
    }
}

/// Parse the six metric fields out of a reported-state object
pub fn parse_record(
    reported: &Map<String, Value>,
    device_id: i64,
) -> Result<TelemetryRecord, ValidationError> {
    Ok(TelemetryRecord {
        device_id,
        liters_used: require_number(reported, MetricName::LitersUsed.as_str())?,
        input_degrees_c: require_number(reported, MetricName::InputDegreesC.as_str())?,
        output_degrees_c: require_number(reported, MetricName::OutputDegreesC.as_str())?,
        liter_deficit: require_number(reported, MetricName::LiterDeficit.as_str())?,
        measured_input_c: require_number(reported, MetricName::MeasuredInputC.as_str())?,
        measured_output_c: require_number(reported, MetricName::MeasuredOutputC.as_str())?,
    })
}

/// Map a reported-state object to metric samples
///
/// The device allow-list is checked before any metric field, so reports from
/// other devices are discarded even when incomplete. Any id value other than
/// the accepted one, including strings and fractions, is discarded; only a
/// missing id is an error.
pub fn map_telemetry(
    reported: &Map<String, Value>,
    accepted_device_id: i64,
) -> Result<TelemetryOutcome, ValidationError> {
    let device_id = require_present(reported, DEVICE_ID_FIELD)?;
    if !is_device(device_id, accepted_device_id) {
        return Ok(TelemetryOutcome::Rejected {
            device_id: device_id.clone(),
        });
    }

    let record = parse_record(reported, accepted_device_id)?;
    let samples = record.samples();
    Ok(TelemetryOutcome::Accepted { record, samples })
}

/// Numeric equality with the accepted id; integral floats count
fn is_device(value: &Value, accepted_device_id: i64) -> bool {
    match value.as_i64() {
        Some(id) => id == accepted_device_id,
        // Firmware occasionally serializes integral ids as floats
        None => value.as_f64() == Some(accepted_device_id as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MetricUnit;
    use crate::validators::ValidationErrorKind;
    use serde_json::json;

    const DEVICE: i64 = 3512530;

    fn reported(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn full_report(device_id: i64) -> Map<String, Value> {
        reported(json!({
            "device_id": device_id,
            "liters_used": 1.5,
            "input_degrees_c": 12.0,
            "output_degrees_c": 51.5,
            "liter_deficit": -20.25,
            "measured_input_c": 11.75,
            "measured_output_c": 50.0
        }))
    }

    #[test]
    fn test_accepted_device_maps_all_six_fields_in_order() {
        let outcome = map_telemetry(&full_report(DEVICE), DEVICE).unwrap();

        let TelemetryOutcome::Accepted { record, samples } = outcome else {
            panic!("Expected accepted outcome");
        };

        assert_eq!(record.device_id, DEVICE);
        let names: Vec<_> = samples.iter().map(|s| s.name).collect();
        assert_eq!(names, MetricName::ALL.to_vec());

        let values: Vec<_> = samples.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![1.5, 12.0, 51.5, -20.25, 11.75, 50.0]);

        assert_eq!(samples[0].unit, Some(MetricUnit::Count));
        assert!(samples[1..].iter().all(|s| s.unit.is_none()));
    }

    #[test]
    fn test_other_device_rejected() {
        let outcome = map_telemetry(&full_report(42), DEVICE).unwrap();
        assert_eq!(outcome, TelemetryOutcome::Rejected { device_id: json!(42) });
        assert!(outcome.is_rejected());
    }

    #[test]
    fn test_other_device_rejected_even_when_incomplete() {
        let report = reported(json!({"device_id": 7}));
        let outcome = map_telemetry(&report, DEVICE).unwrap();
        assert!(outcome.is_rejected());
    }

    #[test]
    fn test_string_device_id_rejected() {
        let mut report = full_report(DEVICE);
        report.insert("device_id".to_string(), json!("test-rig"));

        let outcome = map_telemetry(&report, DEVICE).unwrap();
        assert_eq!(
            outcome,
            TelemetryOutcome::Rejected {
                device_id: json!("test-rig")
            }
        );
    }

    #[test]
    fn test_fractional_device_id_rejected() {
        let report = reported(json!({"device_id": 1.5}));
        let outcome = map_telemetry(&report, DEVICE).unwrap();
        assert!(outcome.is_rejected());
    }

    #[test]
    fn test_integral_float_device_id_accepted() {
        let mut report = full_report(DEVICE);
        report.insert("device_id".to_string(), json!(3512530.0));

        let outcome = map_telemetry(&report, DEVICE).unwrap();
        assert!(!outcome.is_rejected());
    }

    #[test]
    fn test_missing_field_is_error() {
        let mut report = full_report(DEVICE);
        report.remove("measured_output_c");

        let err = map_telemetry(&report, DEVICE).unwrap_err();
        assert_eq!(err.field, "measured_output_c");
        assert_eq!(err.kind, ValidationErrorKind::Missing);
    }

    #[test]
    fn test_missing_device_id_is_error() {
        let mut report = full_report(DEVICE);
        report.remove("device_id");

        let err = map_telemetry(&report, DEVICE).unwrap_err();
        assert_eq!(err.field, "device_id");
    }

    #[test]
    fn test_extra_fields_ignored() {
        let mut report = full_report(DEVICE);
        report.insert("firmware".to_string(), json!("1.2.3"));

        let outcome = map_telemetry(&report, DEVICE).unwrap();
        assert!(!outcome.is_rejected());
    }
}
