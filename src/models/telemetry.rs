//! Telemetry record, request, and response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::error::AppError;
use crate::validate::{is_valid_status, is_valid_timestamp};

/// A stored telemetry reading.
///
/// `timestamp` is kept verbatim as it was submitted, so lexical and
/// chronological order can diverge across mixed ISO 8601 forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TelemetryRecord {
    pub id: i64,
    #[serde(rename = "satelliteId")]
    pub satellite_id: String,
    pub timestamp: String,
    pub altitude: f64,
    pub velocity: f64,
    pub status: String,
}

/// Raw query parameters for the list endpoint.
///
/// Every field is optional text so malformed input degrades to defaults
/// instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "satelliteId")]
    pub satellite_id: Option<String>,
    pub status: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// A validated candidate reading, ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTelemetry {
    pub satellite_id: String,
    pub timestamp: String,
    pub altitude: f64,
    pub velocity: f64,
    pub status: String,
}

const REQUIRED_FIELDS: [&str; 5] = ["satelliteId", "timestamp", "altitude", "velocity", "status"];

impl NewTelemetry {
    /// Validate a loosely-typed JSON payload.
    ///
    /// Checks run in a fixed order and the first failure wins: field
    /// presence, timestamp format, status value, numeric conversion,
    /// non-negative range. A key that is present with a `null` value
    /// passes the presence check and fails a later one.
    pub fn from_payload(payload: &Value) -> Result<Self, AppError> {
        let data = match payload.as_object() {
            Some(map) => map,
            None => {
                return Err(AppError::Validation(format!(
                    "Missing required field: {}",
                    REQUIRED_FIELDS[0]
                )))
            }
        };

        for field in REQUIRED_FIELDS {
            if !data.contains_key(field) {
                return Err(AppError::Validation(format!(
                    "Missing required field: {}",
                    field
                )));
            }
        }

        let timestamp = match data["timestamp"].as_str().filter(|s| is_valid_timestamp(s)) {
            Some(s) => s.to_string(),
            None => {
                return Err(AppError::Validation(
                    "Invalid timestamp format. Must be ISO 8601.".to_string(),
                ))
            }
        };

        let status = match data["status"].as_str().filter(|s| is_valid_status(s)) {
            Some(s) => s.to_string(),
            None => {
                return Err(AppError::Validation(
                    "Status must be either \"healthy\" or \"critical\".".to_string(),
                ))
            }
        };

        let (altitude, velocity) = match (to_f64(&data["altitude"]), to_f64(&data["velocity"])) {
            (Some(altitude), Some(velocity)) => (altitude, velocity),
            _ => {
                return Err(AppError::Validation(
                    "Altitude and velocity must be numeric.".to_string(),
                ))
            }
        };

        if altitude < 0.0 || velocity < 0.0 {
            return Err(AppError::Validation(
                "Altitude and velocity must be non-negative.".to_string(),
            ));
        }

        Ok(Self {
            satellite_id: text_value(&data["satelliteId"]),
            timestamp,
            altitude,
            velocity,
            status,
        })
    }
}

/// Convert a JSON value to `f64`; numeric-looking strings are acceptable.
fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// String content of a JSON value; non-strings keep their JSON rendering.
fn text_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One page of telemetry readings with the resolved query parameters.
#[derive(Debug, Serialize)]
pub struct TelemetryPage {
    pub data: Vec<TelemetryRecord>,
    pub pagination: Pagination,
    pub sorting: Sorting,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    /// `total_pages` is a ceiling division; 0 when there are no rows.
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        Self {
            page,
            per_page,
            total,
            total_pages: (total + per_page - 1) / per_page,
        }
    }
}

/// Resolved sorting parameters, echoed back so callers can detect
/// fallback to the defaults.
#[derive(Debug, Serialize)]
pub struct Sorting {
    pub sort_by: &'static str,
    pub sort_order: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_payload() -> Value {
        json!({
            "satelliteId": "SAT001",
            "timestamp": "2025-03-01T10:00:00Z",
            "altitude": 550.0,
            "velocity": 7.59,
            "status": "healthy",
        })
    }

    #[test]
    fn test_accepts_valid_payload() {
        let reading = NewTelemetry::from_payload(&valid_payload()).unwrap();
        assert_eq!(reading.satellite_id, "SAT001");
        assert_eq!(reading.timestamp, "2025-03-01T10:00:00Z");
        assert_eq!(reading.altitude, 550.0);
        assert_eq!(reading.velocity, 7.59);
        assert_eq!(reading.status, "healthy");
    }

    #[test]
    fn test_reports_first_missing_field() {
        for field in REQUIRED_FIELDS {
            let mut payload = valid_payload();
            payload.as_object_mut().unwrap().remove(field);

            let err = NewTelemetry::from_payload(&payload).unwrap_err();
            assert_eq!(err.to_string(), format!("Missing required field: {}", field));
        }
    }

    #[test]
    fn test_presence_is_checked_before_format() {
        // Invalid timestamp AND missing velocity: the missing field wins.
        let mut payload = valid_payload();
        payload["timestamp"] = json!("not-a-timestamp");
        payload.as_object_mut().unwrap().remove("velocity");

        let err = NewTelemetry::from_payload(&payload).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: velocity");
    }

    #[test]
    fn test_rejects_invalid_timestamp() {
        let mut payload = valid_payload();
        payload["timestamp"] = json!("not-a-timestamp");

        let err = NewTelemetry::from_payload(&payload).unwrap_err();
        assert_eq!(err.to_string(), "Invalid timestamp format. Must be ISO 8601.");

        // Present-but-null also fails here, not at the presence check.
        payload["timestamp"] = Value::Null;
        let err = NewTelemetry::from_payload(&payload).unwrap_err();
        assert_eq!(err.to_string(), "Invalid timestamp format. Must be ISO 8601.");
    }

    #[test]
    fn test_rejects_invalid_status() {
        for status in [json!("unknown"), json!("Healthy"), json!(""), Value::Null] {
            let mut payload = valid_payload();
            payload["status"] = status;

            let err = NewTelemetry::from_payload(&payload).unwrap_err();
            assert_eq!(
                err.to_string(),
                "Status must be either \"healthy\" or \"critical\"."
            );
        }
    }

    #[test]
    fn test_numeric_strings_are_converted() {
        let mut payload = valid_payload();
        payload["altitude"] = json!("123.45");
        payload["velocity"] = json!(" 7.5 ");

        let reading = NewTelemetry::from_payload(&payload).unwrap();
        assert_eq!(reading.altitude, 123.45);
        assert_eq!(reading.velocity, 7.5);
    }

    #[test]
    fn test_rejects_non_numeric_values() {
        for value in [json!("not-a-number"), json!(true), Value::Null, json!([1])] {
            let mut payload = valid_payload();
            payload["altitude"] = value;

            let err = NewTelemetry::from_payload(&payload).unwrap_err();
            assert_eq!(err.to_string(), "Altitude and velocity must be numeric.");
        }
    }

    #[test]
    fn test_rejects_negative_values() {
        let mut payload = valid_payload();
        payload["altitude"] = json!(-100);
        let err = NewTelemetry::from_payload(&payload).unwrap_err();
        assert_eq!(err.to_string(), "Altitude and velocity must be non-negative.");

        let mut payload = valid_payload();
        payload["velocity"] = json!(-7.8);
        let err = NewTelemetry::from_payload(&payload).unwrap_err();
        assert_eq!(err.to_string(), "Altitude and velocity must be non-negative.");

        // The range check applies to converted string values too.
        let mut payload = valid_payload();
        payload["altitude"] = json!("-1");
        let err = NewTelemetry::from_payload(&payload).unwrap_err();
        assert_eq!(err.to_string(), "Altitude and velocity must be non-negative.");
    }

    #[test]
    fn test_accepts_zero_values() {
        let mut payload = valid_payload();
        payload["altitude"] = json!(0);
        payload["velocity"] = json!(0.0);

        let reading = NewTelemetry::from_payload(&payload).unwrap();
        assert_eq!(reading.altitude, 0.0);
        assert_eq!(reading.velocity, 0.0);
    }

    #[test]
    fn test_empty_satellite_id_passes() {
        let mut payload = valid_payload();
        payload["satelliteId"] = json!("");

        let reading = NewTelemetry::from_payload(&payload).unwrap();
        assert_eq!(reading.satellite_id, "");
    }

    #[test]
    fn test_non_object_payload_reports_first_field() {
        let err = NewTelemetry::from_payload(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: satelliteId");
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(Pagination::new(1, 20, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 20, 1).total_pages, 1);
        assert_eq!(Pagination::new(1, 20, 20).total_pages, 1);
        assert_eq!(Pagination::new(1, 20, 21).total_pages, 2);
        assert_eq!(Pagination::new(1, 100, 250).total_pages, 3);
    }

    #[test]
    fn test_record_serializes_with_wire_field_names() {
        let record = TelemetryRecord {
            id: 7,
            satellite_id: "SAT001".to_string(),
            timestamp: "2025-03-01".to_string(),
            altitude: 550.0,
            velocity: 7.59,
            status: "healthy".to_string(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["satelliteId"], "SAT001");
        assert!(value.get("satellite_id").is_none());
    }
}
