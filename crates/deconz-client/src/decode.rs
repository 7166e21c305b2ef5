//! Sensor payload decoding.

use std::collections::BTreeMap;

use api_types::SensorRecord;
use api_types::Sensors;
use error_stack::ResultExt;

use crate::error::GatewayError;
use crate::error::GatewayResult;

/// Decode the body of `GET /api/{token}/sensors`.
///
/// Every top-level entry is kept, whatever its declared type. A `null` entry
/// becomes a zero record, and a top-level `null` an empty collection.
///
/// # Errors
///
/// - [`GatewayError::Decode`] if the body is not JSON, is not an object, or
///   a known field has the wrong type
pub fn decode_sensors(body: &[u8]) -> GatewayResult<Sensors> {
    let sensors: Option<BTreeMap<String, Option<SensorRecord>>> =
        serde_json::from_slice(body)
            .change_context(GatewayError::Decode {
                message: "Failed to deserialize sensor collection".into(),
            })
            .attach_printable_lazy(|| format!("body length: {} bytes", body.len()))?;

    Ok(sensors
        .unwrap_or_default()
        .into_iter()
        .map(|(id, record)| (id, record.unwrap_or_default()))
        .collect())
}

#[cfg(test)]
mod tests {
    use similar_asserts::assert_eq;

    use super::*;

    #[test]
    fn decodes_mixed_sensor_collection() {
        let body = br#"{
            "1": {"name": "Kitchen", "type": "ZHATemperature", "state": {"temperature": 2150}, "config": {"battery": 87}},
            "2": {"name": "Kitchen", "type": "ZHAHumidity", "state": {"humidity": 4520}},
            "3": {"name": "Daylight", "type": "Daylight", "state": {"daylight": true, "status": 170}}
        }"#;

        let sensors = decode_sensors(body).expect("should decode sensors");

        assert_eq!(
            sensors.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["1", "2", "3"]
        );
        assert_eq!(sensors["1"].state.temperature, 2150);
        assert_eq!(sensors["1"].config.battery, 87);
        assert_eq!(sensors["2"].state.humidity, 4520);
        assert_eq!(sensors["3"].sensor_type, "Daylight");
    }

    #[test]
    fn empty_object_and_null_decode_to_no_sensors() {
        assert!(decode_sensors(b"{}").expect("empty object").is_empty());
        assert!(decode_sensors(b"null").expect("null").is_empty());
    }

    #[test]
    fn null_entry_becomes_zero_record() {
        let body = br#"{"1": null, "2": {"name":"Kitchen","type":"ZHATemperature","state":{"temperature":2150}}}"#;

        let sensors = decode_sensors(body).expect("null entries are kept");

        assert_eq!(sensors.len(), 2);
        assert_eq!(sensors["1"], SensorRecord::default());
        assert_eq!(sensors["2"].name, "Kitchen");
        assert_eq!(sensors["2"].state.temperature, 2150);
    }

    #[test]
    fn rejects_malformed_bodies() {
        let bodies: [&[u8]; 5] = [
            b"",
            b"not json",
            br#"{"1": {"name": "Kitchen""#,
            br#"[{"error": {"type": 1, "address": "/", "description": "unauthorized user"}}]"#,
            br#"{"1": {"state": {"temperature": 21.5}}}"#,
        ];

        for body in bodies {
            let err = decode_sensors(body).expect_err("should fail to decode");
            assert!(
                matches!(err.current_context(), GatewayError::Decode { .. }),
                "unexpected error for {:?}: {err:?}",
                String::from_utf8_lossy(body)
            );
        }
    }
}
