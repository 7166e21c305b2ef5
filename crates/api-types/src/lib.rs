//! Shared deCONZ API type definitions
//!
//! This crate contains the wire types returned by the deCONZ REST API
//! `GET /api/{token}/sensors` endpoint. Only the fields the exporter reads are
//! modelled; everything else in the payload is ignored.
//!
//! The gateway omits fields that do not apply to a sensor (a humidity sensor
//! has no `state.temperature`) and sometimes reports them as `null`. Both
//! cases decode to the zero value of the field.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

/// Sensors keyed by the gateway's sensor id (`"1"`, `"2"`, ...)
pub type Sensors = BTreeMap<String, SensorRecord>;

/// A single sensor as reported by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SensorRecord {
    /// User assigned sensor name
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Unique id, usually the device MAC plus endpoint and cluster
    #[serde(default, deserialize_with = "null_as_default")]
    pub uid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub manufacturer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub modelid: String,
    /// Declared sensor type, e.g. `ZHATemperature`
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub sensor_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: SensorState,
    #[serde(default, deserialize_with = "null_as_default")]
    pub config: SensorConfig,
}

/// Measured values. Which fields are meaningful depends on the sensor type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SensorState {
    /// Temperature in hundredths of a degree Celsius
    #[serde(default, deserialize_with = "null_as_default")]
    pub temperature: i64,
    /// Relative humidity in hundredths of a percent
    #[serde(default, deserialize_with = "null_as_default")]
    pub humidity: i64,
    /// Air pressure in hPa
    #[serde(default, deserialize_with = "null_as_default")]
    pub pressure: i64,
}

/// Device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Battery level in percent (0-100)
    #[serde(default, deserialize_with = "null_as_default")]
    pub battery: i64,
}

/// Treats an explicit JSON `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
