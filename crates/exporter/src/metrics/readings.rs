//! Sensor type classification and unit conversion

use api_types::SensorRecord;

use super::SensorMetric;

/// deCONZ reports temperature and humidity in hundredths
const CENTI: f64 = 100.0;

/// Sensor types the exporter knows how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Temperature,
    Humidity,
    Pressure,
    /// Any other declared type; produces no readings
    Other,
}

impl SensorKind {
    /// Exact, case sensitive match on the declared `type`
    pub fn from_type(sensor_type: &str) -> Self {
        match sensor_type {
            "ZHATemperature" => SensorKind::Temperature,
            "ZHAHumidity" => SensorKind::Humidity,
            "ZHAPressure" => SensorKind::Pressure,
            _ => SensorKind::Other,
        }
    }
}

/// Converted value for one gauge family
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub metric: SensorMetric,
    pub value: f64,
}

impl Reading {
    fn new(metric: SensorMetric, value: f64) -> Self {
        Self { metric, value }
    }
}

/// Readings to publish for a record.
///
/// Battery is only taken from temperature sensors, even though the other
/// sensor types of the same device report it as well.
pub fn readings(record: &SensorRecord) -> Vec<Reading> {
    match SensorKind::from_type(&record.sensor_type) {
        SensorKind::Temperature => vec![
            Reading::new(SensorMetric::Battery, record.config.battery as f64),
            Reading::new(
                SensorMetric::Temperature,
                record.state.temperature as f64 / CENTI,
            ),
        ],
        SensorKind::Humidity => vec![Reading::new(
            SensorMetric::Humidity,
            record.state.humidity as f64 / CENTI,
        )],
        SensorKind::Pressure => vec![Reading::new(
            SensorMetric::Pressure,
            record.state.pressure as f64,
        )],
        SensorKind::Other => Vec::new(),
    }
}
