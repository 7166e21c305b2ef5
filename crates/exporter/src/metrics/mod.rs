//! Prometheus metric registry for sensor readings
//!
//! [`SensorMetrics`] is created once at startup and shared (as an `Arc`)
//! between the poller, which writes gauges, and the HTTP server, which
//! encodes the registry on every scrape. Gauges and counters are atomic, so
//! neither side takes a lock.

use api_types::SensorRecord;
#[cfg(test)]
use prometheus::proto::MetricFamily;
use prometheus::Encoder;
use prometheus::GaugeVec;
use prometheus::IntCounter;
use prometheus::Opts;
use prometheus::Registry;
use prometheus::TextEncoder;

pub mod readings;

pub use readings::Reading;

const NAMESPACE: &str = "deconz";
const SUBSYSTEM: &str = "sensor";

/// Label names shared by every gauge family, in [`SensorLabels::values`] order
pub const LABEL_NAMES: [&str; 5] = ["name", "uid", "manufacturer", "model", "type"];

/// Gauge families exported per sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorMetric {
    Temperature,
    Battery,
    Humidity,
    Pressure,
}

impl SensorMetric {
    pub fn name(self) -> &'static str {
        match self {
            SensorMetric::Temperature => "temperature",
            SensorMetric::Battery => "battery",
            SensorMetric::Humidity => "humidity",
            SensorMetric::Pressure => "pressure",
        }
    }

    fn help(self) -> &'static str {
        match self {
            SensorMetric::Temperature => "Temperature of sensor in Celsius",
            SensorMetric::Battery => "Battery level of sensor in percent",
            SensorMetric::Humidity => "Humidity of sensor in percent",
            SensorMetric::Pressure => "Air pressure in hectopascal (hPa)",
        }
    }
}

#[cfg(test)]
impl SensorMetric {
    pub const ALL: [SensorMetric; 4] = [
        SensorMetric::Temperature,
        SensorMetric::Battery,
        SensorMetric::Humidity,
        SensorMetric::Pressure,
    ];

    /// Fully qualified metric name, e.g. `deconz_sensor_temperature`
    pub fn fq_name(self) -> String {
        format!("{NAMESPACE}_{SUBSYSTEM}_{}", self.name())
    }
}

/// Label set identifying one sensor's time series
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SensorLabels {
    pub name: String,
    pub uid: String,
    pub manufacturer: String,
    pub model: String,
    pub sensor_type: String,
}

impl SensorLabels {
    /// Values in [`LABEL_NAMES`] order
    pub fn values(&self) -> [&str; 5] {
        [
            &self.name,
            &self.uid,
            &self.manufacturer,
            &self.model,
            &self.sensor_type,
        ]
    }
}

impl From<&SensorRecord> for SensorLabels {
    fn from(record: &SensorRecord) -> Self {
        Self {
            name: record.name.clone(),
            uid: record.uid.clone(),
            manufacturer: record.manufacturer.clone(),
            model: record.modelid.clone(),
            sensor_type: record.sensor_type.clone(),
        }
    }
}

/// Latest-value store for all exported sensor metrics
#[derive(Clone)]
pub struct SensorMetrics {
    registry: Registry,
    temperature: GaugeVec,
    battery: GaugeVec,
    humidity: GaugeVec,
    pressure: GaugeVec,
    errors: IntCounter,
}

impl SensorMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let temperature = Self::gauge_vec(SensorMetric::Temperature)?;
        let battery = Self::gauge_vec(SensorMetric::Battery)?;
        let humidity = Self::gauge_vec(SensorMetric::Humidity)?;
        let pressure = Self::gauge_vec(SensorMetric::Pressure)?;
        let errors = IntCounter::with_opts(
            Opts::new("errors", "Failures to retrieve data from API")
                .namespace(NAMESPACE)
                .subsystem(SUBSYSTEM),
        )?;

        registry.register(Box::new(temperature.clone()))?;
        registry.register(Box::new(battery.clone()))?;
        registry.register(Box::new(humidity.clone()))?;
        registry.register(Box::new(pressure.clone()))?;
        registry.register(Box::new(errors.clone()))?;

        Ok(Self {
            registry,
            temperature,
            battery,
            humidity,
            pressure,
            errors,
        })
    }

    fn gauge_vec(metric: SensorMetric) -> prometheus::Result<GaugeVec> {
        GaugeVec::new(
            Opts::new(metric.name(), metric.help())
                .namespace(NAMESPACE)
                .subsystem(SUBSYSTEM),
            &LABEL_NAMES,
        )
    }

    fn family(&self, metric: SensorMetric) -> &GaugeVec {
        match metric {
            SensorMetric::Temperature => &self.temperature,
            SensorMetric::Battery => &self.battery,
            SensorMetric::Humidity => &self.humidity,
            SensorMetric::Pressure => &self.pressure,
        }
    }

    /// Overwrite the gauge for `labels` with the reading's value
    pub fn set(&self, labels: &SensorLabels, reading: Reading) {
        self.family(reading.metric)
            .with_label_values(&labels.values())
            .set(reading.value);
    }

    /// Count one failed poll cycle
    pub fn record_error(&self) {
        self.errors.inc();
    }

    /// Encode the registry in the Prometheus text exposition format
    pub fn encode(&self) -> prometheus::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
impl SensorMetrics {
    /// Failed poll cycles since startup
    pub fn errors(&self) -> u64 {
        self.errors.get()
    }

    /// Current value of a gauge, `None` if the series was never set
    pub fn gauge_value(&self, metric: SensorMetric, labels: &SensorLabels) -> Option<f64> {
        let expected = labels.values();
        self.gather_family(metric)?
            .get_metric()
            .iter()
            .find(|m| {
                let pairs = m.get_label();
                pairs.len() == LABEL_NAMES.len()
                    && pairs.iter().all(|pair| {
                        LABEL_NAMES
                            .iter()
                            .position(|name| *name == pair.get_name())
                            .is_some_and(|idx| expected[idx] == pair.get_value())
                    })
            })
            .map(|m| m.get_gauge().get_value())
    }

    /// Number of series ever set in a gauge family
    pub fn series_count(&self, metric: SensorMetric) -> usize {
        self.gather_family(metric)
            .map(|family| family.get_metric().len())
            .unwrap_or(0)
    }

    fn gather_family(&self, metric: SensorMetric) -> Option<MetricFamily> {
        let name = metric.fq_name();
        self.registry
            .gather()
            .into_iter()
            .find(|family| family.get_name() == name)
    }
}
