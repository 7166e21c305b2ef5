//! Poll loop feeding gateway sensor readings into the metric registry

use std::sync::Arc;
use std::time::Duration;

use api_types::Sensors;
use deconz_client::decode_sensors;
use deconz_client::SensorSource;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::metrics::readings::readings;
use crate::metrics::SensorLabels;
use crate::metrics::SensorMetrics;

/// Fixed delay between the end of one cycle and the start of the next
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Result of a single fetch-decode-publish cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Every decoded sensor was classified and applied
    Published { sensors: usize, readings: usize },
    /// Gateway could not be reached; registry untouched
    FetchFailed,
    /// Body was not a sensor collection; registry untouched
    DecodeFailed,
}

/// Polls the gateway and republishes sensor readings as gauges
pub struct SensorPoller<S> {
    source: S,
    metrics: Arc<SensorMetrics>,
}

impl<S: SensorSource> SensorPoller<S> {
    pub fn new(source: S, metrics: Arc<SensorMetrics>) -> Self {
        Self { source, metrics }
    }

    /// Run the poll loop until cancelled
    pub async fn run(&self, interval: Duration, cancellation_token: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancellation_token.cancelled() => {
                    tracing::info!("Sensor poller shutdown requested");
                    break;
                }
                _ = async {
                    self.poll_once().await;
                    tokio::time::sleep(interval).await;
                } => {
                    // Continue the loop
                }
            }
        }
    }

    /// Fetch, decode and publish once. Failures are counted, never returned.
    pub async fn poll_once(&self) -> CycleOutcome {
        let body = match self.source.fetch().await {
            Ok(body) => body,
            Err(e) => {
                self.metrics.record_error();
                debug!("Failed to retrieve data: {e:?}");
                return CycleOutcome::FetchFailed;
            }
        };
        debug!(body = %String::from_utf8_lossy(&body), "Raw sensors response");

        let sensors = match decode_sensors(&body) {
            Ok(sensors) => sensors,
            Err(e) => {
                self.metrics.record_error();
                debug!("Failed to decode sensors: {e:?}");
                return CycleOutcome::DecodeFailed;
            }
        };

        let published = self.publish(&sensors);
        debug!(
            sensors = sensors.len(),
            readings = published,
            "Published sensor readings"
        );

        CycleOutcome::Published {
            sensors: sensors.len(),
            readings: published,
        }
    }

    fn publish(&self, sensors: &Sensors) -> usize {
        let mut published = 0;
        for (id, sensor) in sensors {
            let values = readings(sensor);
            debug!(
                id = %id,
                name = %sensor.name,
                sensor_type = %sensor.sensor_type,
                readings = values.len(),
                record = ?sensor,
                "Sensor"
            );
            if values.is_empty() {
                continue;
            }

            let labels = SensorLabels::from(sensor);
            for reading in values {
                self.metrics.set(&labels, reading);
                published += 1;
            }
        }
        published
    }
}
