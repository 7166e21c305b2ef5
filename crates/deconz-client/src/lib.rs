//! deCONZ REST API client.
//!
//! This library fetches and decodes the sensor collection exposed by a deCONZ
//! gateway at `GET /api/{token}/sensors`.
//!
//! # Examples
//!
//! ```no_run
//! # use deconz_client::{decode_sensors, GatewayClient, GatewayEndpoint, GatewayResult, SensorSource};
//! # async fn run() -> GatewayResult<()> {
//! let endpoint = GatewayEndpoint::new("192.168.0.222", 80, "ABCDEF")?;
//! let client = GatewayClient::new(&endpoint)?;
//!
//! let body = client.fetch().await?;
//! for (id, sensor) in decode_sensors(&body)? {
//!     println!("{id}: {} ({})", sensor.name, sensor.sensor_type);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod decode;
pub mod error;

pub use api_types::SensorConfig;
pub use api_types::SensorRecord;
pub use api_types::SensorState;
pub use api_types::Sensors;
pub use client::GatewayClient;
pub use client::SensorSource;
pub use config::GatewayEndpoint;
pub use decode::decode_sensors;
pub use error::GatewayError;
pub use error::GatewayResult;
