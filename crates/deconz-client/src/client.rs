//! Gateway HTTP client.
//!
//! One plain `GET` per call: no retry, no custom headers, and reqwest's
//! default (unbounded) timeout. Any HTTP status is a successful fetch, the
//! decoder decides whether the body is usable.

use std::future::Future;

use bytes::Bytes;
use error_stack::ResultExt;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::config::GatewayEndpoint;
use crate::error::GatewayError;
use crate::error::GatewayResult;

/// Source of raw sensor payloads.
pub trait SensorSource: Send + Sync {
    /// Fetch the raw body of the sensors endpoint.
    fn fetch(&self) -> impl Future<Output = GatewayResult<Bytes>> + Send;
}

/// [`SensorSource`] backed by the deCONZ REST API.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    url: Url,
    http: Client,
}

impl GatewayClient {
    /// create client
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Configuration`] if the endpoint cannot form a URL or
    ///   the HTTP client cannot be built
    pub fn new(endpoint: &GatewayEndpoint) -> GatewayResult<Self> {
        let url = endpoint.sensors_url()?;
        let http = Client::builder()
            .build()
            .change_context(GatewayError::Configuration {
                message: "Failed to create HTTP client".into(),
            })?;

        debug!(host = %endpoint.host, port = endpoint.port, "Gateway client created");

        Ok(Self { url, http })
    }
}

impl SensorSource for GatewayClient {
    async fn fetch(&self) -> GatewayResult<Bytes> {
        let response = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .change_context(GatewayError::Fetch {
                message: "Failed to send request".into(),
            })?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "Gateway answered with non-success status");
        }

        // `bytes` drains the body and releases the connection, also on error
        let body = response
            .bytes()
            .await
            .change_context(GatewayError::Fetch {
                message: "Failed to read response body".into(),
            })
            .attach_printable_lazy(|| format!("status: {status}"))?;

        debug!(%status, length = body.len(), "Fetched sensors");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_polls_sensors_url() {
        let endpoint = GatewayEndpoint::new("localhost", 8080, "secret").expect("valid");
        let client = GatewayClient::new(&endpoint).expect("should create client");

        assert_eq!(
            client.url.as_str(),
            "http://localhost:8080/api/secret/sensors"
        );
    }
}
