//! gateway endpoint
//!
//! Address and credential of the deCONZ REST API. The API key is part of the
//! request path, so the sensors URL is built once and reused by every poll.

use error_stack::Report;
use error_stack::ResultExt;
use url::Url;

use crate::error::GatewayError;
use crate::error::GatewayResult;

/// deCONZ REST API endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayEndpoint {
    /// url scheme, `http` unless the gateway sits behind a TLS proxy
    pub scheme: String,
    /// gateway hostname or IP address
    pub host: String,
    /// gateway REST API port
    pub port: u16,
    /// API key obtained from the gateway
    pub token: String,
}

impl GatewayEndpoint {
    /// create a plain http endpoint.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Configuration`] if `host` or `token` is empty or `port` is zero
    pub fn new(
        host: impl Into<String>,
        port: u16,
        token: impl Into<String>,
    ) -> GatewayResult<Self> {
        let endpoint = Self {
            scheme: "http".to_string(),
            host: host.into(),
            port,
            token: token.into(),
        };
        endpoint.validate()?;
        Ok(endpoint)
    }

    /// set url scheme.
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    fn validate(&self) -> GatewayResult<()> {
        let missing = if self.token.is_empty() {
            Some("token")
        } else if self.host.is_empty() {
            Some("host")
        } else if self.port == 0 {
            Some("port")
        } else {
            None
        };

        match missing {
            Some(field) => Err(Report::new(GatewayError::Configuration {
                message: format!("{field} is required"),
            })),
            None => Ok(()),
        }
    }

    /// `{scheme}://{host}:{port}/api/{token}/sensors`
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Configuration`] if the parts do not form a valid URL
    pub fn sensors_url(&self) -> GatewayResult<Url> {
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };

        let mut url = Url::parse(&format!("{}://{}:{}/", self.scheme, host, self.port))
            .change_context(GatewayError::Configuration {
                message: "Invalid gateway address".into(),
            })
            .attach_printable_lazy(|| format!("host: {}, port: {}", self.host, self.port))?;

        url.path_segments_mut()
            .map_err(|()| {
                Report::new(GatewayError::Configuration {
                    message: format!("Scheme {} cannot carry a path", self.scheme),
                })
            })?
            .extend(["api", self.token.as_str(), "sensors"]);

        Ok(url)
    }
}
