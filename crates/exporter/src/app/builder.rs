use std::sync::Arc;

use anyhow::Context;
use anyhow::Result;
use deconz_client::GatewayClient;
use error_stack::Report;

use crate::api::server::ApiServer;
use crate::app::Application;
use crate::app::ApplicationServices;
use crate::config::Cli;
use crate::metrics::SensorMetrics;
use crate::poller::SensorPoller;

/// Application builder
pub struct ApplicationBuilder {
    cli: Cli,
}

impl ApplicationBuilder {
    /// Create new application builder
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Build complete application.
    ///
    /// Binds the metrics listener, so an unusable listen address fails here
    /// before any task is started.
    pub async fn build(self) -> Result<Application> {
        tracing::info!("Building application components...");

        let endpoint = self.cli.endpoint().map_err(into_anyhow)?;
        let metrics = Arc::new(SensorMetrics::new().context("create metric registry failed")?);

        let client = GatewayClient::new(&endpoint).map_err(into_anyhow)?;
        tracing::info!(
            host = %endpoint.host,
            port = endpoint.port,
            "Polling deCONZ gateway"
        );
        let poller = Arc::new(SensorPoller::new(client, metrics.clone()));

        let api_server = ApiServer::bind(&self.cli.listen_addr, metrics)
            .await
            .map_err(into_anyhow)?;

        Ok(Application::new(ApplicationServices { poller, api_server }))
    }
}

fn into_anyhow<C>(report: Report<C>) -> anyhow::Error {
    anyhow::anyhow!("{report:?}")
}
