use std::sync::Arc;
use std::time::Duration;

use error_stack::Report;
use poem::get;
use poem::listener::Acceptor;
use poem::listener::Listener;
use poem::listener::TcpAcceptor;
use poem::listener::TcpListener;
use poem::middleware::Tracing;
use poem::web::LocalAddr;
use poem::Endpoint;
use poem::EndpointExt;
use poem::Route;
use poem::Server;
use tokio_util::sync::CancellationToken;
use tracing::error;
use tracing::info;

use super::handlers;
use super::ApiError;
use crate::metrics::SensorMetrics;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Routes served by the exporter
pub fn routes(metrics: Arc<SensorMetrics>) -> impl Endpoint {
    Route::new()
        .at("/", get(handlers::index))
        .at("/metrics", get(handlers::metrics))
        .data(metrics)
        .with(Tracing)
}

/// HTTP server exposing the metric registry
pub struct ApiServer {
    acceptor: TcpAcceptor,
    metrics: Arc<SensorMetrics>,
}

impl ApiServer {
    /// Bind the listening socket
    ///
    /// # Errors
    ///
    /// - [`ApiError::Bind`] if the address is invalid or already in use
    pub async fn bind(
        listen_addr: &str,
        metrics: Arc<SensorMetrics>,
    ) -> Result<Self, Report<ApiError>> {
        let acceptor = TcpListener::bind(listen_addr.to_string())
            .into_acceptor()
            .await
            .map_err(|e| {
                Report::new(ApiError::Bind {
                    addr: listen_addr.to_string(),
                    message: e.to_string(),
                })
            })?;

        Ok(Self { acceptor, metrics })
    }

    /// Addresses the server accepts connections on
    pub fn local_addr(&self) -> Vec<LocalAddr> {
        self.acceptor.local_addr()
    }

    /// Serve until the token is cancelled
    ///
    /// # Errors
    ///
    /// - [`ApiError::ServerError`] if the server stops with an I/O error
    pub async fn run(self, cancellation_token: CancellationToken) -> Result<(), Report<ApiError>> {
        for addr in self.local_addr() {
            info!("Starting HTTP server on {}", addr.0);
        }

        let app = routes(self.metrics);
        let result = Server::new_with_acceptor(self.acceptor)
            .run_with_graceful_shutdown(
                app,
                async move { cancellation_token.cancelled().await },
                Some(SHUTDOWN_TIMEOUT),
            )
            .await;

        match result {
            Ok(()) => {
                info!("HTTP server stopped normally");
                Ok(())
            }
            Err(e) => {
                error!("HTTP server failed: {e}");
                Err(Report::new(ApiError::ServerError {
                    message: format!("Server failed: {e}"),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use poem::http::StatusCode;
    use poem::test::TestClient;

    use super::*;
    use crate::metrics::Reading;
    use crate::metrics::SensorLabels;
    use crate::metrics::SensorMetric;

    fn create_test_metrics() -> Arc<SensorMetrics> {
        Arc::new(SensorMetrics::new().expect("should create metrics"))
    }

    #[tokio::test]
    async fn index_links_to_metrics() {
        let client = TestClient::new(routes(create_test_metrics()));

        let resp = client.get("/").send().await;

        resp.assert_status_is_ok();
        resp.assert_content_type("text/html; charset=utf-8");
        let body = resp.0.into_body().into_string().await.expect("utf-8 body");
        assert!(body.contains("<title>Deconz Exporter</title>"));
        assert!(body.contains(r#"<a href="/metrics">Metrics</a>"#));
    }

    #[tokio::test]
    async fn metrics_endpoint_serves_registry() {
        let metrics = create_test_metrics();
        metrics.set(
            &SensorLabels {
                name: "Bath".to_string(),
                uid: "00:22".to_string(),
                manufacturer: "LUMI".to_string(),
                model: "lumi.weather".to_string(),
                sensor_type: "ZHAHumidity".to_string(),
            },
            Reading {
                metric: SensorMetric::Humidity,
                value: 61.33,
            },
        );
        metrics.record_error();
        let client = TestClient::new(routes(metrics));

        let resp = client.get("/metrics").send().await;

        resp.assert_status_is_ok();
        resp.assert_content_type(prometheus::TEXT_FORMAT);
        let body = resp.0.into_body().into_string().await.expect("utf-8 body");
        assert!(body.contains(
            r#"deconz_sensor_humidity{manufacturer="LUMI",model="lumi.weather",name="Bath",type="ZHAHumidity",uid="00:22"} 61.33"#
        ));
        assert!(body.contains("deconz_sensor_errors 1"));
    }

    #[tokio::test]
    async fn unknown_paths_are_not_found() {
        let client = TestClient::new(routes(create_test_metrics()));

        let resp = client.get("/api/sensors").send().await;

        resp.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn bind_reports_address_in_use() {
        let metrics = create_test_metrics();
        let first = ApiServer::bind("127.0.0.1:0", metrics.clone())
            .await
            .expect("should bind ephemeral port");
        let addr = first.local_addr()[0]
            .as_socket_addr()
            .copied()
            .expect("tcp address");

        let second = ApiServer::bind(&addr.to_string(), metrics).await;

        let err = second.err().expect("port is taken");
        assert!(matches!(err.current_context(), ApiError::Bind { .. }));
    }

    #[tokio::test]
    async fn run_stops_on_cancellation() {
        let server = ApiServer::bind("127.0.0.1:0", create_test_metrics())
            .await
            .expect("should bind ephemeral port");
        let token = CancellationToken::new();
        let handle = tokio::spawn(server.run(token.clone()));

        token.cancel();

        let result = handle.await.expect("server task should not panic");
        assert!(result.is_ok());
    }
}
