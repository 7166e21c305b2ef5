use std::sync::Arc;

use poem::handler;
use poem::http::StatusCode;
use poem::web::Data;
use poem::web::Html;
use poem::Response;
use tracing::error;

use crate::metrics::SensorMetrics;

const INDEX_HTML: &str = r#"<html>
<head><title>Deconz Exporter</title></head>
<body>
<h1>Deconz Exporter</h1>
<p><a href="/metrics">Metrics</a></p>
</body>
</html>"#;

/// Landing page
#[handler]
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Current registry contents for Prometheus scrapes
#[handler]
pub async fn metrics(metrics: Data<&Arc<SensorMetrics>>) -> poem::Result<Response> {
    let body = metrics.encode().map_err(|e| {
        error!("Failed to encode metrics: {e}");
        poem::Error::from_string(
            format!("Failed to encode metrics: {e}"),
            StatusCode::INTERNAL_SERVER_ERROR,
        )
    })?;

    Ok(Response::builder()
        .content_type(prometheus::TEXT_FORMAT)
        .body(body))
}
