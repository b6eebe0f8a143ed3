//! Optional request metrics, exported in Prometheus text format.

use crate::error::ServerError;
use axum::{
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::fmt;
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    HttpRequests,
    HttpRequestDuration,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::HttpRequests => "bench_http_requests_total",
            MetricName::HttpRequestDuration => "bench_http_request_duration_seconds",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MetricName::HttpRequests => "Total HTTP requests by method, path and status",
            MetricName::HttpRequestDuration => "HTTP request latency in seconds",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Installs the global Prometheus recorder. Can only succeed once per process.
pub fn install_recorder() -> Result<PrometheusHandle, ServerError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::Metrics(e.to_string()))?;

    ::metrics::describe_counter!(
        MetricName::HttpRequests.as_str(),
        MetricName::HttpRequests.description()
    );
    ::metrics::describe_histogram!(
        MetricName::HttpRequestDuration.as_str(),
        ::metrics::Unit::Seconds,
        MetricName::HttpRequestDuration.description()
    );

    info!("Prometheus recorder installed");
    Ok(handle)
}

/// Middleware recording a counter and a latency histogram per request.
pub async fn track_metrics<B>(req: Request<B>, next: Next<B>) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = match req.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_owned(),
        None => req.uri().path().to_owned(),
    };

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    ::metrics::counter!(
        MetricName::HttpRequests.as_str(),
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);
    ::metrics::histogram!(
        MetricName::HttpRequestDuration.as_str(),
        "method" => method,
        "path" => path
    )
    .record(start.elapsed().as_secs_f64());

    response
}
