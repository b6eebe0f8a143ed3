use crate::config::ServerConfig;
use crate::error::{RequestError, Result, ServerError};
use crate::graphql::request::{build_request, into_http_response, parse_body, BodyParams, UrlParams};
use crate::graphql::GraphQLSchema;
use crate::metrics::track_metrics;
use async_graphql::http::GraphiQLSource;
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode},
    middleware,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    routing::IntoMakeService,
    Router,
};
use hyper::server::conn::AddrIncoming;
use hyper::Server;
use metrics_exporter_prometheus::PrometheusHandle;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};

pub const GRAPHQL_PATH: &str = "/graphql";

#[derive(Clone)]
pub struct AppState {
    pub schema: GraphQLSchema,
    /// Rendered once; `None` when the explorer is disabled
    pub graphiql_html: Option<Arc<str>>,
    pub metrics: Option<PrometheusHandle>,
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GraphQL handler (supports GET and POST)
async fn graphql_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    url: std::result::Result<Query<UrlParams>, QueryRejection>,
    body: Bytes,
) -> Response {
    let url = match url {
        Ok(Query(url)) => url,
        Err(rejection) => {
            let e = RequestError::InvalidQueryString(rejection.body_text());
            debug!(error = %e, "rejected GraphQL query string");
            return e.into_response();
        }
    };

    if method == Method::GET && url.wants_explorer() {
        if let Some(html) = &state.graphiql_html {
            return Html(html.to_string()).into_response();
        }
    }

    let body = if method == Method::POST {
        let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
        match parse_body(content_type, &body) {
            Ok(params) => params,
            Err(e) => {
                debug!(error = %e, "rejected GraphQL request body");
                return e.into_response();
            }
        }
    } else {
        BodyParams::default()
    };

    let request = match build_request(url, body) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "rejected GraphQL request");
            return e.into_response();
        }
    };

    let response = state.schema.execute(request).await;
    if response.is_err() {
        debug!(errors = response.errors.len(), "GraphQL request returned errors");
    } else {
        debug!("GraphQL request succeeded");
    }
    into_http_response(response)
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Create the HTTP router. Metrics recording and CORS are only layered in
/// when enabled, so the default router is just the GraphQL route and /health.
pub fn create_server(
    config: &ServerConfig,
    schema: GraphQLSchema,
    metrics: Option<PrometheusHandle>,
) -> Router {
    let graphiql_html = config.graphiql.then(|| {
        Arc::<str>::from(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
    });
    let metrics_enabled = metrics.is_some();

    let state = AppState {
        schema,
        graphiql_html,
        metrics,
    };

    let mut router = Router::new()
        .route("/health", get(health))
        .route(GRAPHQL_PATH, get(graphql_handler).post(graphql_handler));

    if metrics_enabled {
        router = router
            .route_layer(middleware::from_fn(track_metrics))
            .route("/metrics", get(metrics_handler));
    }

    let mut router = router.with_state(state);

    if config.cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any);
        router = router.layer(ServiceBuilder::new().layer(cors));
    }

    router
}

/// A listener that has been bound but is not yet serving.
pub struct BoundServer {
    server: Server<AddrIncoming, IntoMakeService<Router>>,
}

impl BoundServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.server.local_addr()
    }

    /// Serve until `signal` completes, then let in-flight requests finish.
    pub async fn run_until<F>(self, signal: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let addr = self.local_addr();
        self.server
            .with_graceful_shutdown(signal)
            .await
            .map_err(ServerError::Serve)?;

        info!(%addr, "server stopped");
        Ok(())
    }
}

/// Bind the listener. Failure here is fatal and leaves nothing listening.
pub fn bind(addr: SocketAddr, app: Router) -> Result<BoundServer> {
    let builder = Server::try_bind(&addr).map_err(|source| ServerError::Bind { addr, source })?;
    let server = builder.serve(app.into_make_service());

    info!(addr = %server.local_addr(), "listener bound");
    Ok(BoundServer { server })
}

/// Resolves on Ctrl-C. If the handler cannot be installed it never resolves.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    }
}
