use crate::api_doc::ApiDoc;
use crate::handlers::{health, reports};
use crate::middleware::{request_id_middleware, RequestId};
use crate::state::AppState;
use axum::{body::Body, routing::get, Router};
use http::{HeaderValue, Method, Request};
use reviewdesk_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

pub const API_PREFIX: &str = "/api/v1";

/// Report endpoints only take query parameters.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1_000)
        .max(1);

    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        let request_id = request
            .extensions()
            .get::<RequestId>()
            .map(|id| id.0.as_str())
            .unwrap_or("-");
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    });

    let app = Router::new()
        .route("/health", get(health::health))
        .nest(API_PREFIX, report_routes())
        .merge(RapiDoc::with_openapi("/api/openapi.json", ApiDoc::openapi()).path("/docs"))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        .layer(trace_layer)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}

fn report_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reports/summary", get(reports::get_summary))
        .route("/reports/timeline", get(reports::get_timeline))
        .route("/reports/ratings/trend", get(reports::get_rating_trend))
        .route(
            "/reports/ratings/distribution",
            get(reports::get_rating_distribution),
        )
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
