//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use reviewdesk_api_client::{ApiClient, Auth};
use reviewdesk_core::Config;
use std::sync::Arc;

/// Initialize telemetry, the upstream client and the router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.base.log_format)?;

    config.validate().context("Configuration validation failed")?;
    tracing::info!(
        environment = %config.base.environment,
        upstream = %config.upstream.api_url,
        timezone = %config.base.report_timezone,
        "Configuration loaded and validated successfully"
    );

    // Credentials are added per request from the caller's bearer token.
    let client = ApiClient::from_config(&config.upstream, Auth::Anonymous)
        .context("Failed to create upstream API client")?;

    let state = Arc::new(AppState::new(config.clone(), client));
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
