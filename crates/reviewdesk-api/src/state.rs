//! Shared application state.

use reviewdesk_api_client::{ApiClient, Auth};
use reviewdesk_core::Config;
use reviewdesk_reports::ReportService;
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    /// Upstream client without credentials; each request adds its own token.
    pub client: ApiClient,
}

impl AppState {
    pub fn new(config: Config, client: ApiClient) -> Self {
        Self { config, client }
    }

    /// Report service scoped to the caller's tenant through their bearer token.
    pub fn reports_for(&self, token: &str) -> ReportService {
        let upstream = Arc::new(self.client.with_auth(Auth::Bearer(token.to_string())));
        ReportService::new(
            upstream.clone(),
            upstream.clone(),
            upstream,
            self.config.base.report_timezone,
        )
    }
}
