//! Test helpers: a gateway router pointed at a mockito upstream.

use axum_test::TestServer;
use reviewdesk_api::setup::routes;
use reviewdesk_api::state::AppState;
use reviewdesk_api_client::{ApiClient, Auth};
use reviewdesk_core::{BaseConfig, Config, LogFormat, UpstreamConfig};
use std::sync::Arc;

pub const TENANT_TOKEN: &str = "tenant-token";

pub const FORMS: &str = r#"[
    {"_id": "f1", "name": "Lobby", "fields": [
        {"name": "stars", "type": "rating", "isRequired": true},
        {"name": "staff", "type": "employee", "hasEmployeeRating": true}
    ]}
]"#;

pub const SUBMISSIONS: &str = r#"{"submissions": [
    {"_id": "s1", "formId": "f1", "createdAt": "2025-01-01T10:00:00Z",
     "submissions": {"stars": "5", "staff": "emp-1", "staff_rating": "4"}},
    {"_id": "s2", "formId": "f1", "createdAt": "2025-01-02T10:00:00Z", "isRead": true,
     "submissions": {"stars": "2", "staff": "emp-2", "staff_rating": "1"}},
    {"_id": "s3", "formId": "other-tenant", "createdAt": "2025-01-02T12:00:00Z",
     "submissions": {"stars": "1"}}
]}"#;

pub const EMPLOYEES: &str = r#"[
    {"_id": "emp-1", "name": "Dana", "designation": "Host"},
    {"_id": "emp-2", "name": "Sam", "designation": "Waiter"}
]"#;

pub fn test_config(api_url: String) -> Config {
    Config {
        base: BaseConfig {
            environment: "test".to_string(),
            log_format: LogFormat::Compact,
            report_timezone: "UTC".parse().unwrap(),
        },
        upstream: UpstreamConfig {
            api_url,
            api_version: None,
            api_key: None,
            http_timeout_secs: 5,
        },
        server_port: 4000,
        cors_origins: vec!["*".to_string()],
    }
}

pub fn test_server(upstream: &mockito::Server) -> TestServer {
    let config = test_config(upstream.url());
    let client = ApiClient::from_config(&config.upstream, Auth::Anonymous).unwrap();
    let state = Arc::new(AppState::new(config.clone(), client));
    let router = routes::setup_routes(&config, state).unwrap();
    TestServer::new(router).unwrap()
}

/// Mocks the three list endpoints for the test tenant.
pub async fn mock_upstream(server: &mut mockito::Server) -> Vec<mockito::Mock> {
    let mut mocks = Vec::new();
    for (path, body) in [
        ("/api/forms", FORMS),
        ("/api/submissions", SUBMISSIONS),
        ("/api/employees", EMPLOYEES),
    ] {
        let mock = server
            .mock("GET", path)
            .match_header("authorization", format!("Bearer {}", TENANT_TOKEN).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;
        mocks.push(mock);
    }
    mocks
}
