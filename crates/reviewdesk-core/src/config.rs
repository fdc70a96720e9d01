//! Configuration module
//!
//! Environment-driven settings for the report gateway and the CLI: upstream
//! REST API location and credentials, report timezone, logging format and
//! gateway listener options. A `.env` file is loaded when present.

use std::env;

use chrono_tz::Tz;

const DEFAULT_API_URL: &str = "http://localhost:5000";
const HTTP_TIMEOUT_SECS: u64 = 60;
const SERVER_PORT: u16 = 4000;

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }
}

/// Settings shared by every binary
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub environment: String,
    pub log_format: LogFormat,
    /// Zone used to resolve date-range presets and custom ranges
    pub report_timezone: Tz,
}

impl BaseConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let log_format = LogFormat::parse(&env::var("LOG_FORMAT").unwrap_or_default());

        let tz_name = env::var("REPORT_TIMEZONE").unwrap_or_else(|_| "UTC".to_string());
        let report_timezone: Tz = tz_name
            .parse()
            .map_err(|_| anyhow::anyhow!("REPORT_TIMEZONE '{}' is not a valid IANA zone", tz_name))?;

        Ok(Self {
            environment,
            log_format,
            report_timezone,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

/// Upstream feedback REST API
#[derive(Clone, Debug)]
pub struct UpstreamConfig {
    pub api_url: String,
    /// Optional version path segment (`/api/<version>`)
    pub api_version: Option<String>,
    /// Bearer token used by the CLI; the gateway forwards the caller's token instead
    pub api_key: Option<String>,
    pub http_timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let api_url = env::var("REVIEWDESK_API_URL")
            .or_else(|_| env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let api_version = env::var("REVIEWDESK_API_VERSION")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let api_key = env::var("REVIEWDESK_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .or_else(|_| env::var("JWT_TOKEN"))
            .ok()
            .filter(|k| !k.is_empty());

        let http_timeout_secs = env::var("HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| HTTP_TIMEOUT_SECS.to_string())
            .parse()
            .unwrap_or(HTTP_TIMEOUT_SECS);

        Ok(Self {
            api_url,
            api_version,
            api_key,
            http_timeout_secs,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "REVIEWDESK_API_URL must start with http:// or https://"
            ));
        }

        if self.http_timeout_secs == 0 {
            return Err(anyhow::anyhow!("HTTP_TIMEOUT_SECS must be greater than 0"));
        }

        Ok(())
    }
}

/// Report gateway configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub upstream: UpstreamConfig,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let base = BaseConfig::from_env()?;
        let upstream = UpstreamConfig::from_env()?;

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| SERVER_PORT.to_string())
            .parse()
            .unwrap_or(SERVER_PORT);

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            base,
            upstream,
            server_port,
            cors_origins,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.upstream.validate()?;

        if self.server_port == 0 {
            return Err(anyhow::anyhow!("SERVER_PORT must be greater than 0"));
        }

        if self.base.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            tracing::warn!("CORS_ORIGINS allows any origin in production");
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.base.is_production()
    }
}
