//! Error types module
//!
//! All failures are unified under the `AppError` enum. Each variant describes
//! how it should be presented to a client through the `ErrorMetadata` trait,
//! so the HTTP gateway, the API client and the CLI render errors the same way.

use std::io;

use crate::validation::FieldErrors;

/// Level an error is logged at when it reaches a boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected outcomes: bad input, unknown ids, rejected answers
    Debug,
    /// Plan limits reached by the tenant
    Warn,
    /// Upstream outages and internal faults
    Error,
}

/// Presentation of an error to clients and logs.
pub trait ErrorMetadata {
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "UPSTREAM_ERROR")
    fn error_code(&self) -> &'static str;

    /// Retrying the same request may succeed
    fn is_recoverable(&self) -> bool;

    fn suggested_action(&self) -> Option<&'static str>;

    /// Message safe to show an end user
    fn client_message(&self) -> String;

    /// Internal details (hosts, upstream bodies) must not reach clients
    fn is_sensitive(&self) -> bool;

    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(FieldErrors),

    #[error("Bot verification token is missing")]
    VerificationRequired,

    #[error("Submission limit reached: {0}")]
    SubmissionLimitReached(String),

    #[error("Upstream API error ({}): {message}", status.map(|s| s.to_string()).unwrap_or_else(|| "no status".to_string()))]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::BadRequest(_) => (
            400,
            "BAD_REQUEST",
            false,
            Some("Check request format and parameters"),
            false,
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the resource ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::Unauthorized(_) => (
            401,
            "UNAUTHORIZED",
            false,
            Some("Sign in again or check the bearer token"),
            false,
            LogLevel::Debug,
        ),
        AppError::Validation(_) => (
            422,
            "VALIDATION_FAILED",
            false,
            Some("Correct the highlighted fields and submit again"),
            false,
            LogLevel::Debug,
        ),
        AppError::VerificationRequired => (
            400,
            "VERIFICATION_REQUIRED",
            false,
            Some("Complete the bot verification before submitting"),
            false,
            LogLevel::Debug,
        ),
        AppError::SubmissionLimitReached(_) => (
            402,
            "SUBMISSION_LIMIT_REACHED",
            false,
            Some("Upgrade plan or wait for the monthly limit to reset"),
            false,
            LogLevel::Warn,
        ),
        AppError::Upstream { .. } => (
            502,
            "UPSTREAM_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::BadRequest(_) => "BadRequest",
            AppError::NotFound(_) => "NotFound",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Validation(_) => "Validation",
            AppError::VerificationRequired => "VerificationRequired",
            AppError::SubmissionLimitReached(_) => "SubmissionLimitReached",
            AppError::Upstream { .. } => "Upstream",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Whether the error is a plan/quota rejection rather than a generic failure.
    pub fn is_limit_reached(&self) -> bool {
        matches!(self, AppError::SubmissionLimitReached(_))
    }

    /// Display text plus field errors and the source chain (max 5 levels).
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        if let AppError::Validation(errors) = self {
            for (field, error) in errors {
                details.push_str(&format!("\n  {}: {}", field, error));
            }
        }

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::BadRequest(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Unauthorized(ref msg) => msg.clone(),
            AppError::Validation(errors) => match errors.values().next() {
                Some(first) if errors.len() == 1 => first.to_string(),
                Some(first) => format!("{} ({} more)", first, errors.len() - 1),
                None => "Validation failed".to_string(),
            },
            AppError::VerificationRequired => {
                "Please complete the verification challenge".to_string()
            }
            AppError::SubmissionLimitReached(ref msg) => msg.clone(),
            AppError::Upstream { .. } => "Failed to reach the feedback service".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}
