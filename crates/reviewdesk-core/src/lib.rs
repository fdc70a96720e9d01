//! ReviewDesk Core Library
//!
//! This crate provides the domain models, error types, configuration, field
//! validation and repository seams shared by every ReviewDesk component.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod repository;
pub mod submission;
pub mod validation;

// Re-export commonly used types
pub use config::{BaseConfig, Config, LogFormat, UpstreamConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use repository::{EmployeeRepository, FormRepository, InMemoryStore, SubmissionRepository};
pub use submission::{is_limit_message, package_submission, PackagedSubmission, SubmissionBody};
pub use validation::{validate_field, validate_form, FieldError, FieldErrors};
