//! Data models for the application
//!
//! Wire-compatible representations of the upstream REST resources (forms,
//! submissions, employees) plus the typed answer values used by the public
//! form engine.

mod employee;
mod form;
mod submission;
mod value;

pub use employee::*;
pub use form::*;
pub use submission::*;
pub use value::*;
