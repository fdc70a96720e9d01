//! Validation modules

pub mod fields;

pub use fields::{validate_field, validate_form, FieldError, FieldErrors};
