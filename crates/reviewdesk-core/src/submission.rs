//! Submission packaging and quota-error classification.
//!
//! A filled form leaves the client either as one JSON body or, when any file
//! is attached, as multipart form data. Both carry the form id and the bot
//! verification token.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{FieldValue, FileUpload, Form};
use crate::validation::validate_form;

/// Whether an upstream error message signals a plan/quota rejection.
pub fn is_limit_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    ["limit", "monthly", "submission"]
        .iter()
        .any(|needle| lower.contains(needle))
}

/// JSON body for `POST submission`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionBody {
    pub form_id: String,
    pub submissions: BTreeMap<String, String>,
    pub captcha_token: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PackagedSubmission {
    Json(SubmissionBody),
    /// Scalar answers stringified plus attached files, keyed by field name.
    Multipart {
        form_id: String,
        token: String,
        fields: Vec<(String, String)>,
        files: Vec<(String, FileUpload)>,
    },
}

impl PackagedSubmission {
    pub fn form_id(&self) -> &str {
        match self {
            PackagedSubmission::Json(body) => &body.form_id,
            PackagedSubmission::Multipart { form_id, .. } => form_id,
        }
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self, PackagedSubmission::Multipart { .. })
    }
}

/// Validate and package the answers of `form` for submission.
///
/// Fails with `VerificationRequired` when no token is present, before any
/// validation or network work, and with `Validation` when a rendered field
/// is invalid. Disabled fields and empty answers are left out.
pub fn package_submission(
    form: &Form,
    values: &BTreeMap<String, FieldValue>,
    token: Option<&str>,
) -> Result<PackagedSubmission, AppError> {
    let token = token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::VerificationRequired)?
        .to_string();

    validate_form(form, values)?;

    let mut scalars = Vec::new();
    let mut files = Vec::new();
    for field in form.rendered_fields() {
        let Some(value) = values.get(&field.name) else {
            continue;
        };
        if let Some(file) = value.file() {
            files.push((field.name.clone(), file.clone()));
        } else {
            scalars.extend(value.wire_entries(field));
        }
    }

    if files.is_empty() {
        Ok(PackagedSubmission::Json(SubmissionBody {
            form_id: form.id.clone(),
            submissions: scalars.into_iter().collect(),
            captcha_token: token,
        }))
    } else {
        Ok(PackagedSubmission::Multipart {
            form_id: form.id.clone(),
            token,
            fields: scalars,
            files,
        })
    }
}
