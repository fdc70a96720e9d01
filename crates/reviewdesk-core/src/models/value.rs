//! Typed answers for the public form engine.
//!
//! Each field type has its own variant; the stringly-typed wire map is only
//! produced at the serialization boundary by [`FieldValue::wire_entries`].

use super::form::{Field, FieldType};
use crate::error::AppError;

/// A file picked for an `image` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Answer of an employee field: the selected employee and an optional rating (0 = unset).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeAnswer {
    pub employee: String,
    pub rating: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Email(String),
    Phone(String),
    LongText(String),
    /// Star rating; 0 means nothing selected.
    Rating(u8),
    /// Dropdown or radio selection.
    Choice(String),
    File(Option<FileUpload>),
    Employee(EmployeeAnswer),
}

impl FieldValue {
    /// Initial (empty) value for a field type.
    pub fn empty_for(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Text => FieldValue::Text(String::new()),
            FieldType::Email => FieldValue::Email(String::new()),
            FieldType::Phone => FieldValue::Phone(String::new()),
            FieldType::Textarea => FieldValue::LongText(String::new()),
            FieldType::Rating => FieldValue::Rating(0),
            FieldType::Dropdown | FieldType::Radio => FieldValue::Choice(String::new()),
            FieldType::Image => FieldValue::File(None),
            FieldType::Employee => FieldValue::Employee(EmployeeAnswer::default()),
        }
    }

    /// Build a value from a JSON answer (as read from an answers file).
    ///
    /// Image fields carry binary content and cannot be built from JSON.
    pub fn from_json(field: &Field, value: &serde_json::Value) -> Result<Self, AppError> {
        let text = || -> Result<String, AppError> {
            super::submission::scalar_text(value).ok_or_else(|| {
                AppError::InvalidInput(format!("{} expects a text answer", field.name))
            })
        };
        let rating = |v: &serde_json::Value| -> Result<u8, AppError> {
            let raw = super::submission::scalar_text(v).unwrap_or_default();
            raw.trim().parse::<u8>().map_err(|_| {
                AppError::InvalidInput(format!(
                    "{} expects a whole-number rating, got '{}'",
                    field.name, raw
                ))
            })
        };

        Ok(match field.field_type {
            FieldType::Text => FieldValue::Text(text()?),
            FieldType::Email => FieldValue::Email(text()?),
            FieldType::Phone => FieldValue::Phone(text()?),
            FieldType::Textarea => FieldValue::LongText(text()?),
            FieldType::Rating => FieldValue::Rating(rating(value)?),
            FieldType::Dropdown | FieldType::Radio => FieldValue::Choice(text()?),
            FieldType::Employee => match value {
                serde_json::Value::Object(map) => FieldValue::Employee(EmployeeAnswer {
                    employee: map
                        .get("employee")
                        .and_then(super::submission::scalar_text)
                        .unwrap_or_default(),
                    rating: match map.get("rating") {
                        Some(r) if !r.is_null() => rating(r)?,
                        _ => 0,
                    },
                }),
                other => FieldValue::Employee(EmployeeAnswer {
                    employee: super::submission::scalar_text(other).unwrap_or_default(),
                    rating: 0,
                }),
            },
            FieldType::Image => {
                return Err(AppError::InvalidInput(format!(
                    "{} is a file field and must be attached as a file",
                    field.name
                )))
            }
        })
    }

    /// Whether the variant is the natural one for a field type.
    pub fn fits(&self, field_type: FieldType) -> bool {
        matches!(
            (self, field_type),
            (FieldValue::Text(_), FieldType::Text)
                | (FieldValue::Email(_), FieldType::Email)
                | (FieldValue::Phone(_), FieldType::Phone)
                | (FieldValue::LongText(_), FieldType::Textarea)
                | (FieldValue::Rating(_), FieldType::Rating)
                | (FieldValue::Choice(_), FieldType::Dropdown | FieldType::Radio)
                | (FieldValue::File(_), FieldType::Image)
                | (FieldValue::Employee(_), FieldType::Employee)
        )
    }

    /// Empty string, unset rating, missing file or no employee selected.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s)
            | FieldValue::Email(s)
            | FieldValue::Phone(s)
            | FieldValue::LongText(s)
            | FieldValue::Choice(s) => s.is_empty(),
            FieldValue::Rating(r) => *r == 0,
            FieldValue::File(file) => file.is_none(),
            FieldValue::Employee(answer) => answer.employee.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s)
            | FieldValue::Email(s)
            | FieldValue::Phone(s)
            | FieldValue::LongText(s)
            | FieldValue::Choice(s) => Some(s),
            FieldValue::Employee(answer) => Some(&answer.employee),
            FieldValue::Rating(_) | FieldValue::File(_) => None,
        }
    }

    /// Star value carried by a rating or an employee rating, if set.
    pub fn rating(&self) -> Option<u8> {
        match self {
            FieldValue::Rating(r) if *r > 0 => Some(*r),
            FieldValue::Employee(answer) if answer.rating > 0 => Some(answer.rating),
            _ => None,
        }
    }

    pub fn file(&self) -> Option<&FileUpload> {
        match self {
            FieldValue::File(file) => file.as_ref(),
            _ => None,
        }
    }

    /// Scalar wire entries for this answer. Empty answers produce nothing;
    /// employee answers produce `<field>` and, when rated, `<field>_rating`.
    pub fn wire_entries(&self, field: &Field) -> Vec<(String, String)> {
        if self.is_empty() {
            return Vec::new();
        }
        match self {
            FieldValue::Rating(r) => vec![(field.name.clone(), r.to_string())],
            FieldValue::Employee(answer) => {
                let mut entries = vec![(field.name.clone(), answer.employee.clone())];
                if answer.rating > 0 {
                    entries.push((field.rating_key(), answer.rating.to_string()));
                }
                entries
            }
            FieldValue::File(_) => Vec::new(),
            other => other
                .as_text()
                .map(|text| vec![(field.name.clone(), text.to_string())])
                .unwrap_or_default(),
        }
    }
}
