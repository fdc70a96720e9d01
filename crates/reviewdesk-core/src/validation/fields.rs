//! Public form field validation
//!
//! Rules run on every change and again on submit:
//! - Required fields must not be empty (empty text, unset rating, missing file)
//! - Ratings must be whole stars between 1 and 5
//! - A field named `name` needs at least 3 characters
//! - Email fields must look like an ASCII address, phone fields like an international number
//!
//! Field names `name`, `email` and `phone` are matched ignoring ASCII case.
//! - Textareas need at least 10 characters
//!
//! Employee pickers with a rating sub-field only require the selection.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::constants::{MAX_RATING, MIN_NAME_LENGTH, MIN_RATING, MIN_TEXTAREA_LENGTH};
use crate::models::{Field, FieldType, FieldValue, Form};

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_\-\.]+@([A-Za-z0-9_-]+\.)+[A-Za-z0-9_-]{2,4}$").ok());

static PHONE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{9,14}$").ok());

/// Field-level error. `Display` is the message shown next to the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{field} is required.")]
    Required { field: String },

    #[error("{field} must be a rating between 1 and 5.")]
    RatingOutOfRange { field: String },

    #[error("{field} must be at least {min} characters.")]
    TooShort { field: String, min: usize },

    #[error("{field} must be a valid email address.")]
    InvalidEmail { field: String },

    #[error("{field} must be a valid phone number.")]
    InvalidPhone { field: String },

    #[error("{field} has an unexpected value.")]
    TypeMismatch { field: String },
}

/// Errors keyed by field name.
pub type FieldErrors = BTreeMap<String, FieldError>;

fn matches(pattern: &LazyLock<Option<Regex>>, value: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(value))
}

fn wants_email(field: &Field) -> bool {
    field.field_type == FieldType::Email || field.name.eq_ignore_ascii_case("email")
}

fn wants_phone(field: &Field) -> bool {
    field.field_type == FieldType::Phone || field.name.eq_ignore_ascii_case("phone")
}

/// Validate one answer against its field definition.
pub fn validate_field(field: &Field, value: &FieldValue) -> Result<(), FieldError> {
    let name = || field.name.clone();

    if !value.fits(field.field_type) {
        return Err(FieldError::TypeMismatch { field: name() });
    }

    if value.is_empty() {
        return if field.is_required {
            Err(FieldError::Required { field: name() })
        } else {
            Ok(())
        };
    }

    match value {
        FieldValue::Rating(stars) => {
            if !(MIN_RATING..=MAX_RATING).contains(stars) {
                return Err(FieldError::RatingOutOfRange { field: name() });
            }
        }
        // The sub-rating is optional; only a set value is range-checked.
        FieldValue::Employee(answer) => {
            if answer.rating > MAX_RATING {
                return Err(FieldError::RatingOutOfRange {
                    field: field.rating_key(),
                });
            }
        }
        _ => {}
    }

    if let Some(text) = value.as_text() {
        let length = text.chars().count();

        if field.name.eq_ignore_ascii_case("name") && length < MIN_NAME_LENGTH {
            return Err(FieldError::TooShort {
                field: name(),
                min: MIN_NAME_LENGTH,
            });
        }
        if wants_email(field) && !matches(&EMAIL_PATTERN, text) {
            return Err(FieldError::InvalidEmail { field: name() });
        }
        if wants_phone(field) && !matches(&PHONE_PATTERN, text) {
            return Err(FieldError::InvalidPhone { field: name() });
        }
        if field.field_type == FieldType::Textarea && length < MIN_TEXTAREA_LENGTH {
            return Err(FieldError::TooShort {
                field: name(),
                min: MIN_TEXTAREA_LENGTH,
            });
        }
    }

    Ok(())
}

/// Validate every rendered field of `form`. Missing answers count as empty.
pub fn validate_form(
    form: &Form,
    values: &BTreeMap<String, FieldValue>,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    for field in form.rendered_fields() {
        let empty = FieldValue::empty_for(field.field_type);
        let value = values.get(&field.name).unwrap_or(&empty);
        if let Err(error) = validate_field(field, value) {
            errors.insert(field.name.clone(), error);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmployeeAnswer, FileUpload, FormType};

    fn form(fields: Vec<Field>) -> Form {
        Form {
            id: "f1".to_string(),
            name: "Lobby".to_string(),
            note: None,
            form_type: FormType::Review,
            description: None,
            logo_url: None,
            is_active: true,
            button_colors: None,
            review_link: None,
            fields,
        }
    }

    #[test]
    fn test_required_empty_values() {
        let text = Field::new("comment", FieldType::Text).required();
        assert_eq!(
            validate_field(&text, &FieldValue::Text(String::new())),
            Err(FieldError::Required {
                field: "comment".to_string()
            })
        );
        assert_eq!(
            validate_field(&text, &FieldValue::Text(String::new()))
                .unwrap_err()
                .to_string(),
            "comment is required."
        );

        let photo = Field::new("photo", FieldType::Image).required();
        assert!(validate_field(&photo, &FieldValue::File(None)).is_err());
        let upload = FileUpload {
            file_name: "receipt.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![1, 2, 3],
        };
        assert!(validate_field(&photo, &FieldValue::File(Some(upload))).is_ok());

        let optional = Field::new("comment", FieldType::Textarea);
        assert!(validate_field(&optional, &FieldValue::LongText(String::new())).is_ok());
    }

    #[test]
    fn test_textarea_min_length() {
        let field = Field::new("feedback", FieldType::Textarea).required();
        let err = validate_field(&field, &FieldValue::LongText("ok".to_string())).unwrap_err();
        assert_eq!(
            err,
            FieldError::TooShort {
                field: "feedback".to_string(),
                min: 10
            }
        );
        assert!(!err.to_string().contains("is required"));
        assert!(
            validate_field(&field, &FieldValue::LongText("this is long enough".to_string()))
                .is_ok()
        );
    }

    #[test]
    fn test_rating_range() {
        let field = Field::new("stars", FieldType::Rating).required();
        assert!(validate_field(&field, &FieldValue::Rating(1)).is_ok());
        assert!(validate_field(&field, &FieldValue::Rating(5)).is_ok());
        assert!(matches!(
            validate_field(&field, &FieldValue::Rating(6)),
            Err(FieldError::RatingOutOfRange { .. })
        ));
        assert!(matches!(
            validate_field(&field, &FieldValue::Rating(0)),
            Err(FieldError::Required { .. })
        ));
    }

    #[test]
    fn test_name_email_and_phone_rules() {
        let name = Field::new("name", FieldType::Text);
        assert!(validate_field(&name, &FieldValue::Text("Al".to_string())).is_err());
        assert!(validate_field(&name, &FieldValue::Text("Ada".to_string())).is_ok());

        let email = Field::new("contact", FieldType::Email);
        assert!(validate_field(&email, &FieldValue::Email("ada@example.com".to_string())).is_ok());
        assert!(validate_field(&email, &FieldValue::Email("ada@example".to_string())).is_err());
        assert!(validate_field(&email, &FieldValue::Email("ada example.com".to_string())).is_err());

        let phone = Field::new("phone", FieldType::Phone);
        assert!(validate_field(&phone, &FieldValue::Phone("+14155552671".to_string())).is_ok());
        assert!(validate_field(&phone, &FieldValue::Phone("4155552671".to_string())).is_ok());
        assert!(validate_field(&phone, &FieldValue::Phone("0123456789".to_string())).is_err());
        assert!(validate_field(&phone, &FieldValue::Phone("12345".to_string())).is_err());

        let phone_as_text = Field::new("phone", FieldType::Text);
        assert!(validate_field(&phone_as_text, &FieldValue::Text("call me".to_string())).is_err());
    }

    #[test]
    fn test_patterns_are_ascii_only() {
        let phone = Field::new("contact", FieldType::Phone);
        assert!(validate_field(&phone, &FieldValue::Phone("+1٢٣٤٥٦٧٨٩٠".to_string())).is_err());
        assert!(validate_field(&phone, &FieldValue::Phone("+１２３４５６７８９０".to_string())).is_err());

        let email = Field::new("contact", FieldType::Email);
        assert!(validate_field(&email, &FieldValue::Email("josé@exämple.com".to_string())).is_err());
        assert!(
            validate_field(&email, &FieldValue::Email("ada_l-ove.x@mail-1.example.io".to_string()))
                .is_ok()
        );
    }

    #[test]
    fn test_special_names_ignore_case() {
        let name = Field::new("Name", FieldType::Text);
        assert!(matches!(
            validate_field(&name, &FieldValue::Text("Al".to_string())),
            Err(FieldError::TooShort { min: 3, .. })
        ));

        let email = Field::new("EMAIL", FieldType::Text);
        assert!(matches!(
            validate_field(&email, &FieldValue::Text("nope".to_string())),
            Err(FieldError::InvalidEmail { .. })
        ));

        let phone = Field::new("Phone", FieldType::Text);
        assert!(matches!(
            validate_field(&phone, &FieldValue::Text("call me".to_string())),
            Err(FieldError::InvalidPhone { .. })
        ));
    }

    #[test]
    fn test_employee_rating_is_never_required() {
        let field = Field::new("staff", FieldType::Employee)
            .required()
            .with_employee_rating();
        let selected = FieldValue::Employee(EmployeeAnswer {
            employee: "emp-1".to_string(),
            rating: 0,
        });
        assert!(validate_field(&field, &selected).is_ok());

        let nobody = FieldValue::Employee(EmployeeAnswer::default());
        assert!(matches!(
            validate_field(&field, &nobody),
            Err(FieldError::Required { .. })
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let field = Field::new("stars", FieldType::Rating);
        assert!(matches!(
            validate_field(&field, &FieldValue::Text("5".to_string())),
            Err(FieldError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_form_collects_errors_for_rendered_fields_only() {
        let mut hidden = Field::new("hidden", FieldType::Text).required();
        hidden.enabled = false;
        let form = form(vec![
            Field::new("name", FieldType::Text).required().at(1),
            Field::new("stars", FieldType::Rating).required().at(2),
            Field::new("comment", FieldType::Textarea).at(3),
            hidden,
        ]);

        let mut values = BTreeMap::new();
        values.insert("name".to_string(), FieldValue::Text("Jo".to_string()));
        let errors = validate_form(&form, &values).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("stars"));
        assert!(!errors.contains_key("hidden"));

        values.insert("name".to_string(), FieldValue::Text("Joan".to_string()));
        values.insert("stars".to_string(), FieldValue::Rating(4));
        assert!(validate_form(&form, &values).is_ok());
    }
}
