use serde::{Deserialize, Serialize};

use super::employee::EmployeeRef;
use crate::constants::EMPLOYEE_RATING_SUFFIX;

/// Form purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FormType {
    #[default]
    Review,
    Complaint,
}

/// Input kind of a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Phone,
    Textarea,
    Rating,
    Dropdown,
    Radio,
    Image,
    Employee,
}

/// Explicit reporting role of a field's own answer key.
///
/// Forms created with a role are classified from the schema; untagged keys
/// fall back to name/value inference in the report builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldRole {
    Rating,
    EmployeeRating,
    Generic,
}

fn default_true() -> bool {
    true
}

/// One input on a form definition (default or custom).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub position: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub employees: Vec<EmployeeRef>,
    #[serde(default)]
    pub has_employee_rating: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<FieldRole>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            is_required: false,
            enabled: true,
            position: 0,
            placeholder: None,
            options: Vec::new(),
            employees: Vec::new(),
            has_employee_rating: false,
            role: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn at(mut self, position: i32) -> Self {
        self.position = position;
        self
    }

    pub fn with_employee_rating(mut self) -> Self {
        self.has_employee_rating = true;
        self
    }

    /// Whether this is an employee picker that also collects a star rating.
    pub fn has_rating_subfield(&self) -> bool {
        self.field_type == FieldType::Employee && self.has_employee_rating
    }

    /// Wire key of the companion employee rating (`<name>_rating`).
    pub fn rating_key(&self) -> String {
        format!("{}{}", self.name, EMPLOYEE_RATING_SUFFIX)
    }

    pub fn holds_file(&self) -> bool {
        self.field_type == FieldType::Image
    }

    /// Free-text answers considered for the review prompt's copy text.
    pub fn is_free_text(&self) -> bool {
        matches!(self.field_type, FieldType::Text | FieldType::Textarea)
    }
}

/// Tenant-owned feedback template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(rename = "type", default)]
    pub form_type: FormType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_colors: Option<serde_json::Value>,
    /// External review site the customer is invited to after a good rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_link: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Form {
    /// Fields in render order: enabled only, sorted by position (stable).
    pub fn rendered_fields(&self) -> Vec<&Field> {
        let mut fields: Vec<&Field> = self.fields.iter().filter(|f| f.enabled).collect();
        fields.sort_by_key(|f| f.position);
        fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn external_review_link(&self) -> Option<&str> {
        self.review_link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_fields_skip_disabled_and_sort_by_position() {
        let mut hidden = Field::new("phone", FieldType::Phone).at(0);
        hidden.enabled = false;
        let form = Form {
            id: "f1".to_string(),
            name: "Lobby".to_string(),
            note: None,
            form_type: FormType::Review,
            description: None,
            logo_url: None,
            is_active: true,
            button_colors: None,
            review_link: None,
            fields: vec![
                Field::new("comment", FieldType::Textarea).at(3),
                hidden,
                Field::new("name", FieldType::Text).at(1),
                Field::new("stars", FieldType::Rating).at(2),
            ],
        };
        let names: Vec<&str> = form.rendered_fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "stars", "comment"]);
    }

    #[test]
    fn deserializes_wire_form() {
        let json = r#"{
            "_id": "64f0",
            "name": "Front desk",
            "type": "Complaint",
            "isActive": true,
            "reviewLink": "  ",
            "fields": [
                {"name": "staff", "type": "employee", "isRequired": true, "position": 1,
                 "hasEmployeeRating": true, "employees": ["e1", {"_id": "e2", "name": "Ana"}]},
                {"name": "mood", "type": "radio", "options": ["ok", "bad"], "enabled": false}
            ]
        }"#;
        let form: Form = serde_json::from_str(json).unwrap();
        assert_eq!(form.id, "64f0");
        assert_eq!(form.form_type, FormType::Complaint);
        assert_eq!(form.external_review_link(), None);
        assert!(form.fields[0].has_rating_subfield());
        assert_eq!(form.fields[0].rating_key(), "staff_rating");
        assert_eq!(form.fields[0].employees[1].id(), "e2");
        assert!(!form.fields[1].enabled);
        assert_eq!(form.rendered_fields().len(), 1);
    }
}
