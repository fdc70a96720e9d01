use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Minimal populated form carried on a submission by some endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormStub {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// `formId` on a submission: a raw id or a populated form object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormRef {
    Id(String),
    Populated(FormStub),
}

impl FormRef {
    pub fn id(&self) -> &str {
        match self {
            FormRef::Id(id) => id,
            FormRef::Populated(stub) => &stub.id,
        }
    }
}

impl From<&str> for FormRef {
    fn from(id: &str) -> Self {
        FormRef::Id(id.to_string())
    }
}

/// One filled instance of a form. Immutable once created except for `is_read`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(alias = "_id")]
    pub id: String,
    pub form_id: FormRef,
    /// Unreadable timestamps become `None`; the record stays listed but
    /// never reaches charts.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub submissions: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub is_read: bool,
}

impl Submission {
    pub fn form_id(&self) -> &str {
        self.form_id.id()
    }

    /// Submissions without a timestamp or without any answer never reach charts.
    pub fn is_reportable(&self) -> bool {
        self.created_at.is_some() && !self.submissions.is_empty()
    }

    /// Answer for `key` as text. Numbers and booleans are stringified; null,
    /// arrays and objects have no scalar text.
    pub fn raw_value(&self, key: &str) -> Option<String> {
        scalar_text(self.submissions.get(key)?)
    }
}

/// Parse a stored timestamp: RFC 3339, a zone-less date-time read as UTC, a
/// bare date at UTC midnight, or epoch milliseconds.
fn parse_timestamp(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    let raw = match value {
        serde_json::Value::String(s) => s.trim(),
        serde_json::Value::Number(n) => return DateTime::from_timestamp_millis(n.as_i64()?),
        _ => return None,
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()?
                .and_hms_opt(0, 0, 0)
        })
        .map(|naive| naive.and_utc())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_timestamp))
}

pub fn scalar_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_ref_accepts_raw_and_populated() {
        let raw: Submission = serde_json::from_str(
            r#"{"_id":"s1","formId":"f1","createdAt":"2025-01-01T10:00:00Z","submissions":{"rating":"5"}}"#,
        )
        .unwrap();
        assert_eq!(raw.form_id(), "f1");
        assert!(raw.is_reportable());

        let populated: Submission = serde_json::from_str(
            r#"{"id":"s2","formId":{"_id":"f2","name":"Lobby"},"submissions":{}}"#,
        )
        .unwrap();
        assert_eq!(populated.form_id(), "f2");
        assert!(!populated.is_reportable());
        assert!(!populated.is_read);
    }

    #[test]
    fn raw_value_stringifies_scalars() {
        let s: Submission = serde_json::from_str(
            r#"{"_id":"s1","formId":"f1","submissions":{"a":4,"b":"x","c":null,"d":true}}"#,
        )
        .unwrap();
        assert_eq!(s.raw_value("a").as_deref(), Some("4"));
        assert_eq!(s.raw_value("b").as_deref(), Some("x"));
        assert_eq!(s.raw_value("c"), None);
        assert_eq!(s.raw_value("d").as_deref(), Some("true"));
        assert_eq!(s.raw_value("missing"), None);
    }

    #[test]
    fn unreadable_timestamp_keeps_the_listing() {
        let listed: Vec<Submission> = serde_json::from_str(
            r#"[
                {"_id":"s1","formId":"f1","createdAt":"2025-01-01T10:00:00Z","submissions":{"rating":"5"}},
                {"_id":"s2","formId":"f1","createdAt":"2025-01-01T23:30:00","submissions":{"rating":"4"}},
                {"_id":"s3","formId":"f1","createdAt":"2025-01-02","submissions":{"rating":"3"}},
                {"_id":"s4","formId":"f1","createdAt":"yesterday-ish","submissions":{"rating":"2"}},
                {"_id":"s5","formId":"f1","createdAt":1735725600000,"submissions":{"rating":"1"}}
            ]"#,
        )
        .unwrap();

        assert_eq!(listed.len(), 5);
        let at = |i: usize| listed[i].created_at.map(|t| t.to_rfc3339());
        assert_eq!(at(0).as_deref(), Some("2025-01-01T10:00:00+00:00"));
        assert_eq!(at(1).as_deref(), Some("2025-01-01T23:30:00+00:00"));
        assert_eq!(at(2).as_deref(), Some("2025-01-02T00:00:00+00:00"));
        assert_eq!(at(3), None);
        assert!(!listed[3].is_reportable());
        assert_eq!(at(4).as_deref(), Some("2025-01-01T10:00:00+00:00"));
    }
}
