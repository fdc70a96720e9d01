//! Rating extraction from submission answer maps.
//!
//! An explicit field role on the known form wins, and `<employee field>_rating`
//! keys are employee ratings paired with that picker. Every other key is
//! inferred from its name and value, whether or not the form was loaded: the
//! key name mentions "rating" or "rate", or the value is a number between 0
//! and 5; names that also mention "employee" are employee ratings.
//!
//! Only values that round to a whole star between 1 and 5 are kept.

use reviewdesk_core::constants::{is_technical_key, EMPLOYEE_RATING_SUFFIX, MAX_RATING, MIN_RATING};
use reviewdesk_core::models::{FieldRole, FieldType, Form, Submission};

use crate::data::ReportData;
use crate::filter::EmployeeSelection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingKind {
    General,
    Employee,
}

/// One qualifying star value found in a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingSample {
    pub key: String,
    pub kind: RatingKind,
    pub stars: u8,
    /// Stored employee selection this rating belongs to (employee ratings only)
    pub employee_value: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
enum KeyRole {
    General,
    /// Employee rating paired with the selection stored under the given key
    Employee(Option<String>),
    NotRating,
}

fn numeric(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn looks_like_rating_key(lower: &str) -> bool {
    lower.contains("rating") || lower.contains("rate")
}

fn looks_like_employee_selection(key: &str) -> bool {
    let lower = key.to_lowercase();
    lower.contains("employee") && !looks_like_rating_key(&lower)
}

fn schema_role(form: &Form, key: &str) -> Option<KeyRole> {
    if let Some(role) = form.field(key).and_then(|field| field.role) {
        return Some(match role {
            FieldRole::Rating => KeyRole::General,
            FieldRole::EmployeeRating => KeyRole::Employee(None),
            FieldRole::Generic => KeyRole::NotRating,
        });
    }

    form.fields
        .iter()
        .find(|f| f.field_type == FieldType::Employee && f.rating_key() == key)
        .map(|f| KeyRole::Employee(Some(f.name.clone())))
}

/// Selection key paired with an inferred employee rating key.
fn paired_selection(submission: &Submission, key: &str) -> Option<String> {
    if let Some(base) = key.strip_suffix(EMPLOYEE_RATING_SUFFIX) {
        if submission.submissions.contains_key(base) {
            return Some(base.to_string());
        }
    }
    submission
        .submissions
        .keys()
        .find(|k| !is_technical_key(k) && looks_like_employee_selection(k))
        .cloned()
}

fn classify(submission: &Submission, form: Option<&Form>, key: &str, raw: &str) -> KeyRole {
    if let Some(role) = form.and_then(|f| schema_role(f, key)) {
        return match role {
            KeyRole::Employee(None) => KeyRole::Employee(paired_selection(submission, key)),
            other => other,
        };
    }

    let lower = key.to_lowercase();
    let in_scale = numeric(raw).is_some_and(|v| (0.0..=f64::from(MAX_RATING)).contains(&v));
    if !(looks_like_rating_key(&lower) || in_scale) {
        return KeyRole::NotRating;
    }
    if lower.contains("employee") {
        KeyRole::Employee(paired_selection(submission, key))
    } else {
        KeyRole::General
    }
}

fn stars(raw: &str) -> Option<u8> {
    let rounded = numeric(raw)?.round();
    (f64::from(MIN_RATING)..=f64::from(MAX_RATING))
        .contains(&rounded)
        .then_some(rounded as u8)
}

/// Every qualifying rating in a submission, regardless of employee selection.
pub fn extract_ratings(submission: &Submission, form: Option<&Form>) -> Vec<RatingSample> {
    let mut samples = Vec::new();

    for key in submission.submissions.keys() {
        if is_technical_key(key) {
            continue;
        }
        let Some(raw) = submission.raw_value(key) else {
            continue;
        };

        let (kind, selection_key) = match classify(submission, form, key, &raw) {
            KeyRole::NotRating => continue,
            KeyRole::General => (RatingKind::General, None),
            KeyRole::Employee(selection_key) => (RatingKind::Employee, selection_key),
        };
        let Some(stars) = stars(&raw) else {
            continue;
        };

        samples.push(RatingSample {
            key: key.clone(),
            kind,
            stars,
            employee_value: selection_key.and_then(|k| submission.raw_value(&k)),
        });
    }

    samples
}

/// Employee selections stored in a submission (values of employee picker keys).
pub fn employee_selections(submission: &Submission, form: Option<&Form>) -> Vec<String> {
    submission
        .submissions
        .keys()
        .filter(|key| !is_technical_key(key))
        .filter(|key| match form.and_then(|f| f.field(key)) {
            Some(field) => field.field_type == FieldType::Employee,
            None => looks_like_employee_selection(key),
        })
        .filter_map(|key| submission.raw_value(key))
        .filter(|value| !value.is_empty())
        .collect()
}

/// Whether a rating counts under the employee selection:
/// unfiltered keeps general ratings only, `all` keeps every rating, a
/// specific employee keeps general ratings plus that employee's ratings.
pub fn rating_included(
    data: &ReportData,
    sample: &RatingSample,
    selection: &EmployeeSelection,
) -> bool {
    match (sample.kind, selection) {
        (RatingKind::General, _) => true,
        (RatingKind::Employee, EmployeeSelection::Unfiltered) => false,
        (RatingKind::Employee, EmployeeSelection::All) => true,
        (RatingKind::Employee, EmployeeSelection::Employee(id)) => sample
            .employee_value
            .as_deref()
            .is_some_and(|stored| data.selection_matches(id, stored)),
    }
}

/// Ratings of a submission that count under the employee selection.
pub fn included_ratings(
    data: &ReportData,
    submission: &Submission,
    selection: &EmployeeSelection,
) -> Vec<RatingSample> {
    extract_ratings(submission, data.form_of(submission))
        .into_iter()
        .filter(|sample| rating_included(data, sample, selection))
        .collect()
}
