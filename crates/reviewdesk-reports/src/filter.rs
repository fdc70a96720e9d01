//! Submission aggregator: narrows the raw submission list to what a
//! dashboard view should see.

use reviewdesk_core::models::Submission;
use serde::{Deserialize, Serialize};

use crate::data::ReportData;
use crate::range::{DateRange, TimeWindow};
use crate::ratings::employee_selections;

/// Selected form: every owned form, or one form id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FormSelection {
    #[default]
    All,
    Form(String),
}

impl FormSelection {
    /// `""` and `"all"` select every form.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "all" => FormSelection::All,
            id => FormSelection::Form(id.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FormSelection::All => "all",
            FormSelection::Form(id) => id,
        }
    }
}

/// Three-way employee switch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmployeeSelection {
    /// `""`: no employee filter; only general ratings are charted
    #[default]
    Unfiltered,
    /// `"all"`: general ratings plus every employee rating
    All,
    /// One employee: general ratings plus that employee's ratings
    Employee(String),
}

impl EmployeeSelection {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" => EmployeeSelection::Unfiltered,
            "all" => EmployeeSelection::All,
            id => EmployeeSelection::Employee(id.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EmployeeSelection::Unfiltered => "",
            EmployeeSelection::All => "all",
            EmployeeSelection::Employee(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportFilter {
    pub form: FormSelection,
    pub employee: EmployeeSelection,
    pub range: DateRange,
}

impl ReportFilter {
    pub fn new(form: FormSelection, employee: EmployeeSelection, range: DateRange) -> Self {
        Self {
            form,
            employee,
            range,
        }
    }
}

fn owned(data: &ReportData, submission: &Submission) -> bool {
    match data.forms.as_deref() {
        Some(forms) => forms.iter().any(|f| f.id == submission.form_id()),
        // Owned forms not loaded: skip the ownership check rather than block.
        None => true,
    }
}

fn in_window(window: &TimeWindow, submission: &Submission) -> bool {
    if window.is_unbounded() {
        return true;
    }
    submission
        .created_at
        .is_some_and(|created_at| window.contains(created_at))
}

fn matches_employee(data: &ReportData, selection: &EmployeeSelection, submission: &Submission) -> bool {
    match selection {
        EmployeeSelection::Unfiltered | EmployeeSelection::All => true,
        EmployeeSelection::Employee(id) => employee_selections(submission, data.form_of(submission))
            .iter()
            .any(|stored| data.selection_matches(id, stored)),
    }
}

/// Submissions visible under `filter`, in input order.
///
/// Applies ownership (when the owned-forms list is available), the form
/// selection, the employee selection and the resolved time window.
pub fn filter_submissions<'a>(
    data: &'a ReportData,
    filter: &ReportFilter,
    window: &TimeWindow,
) -> Vec<&'a Submission> {
    data.submissions
        .iter()
        .filter(|s| owned(data, s))
        .filter(|s| match &filter.form {
            FormSelection::All => true,
            FormSelection::Form(id) => s.form_id() == id,
        })
        .filter(|s| matches_employee(data, &filter.employee, s))
        .filter(|s| in_window(window, s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use reviewdesk_core::models::{Employee, Form, FormType};
    use serde_json::json;

    fn submission(id: &str, form_id: serde_json::Value, at: Option<&str>, answers: serde_json::Value) -> Submission {
        serde_json::from_value(json!({
            "_id": id,
            "formId": form_id,
            "createdAt": at,
            "submissions": answers,
        }))
        .unwrap()
    }

    fn form(id: &str) -> Form {
        Form {
            id: id.to_string(),
            name: format!("Form {}", id),
            note: None,
            form_type: FormType::Review,
            description: None,
            logo_url: None,
            is_active: true,
            button_colors: None,
            review_link: None,
            fields: Vec::new(),
        }
    }

    fn data(forms: Option<Vec<Form>>) -> ReportData {
        ReportData::new(
            forms,
            vec![
                submission("s1", json!("f1"), Some("2025-01-01T09:00:00Z"), json!({"rating": "5", "employee": "emp-1"})),
                submission("s2", json!({"_id": "f2", "name": "Patio"}), Some("2025-01-05T09:00:00Z"), json!({"rating": "3"})),
                submission("s3", json!("other"), Some("2025-01-02T09:00:00Z"), json!({"rating": "1"})),
                submission("s4", json!("f1"), None, json!({"rating": "4", "employee": "Sam"})),
            ],
            vec![Employee {
                id: "emp-1".to_string(),
                name: "Dana".to_string(),
                employee_number: None,
                designation: String::new(),
                profile_photo: None,
            }],
        )
    }

    fn ids(subs: &[&Submission]) -> Vec<String> {
        subs.iter().map(|s| s.id.clone()).collect()
    }

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn ownership_is_skipped_when_forms_unknown() {
        let unknown = data(None);
        let all = filter_submissions(&unknown, &ReportFilter::default(), &TimeWindow::unbounded());
        assert_eq!(all.len(), 4);

        let known = data(Some(vec![form("f1"), form("f2")]));
        let owned = filter_submissions(&known, &ReportFilter::default(), &TimeWindow::unbounded());
        assert_eq!(ids(&owned), vec!["s1", "s2", "s4"]);
    }

    #[test]
    fn form_selection_accepts_populated_form_ids() {
        let d = data(Some(vec![form("f1"), form("f2")]));
        let filter = ReportFilter {
            form: FormSelection::parse("f2"),
            ..ReportFilter::default()
        };
        let result = filter_submissions(&d, &filter, &TimeWindow::unbounded());
        assert_eq!(ids(&result), vec!["s2"]);
    }

    #[test]
    fn employee_selection_keeps_matching_submissions() {
        let d = data(None);
        let filter = ReportFilter {
            employee: EmployeeSelection::parse("emp-1"),
            ..ReportFilter::default()
        };
        assert_eq!(ids(&filter_submissions(&d, &filter, &TimeWindow::unbounded())), vec!["s1"]);

        let filter = ReportFilter {
            employee: EmployeeSelection::parse("all"),
            ..ReportFilter::default()
        };
        assert_eq!(filter_submissions(&d, &filter, &TimeWindow::unbounded()).len(), 4);
    }

    #[test]
    fn bounded_window_drops_undated_submissions() {
        let d = data(None);
        let window = TimeWindow {
            start: Some(utc("2025-01-01T00:00:00Z")),
            end: Some(utc("2025-01-02T23:59:59.999Z")),
        };
        let result = filter_submissions(&d, &ReportFilter::default(), &window);
        assert_eq!(ids(&result), vec!["s1", "s3"]);
    }

    #[test]
    fn selection_parsing() {
        assert_eq!(EmployeeSelection::parse(""), EmployeeSelection::Unfiltered);
        assert_eq!(EmployeeSelection::parse("all"), EmployeeSelection::All);
        assert_eq!(EmployeeSelection::parse("e1").as_str(), "e1");
        assert_eq!(FormSelection::parse(""), FormSelection::All);
        assert_eq!(FormSelection::parse("all").as_str(), "all");
    }
}
