use reviewdesk_core::models::{Employee, Form, Submission};

/// Raw inputs of a report as loaded from the upstream API.
#[derive(Debug, Clone, Default)]
pub struct ReportData {
    /// Forms owned by the tenant. `None` when the list is not available,
    /// in which case ownership is not enforced.
    pub forms: Option<Vec<Form>>,
    pub submissions: Vec<Submission>,
    pub employees: Vec<Employee>,
}

impl ReportData {
    pub fn new(
        forms: Option<Vec<Form>>,
        submissions: Vec<Submission>,
        employees: Vec<Employee>,
    ) -> Self {
        Self {
            forms,
            submissions,
            employees,
        }
    }

    pub fn form(&self, form_id: &str) -> Option<&Form> {
        self.forms.as_deref()?.iter().find(|f| f.id == form_id)
    }

    /// Definition of the form a submission belongs to, when known.
    pub fn form_of(&self, submission: &Submission) -> Option<&Form> {
        self.form(submission.form_id())
    }

    pub fn employee(&self, employee_id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == employee_id)
    }

    /// Whether a stored employee selection refers to `employee_id`: exact id,
    /// or the employee's name / number appearing in the stored text.
    pub fn selection_matches(&self, employee_id: &str, stored: &str) -> bool {
        stored == employee_id
            || self
                .employee(employee_id)
                .is_some_and(|employee| employee.matches_value(stored))
    }
}
