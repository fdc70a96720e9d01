use serde::{Deserialize, Serialize};

/// Staff member owned by a tenant. Referenced by id or by name inside
/// submission answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_number: Option<String>,
    #[serde(default)]
    pub designation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
}

impl Employee {
    /// Whether a stored answer refers to this employee: exact id, or the
    /// name / employee number appearing inside the stored text.
    pub fn matches_value(&self, stored: &str) -> bool {
        if stored.is_empty() {
            return false;
        }
        if stored == self.id {
            return true;
        }
        if !self.name.is_empty() && stored.contains(&self.name) {
            return true;
        }
        self.employee_number
            .as_deref()
            .filter(|number| !number.is_empty())
            .is_some_and(|number| stored.contains(number))
    }
}

/// Employee entry on a field definition: either a bare id or the populated record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmployeeRef {
    Id(String),
    Populated(Employee),
}

impl EmployeeRef {
    pub fn id(&self) -> &str {
        match self {
            EmployeeRef::Id(id) => id,
            EmployeeRef::Populated(employee) => &employee.id,
        }
    }
}

/// Find the employee a stored selection refers to.
pub fn resolve_employee<'a>(employees: &'a [Employee], stored: &str) -> Option<&'a Employee> {
    employees
        .iter()
        .find(|e| e.id == stored)
        .or_else(|| employees.iter().find(|e| e.matches_value(stored)))
}
