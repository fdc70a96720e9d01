use anyhow::Result;
use reviewdesk_api_client::ApiClient;
use reviewdesk_cli::{truncate_string, OutputFormat};
use reviewdesk_core::models::{scalar_text, Employee, Form, Submission};
use std::collections::HashMap;

use super::print_json;

pub async fn forms(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let forms = client.list_forms().await?;
    match format {
        OutputFormat::Json => print_json(&forms)?,
        OutputFormat::Table => print_forms_table(&forms),
    }
    Ok(())
}

fn print_forms_table(forms: &[Form]) {
    println!("\n=== Forms ===\n");
    if forms.is_empty() {
        println!("No forms found.");
        return;
    }

    println!(
        "{:<26} {:<30} {:<10} {:<7} {:>6}",
        "ID", "Name", "Type", "Active", "Fields"
    );
    println!("{}", "-".repeat(83));
    for form in forms {
        println!(
            "{:<26} {:<30} {:<10} {:<7} {:>6}",
            truncate_string(&form.id, 26),
            truncate_string(&form.name, 30),
            format!("{:?}", form.form_type),
            if form.is_active { "yes" } else { "no" },
            form.rendered_fields().len()
        );
    }
}

pub struct SubmissionListFilter {
    pub form: Option<String>,
    pub unread_only: bool,
    pub limit: usize,
}

impl SubmissionListFilter {
    fn keeps(&self, submission: &Submission) -> bool {
        self.form
            .as_deref()
            .map_or(true, |form| submission.form_id() == form)
            && (!self.unread_only || !submission.is_read)
    }
}

pub async fn submissions(
    client: &ApiClient,
    filter: &SubmissionListFilter,
    format: OutputFormat,
) -> Result<()> {
    let (forms, submissions) = tokio::try_join!(client.list_forms(), client.list_submissions())?;

    let mut selected: Vec<Submission> = submissions
        .into_iter()
        .filter(|s| filter.keeps(s))
        .collect();
    selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    selected.truncate(filter.limit);

    match format {
        OutputFormat::Json => print_json(&selected)?,
        OutputFormat::Table => {
            let names: HashMap<&str, &str> = forms
                .iter()
                .map(|f| (f.id.as_str(), f.name.as_str()))
                .collect();
            print_submissions_table(&selected, &names);
        }
    }
    Ok(())
}

fn answers_preview(submission: &Submission) -> String {
    submission
        .submissions
        .iter()
        .filter_map(|(key, value)| Some(format!("{}={}", key, scalar_text(value)?)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_submissions_table(submissions: &[Submission], form_names: &HashMap<&str, &str>) {
    println!("\n=== Submissions ===\n");
    if submissions.is_empty() {
        println!("No submissions found.");
        return;
    }

    println!(
        "{:<26} {:<24} {:<20} {:<5} {:<50}",
        "ID", "Form", "Created At", "Read", "Answers"
    );
    println!("{}", "-".repeat(129));
    for submission in submissions {
        let form = form_names
            .get(submission.form_id())
            .copied()
            .unwrap_or(submission.form_id());
        let created = submission
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<26} {:<24} {:<20} {:<5} {:<50}",
            truncate_string(&submission.id, 26),
            truncate_string(form, 24),
            created,
            if submission.is_read { "yes" } else { "no" },
            truncate_string(&answers_preview(submission), 50)
        );
    }
}

pub async fn employees(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let employees = client.list_employees().await?;
    match format {
        OutputFormat::Json => print_json(&employees)?,
        OutputFormat::Table => print_employees_table(&employees),
    }
    Ok(())
}

fn print_employees_table(employees: &[Employee]) {
    println!("\n=== Employees ===\n");
    if employees.is_empty() {
        println!("No employees found.");
        return;
    }

    println!(
        "{:<26} {:<30} {:<12} {:<24}",
        "ID", "Name", "Number", "Designation"
    );
    println!("{}", "-".repeat(95));
    for employee in employees {
        let designation = if employee.designation.is_empty() {
            "-"
        } else {
            employee.designation.as_str()
        };
        println!(
            "{:<26} {:<30} {:<12} {:<24}",
            truncate_string(&employee.id, 26),
            truncate_string(&employee.name, 30),
            employee.employee_number.as_deref().unwrap_or("-"),
            truncate_string(designation, 24)
        );
    }
}
