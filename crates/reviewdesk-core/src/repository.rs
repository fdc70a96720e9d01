//! Repository traits for the upstream feedback service
//!
//! The report service and the public form session only talk to these
//! interfaces. The HTTP client implements them against the REST API;
//! `InMemoryStore` backs tests and offline report runs.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::AppError;
use crate::models::{Employee, Form, Submission};
use crate::submission::PackagedSubmission;

#[async_trait]
pub trait FormRepository: Send + Sync {
    /// Forms owned by the current tenant
    async fn list_forms(&self) -> Result<Vec<Form>, AppError>;

    /// Public form definition
    async fn get_form(&self, form_id: &str) -> Result<Form, AppError>;
}

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn list_submissions(&self) -> Result<Vec<Submission>, AppError>;

    /// Send a packaged submission; returns the created record
    async fn create_submission(
        &self,
        submission: PackagedSubmission,
    ) -> Result<Submission, AppError>;

    async fn mark_read(&self, submission_id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn list_employees(&self) -> Result<Vec<Employee>, AppError>;
}

/// Repository over in-memory vectors.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    forms: Vec<Form>,
    employees: Vec<Employee>,
    submissions: Mutex<Vec<Submission>>,
}

impl InMemoryStore {
    pub fn new(forms: Vec<Form>, submissions: Vec<Submission>, employees: Vec<Employee>) -> Self {
        Self {
            forms,
            employees,
            submissions: Mutex::new(submissions),
        }
    }

    fn submissions(&self) -> Result<std::sync::MutexGuard<'_, Vec<Submission>>, AppError> {
        self.submissions
            .lock()
            .map_err(|_| AppError::Internal("submission store lock poisoned".to_string()))
    }
}

#[async_trait]
impl FormRepository for InMemoryStore {
    async fn list_forms(&self) -> Result<Vec<Form>, AppError> {
        Ok(self.forms.clone())
    }

    async fn get_form(&self, form_id: &str) -> Result<Form, AppError> {
        self.forms
            .iter()
            .find(|f| f.id == form_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Form {} not found", form_id)))
    }
}

#[async_trait]
impl SubmissionRepository for InMemoryStore {
    async fn list_submissions(&self) -> Result<Vec<Submission>, AppError> {
        Ok(self.submissions()?.clone())
    }

    async fn create_submission(
        &self,
        submission: PackagedSubmission,
    ) -> Result<Submission, AppError> {
        let (form_id, answers) = match submission {
            PackagedSubmission::Json(body) => (body.form_id, body.submissions.into_iter().collect()),
            PackagedSubmission::Multipart {
                form_id,
                fields,
                files,
                ..
            } => {
                let mut answers: Vec<(String, String)> = fields;
                answers.extend(files.into_iter().map(|(name, file)| (name, file.file_name)));
                (form_id, answers)
            }
        };

        let mut store = self.submissions()?;
        let created = Submission {
            id: format!("sub-{}", store.len() + 1),
            form_id: form_id.as_str().into(),
            created_at: Some(Utc::now()),
            submissions: answers
                .into_iter()
                .map(|(k, v)| (k, serde_json::Value::String(v)))
                .collect(),
            is_read: false,
        };
        store.push(created.clone());
        Ok(created)
    }

    async fn mark_read(&self, submission_id: &str) -> Result<(), AppError> {
        let mut store = self.submissions()?;
        let submission = store
            .iter_mut()
            .find(|s| s.id == submission_id)
            .ok_or_else(|| AppError::NotFound(format!("Submission {} not found", submission_id)))?;
        submission.is_read = true;
        Ok(())
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryStore {
    async fn list_employees(&self) -> Result<Vec<Employee>, AppError> {
        Ok(self.employees.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::SubmissionBody;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_in_memory_create_and_mark_read() {
        let store = InMemoryStore::default();
        let mut answers = BTreeMap::new();
        answers.insert("stars".to_string(), "5".to_string());
        let created = store
            .create_submission(PackagedSubmission::Json(SubmissionBody {
                form_id: "form-1".to_string(),
                submissions: answers,
                captcha_token: "tok".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(created.form_id(), "form-1");
        assert!(!created.is_read);

        store.mark_read(&created.id).await.unwrap();
        let all = store.list_submissions().await.unwrap();
        assert!(all[0].is_read);

        assert!(matches!(
            store.mark_read("missing").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            store.get_form("missing").await,
            Err(AppError::NotFound(_))
        ));
    }
}
