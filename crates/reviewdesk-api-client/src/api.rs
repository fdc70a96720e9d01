//! Domain methods for the feedback API client.
//!
//! Resource types come from `reviewdesk_core::models`. The client also
//! implements the core repository traits so report and form services can run
//! against the live API.

use async_trait::async_trait;
use reviewdesk_core::models::{Employee, Form, Submission};
use reviewdesk_core::{
    is_limit_message, AppError, EmployeeRepository, FormRepository, PackagedSubmission,
    SubmissionRepository,
};
use serde::Deserialize;

use crate::ApiClient;

/// List endpoints answer with a bare array or an envelope object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Items(Vec<T>),
    Envelope {
        #[serde(alias = "forms", alias = "submissions", alias = "employees")]
        data: Vec<T>,
    },
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Items(items) => items,
            Listing::Envelope { data } => data,
        }
    }
}

/// Single-resource responses, bare or wrapped.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Single<T> {
    Bare(T),
    Envelope {
        #[serde(alias = "form", alias = "submission", alias = "data")]
        item: T,
    },
}

impl<T> Single<T> {
    fn into_inner(self) -> T {
        match self {
            Single::Bare(item) => item,
            Single::Envelope { item } => item,
        }
    }
}

impl ApiClient {
    /// Forms owned by the authenticated tenant.
    pub async fn list_forms(&self) -> Result<Vec<Form>, AppError> {
        let listing: Listing<Form> = self.get(&self.api_path("forms"), &[]).await?;
        Ok(listing.into_vec())
    }

    /// Form definition by ID (public endpoint).
    pub async fn get_form(&self, form_id: &str) -> Result<Form, AppError> {
        let path = self.api_path(&format!("forms/{}", urlencoding::encode(form_id)));
        let form: Single<Form> = self.get(&path, &[]).await?;
        Ok(form.into_inner())
    }

    /// Submissions across the tenant's forms.
    pub async fn list_submissions(&self) -> Result<Vec<Submission>, AppError> {
        let listing: Listing<Submission> = self.get(&self.api_path("submissions"), &[]).await?;
        Ok(listing.into_vec())
    }

    pub async fn list_employees(&self) -> Result<Vec<Employee>, AppError> {
        let listing: Listing<Employee> = self.get(&self.api_path("employees"), &[]).await?;
        Ok(listing.into_vec())
    }

    /// Mark a submission read.
    pub async fn mark_submission_read(&self, submission_id: &str) -> Result<(), AppError> {
        let path = self.api_path(&format!(
            "submissions/{}/read",
            urlencoding::encode(submission_id)
        ));
        self.patch(&path).await
    }

    /// Send a packaged submission as JSON or multipart form data.
    ///
    /// Rejections whose message mentions a limit, a monthly cap or the
    /// submission quota become `SubmissionLimitReached`.
    #[tracing::instrument(skip(self, submission), fields(form_id = %submission.form_id(), multipart = submission.is_multipart()))]
    pub async fn submit(&self, submission: PackagedSubmission) -> Result<Submission, AppError> {
        let url = self.build_url(&self.api_path("submission"));

        let request = match submission {
            PackagedSubmission::Json(body) => self.client().post(&url).json(&body),
            PackagedSubmission::Multipart {
                form_id,
                token,
                fields,
                files,
            } => {
                let mut form = reqwest::multipart::Form::new()
                    .text("formId", form_id)
                    .text(reviewdesk_core::constants::VERIFICATION_TOKEN_KEY, token);
                for (name, value) in fields {
                    form = form.text(name, value);
                }
                for (name, file) in files {
                    let mut part =
                        reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
                    if let Some(content_type) = file.content_type.as_deref() {
                        part = part.mime_str(content_type).map_err(|e| {
                            AppError::InvalidInput(format!(
                                "Invalid content type '{}': {}",
                                content_type, e
                            ))
                        })?;
                    }
                    form = form.part(name, part);
                }
                self.client().post(&url).multipart(form)
            }
        };

        match self.dispatch(request).await? {
            Ok(response) => {
                let created: Single<Submission> = Self::parse(response).await?;
                let created = created.into_inner();
                tracing::info!(submission_id = %created.id, "Submission created");
                Ok(created)
            }
            Err(failure) if is_limit_message(&failure.message) => {
                tracing::warn!(status = failure.status, message = %failure.message, "Submission limit reached");
                Err(AppError::SubmissionLimitReached(failure.message))
            }
            Err(failure) => Err(failure.into()),
        }
    }
}

#[async_trait]
impl FormRepository for ApiClient {
    async fn list_forms(&self) -> Result<Vec<Form>, AppError> {
        ApiClient::list_forms(self).await
    }

    async fn get_form(&self, form_id: &str) -> Result<Form, AppError> {
        ApiClient::get_form(self, form_id).await
    }
}

#[async_trait]
impl SubmissionRepository for ApiClient {
    async fn list_submissions(&self) -> Result<Vec<Submission>, AppError> {
        ApiClient::list_submissions(self).await
    }

    async fn create_submission(
        &self,
        submission: PackagedSubmission,
    ) -> Result<Submission, AppError> {
        self.submit(submission).await
    }

    async fn mark_read(&self, submission_id: &str) -> Result<(), AppError> {
        self.mark_submission_read(submission_id).await
    }
}

#[async_trait]
impl EmployeeRepository for ApiClient {
    async fn list_employees(&self) -> Result<Vec<Employee>, AppError> {
        ApiClient::list_employees(self).await
    }
}
