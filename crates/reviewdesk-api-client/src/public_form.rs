//! Public form session
//!
//! Holds a form definition and the customer's typed answers while the form is
//! being filled: values are validated on every change, the bot verification
//! token is checked before anything leaves the client, and the outcome of the
//! submission is tracked as a small state machine. After a successful
//! submission with a good rating the session offers a prompt that invites the
//! customer to post their comment on the form's external review site.

use std::collections::BTreeMap;

use reviewdesk_core::constants::REVIEW_PROMPT_THRESHOLD;
use reviewdesk_core::models::{Field, FieldValue, Form, Submission};
use reviewdesk_core::{
    package_submission, validate_field, AppError, ErrorMetadata, FieldError, FieldErrors,
    FormRepository, PackagedSubmission, SubmissionRepository,
};

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitState {
    Idle,
    Submitting,
    Submitted(Submission),
    /// Plan quota reached; shown as a blocking state rather than a toast
    LimitReached(String),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct FormSession {
    form: Form,
    values: BTreeMap<String, FieldValue>,
    errors: FieldErrors,
    token: Option<String>,
    state: SubmitState,
    /// Captured from the answers that were actually sent
    prompt: Option<ReviewPrompt>,
}

impl FormSession {
    /// Start a session for a form definition. Inactive forms are refused.
    pub fn new(form: Form) -> Result<Self, AppError> {
        if !form.is_active {
            return Err(AppError::NotFound(format!(
                "Form {} is not accepting submissions",
                form.id
            )));
        }

        let values = form
            .rendered_fields()
            .into_iter()
            .map(|field| (field.name.clone(), FieldValue::empty_for(field.field_type)))
            .collect();

        Ok(Self {
            form,
            values,
            errors: FieldErrors::new(),
            token: None,
            state: SubmitState::Idle,
            prompt: None,
        })
    }

    /// Fetch the public form definition and start a session.
    pub async fn open(forms: &dyn FormRepository, form_id: &str) -> Result<Self, AppError> {
        let form = forms.get_form(form_id).await?;
        tracing::debug!(form_id = %form.id, fields = form.fields.len(), "Public form loaded");
        Self::new(form)
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Fields in render order.
    pub fn fields(&self) -> Vec<&Field> {
        self.form.rendered_fields()
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn values(&self) -> &BTreeMap<String, FieldValue> {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, name: &str) -> Option<&FieldError> {
        self.errors.get(name)
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    pub fn set_verification_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Store an answer and re-validate that field.
    ///
    /// Unknown or disabled fields are rejected; a value of the wrong kind is
    /// stored as a field error like any other rule violation.
    pub fn set_value(&mut self, name: &str, value: FieldValue) -> Result<(), AppError> {
        let field = self
            .form
            .rendered_fields()
            .into_iter()
            .find(|f| f.name == name)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown field '{}'", name)))?;

        match validate_field(field, &value) {
            Ok(()) => {
                self.errors.remove(name);
            }
            Err(error) => {
                self.errors.insert(name.to_string(), error);
            }
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Validate everything and package the answers.
    ///
    /// A missing verification token fails first, without touching the
    /// field errors.
    pub fn prepare(&mut self) -> Result<PackagedSubmission, AppError> {
        match package_submission(&self.form, &self.values, self.token.as_deref()) {
            Ok(packaged) => {
                self.errors.clear();
                Ok(packaged)
            }
            Err(AppError::Validation(errors)) => {
                self.errors = errors.clone();
                Err(AppError::Validation(errors))
            }
            Err(e) => Err(e),
        }
    }

    /// Submit through the repository and record the outcome.
    pub async fn submit(
        &mut self,
        submissions: &dyn SubmissionRepository,
    ) -> Result<Submission, AppError> {
        let packaged = self.prepare()?;

        self.state = SubmitState::Submitting;
        self.prompt = None;
        match submissions.create_submission(packaged).await {
            Ok(created) => {
                self.prompt = self.build_review_prompt();
                self.state = SubmitState::Submitted(created.clone());
                Ok(created)
            }
            Err(e) if e.is_limit_reached() => {
                self.state = SubmitState::LimitReached(e.client_message());
                Err(e)
            }
            Err(e) => {
                tracing::warn!(error = %e, form_id = %self.form.id, "Submission failed");
                self.state = SubmitState::Failed(e.client_message());
                Err(e)
            }
        }
    }

    /// Prompt shown after a successful submission when any submitted rating
    /// reached the threshold and the form links an external review site.
    /// Answers changed after submitting do not affect it.
    pub fn review_prompt(&self) -> Option<ReviewPrompt> {
        match self.state {
            SubmitState::Submitted(_) => self.prompt.clone(),
            _ => None,
        }
    }

    fn build_review_prompt(&self) -> Option<ReviewPrompt> {
        let link = self.form.external_review_link()?;

        let rendered = self.form.rendered_fields();
        let rated_well = rendered.iter().any(|field| {
            self.values
                .get(&field.name)
                .and_then(FieldValue::rating)
                .is_some_and(|stars| stars >= REVIEW_PROMPT_THRESHOLD)
        });
        if !rated_well {
            return None;
        }

        let copy_text = rendered
            .iter()
            .filter(|field| field.is_free_text())
            .filter_map(|field| self.values.get(&field.name)?.as_text())
            .filter(|text| !text.trim().is_empty())
            .max_by_key(|text| text.chars().count())
            .map(str::to_string);

        Some(ReviewPrompt {
            link: link.to_string(),
            copy_text,
        })
    }
}

/// Clipboard and browser access used by the review prompt.
pub trait ReviewLauncher {
    fn copy_text(&self, text: &str) -> Result<(), AppError>;
    fn open_link(&self, url: &str) -> Result<(), AppError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewPrompt {
    pub link: String,
    /// Longest free-text answer, offered for pasting on the review site
    pub copy_text: Option<String>,
}

impl ReviewPrompt {
    /// Copy the answer text, then open the review link. A failed copy is
    /// logged and the link is still opened.
    pub fn launch(&self, launcher: &dyn ReviewLauncher) -> Result<(), AppError> {
        if let Some(text) = &self.copy_text {
            if let Err(e) = launcher.copy_text(text) {
                tracing::warn!(error = %e, "Failed to copy review text");
            }
        }
        launcher.open_link(&self.link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reviewdesk_core::models::{EmployeeAnswer, FieldType, FormType};
    use reviewdesk_core::InMemoryStore;
    use std::cell::RefCell;

    fn form() -> Form {
        Form {
            id: "form-1".to_string(),
            name: "Lobby".to_string(),
            note: None,
            form_type: FormType::Review,
            description: None,
            logo_url: None,
            is_active: true,
            button_colors: None,
            review_link: Some("https://reviews.example.com/lobby".to_string()),
            fields: vec![
                Field::new("name", FieldType::Text).at(1),
                Field::new("stars", FieldType::Rating).required().at(2),
                Field::new("comment", FieldType::Textarea).at(3),
                Field::new("staff", FieldType::Employee)
                    .required()
                    .with_employee_rating()
                    .at(4),
            ],
        }
    }

    fn filled(form: Form, stars: u8, staff_rating: u8) -> FormSession {
        let mut session = FormSession::new(form).unwrap();
        session.set_value("stars", FieldValue::Rating(stars)).unwrap();
        session.set_value("name", FieldValue::Text("Ada".to_string())).unwrap();
        session
            .set_value("comment", FieldValue::LongText("Lovely staff".to_string()))
            .unwrap();
        session
            .set_value(
                "staff",
                FieldValue::Employee(EmployeeAnswer {
                    employee: "emp-1".to_string(),
                    rating: staff_rating,
                }),
            )
            .unwrap();
        session.set_verification_token("tok");
        session
    }

    #[test]
    fn inactive_forms_are_refused() {
        let mut inactive = form();
        inactive.is_active = false;
        assert!(matches!(FormSession::new(inactive), Err(AppError::NotFound(_))));
    }

    #[test]
    fn set_value_validates_on_change() {
        let mut session = FormSession::new(form()).unwrap();
        session
            .set_value("comment", FieldValue::LongText("ok".to_string()))
            .unwrap();
        assert!(matches!(
            session.error("comment"),
            Some(FieldError::TooShort { min: 10, .. })
        ));

        session
            .set_value("comment", FieldValue::LongText("this is long enough".to_string()))
            .unwrap();
        assert!(session.error("comment").is_none());

        assert!(session.set_value("missing", FieldValue::Rating(3)).is_err());
    }

    #[test]
    fn missing_token_blocks_prepare() {
        let mut session = FormSession::new(form()).unwrap();
        assert!(matches!(session.prepare(), Err(AppError::VerificationRequired)));
        assert!(session.errors().is_empty());

        session.set_verification_token("tok");
        assert!(matches!(session.prepare(), Err(AppError::Validation(_))));
        assert!(session.error("stars").is_some());
        assert!(session.error("staff").is_some());
    }

    #[test]
    fn employee_rating_left_unset_still_prepares() {
        let mut session = FormSession::new(form()).unwrap();
        session.set_verification_token("tok");
        session.set_value("stars", FieldValue::Rating(4)).unwrap();
        session
            .set_value(
                "staff",
                FieldValue::Employee(EmployeeAnswer {
                    employee: "emp-1".to_string(),
                    rating: 0,
                }),
            )
            .unwrap();
        let packaged = session.prepare().unwrap();
        let PackagedSubmission::Json(body) = packaged else {
            panic!("expected JSON packaging");
        };
        assert!(!body.submissions.contains_key("staff_rating"));
    }

    #[tokio::test]
    async fn review_prompt_needs_good_rating_and_link() {
        let store = InMemoryStore::default();

        let mut session = filled(form(), 5, 0);
        assert!(session.review_prompt().is_none());
        session.submit(&store).await.unwrap();
        let prompt = session.review_prompt().unwrap();
        assert_eq!(prompt.link, "https://reviews.example.com/lobby");
        assert_eq!(prompt.copy_text.as_deref(), Some("Lovely staff"));

        let mut by_employee = filled(form(), 3, 4);
        by_employee.submit(&store).await.unwrap();
        assert!(by_employee.review_prompt().is_some());

        let mut low = filled(form(), 3, 0);
        low.submit(&store).await.unwrap();
        assert!(low.review_prompt().is_none());

        let mut no_link = form();
        no_link.review_link = Some("   ".to_string());
        let mut session = filled(no_link, 5, 0);
        session.submit(&store).await.unwrap();
        assert!(session.review_prompt().is_none());
    }

    #[tokio::test]
    async fn review_prompt_reflects_submitted_answers() {
        let store = InMemoryStore::default();

        let mut session = filled(form(), 5, 0);
        session.submit(&store).await.unwrap();
        session.set_value("stars", FieldValue::Rating(2)).unwrap();
        session
            .set_value("comment", FieldValue::LongText("Edited after sending".to_string()))
            .unwrap();
        assert_eq!(
            session.review_prompt().and_then(|p| p.copy_text).as_deref(),
            Some("Lovely staff")
        );

        let mut quiet = filled(form(), 3, 0);
        quiet.submit(&store).await.unwrap();
        quiet.set_value("stars", FieldValue::Rating(5)).unwrap();
        assert!(quiet.review_prompt().is_none());
    }

    struct RecordingLauncher {
        copy_fails: bool,
        opened: RefCell<Vec<String>>,
    }

    impl ReviewLauncher for RecordingLauncher {
        fn copy_text(&self, _text: &str) -> Result<(), AppError> {
            if self.copy_fails {
                Err(AppError::Internal("clipboard unavailable".to_string()))
            } else {
                Ok(())
            }
        }

        fn open_link(&self, url: &str) -> Result<(), AppError> {
            self.opened.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    #[test]
    fn launch_opens_link_even_when_copy_fails() {
        let prompt = ReviewPrompt {
            link: "https://reviews.example.com".to_string(),
            copy_text: Some("Great coffee".to_string()),
        };
        let launcher = RecordingLauncher {
            copy_fails: true,
            opened: RefCell::new(Vec::new()),
        };
        prompt.launch(&launcher).unwrap();
        assert_eq!(launcher.opened.borrow().as_slice(), ["https://reviews.example.com"]);
    }
}
