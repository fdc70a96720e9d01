use anyhow::{Context, Result};
use reviewdesk_api_client::{ApiClient, Auth, FormSession, ReviewLauncher, SubmitState};
use reviewdesk_cli::{answers_from_json, read_upload};
use reviewdesk_core::models::FieldValue;
use reviewdesk_core::{AppError, UpstreamConfig};
use std::path::PathBuf;
use std::process::Command;

pub struct SubmitArgs {
    pub form_id: String,
    pub answers: PathBuf,
    pub token: Option<String>,
    pub images: Vec<(String, PathBuf)>,
    pub open_review: bool,
}

/// Prints the text to paste and hands the link to the desktop opener.
struct TerminalLauncher;

impl ReviewLauncher for TerminalLauncher {
    fn copy_text(&self, text: &str) -> Result<(), AppError> {
        println!("\nPaste this on the review site:\n\n{}\n", text);
        Ok(())
    }

    fn open_link(&self, url: &str) -> Result<(), AppError> {
        let opener = if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        };
        Command::new(opener)
            .arg(url)
            .spawn()
            .map(|_| ())
            .map_err(|e| AppError::Internal(format!("Failed to run {}: {}", opener, e)))
    }
}

pub async fn run(args: &SubmitArgs) -> Result<()> {
    let config = UpstreamConfig::from_env()?;
    config.validate()?;
    // Public form endpoints take no credentials.
    let client = ApiClient::from_config(&config, Auth::Anonymous)?;

    let mut session = FormSession::open(&client, &args.form_id)
        .await
        .with_context(|| format!("Failed to open form {}", args.form_id))?;

    let raw = std::fs::read_to_string(&args.answers)
        .with_context(|| format!("Failed to read {}", args.answers.display()))?;
    let answers: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", args.answers.display()))?;

    for (name, value) in answers_from_json(session.form(), &answers)? {
        session.set_value(&name, value)?;
    }
    for (name, path) in &args.images {
        let upload = read_upload(path)?;
        session.set_value(name, FieldValue::File(Some(upload)))?;
    }
    if let Some(token) = &args.token {
        session.set_verification_token(token.as_str());
    }

    match session.submit(&client).await {
        Ok(created) => println!("Thank you! Submission {} received.", created.id),
        Err(AppError::Validation(errors)) => {
            eprintln!("Please fix the following answers:");
            for (field, error) in &errors {
                eprintln!("  {:<20} {}", field, error);
            }
            anyhow::bail!("{} answer(s) failed validation", errors.len());
        }
        Err(AppError::VerificationRequired) => {
            anyhow::bail!("A verification token is required. Pass --token <captcha-token>");
        }
        Err(e) => {
            return match session.state() {
                SubmitState::LimitReached(message) => Err(anyhow::anyhow!(
                    "This form is not accepting more submissions this month: {}",
                    message
                )),
                _ => Err(e).context("Submission failed"),
            };
        }
    }

    if let Some(prompt) = session.review_prompt() {
        println!("\nGlad you enjoyed it! Share your review at {}", prompt.link);
        if args.open_review {
            if let Err(e) = prompt.launch(&TerminalLauncher) {
                tracing::warn!(error = %e, "Failed to open review link");
                println!("Open {} in your browser to continue.", prompt.link);
            }
        }
    }

    Ok(())
}
