use anyhow::{Context, Result};
use reviewdesk_core::models::{FieldValue, FileUpload, Form};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Initialize tracing for the CLI.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Output format for listing and report commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Parse a `--image field=path` argument.
pub fn parse_image_arg(arg: &str) -> Result<(String, PathBuf), String> {
    match arg.split_once('=') {
        Some((field, path)) if !field.trim().is_empty() && !path.trim().is_empty() => {
            Ok((field.trim().to_string(), PathBuf::from(path.trim())))
        }
        _ => Err(format!("expected FIELD=PATH, got '{}'", arg)),
    }
}

fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

pub fn read_upload(path: &Path) -> Result<FileUpload> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();

    Ok(FileUpload {
        file_name,
        content_type: content_type_for(path).map(String::from),
        bytes,
    })
}

/// Typed answers from a JSON object keyed by field name.
///
/// Keys that are not rendered fields are rejected so typos do not silently
/// drop an answer.
pub fn answers_from_json(
    form: &Form,
    answers: &serde_json::Value,
) -> Result<BTreeMap<String, FieldValue>> {
    let object = answers
        .as_object()
        .context("Answers file must contain a JSON object keyed by field name")?;

    let rendered = form.rendered_fields();
    let mut values = BTreeMap::new();
    for (name, raw) in object {
        let field = rendered
            .iter()
            .find(|f| &f.name == name)
            .with_context(|| format!("Form {} has no field '{}'", form.id, name))?;
        let value = FieldValue::from_json(field, raw)
            .with_context(|| format!("Invalid answer for '{}'", name))?;
        values.insert(name.clone(), value);
    }
    Ok(values)
}
