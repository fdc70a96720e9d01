//! ReviewDesk CLI — command-line client for the feedback API.
//!
//! Authenticated commands read REVIEWDESK_API_KEY (or API_KEY / JWT_TOKEN) and
//! REVIEWDESK_API_URL (or API_URL). `submit` uses the public form endpoints
//! and needs no token.

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use reviewdesk_api_client::ApiClient;
use reviewdesk_cli::{init_tracing, parse_image_arg, OutputFormat};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reviewdesk", about = "ReviewDesk feedback CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tenant's forms
    Forms {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// List submissions, newest first
    Submissions {
        /// Only submissions of this form
        #[arg(long)]
        form: Option<String>,
        /// Only unread submissions
        #[arg(long)]
        unread: bool,
        /// Maximum number of rows
        #[arg(long, default_value = "50")]
        limit: usize,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// List employees
    Employees {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Print dashboard report datasets
    Report {
        /// `all` or a form id
        #[arg(long, default_value = "all")]
        form: String,
        /// Empty for general ratings only, `all`, or an employee id
        #[arg(long, default_value = "")]
        employee: String,
        /// 7days, 30days, 6months or all
        #[arg(long)]
        range: Option<String>,
        /// Custom range start (YYYY-MM-DD)
        #[arg(long, requires = "end")]
        start: Option<String>,
        /// Custom range end, inclusive (YYYY-MM-DD)
        #[arg(long, requires = "start")]
        end: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Fill and submit a public form
    Submit {
        /// Form ID
        form_id: String,
        /// JSON file with answers keyed by field name
        #[arg(long)]
        answers: PathBuf,
        /// Bot verification token
        #[arg(long)]
        token: Option<String>,
        /// Attach a file to an image field (repeatable)
        #[arg(long = "image", value_name = "FIELD=PATH", value_parser = parse_image_arg)]
        images: Vec<(String, PathBuf)>,
        /// Open the external review site when offered
        #[arg(long)]
        open_review: bool,
    },
    /// Mark a submission as read
    MarkRead {
        /// Submission ID
        id: String,
    },
}

fn authenticated_client() -> anyhow::Result<ApiClient> {
    ApiClient::from_env().context(
        "Failed to create API client. Set REVIEWDESK_API_KEY and REVIEWDESK_API_URL (or API_URL)",
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Forms { format } => {
            commands::listing::forms(&authenticated_client()?, format).await?;
        }
        Commands::Submissions {
            form,
            unread,
            limit,
            format,
        } => {
            let filter = commands::listing::SubmissionListFilter {
                form,
                unread_only: unread,
                limit,
            };
            commands::listing::submissions(&authenticated_client()?, &filter, format).await?;
        }
        Commands::Employees { format } => {
            commands::listing::employees(&authenticated_client()?, format).await?;
        }
        Commands::Report {
            form,
            employee,
            range,
            start,
            end,
            format,
        } => {
            let args = commands::report::ReportArgs {
                form,
                employee,
                range,
                start,
                end,
            };
            commands::report::run(authenticated_client()?, &args, format).await?;
        }
        Commands::Submit {
            form_id,
            answers,
            token,
            images,
            open_review,
        } => {
            let args = commands::submit::SubmitArgs {
                form_id,
                answers,
                token,
                images,
                open_review,
            };
            commands::submit::run(&args).await?;
        }
        Commands::MarkRead { id } => {
            authenticated_client()?.mark_submission_read(&id).await?;
            println!("Submission {} marked as read", id);
        }
    }

    Ok(())
}
