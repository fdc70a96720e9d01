use anyhow::Result;
use reviewdesk_api_client::ApiClient;
use reviewdesk_cli::{truncate_string, OutputFormat};
use reviewdesk_core::BaseConfig;
use reviewdesk_reports::{
    DateRange, EmployeeSelection, FormSelection, ReportFilter, ReportService, ReportSummary,
};
use std::sync::Arc;

use super::print_json;

pub struct ReportArgs {
    pub form: String,
    pub employee: String,
    pub range: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl ReportArgs {
    fn filter(&self) -> Result<ReportFilter> {
        let range = DateRange::from_params(
            self.range.as_deref(),
            self.start.as_deref(),
            self.end.as_deref(),
        )?;
        Ok(ReportFilter::new(
            FormSelection::parse(&self.form),
            EmployeeSelection::parse(&self.employee),
            range,
        ))
    }
}

pub async fn run(client: ApiClient, args: &ReportArgs, format: OutputFormat) -> Result<()> {
    let filter = args.filter()?;
    let timezone = BaseConfig::from_env()?.report_timezone;
    tracing::debug!(upstream = %client.base_url(), timezone = %timezone, "Building report");

    let upstream = Arc::new(client);
    let service = ReportService::new(upstream.clone(), upstream.clone(), upstream, timezone);
    let summary = service.summary(&filter).await?;

    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Table => print_summary(&summary, &filter),
    }
    Ok(())
}

fn print_summary(summary: &ReportSummary, filter: &ReportFilter) {
    println!("\n=== Feedback Report ===\n");
    println!("Form:     {}", filter.form.as_str());
    println!(
        "Employee: {}",
        match filter.employee.as_str() {
            "" => "(general ratings only)",
            other => other,
        }
    );
    let bound = |t: Option<chrono::DateTime<chrono::Utc>>| {
        t.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    println!(
        "Window:   {} .. {}",
        bound(summary.window_start),
        bound(summary.window_end)
    );

    println!("\nSubmissions: {}", summary.total_submissions);
    println!("Unread:      {}", summary.unread);

    println!("\n--- Rating Distribution ---");
    for bucket in &summary.distribution.buckets {
        println!(
            "{:<8} {:>6}  {}",
            bucket.label,
            bucket.count,
            "*".repeat(bar_width(bucket.count, summary.distribution.total))
        );
    }
    println!(
        "Average: {} ({} ratings)",
        summary.distribution.average, summary.distribution.total
    );

    if !summary.by_form.is_empty() {
        println!("\n--- By Form ---");
        for form in &summary.by_form {
            println!("{:<30} {:>6}", truncate_string(&form.form_name, 30), form.count);
        }
    }

    if !summary.by_employee.is_empty() {
        println!("\n--- By Employee ---");
        println!("{:<30} {:>8} {:>8}", "Name", "Average", "Ratings");
        for employee in &summary.by_employee {
            println!(
                "{:<30} {:>8.2} {:>8}",
                truncate_string(&employee.name, 30),
                employee.average,
                employee.count
            );
        }
    }

    if !summary.timeline.is_empty() {
        println!("\n--- Daily Submissions ---");
        for day in &summary.timeline {
            println!("{}  {:>6}", day.date, day.count);
        }
    }

    if !summary.rating_trend.is_empty() {
        println!("\n--- Rating Trend ---");
        println!(
            "{:<12} {:>8} {:>8} {:>9}",
            "Date", "Average", "General", "Employee"
        );
        let cell = |v: Option<f64>| v.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string());
        for point in &summary.rating_trend {
            println!(
                "{:<12} {:>8.2} {:>8} {:>9}",
                point.date.to_string(),
                point.average,
                cell(point.general_average),
                cell(point.employee_average)
            );
        }
    }
}

fn bar_width(count: usize, total: usize) -> usize {
    const WIDTH: usize = 40;
    if total == 0 {
        0
    } else {
        (count * WIDTH).div_ceil(total)
    }
}
