use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;
use reviewdesk_core::{AppError, EmployeeRepository, FormRepository, SubmissionRepository};

use crate::charts::{
    build_distribution, build_rating_trend, build_timeline, DailyCount, RatingDistribution,
    RatingTrendPoint,
};
use crate::data::ReportData;
use crate::filter::{filter_submissions, ReportFilter};
use crate::range::TimeWindow;
use crate::summary::{build_report, ReportSummary};

/// Loads report inputs through injected repositories and builds datasets.
#[derive(Clone)]
pub struct ReportService {
    forms: Arc<dyn FormRepository>,
    submissions: Arc<dyn SubmissionRepository>,
    employees: Arc<dyn EmployeeRepository>,
    timezone: Tz,
}

impl ReportService {
    pub fn new(
        forms: Arc<dyn FormRepository>,
        submissions: Arc<dyn SubmissionRepository>,
        employees: Arc<dyn EmployeeRepository>,
        timezone: Tz,
    ) -> Self {
        Self {
            forms,
            submissions,
            employees,
            timezone,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Fetch forms, submissions and employees concurrently.
    ///
    /// Only the submissions fetch is required. Failing to load forms disables
    /// the ownership filter; failing to load employees leaves name/number
    /// matching unavailable.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self) -> Result<ReportData, AppError> {
        let (forms, submissions, employees) = tokio::join!(
            self.forms.list_forms(),
            self.submissions.list_submissions(),
            self.employees.list_employees(),
        );

        let submissions = submissions?;

        let forms = match forms {
            Ok(forms) => Some(forms),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load forms, ownership filter skipped");
                None
            }
        };

        let employees = employees.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load employees");
            Vec::new()
        });

        tracing::debug!(
            submissions = submissions.len(),
            forms = ?forms.as_ref().map(Vec::len),
            employees = employees.len(),
            "Report data loaded"
        );

        Ok(ReportData::new(forms, submissions, employees))
    }

    pub fn window(&self, filter: &ReportFilter) -> TimeWindow {
        filter.range.window(Utc::now(), self.timezone)
    }

    #[tracing::instrument(skip(self), fields(form = %filter.form.as_str(), employee = %filter.employee.as_str()))]
    pub async fn summary(&self, filter: &ReportFilter) -> Result<ReportSummary, AppError> {
        let data = self.load().await?;
        let summary = build_report(&data, filter, &self.window(filter));
        tracing::info!(
            total = summary.total_submissions,
            rated = summary.distribution.total,
            "Report summary built"
        );
        Ok(summary)
    }

    #[tracing::instrument(skip(self), fields(form = %filter.form.as_str()))]
    pub async fn timeline(&self, filter: &ReportFilter) -> Result<Vec<DailyCount>, AppError> {
        let data = self.load().await?;
        let filtered = filter_submissions(&data, filter, &self.window(filter));
        Ok(build_timeline(&filtered))
    }

    #[tracing::instrument(skip(self), fields(form = %filter.form.as_str(), employee = %filter.employee.as_str()))]
    pub async fn rating_trend(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<RatingTrendPoint>, AppError> {
        let data = self.load().await?;
        let filtered = filter_submissions(&data, filter, &self.window(filter));
        Ok(build_rating_trend(&data, &filtered, &filter.employee))
    }

    #[tracing::instrument(skip(self), fields(form = %filter.form.as_str(), employee = %filter.employee.as_str()))]
    pub async fn distribution(
        &self,
        filter: &ReportFilter,
    ) -> Result<RatingDistribution, AppError> {
        let data = self.load().await?;
        let filtered = filter_submissions(&data, filter, &self.window(filter));
        Ok(build_distribution(&data, &filtered, &filter.employee))
    }
}
