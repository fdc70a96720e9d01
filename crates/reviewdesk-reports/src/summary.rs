use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::charts::{
    build_distribution, build_employee_leaderboard, build_form_breakdown, build_rating_trend,
    build_timeline, DailyCount, EmployeeRatingSummary, FormCount, RatingDistribution,
    RatingTrendPoint,
};
use crate::data::ReportData;
use crate::filter::{filter_submissions, ReportFilter};
use crate::range::TimeWindow;

/// Every dashboard dataset computed from one filtered submission set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReportSummary {
    pub total_submissions: usize,
    /// Filtered submissions not yet marked read
    pub unread: usize,
    pub window_start: Option<DateTime<Utc>>,
    pub window_end: Option<DateTime<Utc>>,
    pub timeline: Vec<DailyCount>,
    pub rating_trend: Vec<RatingTrendPoint>,
    pub distribution: RatingDistribution,
    pub by_form: Vec<FormCount>,
    pub by_employee: Vec<EmployeeRatingSummary>,
}

pub fn build_report(data: &ReportData, filter: &ReportFilter, window: &TimeWindow) -> ReportSummary {
    let filtered = filter_submissions(data, filter, window);

    ReportSummary {
        total_submissions: filtered.len(),
        unread: filtered.iter().filter(|s| !s.is_read).count(),
        window_start: window.start,
        window_end: window.end,
        timeline: build_timeline(&filtered),
        rating_trend: build_rating_trend(data, &filtered, &filter.employee),
        distribution: build_distribution(data, &filtered, &filter.employee),
        by_form: build_form_breakdown(data, &filtered),
        by_employee: build_employee_leaderboard(data, &filtered, &filter.employee),
    }
}
