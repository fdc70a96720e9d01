//! ReviewDesk reports
//!
//! Submission aggregation for dashboards: ownership, form, employee and
//! date-range filtering, rating extraction, and the chart datasets built from
//! the filtered set (timeline, rating trend, star distribution, per-form and
//! per-employee breakdowns).

pub mod charts;
pub mod data;
pub mod filter;
pub mod range;
pub mod ratings;
pub mod service;
pub mod summary;

pub use charts::{
    build_distribution, build_employee_leaderboard, build_form_breakdown, build_rating_trend,
    build_timeline, DailyCount, DistributionBucket, EmployeeRatingSummary, FormCount,
    RatingDistribution, RatingTrendPoint,
};
pub use data::ReportData;
pub use filter::{filter_submissions, EmployeeSelection, FormSelection, ReportFilter};
pub use range::{DateRange, DateRangePreset, TimeWindow};
pub use ratings::{extract_ratings, included_ratings, RatingKind, RatingSample};
pub use service::ReportService;
pub use summary::{build_report, ReportSummary};
