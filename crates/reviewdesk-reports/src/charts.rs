//! Chart datasets built from filtered submissions.
//!
//! Submissions without `createdAt` or with an empty answer map never reach
//! any dataset. Days are bucketed by their UTC calendar date.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use reviewdesk_core::constants::{MAX_RATING, MIN_RATING};
use reviewdesk_core::models::{resolve_employee, FormRef, Submission};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::data::ReportData;
use crate::filter::EmployeeSelection;
use crate::ratings::{extract_ratings, included_ratings, rating_included, RatingKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DailyCount {
    #[schema(value_type = String, example = "2025-01-01")]
    pub date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RatingTrendPoint {
    #[schema(value_type = String, example = "2025-01-01")]
    pub date: NaiveDate,
    /// Average of every counted rating that day
    pub average: f64,
    pub general_average: Option<f64>,
    pub employee_average: Option<f64>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DistributionBucket {
    /// "1 Star", "2 Stars", ...
    pub label: String,
    pub stars: u8,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RatingDistribution {
    pub buckets: Vec<DistributionBucket>,
    pub total: usize,
    /// Overall average formatted to one decimal ("0.0" when empty)
    pub average: String,
}

/// Submissions per form (pie chart).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FormCount {
    pub form_id: String,
    pub form_name: String,
    pub count: usize,
}

/// Employee leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmployeeRatingSummary {
    /// Resolved employee id, or the stored selection text when unresolved
    pub employee_id: String,
    pub name: String,
    pub average: f64,
    pub count: usize,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn average(values: &[u8]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: u32 = values.iter().map(|v| u32::from(*v)).sum();
    Some(round2(f64::from(sum) / values.len() as f64))
}

fn star_label(stars: u8) -> String {
    if stars == 1 {
        "1 Star".to_string()
    } else {
        format!("{} Stars", stars)
    }
}

fn reportable<'a>(submissions: &'a [&'a Submission]) -> impl Iterator<Item = &'a Submission> + 'a {
    submissions.iter().copied().filter(|s| s.is_reportable())
}

fn day_of(submission: &Submission) -> Option<NaiveDate> {
    submission.created_at.map(|at| at.date_naive())
}

/// Submission count per day, sorted by date.
pub fn build_timeline(submissions: &[&Submission]) -> Vec<DailyCount> {
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for day in reportable(submissions).filter_map(day_of) {
        *per_day.entry(day).or_default() += 1;
    }
    per_day
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect()
}

/// Per-day rating averages. Days without a counted rating are dropped.
pub fn build_rating_trend(
    data: &ReportData,
    submissions: &[&Submission],
    selection: &EmployeeSelection,
) -> Vec<RatingTrendPoint> {
    let mut per_day: BTreeMap<NaiveDate, (Vec<u8>, Vec<u8>)> = BTreeMap::new();

    for submission in reportable(submissions) {
        let Some(day) = day_of(submission) else {
            continue;
        };
        let samples = included_ratings(data, submission, selection);
        if samples.is_empty() {
            continue;
        }
        let (general, employee) = per_day.entry(day).or_default();
        for sample in samples {
            match sample.kind {
                RatingKind::General => general.push(sample.stars),
                RatingKind::Employee => employee.push(sample.stars),
            }
        }
    }

    per_day
        .into_iter()
        .filter_map(|(date, (general, employee))| {
            let all: Vec<u8> = general.iter().chain(employee.iter()).copied().collect();
            Some(RatingTrendPoint {
                date,
                average: average(&all)?,
                general_average: average(&general),
                employee_average: average(&employee),
                count: all.len(),
            })
        })
        .collect()
}

/// Star histogram over buckets 1..=5 with the overall average.
pub fn build_distribution(
    data: &ReportData,
    submissions: &[&Submission],
    selection: &EmployeeSelection,
) -> RatingDistribution {
    let mut counts = [0usize; MAX_RATING as usize];
    let mut sum = 0u32;
    let mut total = 0usize;

    for submission in reportable(submissions) {
        for sample in included_ratings(data, submission, selection) {
            counts[usize::from(sample.stars - MIN_RATING)] += 1;
            sum += u32::from(sample.stars);
            total += 1;
        }
    }

    let average = if total == 0 {
        "0.0".to_string()
    } else {
        format!("{:.1}", f64::from(sum) / total as f64)
    };

    RatingDistribution {
        buckets: (MIN_RATING..=MAX_RATING)
            .map(|stars| DistributionBucket {
                label: star_label(stars),
                stars,
                count: counts[usize::from(stars - MIN_RATING)],
            })
            .collect(),
        total,
        average,
    }
}

/// Submission count per form, largest first.
pub fn build_form_breakdown(data: &ReportData, submissions: &[&Submission]) -> Vec<FormCount> {
    let mut counts: HashMap<&str, (String, usize)> = HashMap::new();

    for submission in reportable(submissions) {
        let form_id = submission.form_id();
        let entry = counts.entry(form_id).or_insert_with(|| {
            let name = data
                .form(form_id)
                .map(|f| f.name.clone())
                .or_else(|| match &submission.form_id {
                    FormRef::Populated(stub) => stub.name.clone(),
                    FormRef::Id(_) => None,
                })
                .unwrap_or_else(|| form_id.to_string());
            (name, 0)
        });
        entry.1 += 1;
    }

    let mut rows: Vec<FormCount> = counts
        .into_iter()
        .map(|(form_id, (form_name, count))| FormCount {
            form_id: form_id.to_string(),
            form_name,
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.form_name.cmp(&b.form_name)));
    rows
}

/// Average employee rating per employee, best first.
///
/// Unfiltered and `all` rank every employee; a specific selection ranks only
/// that employee.
pub fn build_employee_leaderboard(
    data: &ReportData,
    submissions: &[&Submission],
    selection: &EmployeeSelection,
) -> Vec<EmployeeRatingSummary> {
    let scope = match selection {
        EmployeeSelection::Employee(_) => selection.clone(),
        _ => EmployeeSelection::All,
    };
    let mut per_employee: HashMap<String, (String, Vec<u8>)> = HashMap::new();

    for submission in reportable(submissions) {
        let samples = extract_ratings(submission, data.form_of(submission));
        for sample in samples {
            if sample.kind != RatingKind::Employee || !rating_included(data, &sample, &scope) {
                continue;
            }
            let Some(stored) = sample.employee_value.as_deref() else {
                continue;
            };
            let (id, name) = match resolve_employee(&data.employees, stored) {
                Some(employee) => (employee.id.clone(), employee.name.clone()),
                None => (stored.to_string(), stored.to_string()),
            };
            per_employee
                .entry(id)
                .or_insert_with(|| (name, Vec::new()))
                .1
                .push(sample.stars);
        }
    }

    let mut rows: Vec<EmployeeRatingSummary> = per_employee
        .into_iter()
        .filter_map(|(employee_id, (name, stars))| {
            Some(EmployeeRatingSummary {
                average: average(&stars)?,
                count: stars.len(),
                employee_id,
                name,
            })
        })
        .collect();
    rows.sort_by(|a, b| {
        b.average
            .total_cmp(&a.average)
            .then_with(|| b.count.cmp(&a.count))
            .then_with(|| a.name.cmp(&b.name))
    });
    rows
}
