//! Date-range selection for reports.
//!
//! Presets are computed from "now" at day granularity in the report
//! timezone; custom ranges cover whole days, end day included.

use std::str::FromStr;

use chrono::{DateTime, Days, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use reviewdesk_core::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum DateRangePreset {
    #[serde(rename = "7days")]
    Last7Days,
    #[serde(rename = "30days")]
    Last30Days,
    #[serde(rename = "6months")]
    Last6Months,
    #[default]
    #[serde(rename = "all")]
    All,
}

impl DateRangePreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateRangePreset::Last7Days => "7days",
            DateRangePreset::Last30Days => "30days",
            DateRangePreset::Last6Months => "6months",
            DateRangePreset::All => "all",
        }
    }
}

impl FromStr for DateRangePreset {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "7days" => Ok(DateRangePreset::Last7Days),
            "30days" => Ok(DateRangePreset::Last30Days),
            "6months" => Ok(DateRangePreset::Last6Months),
            "" | "all" => Ok(DateRangePreset::All),
            other => Err(AppError::InvalidInput(format!(
                "Unknown date range '{}'. Expected one of: 7days, 30days, 6months, all",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    Preset(DateRangePreset),
    /// Inclusive calendar days in the report timezone
    Custom { start: NaiveDate, end: NaiveDate },
}

impl Default for DateRange {
    fn default() -> Self {
        DateRange::Preset(DateRangePreset::All)
    }
}

/// Bounds resolved to UTC. `None` means unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Both bounds are inclusive.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| at >= start) && self.end.map_or(true, |end| at <= end)
    }
}

impl DateRange {
    pub fn custom(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if start > end {
            return Err(AppError::InvalidInput(format!(
                "Start date {} is after end date {}",
                start, end
            )));
        }
        Ok(DateRange::Custom { start, end })
    }

    /// Parse a `YYYY-MM-DD` pair.
    pub fn parse_custom(start: &str, end: &str) -> Result<Self, AppError> {
        let parse = |label: &str, value: &str| {
            NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
                AppError::InvalidInput(format!(
                    "Invalid {} date '{}', expected YYYY-MM-DD",
                    label, value
                ))
            })
        };
        Self::custom(parse("start", start)?, parse("end", end)?)
    }

    /// Range from request parameters. A `start`/`end` pair takes precedence
    /// over the preset name; one without the other is rejected.
    pub fn from_params(
        preset: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Self, AppError> {
        match (start, end) {
            (Some(start), Some(end)) => Self::parse_custom(start, end),
            (None, None) => Ok(DateRange::Preset(preset.unwrap_or("").parse()?)),
            _ => Err(AppError::InvalidInput(
                "Custom ranges need both start and end".to_string(),
            )),
        }
    }

    /// Resolve to concrete UTC bounds relative to `now`.
    pub fn window(&self, now: DateTime<Utc>, tz: Tz) -> TimeWindow {
        let today = now.with_timezone(&tz).date_naive();

        match self {
            DateRange::Preset(DateRangePreset::All) => TimeWindow::unbounded(),
            DateRange::Preset(DateRangePreset::Last7Days) => TimeWindow {
                start: today.checked_sub_days(Days::new(7)).map(|d| start_of_day(d, tz)),
                end: None,
            },
            DateRange::Preset(DateRangePreset::Last30Days) => TimeWindow {
                start: today.checked_sub_days(Days::new(30)).map(|d| start_of_day(d, tz)),
                end: None,
            },
            DateRange::Preset(DateRangePreset::Last6Months) => TimeWindow {
                start: today.checked_sub_months(Months::new(6)).map(|d| start_of_day(d, tz)),
                end: None,
            },
            DateRange::Custom { start, end } => TimeWindow {
                start: Some(start_of_day(*start, tz)),
                end: end_of_day(*end, tz),
            },
        }
    }
}

fn local_to_utc(naive: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        // Wall time skipped by a DST jump; treat it as UTC.
        LocalResult::None => tz.from_utc_datetime(&naive).with_timezone(&Utc),
    }
}

fn start_of_day(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    local_to_utc(date.and_time(NaiveTime::MIN), tz)
}

/// Last millisecond of `date` (23:59:59.999 local).
fn end_of_day(date: NaiveDate, tz: Tz) -> Option<DateTime<Utc>> {
    date.succ_opt()
        .map(|next| start_of_day(next, tz) - chrono::Duration::milliseconds(1))
}
