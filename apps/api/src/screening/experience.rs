//! Years-of-experience estimation and the experience score.
//!
//! Estimation sits behind [`ExperienceEstimator`] so a date-aware strategy can
//! replace the entry-count heuristic without touching the overall weighting.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};

use crate::models::resume::Experience;

/// Years credited per experience entry by the default estimator.
const YEARS_PER_ENTRY: f64 = 2.0;

const DAYS_PER_YEAR: f64 = 365.25;

/// Years accepted from free-text dates; anything else is treated as unparseable.
const PLAUSIBLE_YEARS: std::ops::RangeInclusive<i32> = 1900..=2100;

const OPEN_ENDED: &[&str] = &["present", "current", "now", "ongoing", "today"];

const MONTHS: &[&str] = &[
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Strategy for turning a work history into total years of experience.
pub trait ExperienceEstimator: Send + Sync {
    fn estimate_years(&self, experience: &[Experience]) -> f64;

    /// Short label used in logs and health output.
    fn name(&self) -> &'static str;
}

/// Credits a flat two years per entry, ignoring dates.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryCountEstimator;

impl ExperienceEstimator for EntryCountEstimator {
    fn estimate_years(&self, experience: &[Experience]) -> f64 {
        experience.len() as f64 * YEARS_PER_ENTRY
    }

    fn name(&self) -> &'static str {
        "entry_count"
    }
}

/// Parses free-text start/end dates and sums the union of the covered intervals.
///
/// A missing or "Present" end date runs to the reference date. Entries with an
/// unparseable start or end contribute nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRangeEstimator {
    reference_date: Option<NaiveDate>,
}

impl DateRangeEstimator {
    /// Pins "today" for open-ended roles.
    pub fn with_reference_date(reference_date: NaiveDate) -> Self {
        Self {
            reference_date: Some(reference_date),
        }
    }

    fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Utc::now().date_naive())
    }

    fn interval(&self, entry: &Experience) -> Option<(NaiveDate, NaiveDate)> {
        let start = parse_resume_date(entry.start_date.as_deref()?)?;
        let end = match entry.end_date.as_deref() {
            None => self.today(),
            Some(text) if is_open_ended(text) => self.today(),
            Some(text) => parse_resume_date(text)?,
        };
        (end >= start).then_some((start, end))
    }
}

impl ExperienceEstimator for DateRangeEstimator {
    fn estimate_years(&self, experience: &[Experience]) -> f64 {
        let mut intervals: Vec<(NaiveDate, NaiveDate)> =
            experience.iter().filter_map(|e| self.interval(e)).collect();
        intervals.sort();

        let mut merged: Vec<(NaiveDate, NaiveDate)> = Vec::with_capacity(intervals.len());
        for (start, end) in intervals {
            match merged.last_mut() {
                Some(last) if start <= last.1 => last.1 = last.1.max(end),
                _ => merged.push((start, end)),
            }
        }

        let days: i64 = merged
            .iter()
            .map(|(start, end)| (*end - *start).num_days())
            .sum();
        days as f64 / DAYS_PER_YEAR
    }

    fn name(&self) -> &'static str {
        "date_range"
    }
}

/// Which estimator the service is configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EstimatorKind {
    #[default]
    EntryCount,
    DateRange,
}

impl std::str::FromStr for EstimatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "entry_count" | "entries" => Ok(EstimatorKind::EntryCount),
            "date_range" | "dates" => Ok(EstimatorKind::DateRange),
            other => Err(format!("Unknown experience estimator: {other}")),
        }
    }
}

impl EstimatorKind {
    pub fn build(self) -> Arc<dyn ExperienceEstimator> {
        match self {
            EstimatorKind::EntryCount => Arc::new(EntryCountEstimator),
            EstimatorKind::DateRange => Arc::new(DateRangeEstimator::default()),
        }
    }
}

/// Experience score in 0 – 100. A missing or non-positive minimum is no requirement.
pub fn score_experience(total_years: f64, min_years: Option<i32>) -> f64 {
    let min_years = match min_years {
        Some(min) if min > 0 => min as f64,
        _ => return 100.0,
    };

    if total_years >= min_years {
        100.0
    } else {
        total_years / min_years * 100.0
    }
}

fn is_open_ended(text: &str) -> bool {
    let text = text.trim().to_lowercase();
    OPEN_ENDED.iter().any(|word| text == *word)
}

/// Best-effort parse of the date formats extraction tends to produce.
/// Month- and year-only dates resolve to the first day of the period.
fn parse_resume_date(text: &str) -> Option<NaiveDate> {
    parse_any_date(text.trim()).filter(|d| PLAUSIBLE_YEARS.contains(&d.year()))
}

fn parse_any_date(text: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }

    if let Some((a, b)) = text.split_once('-').or_else(|| text.split_once('/')) {
        let (a, b) = (a.trim(), b.trim());
        if let (Ok(x), Ok(y)) = (a.parse::<u32>(), b.parse::<u32>()) {
            // YYYY-MM or MM/YYYY
            let (year, month) = if a.len() == 4 { (x, y) } else { (y, x) };
            return NaiveDate::from_ymd_opt(year as i32, month, 1);
        }
    }

    let tokens: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || c == ',' || c == '.')
        .filter(|t| !t.is_empty())
        .collect();

    match tokens.as_slice() {
        [year] => {
            let year = year.parse::<i32>().ok()?;
            NaiveDate::from_ymd_opt(year, 1, 1)
        }
        [month, year] => {
            let month = month_from_name(month)?;
            NaiveDate::from_ymd_opt(year.parse().ok()?, month, 1)
        }
        _ => None,
    }
}

fn month_from_name(name: &str) -> Option<u32> {
    let prefix: String = name.to_lowercase().chars().take(3).collect();
    MONTHS
        .iter()
        .position(|m| *m == prefix)
        .map(|idx| idx as u32 + 1)
}
