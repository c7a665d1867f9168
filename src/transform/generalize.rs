//! Generalization techniques
//!
//! Precision reduction: exact dates become year / month-year /
//! quarter-year, numbers become bucket intervals. The functions return
//! `None` for unparseable input; the dispatcher applies the configured
//! parse-failure policy.

use chrono::{DateTime, Datelike, NaiveDate};

/// Date generalization level
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateGranularity {
    /// Year only, e.g. `1984`
    Year,
    /// Month and year, e.g. `1984-02`
    MonthYear,
    /// Quarter and year, e.g. `Q1 1984`
    QuarterYear,
}

impl DateGranularity {
    /// Map the numeric generalization level (1/2/3) used at the API boundary
    pub fn from_level(level: u8) -> Self {
        match level {
            2 => Self::MonthYear,
            3 => Self::QuarterYear,
            _ => Self::Year,
        }
    }
}

/// Reduce a date's precision; `None` when the value isn't a recognized date
pub fn generalize_date(value: &str, granularity: DateGranularity) -> Option<String> {
    let date = parse_date(value.trim())?;
    Some(match granularity {
        DateGranularity::Year => format!("{:04}", date.year()),
        DateGranularity::MonthYear => format!("{:04}-{:02}", date.year(), date.month()),
        DateGranularity::QuarterYear => {
            let quarter = (date.month() - 1) / 3 + 1;
            format!("Q{quarter} {:04}", date.year())
        }
    })
}

/// Bucket a numeric value into `[floor, floor + range)`, rendered `"lo-hi"`
///
/// `None` when the value isn't numeric or the range is not positive.
pub fn generalize_numeric(value: &str, range_size: f64) -> Option<String> {
    if !(range_size > 0.0) || !range_size.is_finite() {
        return None;
    }
    let number: f64 = value.trim().parse().ok()?;
    let floor = (number / range_size).floor() * range_size;
    let ceil = floor + range_size;

    if range_size.fract() == 0.0 && floor.fract() == 0.0 {
        Some(format!("{}-{}", floor as i64, ceil as i64))
    } else {
        Some(format!("{floor}-{ceil}"))
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d %b %Y", "%B %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    None
}
