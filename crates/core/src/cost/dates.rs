//! Time period parsing and Cost Explorer date windows.
//!
//! Cost Explorer treats the end date as exclusive, so every window here ends
//! on the day after the last day it covers.

use chrono::{Datelike, NaiveDate};

use crate::tool::{Result, ToolError};

use super::types::{CostWindow, Granularity, TimePeriod};

const MONTHS: [(&str, u32); 24] = [
    ("january", 1),
    ("jan", 1),
    ("february", 2),
    ("feb", 2),
    ("march", 3),
    ("mar", 3),
    ("april", 4),
    ("apr", 4),
    ("may", 5),
    ("june", 6),
    ("jun", 6),
    ("july", 7),
    ("jul", 7),
    ("august", 8),
    ("aug", 8),
    ("september", 9),
    ("sept", 9),
    ("sep", 9),
    ("october", 10),
    ("oct", 10),
    ("november", 11),
    ("nov", 11),
    ("december", 12),
    ("dec", 12),
];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Parses a free-form period such as `MONTHLY`, `this year` or `march_2024`.
///
/// A month name wins over the generic keywords. A month without a year uses
/// the year of `today`. Blank input means the current month.
pub fn parse_time_period(raw: &str, today: NaiveDate) -> Result<TimePeriod> {
    let lower = raw.trim().to_lowercase();
    if lower.is_empty() {
        return Ok(TimePeriod::Monthly);
    }

    let tokens: Vec<&str> = lower
        .split(|c: char| c.is_whitespace() || matches!(c, '_' | '-' | ',' | '/'))
        .filter(|t| !t.is_empty())
        .collect();

    if let Some(month) = tokens.iter().find_map(|t| month_number(t)) {
        let year = tokens
            .iter()
            .find_map(|t| parse_year(t))
            .unwrap_or_else(|| today.year());
        return Ok(TimePeriod::Month { year, month });
    }

    let has_any = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    if has_any(&["daily", "day", "today", "yesterday"]) {
        Ok(TimePeriod::Daily)
    } else if has_any(&["month", "mtd"]) {
        Ok(TimePeriod::Monthly)
    } else if has_any(&["year", "annual", "ytd"]) {
        Ok(TimePeriod::Yearly)
    } else {
        Err(ToolError::InvalidInput(format!(
            "unsupported time period '{raw}', use DAILY, MONTHLY, YEARLY or a month such as 'March 2024'"
        )))
    }
}

/// Resolves a period into a Cost Explorer window.
///
/// On the first day of a month (or year) the running period has no data yet,
/// so the whole previous month (or year) is used instead. Daily windows are
/// always reported daily and yearly windows monthly.
pub fn cost_window(
    period: TimePeriod,
    requested: Granularity,
    today: NaiveDate,
) -> Result<CostWindow> {
    let (start, end, granularity, label) = match period {
        TimePeriod::Daily => (
            day_before(today)?,
            today,
            Granularity::Daily,
            "DAILY".to_string(),
        ),
        TimePeriod::Monthly if today.day() == 1 => {
            let (year, month) = previous_month(today.year(), today.month());
            (
                first_of_month(year, month)?,
                today,
                requested,
                "MONTHLY".to_string(),
            )
        }
        TimePeriod::Monthly => (
            first_of_month(today.year(), today.month())?,
            day_after(today)?,
            requested,
            "MONTHLY".to_string(),
        ),
        TimePeriod::Yearly => {
            let (start, end) = if today.month() == 1 && today.day() == 1 {
                (first_of_month(today.year() - 1, 1)?, today)
            } else {
                (first_of_month(today.year(), 1)?, day_after(today)?)
            };
            (start, end, Granularity::Monthly, "YEARLY".to_string())
        }
        TimePeriod::Month { year, month } => {
            let (next_year, next_month) = following_month(year, month);
            (
                first_of_month(year, month)?,
                first_of_month(next_year, next_month)?,
                requested,
                month_label(year, month),
            )
        }
    };

    Ok(CostWindow {
        start,
        end,
        granularity,
        label,
    })
}

/// Returns true when the period starts after `today`.
pub fn is_future_period(period: TimePeriod, today: NaiveDate) -> bool {
    match period {
        TimePeriod::Month { year, month } => (year, month) > (today.year(), today.month()),
        _ => false,
    }
}

/// Human label for a month, e.g. `March 2024`.
pub fn month_label(year: i32, month: u32) -> String {
    let name = MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("Unknown");
    format!("{name} {year}")
}

fn month_number(token: &str) -> Option<u32> {
    MONTHS
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, number)| *number)
}

fn parse_year(token: &str) -> Option<i32> {
    if token.len() == 4 && token.starts_with("20") && token.chars().all(|c| c.is_ascii_digit()) {
        token.parse().ok()
    } else {
        None
    }
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ToolError::InvalidInput(format!("invalid month {year}-{month:02}")))
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

fn following_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn day_before(date: NaiveDate) -> Result<NaiveDate> {
    date.pred_opt()
        .ok_or_else(|| ToolError::InvalidInput(format!("date out of range: {date}")))
}

fn day_after(date: NaiveDate) -> Result<NaiveDate> {
    date.succ_opt()
        .ok_or_else(|| ToolError::InvalidInput(format!("date out of range: {date}")))
}
