//! `/cash` argument parsing
//!
//! Periods run from their local start until now. Explicit dates use
//! `DD-MM-YY` or `DD.MM.YY` (two- or four-digit year, one separator kind per
//! date); a range `A - B` runs from the start of A to the end of B.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

use crate::core::BotError;
use crate::features::time::Zone;

/// Entries shown when `/cash` has no argument
pub const RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CashQuery {
    /// Latest entries, newest first
    Recent { limit: usize },
    /// Inclusive UTC bounds
    Range {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

const USAGE: &str = "day | week | month | year | 01-10-25 | 01-10-25 - 14-10-25";

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{1,2})([.-])(\d{1,2})([.-])(\d{2,4})$").expect("date pattern is valid")
    })
}

fn range_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{1,2}[.-]\d{1,2}[.-]\d{2,4})\s*-\s*(\d{1,2}[.-]\d{1,2}[.-]\d{2,4})$")
            .expect("range pattern is valid")
    })
}

/// Interpret the text after `/cash`; `None` or blank means recent entries
pub fn parse_cash_query(
    argument: Option<&str>,
    zone: &Zone,
    now: DateTime<Utc>,
) -> Result<CashQuery, BotError> {
    let arg = match argument.map(str::trim) {
        None | Some("") => return Ok(CashQuery::Recent { limit: RECENT_LIMIT }),
        Some(arg) => arg.to_lowercase(),
    };

    let today = zone.naive_local(now).date();
    let period_start = match arg.as_str() {
        "day" | "today" => Some(today),
        "week" => today.checked_sub_signed(Duration::days(today.weekday().num_days_from_monday() as i64)),
        "month" => today.with_day(1),
        "year" => NaiveDate::from_ymd_opt(today.year(), 1, 1),
        _ => None,
    };
    if let Some(start_date) = period_start {
        return Ok(CashQuery::Range {
            start: start_of_day(zone, start_date)?,
            end: now,
        });
    }

    if let Some(caps) = range_pattern().captures(&arg) {
        let first = parse_date(&caps[1])?;
        let last = parse_date(&caps[2])?;
        return Ok(CashQuery::Range {
            start: start_of_day(zone, first)?,
            end: end_of_day(zone, last)?,
        });
    }

    let day = parse_date(&arg)?;
    Ok(CashQuery::Range {
        start: start_of_day(zone, day)?,
        end: now,
    })
}

fn invalid() -> BotError {
    BotError::InvalidFormat(USAGE.to_string())
}

fn parse_date(text: &str) -> Result<NaiveDate, BotError> {
    let caps = date_pattern().captures(text).ok_or_else(invalid)?;
    if caps[2] != caps[4] {
        return Err(invalid());
    }
    let day: u32 = caps[1].parse().map_err(|_| invalid())?;
    let month: u32 = caps[3].parse().map_err(|_| invalid())?;
    let mut year: i32 = caps[5].parse().map_err(|_| invalid())?;
    if year < 100 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

fn start_of_day(zone: &Zone, date: NaiveDate) -> Result<DateTime<Utc>, BotError> {
    zone.start_of_day(date).ok_or_else(invalid)
}

fn end_of_day(zone: &Zone, date: NaiveDate) -> Result<DateTime<Utc>, BotError> {
    let last_ms = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).ok_or_else(invalid)?;
    zone.from_local(date.and_time(last_ms)).ok_or_else(invalid)
}
