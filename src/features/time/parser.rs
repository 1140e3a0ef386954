//! Free-text time expressions
//!
//! Accepted shapes (day/month separator may be `.` or `-`):
//! - `HH:MM`: today, or tomorrow once that time has passed
//! - `HH:MM DD.MM`: this year, or next year once that date has passed
//! - `HH:MM DD.MM.YYYY`: taken as-is, even when in the past

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use super::timezone::Zone;

/// The text is not a time expression; callers try the next interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("not a time expression")]
    Unparseable,
}

struct Patterns {
    time: Regex,
    day_month: Regex,
    day_month_year: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        time: Regex::new(r"^(\d{1,2}):(\d{2})$").expect("time pattern is valid"),
        day_month: Regex::new(r"^(\d{1,2})[.-](\d{1,2})$").expect("date pattern is valid"),
        day_month_year: Regex::new(r"^(\d{1,2})[.-](\d{1,2})[.-](\d{4})$")
            .expect("date pattern is valid"),
    })
}

/// Parse `text` as a time expression in `zone`, relative to `now`
pub fn parse_time_expression(
    text: &str,
    zone: &Zone,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, TimeParseError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let (time_token, date_token) = match tokens.as_slice() {
        [time] => (*time, None),
        [time, date] => (*time, Some(*date)),
        _ => return Err(TimeParseError::Unparseable),
    };

    let time = parse_clock(time_token)?;
    let today = zone.naive_local(now).date();

    let Some(date_token) = date_token else {
        let candidate = resolve(zone, today, time)?;
        if candidate > now {
            return Ok(candidate);
        }
        let tomorrow = today
            .checked_add_days(Days::new(1))
            .ok_or(TimeParseError::Unparseable)?;
        return resolve(zone, tomorrow, time);
    };

    if let Some(caps) = patterns().day_month.captures(date_token) {
        let day = number(&caps[1])?;
        let month = number(&caps[2])?;
        let this_year = NaiveDate::from_ymd_opt(today.year(), month, day)
            .ok_or(TimeParseError::Unparseable)?;
        let candidate = resolve(zone, this_year, time)?;
        if candidate > now {
            return Ok(candidate);
        }
        let next_year = NaiveDate::from_ymd_opt(today.year() + 1, month, day)
            .ok_or(TimeParseError::Unparseable)?;
        return resolve(zone, next_year, time);
    }

    if let Some(caps) = patterns().day_month_year.captures(date_token) {
        let day = number(&caps[1])?;
        let month = number(&caps[2])?;
        let year: i32 = caps[3].parse().map_err(|_| TimeParseError::Unparseable)?;
        let date =
            NaiveDate::from_ymd_opt(year, month, day).ok_or(TimeParseError::Unparseable)?;
        return resolve(zone, date, time);
    }

    Err(TimeParseError::Unparseable)
}

/// Parse a bare `HH:MM` token
pub fn parse_clock(token: &str) -> Result<NaiveTime, TimeParseError> {
    let caps = patterns()
        .time
        .captures(token)
        .ok_or(TimeParseError::Unparseable)?;
    NaiveTime::from_hms_opt(number(&caps[1])?, number(&caps[2])?, 0)
        .ok_or(TimeParseError::Unparseable)
}

fn number(digits: &str) -> Result<u32, TimeParseError> {
    digits.parse().map_err(|_| TimeParseError::Unparseable)
}

fn resolve(zone: &Zone, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>, TimeParseError> {
    zone.from_local(date.and_time(time))
        .ok_or(TimeParseError::Unparseable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn plus3() -> Zone {
        Zone::Fixed(FixedOffset::east_opt(3 * 3600).unwrap())
    }

    /// 2025-03-10 14:00 local in UTC+3
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 11, 0, 0).unwrap()
    }

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        FixedOffset::east_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_time_later_today() {
        assert_eq!(
            parse_time_expression("16:30", &plus3(), now()).unwrap(),
            local(2025, 3, 10, 16, 30)
        );
    }

    #[test]
    fn test_past_time_rolls_to_tomorrow() {
        assert_eq!(
            parse_time_expression("13:00", &plus3(), now()).unwrap(),
            local(2025, 3, 11, 13, 0)
        );
    }

    #[test]
    fn test_current_minute_rolls_to_tomorrow() {
        assert_eq!(
            parse_time_expression("14:00", &plus3(), now()).unwrap(),
            local(2025, 3, 11, 14, 0)
        );
    }

    #[test]
    fn test_rollover_uses_local_date_not_utc_date() {
        // 23:30 UTC on the 10th is already 02:30 on the 11th in UTC+3
        let late = Utc.with_ymd_and_hms(2025, 3, 10, 23, 30, 0).unwrap();
        assert_eq!(
            parse_time_expression("09:00", &plus3(), late).unwrap(),
            local(2025, 3, 11, 9, 0)
        );
    }

    #[test]
    fn test_day_month_this_year_and_rollover() {
        assert_eq!(
            parse_time_expression("13:00 20.03", &plus3(), now()).unwrap(),
            local(2025, 3, 20, 13, 0)
        );
        assert_eq!(
            parse_time_expression("13:00 05-03", &plus3(), now()).unwrap(),
            local(2026, 3, 5, 13, 0)
        );
    }

    #[test]
    fn test_full_date_is_not_rolled() {
        assert_eq!(
            parse_time_expression("08:15 01.02.2020", &plus3(), now()).unwrap(),
            local(2020, 2, 1, 8, 15)
        );
        assert_eq!(
            parse_time_expression("08:15 1-2-2030", &plus3(), now()).unwrap(),
            local(2030, 2, 1, 8, 15)
        );
    }

    #[test]
    fn test_out_of_range_components() {
        for bad in ["24:00", "12:60", "13:00 32.01", "13:00 10.13", "13:00 30.02", "13:00 00.05"] {
            assert_eq!(
                parse_time_expression(bad, &plus3(), now()),
                Err(TimeParseError::Unparseable),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_other_shapes_are_unparseable() {
        for bad in ["", "1630", "16:30 walk", "16:30 walk the dog", "+300", "16:30 05.03 extra", "16:3"] {
            assert_eq!(
                parse_time_expression(bad, &plus3(), now()),
                Err(TimeParseError::Unparseable),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_named_zone_dst() {
        let berlin = Zone::Named(chrono_tz::Europe::Berlin);
        let summer_now = Utc.with_ymd_and_hms(2025, 7, 1, 8, 0, 0).unwrap();
        // 12:00 CEST is 10:00 UTC
        assert_eq!(
            parse_time_expression("12:00", &berlin, summer_now).unwrap(),
            Utc.with_ymd_and_hms(2025, 7, 1, 10, 0, 0).unwrap()
        );
    }
}
