//! Timezone resolution
//!
//! A descriptor is either offset notation (`UTC`, `UTC+3`, `UTC-5:30`) or an
//! IANA identifier (`Europe/Moscow`). Offset notation is matched by its `UTC`
//! prefix, case-insensitively.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;
use std::sync::OnceLock;

use crate::core::BotError;

fn offset_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^UTC(?:([+-])?(\d{1,2})(?::(\d{2}))?)?$").expect("offset pattern is valid")
    })
}

/// Parse offset notation; a missing sign means positive
pub fn parse_offset(text: &str) -> Result<FixedOffset, BotError> {
    let normalized = text.trim().to_uppercase();
    let invalid = || BotError::InvalidFormat(format!("'{}' is not a UTC offset", text.trim()));

    let caps = offset_pattern().captures(&normalized).ok_or_else(invalid)?;
    let Some(hours) = caps.get(2) else {
        return Ok(Utc.fix());
    };

    let hours: i32 = hours.as_str().parse().map_err(|_| invalid())?;
    let minutes: i32 = match caps.get(3) {
        Some(m) => m.as_str().parse().map_err(|_| invalid())?,
        None => 0,
    };
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    let sign = if caps.get(1).map(|s| s.as_str()) == Some("-") { -1 } else { 1 };
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Render an offset as `UTC±H[:MM]`
pub fn describe_offset(offset: FixedOffset) -> String {
    let total = offset.local_minus_utc();
    let sign = if total < 0 { '-' } else { '+' };
    let hours = total.abs() / 3600;
    let minutes = (total.abs() % 3600) / 60;
    if minutes == 0 {
        format!("UTC{sign}{hours}")
    } else {
        format!("UTC{sign}{hours}:{minutes:02}")
    }
}

/// Canonical offset string for a stored descriptor
///
/// Offset notation passes through (uppercased). IANA zones render their
/// offset at `now`, so DST zones report the current offset. Anything else is
/// returned unchanged.
pub fn describe(descriptor: &str, now: DateTime<Utc>) -> String {
    if descriptor.to_uppercase().starts_with("UTC") {
        return descriptor.to_uppercase();
    }
    match descriptor.trim().parse::<Tz>() {
        Ok(tz) => Zone::Named(tz).describe(now),
        Err(_) => descriptor.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Zone {
    Fixed(FixedOffset),
    Named(Tz),
}

impl Zone {
    pub fn utc() -> Self {
        Zone::Fixed(Utc.fix())
    }

    pub fn parse(descriptor: &str) -> Result<Self, BotError> {
        let trimmed = descriptor.trim();
        if trimmed.to_uppercase().starts_with("UTC") {
            return parse_offset(trimmed).map(Zone::Fixed);
        }
        trimmed
            .parse::<Tz>()
            .map(Zone::Named)
            .map_err(|_| BotError::InvalidFormat(format!("unknown timezone '{trimmed}'")))
    }

    pub fn offset_at(&self, instant: DateTime<Utc>) -> FixedOffset {
        match self {
            Zone::Fixed(offset) => *offset,
            Zone::Named(tz) => instant.with_timezone(tz).offset().fix(),
        }
    }

    pub fn describe(&self, now: DateTime<Utc>) -> String {
        describe_offset(self.offset_at(now))
    }

    pub fn to_local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset_at(instant))
    }

    pub fn naive_local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        self.to_local(instant).naive_local()
    }

    /// Resolve a wall-clock time in this zone
    ///
    /// Ambiguous times (DST fall-back) pick the earlier instant; times that
    /// do not exist (spring-forward gap) yield `None`.
    pub fn from_local(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Zone::Fixed(offset) => offset
                .from_local_datetime(&local)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
            Zone::Named(tz) => tz
                .from_local_datetime(&local)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    /// First instant of `date` in this zone
    ///
    /// Where DST starts at midnight the day begins at the first wall-clock
    /// minute that exists.
    pub fn start_of_day(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        (0..24 * 60)
            .map(|minute| midnight + Duration::minutes(minute))
            .find_map(|local| self.from_local(local))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summer() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap()
    }

    fn winter() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_offset_forms() {
        assert_eq!(parse_offset("UTC").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_offset("UTC+3").unwrap().local_minus_utc(), 3 * 3600);
        assert_eq!(parse_offset("utc-5").unwrap().local_minus_utc(), -5 * 3600);
        assert_eq!(parse_offset("UTC+5:30").unwrap().local_minus_utc(), 5 * 3600 + 1800);
        assert_eq!(parse_offset("UTC-3:30").unwrap().local_minus_utc(), -(3 * 3600 + 1800));
        assert_eq!(parse_offset(" UTC7 ").unwrap().local_minus_utc(), 7 * 3600);
    }

    #[test]
    fn test_parse_offset_rejects_malformed() {
        for bad in ["UTC+", "UTC+x", "UTC+3:5", "UTC+24", "UTC+3:60", "GMT+3", "UTC++3", "+3", ""] {
            assert!(
                matches!(parse_offset(bad), Err(BotError::InvalidFormat(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_canonical_offsets_round_trip() {
        for s in ["UTC+3", "UTC-5:30", "UTC+0", "UTC+5:45", "UTC-12", "UTC+14"] {
            assert_eq!(describe_offset(parse_offset(s).unwrap()), s);
        }
    }

    #[test]
    fn test_describe_passes_offset_notation_through() {
        assert_eq!(describe("utc+3", summer()), "UTC+3");
        assert_eq!(describe("UTC", summer()), "UTC");
    }

    #[test]
    fn test_describe_named_zone_uses_current_offset() {
        assert_eq!(describe("Europe/Berlin", summer()), "UTC+2");
        assert_eq!(describe("Europe/Berlin", winter()), "UTC+1");
        assert_eq!(describe("Asia/Kolkata", winter()), "UTC+5:30");
        assert_eq!(describe("America/St_Johns", winter()), "UTC-3:30");
        assert_eq!(describe("Mars/Olympus", winter()), "Mars/Olympus");
    }

    #[test]
    fn test_zone_parse() {
        assert_eq!(Zone::parse("UTC+3").unwrap(), Zone::Fixed(FixedOffset::east_opt(10800).unwrap()));
        assert_eq!(Zone::parse("Europe/Moscow").unwrap(), Zone::Named(chrono_tz::Europe::Moscow));
        assert!(Zone::parse("Nowhere/Special").is_err());
        assert!(Zone::parse("UTC+abc").is_err());
    }

    #[test]
    fn test_from_local_dst_gap_and_overlap() {
        let berlin = Zone::Named(chrono_tz::Europe::Berlin);
        let gap = chrono::NaiveDate::from_ymd_opt(2025, 3, 30)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        assert_eq!(berlin.from_local(gap), None);

        let overlap = chrono::NaiveDate::from_ymd_opt(2025, 10, 26)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        // earlier of the two instants is still on summer time (UTC+2)
        assert_eq!(
            berlin.from_local(overlap).unwrap(),
            Utc.with_ymd_and_hms(2025, 10, 26, 0, 30, 0).unwrap()
        );
    }
}
