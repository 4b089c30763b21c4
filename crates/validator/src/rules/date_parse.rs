//! Free-form date parsing for the temporal rules.
//!
//! Accepted inputs, tried in order:
//!
//! - keywords: `now`, `today`, `midnight`, `tomorrow`, `yesterday`;
//! - unix timestamps: `@1700000000`;
//! - relative offsets: `+3 days`, `-1 week`, `2 hours ago`, `next month`,
//!   `last year`;
//! - RFC 3339 and RFC 2822;
//! - common layouts with an explicit offset;
//! - common naive date-time and date layouts, read as UTC, including the
//!   compact `20240131`.

use std::sync::LazyLock;

use chrono::{
    DateTime, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc,
};
use regex::Regex;

static RELATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:([+-]?\d+)|(next|last))\s*(sec|second|min|minute|hour|day|week|fortnight|month|year)s?(\s+ago)?$",
    )
    .unwrap()
});

const OFFSET_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M %z",
];

const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const DATE_LAYOUTS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%Y%m%d",
];

/// Parses `input` relative to the current time.
#[must_use]
pub fn parse_datetime(input: &str) -> Option<DateTime<Utc>> {
    parse_datetime_at(input, Utc::now())
}

/// Parses `input`, resolving keywords and relative offsets against `now`.
#[must_use]
pub fn parse_datetime_at(input: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();

    keyword(&lower, now)
        .or_else(|| timestamp(&lower))
        .or_else(|| relative(&lower, now))
        .or_else(|| absolute(trimmed))
}

fn keyword(input: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    match input {
        "now" => Some(now),
        "today" | "midnight" => Some(midnight),
        "tomorrow" => midnight.checked_add_days(Days::new(1)),
        "yesterday" => midnight.checked_sub_days(Days::new(1)),
        _ => None,
    }
}

fn timestamp(input: &str) -> Option<DateTime<Utc>> {
    let secs = input.strip_prefix('@')?.parse::<i64>().ok()?;
    DateTime::from_timestamp(secs, 0)
}

fn relative(input: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let caps = RELATIVE.captures(input)?;

    let mut amount: i64 = match (caps.get(1), caps.get(2)) {
        (Some(n), _) => n.as_str().parse().ok()?,
        (None, Some(word)) if word.as_str() == "last" => -1,
        _ => 1,
    };
    if caps.get(4).is_some() {
        amount = amount.checked_neg()?;
    }

    let delta = match &caps[3] {
        "sec" | "second" => TimeDelta::try_seconds(amount),
        "min" | "minute" => TimeDelta::try_minutes(amount),
        "hour" => TimeDelta::try_hours(amount),
        "day" => TimeDelta::try_days(amount),
        "week" => TimeDelta::try_weeks(amount),
        "fortnight" => TimeDelta::try_weeks(amount.checked_mul(2)?),
        "month" => return shift_months(now, amount),
        "year" => return shift_months(now, amount.checked_mul(12)?),
        _ => None,
    }?;
    now.checked_add_signed(delta)
}

fn shift_months(now: DateTime<Utc>, amount: i64) -> Option<DateTime<Utc>> {
    let months = Months::new(u32::try_from(amount.unsigned_abs()).ok()?);
    if amount >= 0 {
        now.checked_add_months(months)
    } else {
        now.checked_sub_months(months)
    }
}

fn absolute(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Utc));
    }
    OFFSET_LAYOUTS
        .iter()
        .find_map(|layout| DateTime::parse_from_str(input, layout).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            DATETIME_LAYOUTS
                .iter()
                .find_map(|layout| NaiveDateTime::parse_from_str(input, layout).ok())
                .map(|naive| naive.and_utc())
        })
        .or_else(|| {
            DATE_LAYOUTS
                .iter()
                .find_map(|layout| NaiveDate::parse_from_str(input, layout).ok())
                .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[rstest]
    #[case("2024-01-31", utc(2024, 1, 31, 0, 0, 0))]
    #[case("2024/01/31", utc(2024, 1, 31, 0, 0, 0))]
    #[case("01/31/2024", utc(2024, 1, 31, 0, 0, 0))]
    #[case("31.01.2024", utc(2024, 1, 31, 0, 0, 0))]
    #[case("January 31, 2024", utc(2024, 1, 31, 0, 0, 0))]
    #[case("31 Jan 2024", utc(2024, 1, 31, 0, 0, 0))]
    #[case("2024-01-31 13:45:10", utc(2024, 1, 31, 13, 45, 10))]
    #[case("2024-01-31T13:45", utc(2024, 1, 31, 13, 45, 0))]
    #[case("2024-01-31T13:45:10Z", utc(2024, 1, 31, 13, 45, 10))]
    #[case("2024-01-31T13:45:10+02:00", utc(2024, 1, 31, 11, 45, 10))]
    #[case("2024-01-31 13:45:10 +0100", utc(2024, 1, 31, 12, 45, 10))]
    #[case("Wed, 31 Jan 2024 13:45:10 +0000", utc(2024, 1, 31, 13, 45, 10))]
    #[case("20240131", utc(2024, 1, 31, 0, 0, 0))]
    #[case("@0", utc(1970, 1, 1, 0, 0, 0))]
    fn test_absolute_inputs(#[case] input: &str, #[case] expected: DateTime<Utc>) {
        assert_eq!(parse_datetime_at(input, now()), Some(expected));
    }

    #[rstest]
    #[case("now", utc(2024, 3, 15, 10, 30, 0))]
    #[case("Today", utc(2024, 3, 15, 0, 0, 0))]
    #[case("tomorrow", utc(2024, 3, 16, 0, 0, 0))]
    #[case("yesterday", utc(2024, 3, 14, 0, 0, 0))]
    #[case("+3 days", utc(2024, 3, 18, 10, 30, 0))]
    #[case("-1 week", utc(2024, 3, 8, 10, 30, 0))]
    #[case("2 hours ago", utc(2024, 3, 15, 8, 30, 0))]
    #[case("next month", utc(2024, 4, 15, 10, 30, 0))]
    #[case("last year", utc(2023, 3, 15, 10, 30, 0))]
    #[case("1 fortnight", utc(2024, 3, 29, 10, 30, 0))]
    fn test_relative_inputs(#[case] input: &str, #[case] expected: DateTime<Utc>) {
        assert_eq!(parse_datetime_at(input, now()), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("not a date")]
    #[case("2024-02-30")]
    #[case("2024-13-01")]
    #[case("31/31/2024")]
    #[case("@abc")]
    #[case("3 parsecs")]
    #[case("20241301")]
    #[case("1700000000")]
    fn test_rejected_inputs(#[case] input: &str) {
        assert_eq!(parse_datetime_at(input, now()), None);
    }
}
