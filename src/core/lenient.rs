//! Tolerant conversions for upstream text nodes. A value that does not parse
//! becomes `None`; nothing here returns an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn parse_int(value: Option<&str>) -> Option<i32> {
    non_blank(value)?.parse().ok()
}

pub fn parse_decimal(value: Option<&str>) -> Option<Decimal> {
    let raw = non_blank(value)?.replace(',', "");
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .ok()
}

pub fn parse_bool(value: Option<&str>) -> Option<bool> {
    let raw = non_blank(value)?;
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Wall-clock value as written; an explicit offset or `Z` is dropped rather
/// than applied. A bare date means midnight.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let raw = value.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

pub fn parse_optional_datetime(value: Option<&str>) -> Option<NaiveDateTime> {
    value.and_then(parse_datetime)
}
