//! "Time elapsed" column: how long ago a load was entered.
//!
//! TruckStop stamps `Entered` in US Mountain Time (America/Denver) without an
//! offset, so the wall clock is converted using US daylight-saving rules.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};

const MOUNTAIN_STANDARD_OFFSET_HOURS: i64 = -7;
const MOUNTAIN_DAYLIGHT_OFFSET_HOURS: i64 = -6;

fn nth_sunday(year: i32, month: u32, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Sun, n)
}

/// DST runs from 02:00 on the second Sunday of March to 02:00 on the first
/// Sunday of November, both in local wall-clock time.
pub fn is_mountain_daylight_time(local: NaiveDateTime) -> bool {
    let year = local.year();
    let two_am = NaiveTime::from_hms_opt(2, 0, 0).unwrap_or_default();
    match (nth_sunday(year, 3, 2), nth_sunday(year, 11, 1)) {
        (Some(start), Some(end)) => local >= start.and_time(two_am) && local < end.and_time(two_am),
        _ => false,
    }
}

/// Converts a Mountain Time wall clock to UTC.
pub fn mountain_to_utc(local: NaiveDateTime) -> DateTime<Utc> {
    let offset_hours = if is_mountain_daylight_time(local) {
        MOUNTAIN_DAYLIGHT_OFFSET_HOURS
    } else {
        MOUNTAIN_STANDARD_OFFSET_HOURS
    };
    (local - Duration::hours(offset_hours)).and_utc()
}

/// `SSs` under a minute, `MM:SS` under an hour, then total minutes as `MMM:00`.
pub fn format_elapsed(seconds: i64) -> String {
    let seconds = seconds.max(0);
    if seconds < 60 {
        format!("{:02}s", seconds)
    } else if seconds < 3600 {
        format!("{:02}:{:02}", seconds / 60, seconds % 60)
    } else {
        format!("{:02}:00", seconds / 60)
    }
}

pub fn elapsed_since(entered: NaiveDateTime, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(mountain_to_utc(entered));
    format_elapsed(diff.num_seconds())
}
