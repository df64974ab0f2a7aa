use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;

/// Default timezone used to decide which calendar day "today" is.
pub const DEFAULT_TZ: Tz = chrono_tz::UTC;

/// Converts a UTC instant to the calendar date it falls on in `tz`.
///
/// This is the single source of truth for turning a timestamp into a domain
/// date; due dates and streak anchors are always calendar dates.
pub fn local_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Today's calendar date in `tz`.
pub fn today_in(tz: Tz) -> NaiveDate {
    local_date_from_utc(Utc::now(), tz)
}

/// Calendar-day offset. Returns `None` past the end of the supported range.
pub fn add_days(date: NaiveDate, days: u64) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(days))
}

pub fn sub_days(date: NaiveDate, days: u64) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(days))
}

pub fn get_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        if let Some(next) = current.succ_opt() {
            current = next;
        } else {
            break;
        }
    }
    days
}
