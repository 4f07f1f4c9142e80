//! Calendar-day helpers in the service's configured local offset.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};

/// Local calendar day with its UTC bounds `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalDay {
    pub date: NaiveDate,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
}

pub fn offset_from_minutes(minutes: i32) -> FixedOffset {
    // Config validation keeps the value under one day
    FixedOffset::east_opt(minutes * 60).unwrap_or(Utc.fix())
}

pub fn local_date(at: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    at.with_timezone(&offset).date_naive()
}

pub fn day_bounds(date: NaiveDate, offset: FixedOffset) -> LocalDay {
    let midnight = date.and_time(NaiveTime::default());
    // A fixed offset has no gaps, so local midnight always maps to one instant
    let start_utc = (midnight - Duration::seconds(offset.local_minus_utc() as i64)).and_utc();
    LocalDay {
        date,
        start_utc,
        end_utc: start_utc + Duration::days(1),
    }
}

pub fn today(now: DateTime<Utc>, offset: FixedOffset) -> LocalDay {
    day_bounds(local_date(now, offset), offset)
}
