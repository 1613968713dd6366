//! Local-day arithmetic.
//!
//! All day boundaries are computed in the configured fixed offset, never in
//! UTC, so a booking made just after local midnight lands on the right day.

use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Timelike, Utc,
};

pub const DAY_FORMAT: &str = "%d-%m-%Y";
pub const INVALID_DATE: &str = "Date: invalid format (must be DD-MM-YYYY)";

const QUARTER_MINUTES: u32 = 15;

pub trait Clock: Send + Sync {
    fn offset(&self) -> FixedOffset;
    fn now_utc(&self) -> DateTime<Utc>;

    fn now(&self) -> DateTime<FixedOffset> {
        self.now_utc().with_timezone(&self.offset())
    }
}

pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn offset(&self) -> FixedOffset {
        self.offset
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant.
pub struct FixedClock {
    offset: FixedOffset,
    instant: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(offset: FixedOffset, instant: DateTime<Utc>) -> Self {
        Self { offset, instant }
    }

    pub fn utc(instant: DateTime<Utc>) -> Self {
        Self::new(Utc.fix(), instant)
    }
}

impl Clock for FixedClock {
    fn offset(&self) -> FixedOffset {
        self.offset
    }

    fn now_utc(&self) -> DateTime<Utc> {
        self.instant
    }
}

/// Local midnight of a `DD-MM-YYYY` day.
pub fn parse_day(input: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let day = NaiveDate::parse_from_str(input.trim(), DAY_FORMAT).ok()?;
    local_midnight(day, offset)
}

pub fn local_midnight(day: NaiveDate, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    offset
        .from_local_datetime(&day.and_time(NaiveTime::MIN))
        .single()
}

/// `[local day start, +24h)` for the day containing `instant`.
pub fn day_bounds(instant: DateTime<Utc>, offset: FixedOffset) -> (DateTime<Utc>, DateTime<Utc>) {
    let local_day = instant.with_timezone(&offset).date_naive();
    let start = local_midnight(local_day, offset)
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or(instant);
    (start, start + Duration::hours(24))
}

/// `[first of month, first of next month)` in local time.
pub fn month_bounds(
    year: i32,
    month: u32,
    offset: FixedOffset,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((
        local_midnight(first, offset)?.with_timezone(&Utc),
        local_midnight(next, offset)?.with_timezone(&Utc),
    ))
}

/// Rounds up to the next quarter hour; on a boundary the time is unchanged.
///
/// Only the minute is considered: `minute + (15 - minute % 15) % 15`,
/// carrying into the hour. Seconds are left as given.
pub fn round_up_quarter(instant: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
    let minute = instant.with_timezone(&offset).minute();
    let extra = (QUARTER_MINUTES - minute % QUARTER_MINUTES) % QUARTER_MINUTES;
    instant + Duration::minutes(i64::from(extra))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn offset_hours(h: i32) -> FixedOffset {
        FixedOffset::east_opt(h * 3600).unwrap()
    }

    #[test]
    fn rounds_checkout_up_to_quarter_hours() {
        let z = Utc.fix();
        assert_eq!(
            round_up_quarter(utc("2024-03-01T14:07:00Z"), z),
            utc("2024-03-01T14:15:00Z")
        );
        assert_eq!(
            round_up_quarter(utc("2024-03-01T14:15:00Z"), z),
            utc("2024-03-01T14:15:00Z")
        );
        assert_eq!(
            round_up_quarter(utc("2024-03-01T14:59:00Z"), z),
            utc("2024-03-01T15:00:00Z")
        );
        assert_eq!(
            round_up_quarter(utc("2024-03-01T23:50:00Z"), z),
            utc("2024-03-02T00:00:00Z")
        );
    }

    #[test]
    fn rounding_keeps_seconds() {
        assert_eq!(
            round_up_quarter(utc("2024-03-01T14:07:30Z"), Utc.fix()),
            utc("2024-03-01T14:15:30Z")
        );
    }

    #[test]
    fn parses_day_month_year() {
        let day = parse_day("05-03-2024", offset_hours(1)).unwrap();
        assert_eq!(day.with_timezone(&Utc), utc("2024-03-04T23:00:00Z"));
        assert!(parse_day("2024-03-05", Utc.fix()).is_none());
        assert!(parse_day("31-02-2024", Utc.fix()).is_none());
        assert!(parse_day("", Utc.fix()).is_none());
    }

    #[test]
    fn day_bounds_ignore_time_of_day() {
        let (start, end) = day_bounds(utc("2024-03-05T17:42:00Z"), Utc.fix());
        assert_eq!(start, utc("2024-03-05T00:00:00Z"));
        assert_eq!(end, utc("2024-03-06T00:00:00Z"));
    }

    #[test]
    fn day_bounds_follow_the_local_offset() {
        // 00:30 local on the 6th is still the 5th in UTC
        let (start, end) = day_bounds(utc("2024-03-05T22:30:00Z"), offset_hours(2));
        assert_eq!(start, utc("2024-03-05T22:00:00Z"));
        assert_eq!(end, utc("2024-03-06T22:00:00Z"));
    }

    #[test]
    fn month_bounds_wrap_december() {
        let (start, end) = month_bounds(2024, 12, Utc.fix()).unwrap();
        assert_eq!(start, utc("2024-12-01T00:00:00Z"));
        assert_eq!(end, utc("2025-01-01T00:00:00Z"));
        assert!(month_bounds(2024, 13, Utc.fix()).is_none());
    }
}
