use std::cell::RefCell;

use chrono::{Datelike, TimeZone};
use rust_decimal::{prelude::ToPrimitive, Decimal};
pub use time::Date;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Month,
    OffsetDateTime, UtcOffset,
};

pub type StaticDateFormat<'a> =
    &'static [time::format_description::BorrowedFormatItem<'a>];

pub const STANDARD_DATE_FORMAT: StaticDateFormat =
    format_description!("[year]-[month]-[day]");

// Rate tables exported from some sources use slashes.
pub const SLASH_DATE_FORMAT: StaticDateFormat =
    format_description!("[year]/[month]/[day]");

pub const STANDARD_DATETIME_FORMAT: StaticDateFormat =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

pub fn parse_standard_date(date_str: &str) -> Result<Date, time::error::Parse> {
    Date::parse(date_str, STANDARD_DATE_FORMAT)
}

/// Accepts either YYYY-MM-DD or YYYY/MM/DD.
pub fn parse_rate_date(date_str: &str) -> Result<Date, time::error::Parse> {
    let trimmed = date_str.trim();
    if trimmed.contains('/') {
        Date::parse(trimmed, SLASH_DATE_FORMAT)
    } else {
        parse_standard_date(trimmed)
    }
}

/// Decides the calendar day (and year) an exchange timestamp falls on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TradeTimeZone {
    /// Every instant is read at the same offset (eg. UTC).
    Fixed(UtcOffset),
    /// The system's local zone. Each instant gets the offset in force at that
    /// instant, so daylight saving time is respected.
    Local,
}

impl Default for TradeTimeZone {
    fn default() -> Self {
        TradeTimeZone::Fixed(UtcOffset::UTC)
    }
}

impl TradeTimeZone {
    pub fn offset_at(&self, instant: &OffsetDateTime) -> Result<UtcOffset, String> {
        match self {
            TradeTimeZone::Fixed(offset) => Ok(*offset),
            TradeTimeZone::Local => local_utc_offset_at(instant),
        }
    }

    /// Expresses `instant` in the offset this zone has at that instant.
    pub fn localize(&self, instant: OffsetDateTime) -> Result<OffsetDateTime, String> {
        Ok(instant.to_offset(self.offset_at(&instant)?))
    }
}

/// Converts a (possibly fractional) unix timestamp, in seconds, into an
/// instant in `tz`. Sub-nanosecond digits are truncated.
pub fn unix_timestamp_to_instant(
    secs: &Decimal,
    tz: TradeTimeZone,
) -> Result<OffsetDateTime, String> {
    let nanos = secs
        .checked_mul(Decimal::from(1_000_000_000))
        .ok_or_else(|| format!("Timestamp {} is out of range", secs))?
        .trunc()
        .to_i128()
        .ok_or_else(|| format!("Timestamp {} is out of range", secs))?;
    let dt = OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .map_err(|e| format!("Timestamp {} is out of range: {}", secs, e))?;
    tz.localize(dt)
}

/// Parses an RFC 3339 instant (eg. 2018-04-04T19:58:01.138-05:00), and
/// expresses it in `tz`.
pub fn parse_rfc3339_instant(
    s: &str,
    tz: TradeTimeZone,
) -> Result<OffsetDateTime, String> {
    let dt = OffsetDateTime::parse(s.trim(), &Rfc3339).map_err(|e| e.to_string())?;
    tz.localize(dt)
}

pub fn to_pretty_datetime_string(dt: &OffsetDateTime) -> String {
    dt.format(STANDARD_DATETIME_FORMAT)
        .unwrap_or_else(|_| dt.to_string())
}

fn date_naive_to_date(dn: &chrono::NaiveDate) -> Date {
    Date::from_calendar_date(
        dn.year(),
        Month::December.nth_next(dn.month() as u8),
        dn.day() as u8,
    )
    .unwrap()
}

thread_local! {
    static TODAYS_DATE_FOR_TEST_TL: RefCell<Date> = RefCell::new(Date::MIN);
}

pub fn set_todays_date_for_test(d: Date) {
    TODAYS_DATE_FOR_TEST_TL.with_borrow_mut(|d_| *d_ = d);
}

pub fn today_local() -> Date {
    let test_date: Date = TODAYS_DATE_FOR_TEST_TL.with_borrow(|d| *d);
    if test_date != Date::MIN {
        return test_date;
    }
    let now = chrono::offset::Local::now();
    date_naive_to_date(&now.date_naive())
}

// UtcOffset::current_local_offset refuses to run on Linux in multi-threaded
// processes without the "unsound" cfg, so ask chrono instead.
pub fn local_utc_offset() -> Result<UtcOffset, time::error::ComponentRange> {
    let now = chrono::offset::Local::now();
    let offset = now.offset();
    UtcOffset::from_whole_seconds(-offset.utc_minus_local())
}

/// The local zone's offset at `instant`, rather than now.
pub fn local_utc_offset_at(instant: &OffsetDateTime) -> Result<UtcOffset, String> {
    let utc = chrono::DateTime::from_timestamp(instant.unix_timestamp(), 0)
        .ok_or_else(|| format!("{} is out of range for the local time zone", instant))?;
    let offset = chrono::offset::Local.offset_from_utc_datetime(&utc.naive_utc());
    UtcOffset::from_whole_seconds(offset.local_minus_utc()).map_err(|e| e.to_string())
}

// Used by both unit and integration tests
pub mod pub_testlib {
    use time::{Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, Time};

    pub fn doy_date(year: u32, day: i64) -> Date {
        Date::from_calendar_date(year as i32, Month::January, 1)
            .unwrap()
            .saturating_add(Duration::days(day))
    }

    /// Noon UTC on day-of-year `day` (0-based).
    pub fn doy_instant(year: u32, day: i64) -> OffsetDateTime {
        PrimitiveDateTime::new(doy_date(year, day), Time::from_hms(12, 0, 0).unwrap())
            .assume_utc()
    }
}
