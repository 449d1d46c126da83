//! Epoch <-> calendar conversion and the fixed local-time rule.
//!
//! Epochs are signed seconds since 1970-01-01T00:00:00 (proleptic Gregorian,
//! no leap seconds). Conversion is table driven: whole years are unrolled one
//! at a time from 1970, then whole months from January.

use chrono::{Datelike, Days, NaiveDate, Weekday};

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_DAY: i64 = 86_400;
const EPOCH_YEAR: i32 = 1970;
/// 1970-01-01 was a Thursday (Sunday = 0).
const EPOCH_WEEKDAY: i64 = 4;

const DAYS_IN_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

pub const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Broken-down time of one epoch value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CalendarFields {
    /// 0..=59
    pub second: u8,
    /// 0..=59
    pub minute: u8,
    /// 0..=23
    pub hour: u8,
    /// 0..=6, 0 = Sunday
    pub weekday: u8,
    /// 1..=31
    pub day: u8,
    /// 0..=11, 0 = January
    pub month: u8,
    /// Full year, e.g. 2020.
    pub year: i32,
}

impl CalendarFields {
    pub fn day_name(&self) -> &'static str {
        DAY_NAMES[self.weekday as usize % DAY_NAMES.len()]
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.month as usize % MONTH_NAMES.len()]
    }
}

pub const fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Days in `month` (0-based) of `year`.
pub const fn days_in_month(year: i32, month: u8) -> u8 {
    if month == 1 && is_leap_year(year) {
        29
    } else {
        DAYS_IN_MONTH[month as usize % 12]
    }
}

const fn days_in_year(year: i32) -> i64 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Splits an epoch into calendar fields.
pub fn decode(epoch: i64) -> CalendarFields {
    let mut days = epoch.div_euclid(SECONDS_PER_DAY);
    let secs_of_day = epoch.rem_euclid(SECONDS_PER_DAY);

    let weekday = (days + EPOCH_WEEKDAY).rem_euclid(7) as u8;

    let mut year = EPOCH_YEAR;
    if days >= 0 {
        while days >= days_in_year(year) {
            days -= days_in_year(year);
            year += 1;
        }
    } else {
        while days < 0 {
            year -= 1;
            days += days_in_year(year);
        }
    }

    let mut month = 0u8;
    while days >= days_in_month(year, month) as i64 {
        days -= days_in_month(year, month) as i64;
        month += 1;
    }

    CalendarFields {
        second: (secs_of_day % SECONDS_PER_MINUTE) as u8,
        minute: ((secs_of_day % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE) as u8,
        hour: (secs_of_day / SECONDS_PER_HOUR) as u8,
        weekday,
        day: days as u8 + 1,
        month,
        year,
    }
}

/// Inverse of [`decode`]. `weekday` is ignored; it is implied by the date.
pub fn encode(fields: &CalendarFields) -> i64 {
    let days = date_to_days(fields.year, fields.month, fields.day);

    days * SECONDS_PER_DAY
        + fields.hour as i64 * SECONDS_PER_HOUR
        + fields.minute as i64 * SECONDS_PER_MINUTE
        + fields.second as i64
}

fn date_to_days(year: i32, month: u8, day: u8) -> i64 {
    let mut days = 0i64;
    if year >= EPOCH_YEAR {
        for y in EPOCH_YEAR..year {
            days += days_in_year(y);
        }
    } else {
        for y in year..EPOCH_YEAR {
            days -= days_in_year(y);
        }
    }
    for m in 0..month.min(11) {
        days += days_in_month(year, m) as i64;
    }
    days + day.max(1) as i64 - 1
}

/// Days since the epoch of a chrono date.
fn days_of(date: NaiveDate) -> i64 {
    date_to_days(date.year(), date.month0() as u8, date.day() as u8)
}

/// Last Sunday of `month` (1-based).
fn last_sunday(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()?;
    last.checked_sub_days(Days::new(last.weekday().num_days_from_sunday().into()))
}

/// Daylight-saving schedules the watch knows about. Both add one hour.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DstRule {
    /// Last Sunday of March 01:00 UTC until last Sunday of October 01:00 UTC.
    EuropeanUnion,
    /// Second Sunday of March 02:00 standard time until first Sunday of
    /// November 02:00 daylight time.
    UnitedStates,
}

const DST_SHIFT_SECS: i64 = SECONDS_PER_HOUR;
const MARCH: u32 = 3;
const OCTOBER: u32 = 10;
const NOVEMBER: u32 = 11;

impl DstRule {
    /// UTC instants `[start, end)` of the daylight period in `year`.
    fn window_utc(self, year: i32, utc_offset_secs: i64) -> Option<(i64, i64)> {
        match self {
            Self::EuropeanUnion => {
                let start = last_sunday(year, MARCH)?;
                let end = last_sunday(year, OCTOBER)?;
                Some((
                    days_of(start) * SECONDS_PER_DAY + SECONDS_PER_HOUR,
                    days_of(end) * SECONDS_PER_DAY + SECONDS_PER_HOUR,
                ))
            }
            Self::UnitedStates => {
                let start = NaiveDate::from_weekday_of_month_opt(year, MARCH, Weekday::Sun, 2)?;
                let end = NaiveDate::from_weekday_of_month_opt(year, NOVEMBER, Weekday::Sun, 1)?;
                let two_am = 2 * SECONDS_PER_HOUR;
                Some((
                    days_of(start) * SECONDS_PER_DAY + two_am - utc_offset_secs,
                    days_of(end) * SECONDS_PER_DAY + two_am - utc_offset_secs - DST_SHIFT_SECS,
                ))
            }
        }
    }
}

/// Fixed offset from UTC plus an optional daylight-saving rule.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TzRule {
    pub utc_offset_secs: i32,
    pub dst: Option<DstRule>,
}

impl TzRule {
    pub const UTC: Self = Self {
        utc_offset_secs: 0,
        dst: None,
    };

    /// CET/CEST.
    pub const CENTRAL_EUROPE: Self = Self {
        utc_offset_secs: 3_600,
        dst: Some(DstRule::EuropeanUnion),
    };

    pub const fn fixed(utc_offset_secs: i32) -> Self {
        Self {
            utc_offset_secs,
            dst: None,
        }
    }

    pub const fn with_dst(mut self, dst: DstRule) -> Self {
        self.dst = Some(dst);
        self
    }

    pub fn dst_active(&self, utc_epoch: i64) -> bool {
        let Some(rule) = self.dst else {
            return false;
        };
        let offset = self.utc_offset_secs as i64;
        let year = decode(utc_epoch + offset).year;
        rule.window_utc(year, offset)
            .is_some_and(|(start, end)| (start..end).contains(&utc_epoch))
    }

    /// Local epoch for a UTC epoch; decode the result to get wall-clock fields.
    pub fn to_local(&self, utc_epoch: i64) -> i64 {
        let dst = if self.dst_active(utc_epoch) {
            DST_SHIFT_SECS
        } else {
            0
        };
        utc_epoch + self.utc_offset_secs as i64 + dst
    }
}

impl Default for TzRule {
    fn default() -> Self {
        Self::CENTRAL_EUROPE
    }
}
