//! Week period bucketing.
//!
//! A single [`WeekPolicy`] decides on which weekday a period starts and how many
//! calendar days it covers. Goal lookups, report range queries, past-goal listing
//! and exports all go through it; no caller does its own weekday arithmetic.
//!
//! The default policy is a Monday start with a 6-day window (Mon–Sat). A reference
//! instant that falls on a day outside the window (Sunday under the default policy)
//! belongs to the period that started on the most recent week-start day.

use chrono::{
    DateTime, Datelike, Days, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc,
    Weekday,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};

pub const DAYS_PER_WEEK: u32 = 7;

/// Distance a period bound keeps from the ends of chrono's calendar, so that
/// local-day instants and the following period stay representable
const CALENDAR_MARGIN: Days = Days::new(2 * DAYS_PER_WEEK as u64);

/// An inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    /// Returns `None` when `start` is after `end` or either day is not a
    /// [supported day](is_supported_day)
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end && is_supported_day(start) && is_supported_day(end))
            .then_some(Self { start, end })
    }

    /// Like [`Period::new`], with a validation error naming the offending bound
    pub fn checked(start: NaiveDate, end: NaiveDate, names: (&str, &str)) -> Result<Self> {
        for (name, day) in [(names.0, start), (names.1, end)] {
            if !is_supported_day(day) {
                return Err(AppError::Validation(format!(
                    "{} ({}) is outside the supported calendar range",
                    name, day
                )));
            }
        }
        Self::new(start, end).ok_or_else(|| {
            AppError::Validation(format!(
                "{} ({}) must not be after {} ({})",
                names.0, start, names.1, end
            ))
        })
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// False for days within two weeks of `NaiveDate::MIN` or `NaiveDate::MAX`
pub fn is_supported_day(day: NaiveDate) -> bool {
    day.checked_sub_days(CALENDAR_MARGIN).is_some()
        && day.checked_add_days(CALENDAR_MARGIN).is_some()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekPolicy {
    week_start: Weekday,
    window_days: u32,
    utc_offset: FixedOffset,
}

impl Default for WeekPolicy {
    fn default() -> Self {
        Self::new(Weekday::Mon, 6, Utc.fix())
    }
}

impl WeekPolicy {
    /// `window_days` is clamped to 1..=7
    pub fn new(week_start: Weekday, window_days: u32, utc_offset: FixedOffset) -> Self {
        Self {
            week_start,
            window_days: window_days.clamp(1, DAYS_PER_WEEK),
            utc_offset,
        }
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    /// Number of days between `day` and the most recent week-start day (0..=6)
    pub fn offset_for(&self, day: Weekday) -> u32 {
        (day.num_days_from_monday() + DAYS_PER_WEEK - self.week_start.num_days_from_monday())
            % DAYS_PER_WEEK
    }

    /// Calendar day of `instant` in the site's local offset
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.utc_offset).date_naive()
    }

    /// The period covering `reference`; `None` only at the ends of the calendar
    pub fn current_period(&self, reference: DateTime<Utc>) -> Option<Period> {
        let today = self.local_date(reference);
        let offset = self.offset_for(today.weekday());
        self.period_starting(today.checked_sub_days(Days::new(u64::from(offset)))?)
    }

    /// The period that starts one week after `period`
    pub fn following(&self, period: &Period) -> Option<Period> {
        self.period_starting(
            period
                .start
                .checked_add_days(Days::new(u64::from(DAYS_PER_WEEK)))?,
        )
    }

    /// Up to `count` consecutive periods, the first one covering `reference`
    pub fn consecutive(&self, reference: DateTime<Utc>, count: usize) -> Vec<Period> {
        std::iter::successors(self.current_period(reference), |period| {
            self.following(period)
        })
        .take(count)
        .collect()
    }

    fn period_starting(&self, start: NaiveDate) -> Option<Period> {
        let end = start.checked_add_days(Days::new(u64::from(self.window_days - 1)))?;
        Period::new(start, end)
    }

    /// 00:00:00.000 local time of `date`
    pub fn start_of_day(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        date.and_time(NaiveTime::MIN)
            .and_utc()
            .checked_sub_signed(Duration::seconds(i64::from(
                self.utc_offset.local_minus_utc(),
            )))
    }

    /// 23:59:59.999 local time of `date`
    pub fn end_of_day(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        self.start_of_day(date.checked_add_days(Days::new(1))?)?
            .checked_sub_signed(Duration::milliseconds(1))
    }

    /// Instants bounding the inclusive day range `[start, end]`
    pub fn bounds(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.start_of_day(start)?, self.end_of_day(end)?))
    }

    /// [`WeekPolicy::bounds`] of a period, as a validation error when the
    /// instants fall outside the calendar
    pub fn period_bounds(&self, period: &Period) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        self.bounds(period.start, period.end).ok_or_else(|| {
            AppError::Validation(format!(
                "Period {} to {} is outside the supported calendar range",
                period.start, period.end
            ))
        })
    }

    /// True iff `start 00:00:00.000 <= timestamp <= end 23:59:59.999`
    pub fn in_period(&self, timestamp: DateTime<Utc>, start: NaiveDate, end: NaiveDate) -> bool {
        self.bounds(start, end)
            .is_some_and(|(from, to)| from <= timestamp && timestamp <= to)
    }
}

/// Weekday for a day index where 0 is Sunday and 6 is Saturday
pub fn weekday_from_index(index: u32) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Accepts weekday names ("monday", "Mon") or a 0-6 index with 0 = Sunday
pub fn parse_weekday(raw: &str) -> Option<Weekday> {
    let raw = raw.trim();
    match raw.parse::<u32>() {
        Ok(index) => weekday_from_index(index),
        Err(_) => raw.parse::<Weekday>().ok(),
    }
}
