//! Registration analytics: time bucketing in the reporting timezone.
//!
//! Users are grouped by the civil hour, day or month of their `createdAt`
//! instant as observed in UTC+05:30. A report covers one reference period
//! (today, this month or this year) and lists every slot in that period,
//! including empty ones, in ascending order. Slots are half-open:
//! `[start, end)`.

use std::collections::BTreeMap;
use std::fmt;
use std::iter;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, FixedOffset, Months, NaiveDateTime, NaiveTime, Offset, TimeDelta,
    TimeZone, Timelike, Utc,
};
use serde::{Deserialize, Serialize};

/// Offset of the reporting timezone (UTC+05:30) in seconds.
pub const REPORTING_OFFSET_SECONDS: i32 = 5 * 3_600 + 30 * 60;

/// The fixed civil timezone used for bucketing.
pub fn reporting_offset() -> FixedOffset {
    FixedOffset::east_opt(REPORTING_OFFSET_SECONDS).unwrap_or_else(|| Utc.fix())
}

/// Width of a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One civil hour; the period is the current day.
    Hour,
    /// One civil day; the period is the current month.
    #[default]
    Day,
    /// One calendar month; the period is the current year.
    Month,
}

/// Returned when a timeframe string names no known granularity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown timeframe `{0}`; expected hour, day or month")]
pub struct UnknownGranularity(pub String);

impl Granularity {
    /// Wire name of the granularity.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Month => "month",
        }
    }

    /// Start of the slot that contains `local`.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use cms_backend::domain::Granularity;
    ///
    /// let at = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(9, 41, 7).unwrap();
    /// let slot = Granularity::Hour.truncate(at);
    /// assert_eq!(slot, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(9, 0, 0).unwrap());
    /// ```
    pub fn truncate(self, local: NaiveDateTime) -> NaiveDateTime {
        let date = local.date();
        match self {
            Self::Hour => date.and_time(NaiveTime::MIN) + TimeDelta::hours(i64::from(local.hour())),
            Self::Day => date.and_time(NaiveTime::MIN),
            Self::Month => date.with_day(1).unwrap_or(date).and_time(NaiveTime::MIN),
        }
    }

    /// Start of the slot following the one that starts at `slot`.
    ///
    /// Months advance on the calendar, so January 31 never appears as a slot
    /// boundary; slot starts are always the first of the month.
    pub fn advance(self, slot: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Self::Hour => slot.checked_add_signed(TimeDelta::hours(1)),
            Self::Day => slot.checked_add_signed(TimeDelta::days(1)),
            Self::Month => slot.checked_add_months(Months::new(1)),
        }
    }

    /// Start of the reference period containing `local`.
    fn period_start(self, local: NaiveDateTime) -> NaiveDateTime {
        match self {
            Self::Hour => Self::Day.truncate(local),
            Self::Day => Self::Month.truncate(local),
            Self::Month => {
                let date = local.date();
                date.with_ordinal(1).unwrap_or(date).and_time(NaiveTime::MIN)
            }
        }
    }

    fn period_end(self, start: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Self::Hour => Self::Day.advance(start),
            Self::Day => Self::Month.advance(start),
            Self::Month => start.checked_add_months(Months::new(12)),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = UnknownGranularity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "month" => Ok(Self::Month),
            _ => Err(UnknownGranularity(s.to_owned())),
        }
    }
}

/// One gap-filled analytics bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationBucket {
    pub count: u64,
    pub timeframe: Granularity,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// The span of time an analytics report covers, in reporting-local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferencePeriod {
    granularity: Granularity,
    offset: FixedOffset,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl ReferencePeriod {
    /// The period containing `now`, or `None` at the edges of representable time.
    pub fn containing(granularity: Granularity, now: DateTime<Utc>) -> Option<Self> {
        let offset = reporting_offset();
        let local = now.with_timezone(&offset).naive_local();
        let start = granularity.period_start(local);
        let end = granularity.period_end(start)?;
        Some(Self {
            granularity,
            offset,
            start,
            end,
        })
    }

    fn to_utc(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        self.offset
            .from_local_datetime(&local)
            .single()
            .map(|instant| instant.with_timezone(&Utc))
    }

    /// First instant of the period.
    pub fn start_utc(&self) -> Option<DateTime<Utc>> {
        self.to_utc(self.start)
    }

    /// First instant after the period.
    pub fn end_utc(&self) -> Option<DateTime<Utc>> {
        self.to_utc(self.end)
    }

    /// Slot starts in ascending order.
    fn slots(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        iter::successors(Some(self.start), |slot| self.granularity.advance(*slot))
            .take_while(|slot| *slot < self.end)
    }

    /// Count `created` instants into every slot of the period.
    ///
    /// Instants outside the period are ignored. Returns `None` only when a
    /// slot boundary cannot be represented.
    pub fn buckets(&self, created: &[DateTime<Utc>]) -> Option<Vec<RegistrationBucket>> {
        let mut counts: BTreeMap<NaiveDateTime, u64> =
            self.slots().map(|slot| (slot, 0)).collect();
        for instant in created {
            let local = instant.with_timezone(&self.offset).naive_local();
            if local < self.start || local >= self.end {
                continue;
            }
            if let Some(count) = counts.get_mut(&self.granularity.truncate(local)) {
                *count += 1;
            }
        }
        counts
            .into_iter()
            .map(|(slot, count)| {
                let next = self.granularity.advance(slot)?;
                Some(RegistrationBucket {
                    count,
                    timeframe: self.granularity,
                    start: self.to_utc(slot)?,
                    end: self.to_utc(next)?,
                })
            })
            .collect()
    }
}

/// Half-open creation window `[start, end)` used by the user range filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CreatedRange {
    /// Build a window; an inverted window is allowed and matches nothing.
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Whether the window can match anything.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether `instant` falls inside the window.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

#[cfg(test)]
#[path = "analytics_tests.rs"]
mod tests;
