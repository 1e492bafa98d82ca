// --- File: crates/calmirror_common/src/schedule.rs ---
//! Calendar date plus optional wall-clock time.
//!
//! Provider payloads carry either a timed instant (`dateTime`, ISO-8601 with
//! offset) or an all-day `date`. The mirror keeps only the wall-clock parts as
//! written by the provider: the date before the `T` separator and the
//! hour:minute right after it. Offsets and seconds are discarded.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("neither date nor dateTime present")]
    Missing,
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("invalid time: {0}")]
    InvalidTime(String),
}

/// A date with an optional hour:minute. `time == None` means all-day.
///
/// Ordering is by date, then time; an all-day value sorts before any timed
/// value on the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventSchedule {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
}

impl EventSchedule {
    pub fn all_day(date: NaiveDate) -> Self {
        Self { date, time: None }
    }

    pub fn timed(at: NaiveDateTime) -> Self {
        Self {
            date: at.date(),
            time: Some(truncate_to_minute(at.time())),
        }
    }

    /// Decomposes a provider start/end pair. `date_time` wins when both are set.
    pub fn from_provider(
        date: Option<&str>,
        date_time: Option<&str>,
    ) -> Result<Self, ScheduleError> {
        if let Some(instant) = date_time {
            let (date_part, time_part) = instant
                .split_once('T')
                .ok_or_else(|| ScheduleError::InvalidTime(instant.to_string()))?;
            let clock: String = time_part.chars().take(5).collect();
            return Self::parse(date_part, Some(&clock));
        }

        match date {
            Some(day) => {
                // All-day values never carry a time, but tolerate a stray suffix.
                let date_part = day.split('T').next().unwrap_or(day);
                Self::parse(date_part, None)
            }
            None => Err(ScheduleError::Missing),
        }
    }

    /// Parses the stored `YYYY-MM-DD` / `HH:MM` text form.
    pub fn parse(date: &str, time: Option<&str>) -> Result<Self, ScheduleError> {
        let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| ScheduleError::InvalidDate(date.to_string()))?;
        let time = match time {
            Some(t) => Some(
                NaiveTime::parse_from_str(t, TIME_FORMAT)
                    .map_err(|_| ScheduleError::InvalidTime(t.to_string()))?,
            ),
            None => None,
        };
        Ok(Self { date, time })
    }

    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    pub fn time_string(&self) -> Option<String> {
        self.time.map(|t| t.format(TIME_FORMAT).to_string())
    }
}

impl fmt::Display for EventSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.time_string() {
            Some(time) => write!(f, "{}T{}", self.date_string(), time),
            None => write!(f, "{}", self.date_string()),
        }
    }
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    use chrono::Timelike;
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_all_day_event_has_no_time() {
        let schedule = EventSchedule::from_provider(Some("2024-05-01"), None).unwrap();
        assert_eq!(schedule.date_string(), "2024-05-01");
        assert_eq!(schedule.time_string(), None);
    }

    #[test]
    fn test_timed_event_keeps_wall_clock_and_drops_offset() {
        let schedule =
            EventSchedule::from_provider(None, Some("2024-05-01T09:30:00-05:00")).unwrap();
        assert_eq!(schedule.date_string(), "2024-05-01");
        assert_eq!(schedule.time_string().as_deref(), Some("09:30"));
    }

    #[test]
    fn test_date_time_wins_over_date() {
        let schedule =
            EventSchedule::from_provider(Some("2024-01-01"), Some("2024-05-01T23:59:59Z")).unwrap();
        assert_eq!(schedule.to_string(), "2024-05-01T23:59");
    }

    #[test]
    fn test_missing_both_parts() {
        assert_eq!(
            EventSchedule::from_provider(None, None),
            Err(ScheduleError::Missing)
        );
    }

    #[test]
    fn test_garbage_date_time_rejected() {
        assert!(matches!(
            EventSchedule::from_provider(None, Some("tomorrow")),
            Err(ScheduleError::InvalidTime(_))
        ));
        assert!(matches!(
            EventSchedule::from_provider(None, Some("2024-13-01T10:00:00Z")),
            Err(ScheduleError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_all_day_sorts_before_timed_on_same_date() {
        let all_day = EventSchedule::all_day(date(2024, 5, 1));
        let morning = EventSchedule::parse("2024-05-01", Some("08:00")).unwrap();
        let next_day = EventSchedule::all_day(date(2024, 5, 2));
        assert!(all_day < morning);
        assert!(morning < next_day);
    }

    #[test]
    fn test_timed_truncates_seconds() {
        let at = date(2024, 6, 1).and_hms_opt(14, 5, 59).unwrap();
        assert_eq!(EventSchedule::timed(at).time_string().as_deref(), Some("14:05"));
    }
}
