//! Time-range resolution for reservations.
//!
//! A wizard selection carries its time as a slot token: either a full
//! range (`"14:00-22:00"`) or a bare start time (`"08:00"`) whose end
//! comes from the package's nominal duration. This module turns a
//! `(date, token, duration)` triple into absolute wall-clock start and
//! end timestamps. Both the availability probe and the reservation
//! creation call resolve through this single path, so the two can
//! never disagree about the window being booked.
//!
//! Times are plain calendar values (`chrono` naive types); no timezone
//! parsing is involved anywhere.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hours on a clock face.
const HOURS_IN_DAY: u32 = 24;

/// An absolute booking window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Inclusive start of the window
    pub start: NaiveDateTime,
    /// Exclusive end of the window, always after `start`
    pub end: NaiveDateTime,
}

impl TimeRange {
    /// Whether two windows overlap (half-open interval semantics).
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Failure to resolve a slot token into a window.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeRangeError {
    /// The token had no explicit end and the package has no positive
    /// duration to derive one from.
    #[error("package has no duration to derive an end time from")]
    InvalidPackage,

    /// The token was not a recognizable clock time or range.
    #[error("invalid time slot token: {0}")]
    InvalidTimeSlot(String),
}

/// Parses a clock-time fragment of a slot token.
///
/// Accepts `"HH"`, `"HH:MM"`, and `"HH:MM:00"` (a trailing seconds
/// marker is stripped, matching the tokens the catalog emits).
fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    let trimmed = value.trim();
    // "HH:MM:00" → "HH:MM"
    let trimmed = if trimmed.len() == 8 {
        trimmed.strip_suffix(":00").unwrap_or(trimmed)
    } else {
        trimmed
    };

    let (hour, minute) = match trimmed.split_once(':') {
        Some((h, m)) => (h, m),
        None => (trimmed, "0"),
    };
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Minutes since midnight of a clock-time fragment.
#[must_use]
pub fn time_to_minutes(value: &str) -> Option<u32> {
    use chrono::Timelike;
    parse_clock_time(value).map(|t| t.hour() * 60 + t.minute())
}

/// Minutes since midnight of a slot token's start.
///
/// For range tokens this is the left side; for bare start times the
/// token itself.
#[must_use]
pub fn slot_start_minutes(token: &str) -> Option<u32> {
    let start = token.split('-').next().unwrap_or(token);
    time_to_minutes(start)
}

/// Resolves a `(date, token, duration)` triple into an absolute window.
///
/// - A token with a `-` separator is an explicit range. When the end
///   clock-time is numerically at or before the start, the range
///   crosses midnight and the end date rolls to the next calendar day;
///   the resolved end is never at or before the start.
/// - A bare start time takes its end from `duration_minutes`.
///
/// # Errors
///
/// - [`TimeRangeError::InvalidPackage`] when a bare start time is
///   given but `duration_minutes` is zero.
/// - [`TimeRangeError::InvalidTimeSlot`] for unparseable tokens.
pub fn resolve_time_range(
    date: NaiveDate,
    token: &str,
    duration_minutes: u32,
) -> Result<TimeRange, TimeRangeError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(TimeRangeError::InvalidTimeSlot(token.to_string()));
    }

    if let Some((start_text, end_text)) = token.split_once('-') {
        if start_text.trim().is_empty() || end_text.trim().is_empty() {
            return Err(TimeRangeError::InvalidTimeSlot(token.to_string()));
        }
        let start_time = parse_clock_time(start_text)
            .ok_or_else(|| TimeRangeError::InvalidTimeSlot(token.to_string()))?;
        let end_time = parse_clock_time(end_text)
            .ok_or_else(|| TimeRangeError::InvalidTimeSlot(token.to_string()))?;

        let start = date.and_time(start_time);
        let end_date = if end_time <= start_time {
            // Crosses midnight: the end belongs to the next day.
            date.succ_opt()
                .ok_or_else(|| TimeRangeError::InvalidTimeSlot(token.to_string()))?
        } else {
            date
        };
        return Ok(TimeRange {
            start,
            end: end_date.and_time(end_time),
        });
    }

    let start_time =
        parse_clock_time(token).ok_or_else(|| TimeRangeError::InvalidTimeSlot(token.to_string()))?;
    if duration_minutes == 0 {
        return Err(TimeRangeError::InvalidPackage);
    }
    let start = date.and_time(start_time);
    Ok(TimeRange {
        start,
        end: start + Duration::minutes(i64::from(duration_minutes)),
    })
}

/// The selectable end hours for a free-form event range starting at
/// `start_hour`: ten, eleven, or twelve hours later, wrapping around
/// midnight.
#[must_use]
pub fn selectable_end_hours(start_hour: u32) -> [u32; 3] {
    [
        (start_hour + 10) % HOURS_IN_DAY,
        (start_hour + 11) % HOURS_IN_DAY,
        (start_hour + 12) % HOURS_IN_DAY,
    ]
}

/// Clock-face duration in hours from `start_hour` to `end_hour`,
/// wrapping around midnight.
#[must_use]
pub const fn wrapped_duration_hours(start_hour: u32, end_hour: u32) -> u32 {
    (end_hour + HOURS_IN_DAY - start_hour % HOURS_IN_DAY) % HOURS_IN_DAY
}

/// Builds the `"HH:00-HH:00"` token for a composed free-form range.
#[must_use]
pub fn compose_range_token(start_hour: u32, end_hour: u32) -> String {
    format!("{start_hour:02}:00-{end_hour:02}:00")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn explicit_range_ignores_duration() {
        let range = resolve_time_range(date(2024, 3, 5), "14:00-22:00", 240);
        assert_eq!(
            range,
            Ok(TimeRange {
                start: dt(2024, 3, 5, 14, 0),
                end: dt(2024, 3, 5, 22, 0),
            })
        );
    }

    #[test]
    fn bare_start_uses_package_duration() {
        let range = resolve_time_range(date(2024, 3, 5), "08:00", 240);
        assert_eq!(
            range,
            Ok(TimeRange {
                start: dt(2024, 3, 5, 8, 0),
                end: dt(2024, 3, 5, 12, 0),
            })
        );
    }

    #[test]
    fn bare_start_without_duration_is_invalid_package() {
        assert_eq!(
            resolve_time_range(date(2024, 3, 5), "08:00", 0),
            Err(TimeRangeError::InvalidPackage)
        );
    }

    #[test]
    fn midnight_wraparound_rolls_end_to_next_day() {
        let range = resolve_time_range(date(2024, 3, 5), "22:00-02:00", 0);
        assert_eq!(
            range,
            Ok(TimeRange {
                start: dt(2024, 3, 5, 22, 0),
                end: dt(2024, 3, 6, 2, 0),
            })
        );
    }

    #[test]
    fn equal_endpoints_roll_a_full_day() {
        let range = resolve_time_range(date(2024, 3, 5), "10:00-10:00", 0);
        let range = range.unwrap();
        assert_eq!(range.end, dt(2024, 3, 6, 10, 0));
        assert!(range.end > range.start);
    }

    #[test]
    fn seconds_markers_are_stripped() {
        let range = resolve_time_range(date(2024, 3, 5), "14:00:00-22:00:00", 0);
        assert_eq!(
            range,
            Ok(TimeRange {
                start: dt(2024, 3, 5, 14, 0),
                end: dt(2024, 3, 5, 22, 0),
            })
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let a = resolve_time_range(date(2024, 7, 1), "12:00-20:00", 480);
        let b = resolve_time_range(date(2024, 7, 1), "12:00-20:00", 480);
        assert_eq!(a, b);
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        for bad in ["", "-", "25:00", "ab:cd", "08:00-", "-12:00", "8:61"] {
            let result = resolve_time_range(date(2024, 3, 5), bad, 240);
            assert!(result.is_err(), "expected {bad:?} to be rejected");
        }
    }

    #[test]
    fn end_always_after_start() {
        for token in ["06:00-09:00", "22:00-02:00", "00:00-00:00", "13:00"] {
            let range = resolve_time_range(date(2024, 12, 31), token, 600).unwrap();
            assert!(range.end > range.start, "token {token}");
        }
    }

    #[test]
    fn event_end_hours_wrap_midnight() {
        assert_eq!(selectable_end_hours(8), [18, 19, 20]);
        assert_eq!(selectable_end_hours(12), [22, 23, 0]);
    }

    #[test]
    fn wrapped_duration() {
        assert_eq!(wrapped_duration_hours(8, 18), 10);
        assert_eq!(wrapped_duration_hours(22, 2), 4);
        assert_eq!(wrapped_duration_hours(12, 0), 12);
    }

    #[test]
    fn compose_token_formats_hours() {
        assert_eq!(compose_range_token(8, 18), "08:00-18:00");
        assert_eq!(compose_range_token(12, 0), "12:00-00:00");
    }

    #[test]
    fn slot_start_minutes_reads_the_left_side() {
        assert_eq!(slot_start_minutes("08:00-12:00"), Some(480));
        assert_eq!(slot_start_minutes("13:30"), Some(810));
        assert_eq!(slot_start_minutes("junk"), None);
    }

    #[test]
    fn overlap_uses_half_open_intervals() {
        let a = TimeRange {
            start: dt(2024, 3, 5, 8, 0),
            end: dt(2024, 3, 5, 12, 0),
        };
        let b = TimeRange {
            start: dt(2024, 3, 5, 12, 0),
            end: dt(2024, 3, 5, 16, 0),
        };
        assert!(!a.overlaps(&b), "touching windows do not overlap");
        let c = TimeRange {
            start: dt(2024, 3, 5, 11, 0),
            end: dt(2024, 3, 5, 13, 0),
        };
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }
}
