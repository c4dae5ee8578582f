//! Exam countdown helpers.
//!
//! # Responsibility
//! - Derive day/hour/minute countdowns from the stored exam date.
//! - Convert user-entered local date-times into stored ISO timestamps.
//!
//! # Invariants
//! - A date that is not in the future, or cannot be parsed, counts as past.

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;

/// Whole days/hours/minutes remaining until the exam.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub past: bool,
}

impl Countdown {
    /// Countdown from `now` to the ISO-8601 `exam_date`.
    pub fn until(exam_date: &str, now: DateTime<Utc>) -> Self {
        let Some(target) = parse_exam_date(exam_date) else {
            return Self::elapsed();
        };
        let remaining = (target - now).num_seconds();
        if remaining <= 0 {
            return Self::elapsed();
        }
        Self {
            days: remaining / SECS_PER_DAY,
            hours: (remaining % SECS_PER_DAY) / SECS_PER_HOUR,
            minutes: (remaining % SECS_PER_HOUR) / SECS_PER_MINUTE,
            past: false,
        }
    }

    /// Countdown from the current system time.
    pub fn from_now(exam_date: &str) -> Self {
        Self::until(exam_date, Utc::now())
    }

    fn elapsed() -> Self {
        Self {
            past: true,
            ..Self::default()
        }
    }

    /// Short dashboard summary.
    pub fn summary(&self) -> String {
        if self.past {
            "Exam day is here. Good luck!".to_string()
        } else {
            format!("{}d {}h remaining", self.days, self.hours)
        }
    }

    /// Encouragement line shown under the countdown.
    pub fn message(&self) -> &'static str {
        if self.past {
            "Exam time. Set a new date to keep tracking."
        } else {
            "Stay steady, focus on weak spots."
        }
    }
}

/// Parses a stored exam date. Accepts RFC 3339 with any offset.
pub fn parse_exam_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

/// Formats an instant the way exam dates are stored (`...T09:00:00.000Z`).
pub fn to_iso_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Converts either an RFC 3339 timestamp or a local `YYYY-MM-DDTHH:MM` input into
/// the stored ISO form. Returns `None` for blank or unparsable input.
pub fn exam_date_from_input(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(date) = parse_exam_date(trimmed) {
        return Some(to_iso_timestamp(date));
    }
    let naive = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())?;
    let local = Local.from_local_datetime(&naive).earliest()?;
    Some(to_iso_timestamp(local.with_timezone(&Utc)))
}

#[cfg(test)]
mod tests {
    use super::{exam_date_from_input, parse_exam_date, Countdown};
    use chrono::{TimeZone, Utc};

    #[test]
    fn countdown_splits_remaining_time() {
        let now = Utc.with_ymd_and_hms(2025, 10, 25, 7, 30, 0).unwrap();
        let countdown = Countdown::until("2025-10-28T09:00:00Z", now);
        assert_eq!(
            countdown,
            Countdown {
                days: 3,
                hours: 1,
                minutes: 30,
                past: false
            }
        );
        assert_eq!(countdown.summary(), "3d 1h remaining");
    }

    #[test]
    fn past_or_invalid_dates_are_past() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert!(Countdown::until("2025-10-28T09:00:00Z", now).past);
        assert!(Countdown::until("2026-01-01T00:00:00Z", now).past);
        assert!(Countdown::until("next tuesday", now).past);
        assert_eq!(
            Countdown::until("garbage", now).summary(),
            "Exam day is here. Good luck!"
        );
    }

    #[test]
    fn input_accepts_rfc3339_and_normalizes() {
        assert_eq!(
            exam_date_from_input("2026-03-01T10:00:00+02:00").as_deref(),
            Some("2026-03-01T08:00:00.000Z")
        );
        assert!(exam_date_from_input("2026-03-01T10:00").is_some());
        assert_eq!(exam_date_from_input("  "), None);
        assert_eq!(exam_date_from_input("soon"), None);
    }

    #[test]
    fn parse_handles_offsets() {
        let parsed = parse_exam_date("2025-10-28T11:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 10, 28, 9, 0, 0).unwrap());
    }
}
