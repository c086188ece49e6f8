//! Wall clock, calendar date and the study-day ring.
//!
//! Every component asks the same [`Clock`] for "now" and "today" so that a
//! midnight boundary cannot be observed differently by two callers.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    fn now_utc(&self) -> DateTime<Utc> {
        self.now().with_timezone(&Utc)
    }

    /// Local calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock pinned to one instant. Used by tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl FixedClock {
    pub fn advance(&mut self, by: chrono::Duration) {
        self.0 += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// Today's local date from the system clock.
pub fn local_today() -> NaiveDate {
    SystemClock.today()
}

/// Parse an `HH:MM` setting.
pub fn parse_hhmm(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| ValidationError::InvalidValue {
        field: "time".into(),
        message: format!("expected HH:MM, got '{value}'"),
    })
}

/// Time-of-day greeting shown above the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Greeting {
    Morning,
    Afternoon,
    Evening,
}

impl Greeting {
    pub fn for_hour(hour: u32) -> Self {
        match hour {
            0..=11 => Greeting::Morning,
            12..=16 => Greeting::Afternoon,
            _ => Greeting::Evening,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Greeting::Morning => "Good morning",
            Greeting::Afternoon => "Good afternoon",
            Greeting::Evening => "Good evening",
        }
    }
}

/// How much of the configured study day is left.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayRing {
    pub remaining_secs: i64,
    /// 0.0 at day start, 1.0 at day end.
    pub progress: f64,
    /// Ring colour hue, 240 (blue) fading to 80 (yellow-green).
    pub hue: u32,
    pub greeting: Greeting,
    pub day_end: String,
}

impl DayRing {
    pub fn compute(now: NaiveTime, day_start: NaiveTime, day_end: NaiveTime) -> Self {
        let now_secs = now.num_seconds_from_midnight() as i64;
        let start_secs = day_start.num_seconds_from_midnight() as i64;
        let end_secs = day_end.num_seconds_from_midnight() as i64;

        let remaining = (end_secs - now_secs).max(0);
        let total = end_secs - start_secs;
        let progress = if total > 0 {
            (1.0 - remaining as f64 / total as f64).clamp(0.0, 1.0)
        } else if remaining == 0 {
            1.0
        } else {
            0.0
        };

        Self {
            remaining_secs: remaining,
            progress,
            hue: (240.0 - progress * 160.0).round() as u32,
            greeting: Greeting::for_hour(now.hour()),
            day_end: day_end.format("%H:%M").to_string(),
        }
    }

    /// `"5h 12m"`
    pub fn remaining_label(&self) -> String {
        let h = self.remaining_secs / 3600;
        let m = (self.remaining_secs % 3600) / 60;
        format!("{h}h {m}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn midday_progress() {
        let ring = DayRing::compute(t(14, 30), t(6, 0), t(23, 0));
        assert_eq!(ring.remaining_secs, 8 * 3600 + 30 * 60);
        assert!((ring.progress - 0.5).abs() < 1e-9);
        assert_eq!(ring.hue, 160);
        assert_eq!(ring.greeting, Greeting::Afternoon);
        assert_eq!(ring.remaining_label(), "8h 30m");
    }

    #[test]
    fn before_start_and_after_end_clamp() {
        let early = DayRing::compute(t(5, 0), t(6, 0), t(23, 0));
        assert_eq!(early.progress, 0.0);
        assert_eq!(early.hue, 240);

        let late = DayRing::compute(t(23, 30), t(6, 0), t(23, 0));
        assert_eq!(late.remaining_secs, 0);
        assert_eq!(late.progress, 1.0);
        assert_eq!(late.hue, 80);
        assert_eq!(late.greeting, Greeting::Evening);
    }

    #[test]
    fn empty_window_does_not_divide_by_zero() {
        let ring = DayRing::compute(t(9, 0), t(10, 0), t(10, 0));
        assert_eq!(ring.progress, 0.0);
        let ring = DayRing::compute(t(11, 0), t(10, 0), t(10, 0));
        assert_eq!(ring.progress, 1.0);
    }

    #[test]
    fn parses_hhmm() {
        assert_eq!(parse_hhmm(" 06:30 ").unwrap(), t(6, 30));
        assert!(parse_hhmm("6pm").is_err());
    }
}
