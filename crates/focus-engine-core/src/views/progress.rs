use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::model::{Session, Subject};
use crate::store::PlanStore;

/// Days in the trailing window, today included.
pub const WINDOW_DAYS: i64 = 7;

/// Minutes at which a day's bar is drawn full height.
pub const BAR_CEILING_MINUTES: u64 = 240;

const WEEKDAY_INITIALS: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];

#[derive(Debug, Clone, Serialize)]
pub struct DayBar {
    pub date: NaiveDate,
    pub weekday: &'static str,
    pub minutes: u64,
    /// 0..=100, clamped at the ceiling.
    pub height_pct: u32,
    pub is_today: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyMetrics {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub active_days: usize,
    pub consistency_pct: u32,
    pub total_minutes: u64,
    pub session_count: usize,
    pub avg_minutes_per_active_day: u64,
    pub bars: Vec<DayBar>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectShare {
    pub subject: Subject,
    pub color: &'static str,
    pub seconds: u64,
    pub pct: u32,
}

/// The seven dates ending at `today`, oldest first.
pub fn trailing_window(today: NaiveDate) -> Vec<NaiveDate> {
    (0..WINDOW_DAYS)
        .rev()
        .map(|back| today - Duration::days(back))
        .collect()
}

fn in_window<'a>(sessions: &'a [Session], window: &'a [NaiveDate]) -> impl Iterator<Item = &'a Session> + 'a {
    sessions.iter().filter(move |s| window.contains(&s.session_date))
}

impl WeeklyMetrics {
    pub fn build(store: &PlanStore, today: NaiveDate) -> Self {
        let window = trailing_window(today);
        let recent: Vec<&Session> = in_window(store.sessions(), &window).collect();

        let active_days = recent
            .iter()
            .map(|s| s.session_date)
            .collect::<BTreeSet<_>>()
            .len();
        let consistency_pct = (100.0 * active_days as f64 / WINDOW_DAYS as f64).round() as u32;
        let total_secs: u64 = recent.iter().map(|s| s.duration_seconds).sum();
        let total_minutes = total_secs / 60;
        let avg_minutes_per_active_day = if active_days > 0 {
            (total_minutes as f64 / active_days as f64).round() as u64
        } else {
            0
        };

        let bars = window
            .iter()
            .map(|date| {
                let minutes: u64 = recent
                    .iter()
                    .filter(|s| s.session_date == *date)
                    .map(|s| s.duration_seconds / 60)
                    .sum();
                let height =
                    (100.0 * minutes as f64 / BAR_CEILING_MINUTES as f64).round().min(100.0) as u32;
                DayBar {
                    date: *date,
                    weekday: WEEKDAY_INITIALS[date.weekday().num_days_from_sunday() as usize],
                    minutes,
                    height_pct: height,
                    is_today: *date == today,
                }
            })
            .collect();

        Self {
            from: window[0],
            to: today,
            active_days,
            consistency_pct,
            total_minutes,
            session_count: recent.len(),
            avg_minutes_per_active_day,
            bars,
        }
    }
}

/// Share of focused time per subject in the trailing window, largest first.
///
/// Empty when nothing was focused in the window.
pub fn subject_distribution(store: &PlanStore, today: NaiveDate) -> Vec<SubjectShare> {
    let window = trailing_window(today);
    let mut per_subject: HashMap<&Subject, u64> = HashMap::new();
    for s in in_window(store.sessions(), &window) {
        *per_subject.entry(&s.subject).or_default() += s.duration_seconds;
    }
    let total: u64 = per_subject.values().sum();
    if total == 0 {
        return Vec::new();
    }

    let mut shares: Vec<SubjectShare> = per_subject
        .into_iter()
        .map(|(subject, seconds)| SubjectShare {
            subject: subject.clone(),
            color: subject.color(),
            seconds,
            pct: (100.0 * seconds as f64 / total as f64).round() as u32,
        })
        .collect();
    shares.sort_by(|a, b| b.seconds.cmp(&a.seconds).then_with(|| a.subject.cmp(&b.subject)));
    shares
}
