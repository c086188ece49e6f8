//! Which reminders make sense right now.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, Timelike};

use super::NotificationCategory;
use crate::storage::Settings;
use crate::store::PlanStore;
use crate::views::today_tasks;

/// Evening reminders start this long before the day ends.
const EVENING_LEAD_MINUTES: i64 = 120;

/// Streak length that earns a consistency reminder.
const STREAK_THRESHOLD: u32 = 3;

/// Consecutive days with at least one session, ending at `today`.
pub fn streak_days(store: &PlanStore, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today;
    while store.sessions().iter().any(|s| s.session_date == day) {
        streak += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}

/// Categories whose conditions hold at `now` and whose toggle is on.
///
/// The study day is the same-day window `[dayStartTime, dayEndTime)`; an end
/// at or before the start matches no time. Brain-fog reminders are never due
/// on their own; they are sent on request.
pub fn due_categories(
    store: &PlanStore,
    settings: &Settings,
    now: DateTime<Local>,
) -> Vec<NotificationCategory> {
    let today = now.date_naive();
    let time = now.time();
    let (day_start, day_end) = settings.day_bounds();
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(day_start);
    let lead = Duration::minutes(EVENING_LEAD_MINUTES);
    // Clamped to the day start for windows shorter than the lead.
    let evening_from = match day_end.overflowing_sub_signed(lead) {
        (from, 0) if from > day_start => from,
        _ => day_start,
    };

    let studied_today = store.sessions().iter().any(|s| s.session_date == today);
    let pending_today = today_tasks(store, today).iter().any(|t| !t.is_completed());
    let pending_personal = store
        .personal_tasks()
        .iter()
        .any(|p| p.date == today && !p.completed);
    let in_day = time >= day_start && time < day_end;

    let mut due = Vec::new();
    if in_day && time < noon && !studied_today {
        due.push(NotificationCategory::Morning);
    }
    if in_day && time.hour() >= 12 && time < evening_from && !studied_today && pending_today {
        due.push(NotificationCategory::Inactivity);
    }
    if in_day && time >= evening_from && pending_today {
        due.push(NotificationCategory::Evening);
    }
    if streak_days(store, today) >= STREAK_THRESHOLD {
        due.push(NotificationCategory::Consistency);
    }
    if pending_personal {
        due.push(NotificationCategory::Personal);
    }

    due.retain(|c| settings.notifications.allows(*c));
    due
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Subject;
    use crate::timer::FinishedSession;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 3, day, hour, minute, 0)
            .single()
            .unwrap()
    }

    fn enabled() -> Settings {
        let mut s = Settings::default();
        s.notifications.study = true;
        s.notifications.evening = true;
        s.notifications.personal = true;
        s
    }

    fn studied(store: &mut PlanStore, day: u32) {
        store.record_session(
            FinishedSession {
                task_id: "t".into(),
                subject: Subject::from("Quant"),
                topic: "x".into(),
                duration_seconds: 600,
            },
            NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
        );
    }

    fn plan_today(store: &mut PlanStore, day: u32) {
        let d = store
            .add_day("Today", NaiveDate::from_ymd_opt(2026, 3, day))
            .unwrap();
        store.add_task(&d.id, "Quant", "Ratios", 30).unwrap();
    }

    #[test]
    fn morning_without_study() {
        let store = PlanStore::new();
        assert_eq!(
            due_categories(&store, &enabled(), at(10, 8, 0)),
            vec![NotificationCategory::Morning]
        );
        assert!(due_categories(&store, &enabled(), at(10, 5, 0)).is_empty());
    }

    #[test]
    fn afternoon_inactivity_then_evening() {
        let mut store = PlanStore::new();
        plan_today(&mut store, 10);
        assert_eq!(
            due_categories(&store, &enabled(), at(10, 14, 0)),
            vec![NotificationCategory::Inactivity]
        );
        assert_eq!(
            due_categories(&store, &enabled(), at(10, 21, 30)),
            vec![NotificationCategory::Evening]
        );
    }

    #[test]
    fn streak_and_personal() {
        let mut store = PlanStore::new();
        for day in 8..=10 {
            studied(&mut store, day);
        }
        store
            .add_personal_task("Call home", NaiveDate::from_ymd_opt(2026, 3, 10).unwrap())
            .unwrap();
        assert_eq!(streak_days(&store, NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()), 3);
        assert_eq!(
            due_categories(&store, &enabled(), at(10, 14, 0)),
            vec![
                NotificationCategory::Consistency,
                NotificationCategory::Personal
            ]
        );
    }

    #[test]
    fn short_day_after_midnight_reaches_evening() {
        let mut store = PlanStore::new();
        plan_today(&mut store, 10);
        let mut settings = enabled();
        settings.day_start_time = "00:30".into();
        settings.day_end_time = "01:00".into();

        assert_eq!(
            due_categories(&store, &settings, at(10, 0, 40)),
            vec![NotificationCategory::Morning, NotificationCategory::Evening]
        );
        assert!(due_categories(&store, &settings, at(10, 23, 30)).is_empty());
    }

    #[test]
    fn inverted_day_window_matches_nothing() {
        let mut store = PlanStore::new();
        plan_today(&mut store, 10);
        let mut settings = enabled();
        settings.day_start_time = "22:00".into();
        settings.day_end_time = "01:00".into();

        assert!(due_categories(&store, &settings, at(10, 23, 0)).is_empty());
        assert!(due_categories(&store, &settings, at(10, 0, 30)).is_empty());
    }

    #[test]
    fn toggles_filter_everything() {
        let mut store = PlanStore::new();
        plan_today(&mut store, 10);
        assert!(due_categories(&store, &Settings::default(), at(10, 8, 0)).is_empty());
    }
}
