//! E2E test of a study day: import a plan, focus on a task, read the views.

use chrono::{Duration, Local, TimeZone};
use focus_engine_core::{App, Event, FixedClock, MemoryStore, TaskStatus};

const PLAN: &str = "day,subject,topic,estimated_minutes\n\
                    Day 1,Quant,Ratios,30\n\
                    Day 1,LR,Seating,30\n\
                    Day 2,VA,Reading,60\n";

fn morning() -> FixedClock {
    FixedClock(Local.with_ymd_and_hms(2026, 3, 30, 10, 0, 0).single().unwrap())
}

#[tokio::test]
async fn import_focus_and_review() {
    let mut app = App::with_clock(MemoryStore::new(), morning());

    let summary = app.import_csv(PLAN.as_bytes()).await.unwrap();
    assert_eq!(summary.days_added, 2);
    assert_eq!(summary.tasks_added, 3);

    let today = app.today_view();
    assert_eq!(today.label, "Day 1");
    assert_eq!(today.total, 2);
    assert_eq!(today.done, 0);

    let ratios = app
        .session_candidates()
        .into_iter()
        .find(|t| t.topic == "Ratios")
        .unwrap();
    app.start_session(&ratios.id).unwrap();

    // 5 minutes of focus, a 10 minute pause, then 20 more.
    app.clock_mut().advance(Duration::minutes(5));
    app.pause_session().unwrap();
    app.clock_mut().advance(Duration::minutes(10));
    app.resume_session().unwrap();
    app.clock_mut().advance(Duration::minutes(20));

    match app.end_session().unwrap() {
        Event::SessionEnded {
            duration_secs,
            task_completed,
            ..
        } => {
            assert_eq!(duration_secs, 25 * 60);
            assert!(task_completed);
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert_eq!(app.store().task(&ratios.id).unwrap().status, TaskStatus::Completed);

    let today = app.today_view();
    assert_eq!(today.done, 1);
    assert_eq!(today.completion_pct, 50);

    let week = app.weekly_metrics();
    assert_eq!(week.session_count, 1);
    assert_eq!(week.total_minutes, 25);
    assert_eq!(week.active_days, 1);

    // Everything above was persisted.
    let raw = app.storage().raw().unwrap();
    let reloaded = App::with_clock(MemoryStore::with_raw(raw), morning());
    assert_eq!(reloaded.store().days().len(), 2);
    assert_eq!(reloaded.store().sessions().len(), 1);

    // Two days later both days have slipped into the backlog.
    app.clock_mut().advance(Duration::days(2));
    let backlog = app.backlog_view();
    assert_eq!(backlog.count, 2);
    assert_eq!(backlog.total_minutes, 90);
    assert_eq!(backlog.days_overdue, 2);
}
