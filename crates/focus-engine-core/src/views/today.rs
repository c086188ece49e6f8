use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Subject, Task, TaskStatus};
use crate::store::PlanStore;

/// Per-subject totals for today's plan, in estimated minutes.
#[derive(Debug, Clone, Serialize)]
pub struct SubjectProgress {
    pub subject: Subject,
    pub color: &'static str,
    pub topics: Vec<String>,
    pub planned_minutes: u64,
    pub completed_minutes: u64,
    pub remaining_minutes: u64,
    pub progress_pct: u32,
    pub all_done: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TodayView {
    pub date: NaiveDate,
    pub day_id: Option<String>,
    pub label: String,
    pub tasks: Vec<Task>,
    pub done: usize,
    pub total: usize,
    pub completion_pct: u32,
    pub subjects: Vec<SubjectProgress>,
}

/// `round(100 * done / total)`, 0 for an empty list.
pub fn completion_pct(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * done as f64 / total as f64).round() as u32
}

/// Tasks belonging to the day dated `today`.
pub fn today_tasks(store: &PlanStore, today: NaiveDate) -> Vec<Task> {
    match store.day_for(today) {
        Some(day) => store.tasks_of(&day.id).cloned().collect(),
        None => Vec::new(),
    }
}

impl TodayView {
    pub fn build(store: &PlanStore, today: NaiveDate) -> Self {
        let day = store.day_for(today);
        let tasks = today_tasks(store, today);
        let total = tasks.len();
        let done = tasks.iter().filter(|t| t.is_completed()).count();

        // Subjects in first-seen order.
        let mut subjects: Vec<SubjectProgress> = Vec::new();
        for task in &tasks {
            let idx = match subjects.iter().position(|s| s.subject == task.subject) {
                Some(i) => i,
                None => {
                    subjects.push(SubjectProgress {
                        subject: task.subject.clone(),
                        color: task.subject.color(),
                        topics: Vec::new(),
                        planned_minutes: 0,
                        completed_minutes: 0,
                        remaining_minutes: 0,
                        progress_pct: 0,
                        all_done: false,
                    });
                    subjects.len() - 1
                }
            };
            let entry = &mut subjects[idx];
            entry.topics.push(task.topic.clone());
            let minutes = u64::from(task.estimated_minutes);
            entry.planned_minutes += minutes;
            if task.status == TaskStatus::Completed {
                entry.completed_minutes += minutes;
            }
        }
        for s in &mut subjects {
            s.remaining_minutes = s.planned_minutes.saturating_sub(s.completed_minutes);
            s.all_done = s.remaining_minutes == 0;
            s.progress_pct = if s.planned_minutes > 0 {
                (100.0 * s.completed_minutes as f64 / s.planned_minutes as f64).round() as u32
            } else {
                0
            };
        }

        Self {
            date: today,
            day_id: day.map(|d| d.id.clone()),
            label: day
                .map(|d| d.label.clone())
                .unwrap_or_else(|| "No plan for today".to_string()),
            tasks,
            done,
            total,
            completion_pct: completion_pct(done, total),
            subjects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[test]
    fn empty_plan_is_zero_percent() {
        let view = TodayView::build(&PlanStore::new(), today());
        assert_eq!(view.total, 0);
        assert_eq!(view.completion_pct, 0);
        assert_eq!(view.label, "No plan for today");
        assert!(view.subjects.is_empty());
    }

    #[test]
    fn groups_by_subject() {
        let mut store = PlanStore::new();
        let day = store.add_day("Mock week", Some(today())).unwrap().id;
        let other = store.add_day("Tomorrow", today().succ_opt()).unwrap().id;
        let a = store.add_task(&day, "Quant", "Algebra", 30).unwrap().id;
        store.add_task(&day, "Quant", "Geometry", 20).unwrap();
        store.add_task(&day, "VA", "Reading", 40).unwrap();
        store.add_task(&other, "LR", "Not today", 15).unwrap();
        store.toggle_task(&a).unwrap();

        let view = TodayView::build(&store, today());
        assert_eq!(view.label, "Mock week");
        assert_eq!(view.total, 3);
        assert_eq!(view.done, 1);
        assert_eq!(view.completion_pct, 33);

        let quant = &view.subjects[0];
        assert_eq!(quant.subject.as_str(), "Quant");
        assert_eq!(quant.topics, vec!["Algebra", "Geometry"]);
        assert_eq!(quant.planned_minutes, 50);
        assert_eq!(quant.remaining_minutes, 20);
        assert_eq!(quant.progress_pct, 60);
        assert!(!view.subjects[1].all_done);
    }

    #[test]
    fn huge_estimates_do_not_overflow() {
        let mut store = PlanStore::new();
        let day = store.add_day("Marathon", Some(today())).unwrap().id;
        store.add_task(&day, "Quant", "A", 3_000_000_000).unwrap();
        store.add_task(&day, "Quant", "B", 3_000_000_000).unwrap();

        let view = TodayView::build(&store, today());
        assert_eq!(view.subjects[0].planned_minutes, 6_000_000_000);
        assert_eq!(view.subjects[0].remaining_minutes, 6_000_000_000);
    }

    #[test]
    fn completion_percentage_rounds() {
        assert_eq!(completion_pct(0, 0), 0);
        assert_eq!(completion_pct(2, 3), 67);
        assert_eq!(completion_pct(3, 3), 100);
    }
}
