use chrono::NaiveDate;
use serde::Serialize;

use crate::model::Task;
use crate::store::PlanStore;

#[derive(Debug, Clone, Serialize)]
pub struct BacklogItem {
    pub task: Task,
    pub origin_label: String,
    pub origin_date: NaiveDate,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct BacklogView {
    pub items: Vec<BacklogItem>,
    pub count: usize,
    pub total_minutes: u64,
    /// Age in days of the oldest backlog item.
    pub days_overdue: i64,
}

/// Pending tasks whose day is dated strictly before `today`.
pub fn backlog_tasks(store: &PlanStore, today: NaiveDate) -> Vec<BacklogItem> {
    store
        .tasks()
        .iter()
        .filter(|t| !t.is_completed())
        .filter_map(|t| {
            let day = store.day(&t.day_id)?;
            let date = day.date.filter(|d| *d < today)?;
            Some(BacklogItem {
                task: t.clone(),
                origin_label: day.label.clone(),
                origin_date: date,
                color: t.subject.color(),
            })
        })
        .collect()
}

impl BacklogView {
    pub fn build(store: &PlanStore, today: NaiveDate) -> Self {
        let items = backlog_tasks(store, today);
        let total_minutes = items
            .iter()
            .map(|i| u64::from(i.task.estimated_minutes))
            .sum();
        let days_overdue = items
            .iter()
            .map(|i| (today - i.origin_date).num_days())
            .max()
            .unwrap_or(0);
        Self {
            count: items.len(),
            total_minutes,
            days_overdue,
            items,
        }
    }
}

/// Tasks offered when starting a focus session: today's pending tasks
/// first, then the backlog.
pub fn session_candidates(store: &PlanStore, today: NaiveDate) -> Vec<Task> {
    let mut out: Vec<Task> = match store.day_for(today) {
        Some(day) => store
            .tasks_of(&day.id)
            .filter(|t| !t.is_completed())
            .cloned()
            .collect(),
        None => Vec::new(),
    };
    out.extend(backlog_tasks(store, today).into_iter().map(|i| i.task));
    out
}
