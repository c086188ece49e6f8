//! In-memory plan store.
//!
//! Holds the four record collections and applies validated mutations.
//! Every mutation either fully applies or returns a `ValidationError`
//! without touching anything. Derived views live in [`crate::views`].

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ValidationError;
use crate::model::{new_id, Day, PersonalTask, Session, Subject, Task, TaskStatus};
use crate::timer::FinishedSession;

/// Outcome of deleting a day.
#[derive(Debug, Clone)]
pub struct DayRemoval {
    pub day: Day,
    pub removed_task_ids: Vec<String>,
}

/// Outcome of recording a finished focus session.
#[derive(Debug, Clone)]
pub struct RecordedSession {
    pub session: Session,
    /// Set when the session flipped its task to completed.
    pub completed_task: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanStore {
    #[serde(default)]
    days: Vec<Day>,
    #[serde(default)]
    tasks: Vec<Task>,
    #[serde(default)]
    sessions: Vec<Session>,
    #[serde(default, rename = "personalTasks", alias = "personal_tasks")]
    personal_tasks: Vec<PersonalTask>,
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty(field));
    }
    Ok(trimmed.to_string())
}

fn positive_minutes(minutes: i64) -> Result<u32, ValidationError> {
    if minutes <= 0 {
        return Err(ValidationError::NonPositiveMinutes(minutes));
    }
    u32::try_from(minutes).map_err(|_| ValidationError::InvalidValue {
        field: "estimated_minutes".into(),
        message: format!("{minutes} is too large"),
    })
}

impl PlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn personal_tasks(&self) -> &[PersonalTask] {
        &self.personal_tasks
    }

    pub fn day(&self, id: &str) -> Option<&Day> {
        self.days.iter().find(|d| d.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// The first day dated `today`, if any.
    pub fn day_for(&self, date: NaiveDate) -> Option<&Day> {
        self.days.iter().find(|d| d.date == Some(date))
    }

    pub fn tasks_of<'a>(&'a self, day_id: &'a str) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks.iter().filter(move |t| t.day_id == day_id)
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
            && self.tasks.is_empty()
            && self.sessions.is_empty()
            && self.personal_tasks.is_empty()
    }

    // ── Days ─────────────────────────────────────────────────────────

    pub fn add_day(&mut self, label: &str, date: Option<NaiveDate>) -> Result<Day, ValidationError> {
        let day = Day::new(required(label, "label")?, date);
        debug!(day_id = %day.id, label = %day.label, "day added");
        self.days.push(day.clone());
        Ok(day)
    }

    pub fn rename_day(&mut self, id: &str, label: &str) -> Result<Day, ValidationError> {
        let label = required(label, "label")?;
        let day = self
            .days
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| ValidationError::not_found("day", id))?;
        day.label = label;
        Ok(day.clone())
    }

    /// Remove a day and exactly the tasks it owns.
    pub fn delete_day(&mut self, id: &str) -> Result<DayRemoval, ValidationError> {
        let pos = self
            .days
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| ValidationError::not_found("day", id))?;
        let day = self.days.remove(pos);

        let mut removed_task_ids = Vec::new();
        self.tasks.retain(|t| {
            if t.day_id == day.id {
                removed_task_ids.push(t.id.clone());
                false
            } else {
                true
            }
        });
        debug!(day_id = %day.id, tasks = removed_task_ids.len(), "day deleted");
        Ok(DayRemoval {
            day,
            removed_task_ids,
        })
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn add_task(
        &mut self,
        day_id: &str,
        subject: &str,
        topic: &str,
        estimated_minutes: i64,
    ) -> Result<Task, ValidationError> {
        if self.day(day_id).is_none() {
            return Err(ValidationError::not_found("day", day_id));
        }
        let subject = Subject::new(required(subject, "subject")?);
        let topic = required(topic, "topic")?;
        let minutes = positive_minutes(estimated_minutes)?;

        let task = Task::new(day_id, subject, topic, minutes);
        debug!(task_id = %task.id, day_id, "task added");
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Change topic and/or estimate. Both are validated before either is applied.
    pub fn edit_task(
        &mut self,
        id: &str,
        topic: Option<&str>,
        estimated_minutes: Option<i64>,
    ) -> Result<Task, ValidationError> {
        let topic = topic.map(|t| required(t, "topic")).transpose()?;
        let minutes = estimated_minutes.map(positive_minutes).transpose()?;

        let task = self.task_mut(id)?;
        if let Some(topic) = topic {
            task.topic = topic;
        }
        if let Some(minutes) = minutes {
            task.estimated_minutes = minutes;
        }
        Ok(task.clone())
    }

    pub fn toggle_task(&mut self, id: &str) -> Result<Task, ValidationError> {
        let task = self.task_mut(id)?;
        task.status = task.status.toggled();
        Ok(task.clone())
    }

    pub fn delete_task(&mut self, id: &str) -> Result<Task, ValidationError> {
        let pos = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| ValidationError::not_found("task", id))?;
        Ok(self.tasks.remove(pos))
    }

    /// Move a task to another day. Nothing but `day_id` changes.
    pub fn reassign_task(&mut self, id: &str, day_id: &str) -> Result<Task, ValidationError> {
        if self.day(day_id).is_none() {
            return Err(ValidationError::not_found("day", day_id));
        }
        let task = self.task_mut(id)?;
        task.day_id = day_id.to_string();
        Ok(task.clone())
    }

    fn task_mut(&mut self, id: &str) -> Result<&mut Task, ValidationError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ValidationError::not_found("task", id))
    }

    // ── Sessions ─────────────────────────────────────────────────────

    /// Append the session and credit its task if the session covered
    /// enough of the estimate. The task may have been deleted meanwhile.
    pub fn record_session(&mut self, finished: FinishedSession, today: NaiveDate) -> RecordedSession {
        let session = Session {
            id: new_id(),
            subject: finished.subject,
            topic: finished.topic,
            duration_seconds: finished.duration_seconds,
            session_date: today,
            created_at: Utc::now(),
        };
        self.sessions.push(session.clone());

        let mut completed_task = None;
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == finished.task_id) {
            if task.status == TaskStatus::Pending && task.credits_completion(finished.duration_seconds) {
                task.status = TaskStatus::Completed;
                completed_task = Some(task.id.clone());
            }
        }
        debug!(
            session_id = %session.id,
            secs = session.duration_seconds,
            completed = completed_task.is_some(),
            "session recorded"
        );
        RecordedSession {
            session,
            completed_task,
        }
    }

    // ── Personal tasks ───────────────────────────────────────────────

    pub fn add_personal_task(&mut self, text: &str, today: NaiveDate) -> Result<PersonalTask, ValidationError> {
        let task = PersonalTask {
            id: new_id(),
            text: required(text, "text")?,
            completed: false,
            date: today,
            created_at: Utc::now(),
        };
        self.personal_tasks.push(task.clone());
        Ok(task)
    }

    pub fn toggle_personal_task(&mut self, id: &str) -> Result<PersonalTask, ValidationError> {
        let task = self
            .personal_tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ValidationError::not_found("personal task", id))?;
        task.completed = !task.completed;
        Ok(task.clone())
    }

    pub fn delete_personal_task(&mut self, id: &str) -> Result<PersonalTask, ValidationError> {
        let pos = self
            .personal_tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| ValidationError::not_found("personal task", id))?;
        Ok(self.personal_tasks.remove(pos))
    }

    // ── Bulk ─────────────────────────────────────────────────────────

    /// Append an already validated batch of days and tasks.
    pub fn extend(&mut self, days: Vec<Day>, tasks: Vec<Task>) {
        self.days.extend(days);
        self.tasks.extend(tasks);
    }

    pub fn replace_days(&mut self, days: Vec<Day>) {
        self.days = days;
    }

    pub fn replace_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub fn replace_sessions(&mut self, sessions: Vec<Session>) {
        self.sessions = sessions;
    }

    pub fn replace_personal_tasks(&mut self, personal_tasks: Vec<PersonalTask>) {
        self.personal_tasks = personal_tasks;
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn store_with_two_days() -> (PlanStore, String, String) {
        let mut store = PlanStore::new();
        let a = store.add_day("Day A", Some(date(1))).unwrap().id;
        let b = store.add_day("Day B", Some(date(2))).unwrap().id;
        store.add_task(&a, "Quant", "Algebra", 30).unwrap();
        store.add_task(&a, "LR", "Puzzles", 20).unwrap();
        store.add_task(&b, "VA", "Reading", 45).unwrap();
        (store, a, b)
    }

    #[test]
    fn delete_day_cascades_to_its_tasks_only() {
        let (mut store, a, b) = store_with_two_days();
        let removal = store.delete_day(&a).unwrap();
        assert_eq!(removal.removed_task_ids.len(), 2);
        assert_eq!(store.days().len(), 1);
        assert_eq!(store.tasks().len(), 1);
        assert!(store.tasks().iter().all(|t| t.day_id == b));
    }

    #[test]
    fn delete_empty_day_keeps_all_tasks() {
        let (mut store, _, _) = store_with_two_days();
        let empty = store.add_day("Spare", None).unwrap().id;
        let removal = store.delete_day(&empty).unwrap();
        assert!(removal.removed_task_ids.is_empty());
        assert_eq!(store.tasks().len(), 3);
    }

    #[test]
    fn add_task_validation_leaves_store_untouched() {
        let (mut store, a, _) = store_with_two_days();
        assert_eq!(
            store.add_task(&a, "  ", "Topic", 10).unwrap_err(),
            ValidationError::Empty("subject")
        );
        assert_eq!(
            store.add_task(&a, "Quant", "", 10).unwrap_err(),
            ValidationError::Empty("topic")
        );
        assert_eq!(
            store.add_task(&a, "Quant", "Topic", 0).unwrap_err(),
            ValidationError::NonPositiveMinutes(0)
        );
        assert!(matches!(
            store.add_task("missing", "Quant", "Topic", 10).unwrap_err(),
            ValidationError::NotFound { kind: "day", .. }
        ));
        assert_eq!(store.tasks().len(), 3);
    }

    #[test]
    fn edit_task_is_all_or_nothing() {
        let (mut store, a, _) = store_with_two_days();
        let id = store.tasks_of(&a).next().unwrap().id.clone();
        assert!(store.edit_task(&id, Some("Geometry"), Some(-5)).is_err());
        assert_eq!(store.task(&id).unwrap().topic, "Algebra");

        let edited = store.edit_task(&id, Some("Geometry"), Some(50)).unwrap();
        assert_eq!(edited.topic, "Geometry");
        assert_eq!(edited.estimated_minutes, 50);
    }

    #[test]
    fn reassign_only_changes_day() {
        let (mut store, a, b) = store_with_two_days();
        let before = store.tasks_of(&a).next().unwrap().clone();
        let moved = store.reassign_task(&before.id, &b).unwrap();
        assert_eq!(moved.day_id, b);
        assert_eq!(moved.estimated_minutes, before.estimated_minutes);
        assert_eq!(moved.status, before.status);
        assert_eq!(moved.created_at, before.created_at);
    }

    #[test]
    fn toggle_round_trips_status() {
        let (mut store, a, _) = store_with_two_days();
        let id = store.tasks_of(&a).next().unwrap().id.clone();
        assert_eq!(store.toggle_task(&id).unwrap().status, TaskStatus::Completed);
        assert_eq!(store.toggle_task(&id).unwrap().status, TaskStatus::Pending);
    }

    #[test]
    fn recorded_session_completes_task_at_eighty_percent() {
        let (mut store, a, _) = store_with_two_days();
        let task = store.tasks_of(&a).next().unwrap().clone();
        let recorded = store.record_session(
            FinishedSession {
                task_id: task.id.clone(),
                subject: task.subject.clone(),
                topic: task.topic.clone(),
                duration_seconds: 24 * 60,
            },
            date(1),
        );
        assert_eq!(recorded.session.duration_seconds, 24 * 60);
        assert_eq!(recorded.session.session_date, date(1));
        assert_eq!(recorded.completed_task.as_deref(), Some(task.id.as_str()));
        assert!(store.task(&task.id).unwrap().is_completed());
        assert_eq!(store.sessions().len(), 1);
    }

    #[test]
    fn short_credit_leaves_task_pending() {
        let (mut store, a, _) = store_with_two_days();
        let task = store.tasks_of(&a).next().unwrap().clone();
        let recorded = store.record_session(
            FinishedSession {
                task_id: task.id.clone(),
                subject: task.subject.clone(),
                topic: task.topic.clone(),
                duration_seconds: 23 * 60 + 59,
            },
            date(1),
        );
        assert!(recorded.completed_task.is_none());
        assert!(!store.task(&task.id).unwrap().is_completed());
    }

    #[test]
    fn personal_tasks() {
        let mut store = PlanStore::new();
        assert!(store.add_personal_task("   ", date(1)).is_err());
        let t = store.add_personal_task(" Call bank ", date(1)).unwrap();
        assert_eq!(t.text, "Call bank");
        assert!(store.toggle_personal_task(&t.id).unwrap().completed);
        store.delete_personal_task(&t.id).unwrap();
        assert!(store.personal_tasks().is_empty());
    }
}
