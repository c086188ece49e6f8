//! Plan records: days, tasks, focus sessions and personal to-dos.
//!
//! Field names match the remote tables so a record serializes straight into
//! a row.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Fresh record id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A schedulable calendar unit holding a set of tasks.
///
/// A day without a date is an unscheduled template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Day {
    pub fn new(label: impl Into<String>, date: Option<NaiveDate>) -> Self {
        Self {
            id: new_id(),
            label: label.into(),
            date,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn toggled(self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }
}

/// Study subject. Free text; a handful of well-known subjects carry a
/// display colour.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subject(pub String);

impl Subject {
    pub const KNOWN: [(&'static str, &'static str); 6] = [
        ("Quant", "#6366f1"),
        ("LR", "#f59e0b"),
        ("AR", "#10b981"),
        ("VA", "#ec4899"),
        ("Practice", "#8b5cf6"),
        ("Other", "#6b7294"),
    ];

    pub fn new(name: impl Into<String>) -> Self {
        Subject(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hex colour; unknown subjects share the `Other` colour.
    pub fn color(&self) -> &'static str {
        Self::KNOWN
            .iter()
            .find(|(name, _)| *name == self.0)
            .map(|(_, color)| *color)
            .unwrap_or("#6b7294")
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for Subject {
    fn from(s: &str) -> Self {
        Subject(s.to_string())
    }
}

/// A unit of planned study work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub day_id: String,
    pub subject: Subject,
    pub topic: String,
    #[serde(default)]
    pub estimated_minutes: u32,
    #[serde(default)]
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        day_id: impl Into<String>,
        subject: Subject,
        topic: impl Into<String>,
        estimated_minutes: u32,
    ) -> Self {
        Self {
            id: new_id(),
            day_id: day_id.into(),
            subject,
            topic: topic.into(),
            estimated_minutes,
            status: TaskStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Whether a focus session of `elapsed_secs` earns completion.
    ///
    /// Whole minutes must reach 80% of the estimate. A task without an
    /// estimate never completes this way.
    pub fn credits_completion(&self, elapsed_secs: u64) -> bool {
        if self.estimated_minutes == 0 {
            return false;
        }
        let whole_minutes = (elapsed_secs / 60) as f64;
        whole_minutes >= self.estimated_minutes as f64 * COMPLETION_CREDIT
    }
}

/// Share of the estimate a single session must cover to complete a task.
pub const COMPLETION_CREDIT: f64 = 0.8;

/// Sessions shorter than this are discarded.
pub const MIN_SESSION_SECS: u64 = 10;

/// An immutable record of one completed focus interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub subject: Subject,
    pub topic: String,
    pub duration_seconds: u64,
    pub session_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A quick personal to-do, unrelated to the study plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalTask {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_row_shape() {
        let task = Task::new("day-1", Subject::from("Quant"), "Algebra", 30);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["subject"], "Quant");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["estimated_minutes"], 30);
    }

    #[test]
    fn completion_credit_threshold() {
        let task = Task::new("d", Subject::from("LR"), "Puzzles", 25);
        // 20 whole minutes is exactly 80% of 25.
        assert!(task.credits_completion(20 * 60));
        assert!(!task.credits_completion(20 * 60 - 1));
    }

    #[test]
    fn zero_estimate_never_completes() {
        let task = Task::new("d", Subject::from("VA"), "Reading", 0);
        assert!(!task.credits_completion(3 * 3600));
    }

    #[test]
    fn unknown_subject_uses_other_colour() {
        assert_eq!(Subject::from("Quant").color(), "#6366f1");
        assert_eq!(Subject::from("History").color(), "#6b7294");
    }

    #[test]
    fn undated_day_deserializes() {
        let day: Day = serde_json::from_str(
            r#"{"id":"1","label":"Template","date":null,"created_at":"2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(day.date.is_none());
    }
}
