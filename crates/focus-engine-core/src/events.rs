use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Subject;
use crate::timer::TimerState;

/// Every focus-session transition produces an Event.
/// The renderer draws from them; nothing else depends on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        task_id: String,
        subject: Subject,
        topic: String,
        at: DateTime<Utc>,
    },
    SessionPaused {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        elapsed_secs: u64,
        /// Length of the pause that just ended.
        paused_secs: u64,
        at: DateTime<Utc>,
    },
    /// Session was long enough to be recorded.
    SessionEnded {
        session_id: String,
        task_id: String,
        duration_secs: u64,
        task_completed: bool,
        at: DateTime<Utc>,
    },
    /// Session ended below the recording threshold.
    SessionDiscarded {
        task_id: String,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        task_id: Option<String>,
        subject: Option<Subject>,
        topic: Option<String>,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
}
