//! Focus session state machine.
//!
//! The timer is wall-clock based and owns no thread. Callers pass the
//! current instant into every command; `tick()` is a display refresh only.
//! Elapsed time is always recomputed from the stored start instant, so a
//! missed or late tick can never skew it.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused -> Idle
//! ```
//!
//! Resuming shifts the start instant forward by the length of the pause,
//! which keeps paused time out of every later elapsed computation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TimerError;
use crate::events::Event;
use crate::model::{Subject, Task, MIN_SESSION_SECS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// The session currently being timed. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveSession {
    pub task_id: String,
    pub subject: Subject,
    pub topic: String,
    /// Start instant, shifted forward by every completed pause.
    pub start_time: DateTime<Utc>,
    pub paused_at: Option<DateTime<Utc>>,
    /// Last value shown to the user.
    pub elapsed_seconds: u64,
}

impl ActiveSession {
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Whole seconds of unpaused time up to `now`.
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> u64 {
        let until = self.paused_at.unwrap_or(now);
        (until - self.start_time).num_seconds().max(0) as u64
    }
}

/// A session that lasted long enough to be recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishedSession {
    pub task_id: String,
    pub subject: Subject,
    pub topic: String,
    pub duration_seconds: u64,
}

/// Result of ending a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEnd {
    /// Under the recording threshold; nothing is stored.
    Discarded { task_id: String, elapsed_secs: u64 },
    Finished(FinishedSession),
}

/// Core focus timer.
#[derive(Debug, Clone, Default)]
pub struct SessionTimer {
    active: Option<ActiveSession>,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        match &self.active {
            None => TimerState::Idle,
            Some(s) if s.is_paused() => TimerState::Paused,
            Some(_) => TimerState::Running,
        }
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        let active = self.active.as_ref();
        Event::StateSnapshot {
            state: self.state(),
            task_id: active.map(|s| s.task_id.clone()),
            subject: active.map(|s| s.subject.clone()),
            topic: active.map(|s| s.topic.clone()),
            elapsed_secs: active.map(|s| s.elapsed_at(now)).unwrap_or(0),
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, task: &Task, now: DateTime<Utc>) -> Result<Event, TimerError> {
        if let Some(current) = &self.active {
            return Err(TimerError::AlreadyActive {
                task_id: current.task_id.clone(),
            });
        }
        self.active = Some(ActiveSession {
            task_id: task.id.clone(),
            subject: task.subject.clone(),
            topic: task.topic.clone(),
            start_time: now,
            paused_at: None,
            elapsed_seconds: 0,
        });
        Ok(Event::SessionStarted {
            task_id: task.id.clone(),
            subject: task.subject.clone(),
            topic: task.topic.clone(),
            at: now,
        })
    }

    /// Refresh the displayed elapsed time. Returns it while running.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<u64> {
        let session = self.active.as_mut()?;
        if session.is_paused() {
            return None;
        }
        session.elapsed_seconds = session.elapsed_at(now);
        Some(session.elapsed_seconds)
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<Event, TimerError> {
        let session = self.active.as_mut().ok_or(TimerError::NotActive)?;
        if session.is_paused() {
            return Err(TimerError::NotRunning);
        }
        session.elapsed_seconds = session.elapsed_at(now);
        session.paused_at = Some(now);
        Ok(Event::SessionPaused {
            elapsed_secs: session.elapsed_seconds,
            at: now,
        })
    }

    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<Event, TimerError> {
        let session = self.active.as_mut().ok_or(TimerError::NotActive)?;
        let paused_at = session.paused_at.take().ok_or(TimerError::NotPaused)?;
        let paused_for = (now - paused_at).max(chrono::Duration::zero());
        session.start_time += paused_for;
        Ok(Event::SessionResumed {
            elapsed_secs: session.elapsed_at(now),
            paused_secs: paused_for.num_seconds() as u64,
            at: now,
        })
    }

    /// Pause when running, resume when paused.
    pub fn toggle_pause(&mut self, now: DateTime<Utc>) -> Result<Event, TimerError> {
        match self.state() {
            TimerState::Idle => Err(TimerError::NotActive),
            TimerState::Running => self.pause(now),
            TimerState::Paused => self.resume(now),
        }
    }

    /// End the session from Running or Paused and return to Idle.
    pub fn end(&mut self, now: DateTime<Utc>) -> Result<SessionEnd, TimerError> {
        let session = self.active.take().ok_or(TimerError::NotActive)?;
        let elapsed = session.elapsed_at(now);
        if elapsed < MIN_SESSION_SECS {
            return Ok(SessionEnd::Discarded {
                task_id: session.task_id,
                elapsed_secs: elapsed,
            });
        }
        Ok(SessionEnd::Finished(FinishedSession {
            task_id: session.task_id,
            subject: session.subject,
            topic: session.topic,
            duration_seconds: elapsed,
        }))
    }
}
