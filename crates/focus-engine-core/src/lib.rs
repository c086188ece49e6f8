//! # Focus Engine Core Library
//!
//! This library provides the core logic of the Focus Engine study planner.
//! Every operation is available through the `focus-engine` CLI, which is a
//! thin renderer over this crate.
//!
//! ## Architecture
//!
//! - **Session Timer**: a wall-clock focus-session state machine; the caller
//!   invokes `tick()` for display updates, elapsed time is always derived
//!   from stored instants
//! - **Plan Store**: days, tasks, focus sessions and personal to-dos with
//!   validated mutations
//! - **Views**: today, backlog, weekly metrics and subject distribution,
//!   recomputed on demand
//! - **Storage**: SQLite-backed snapshot of the whole state plus settings
//! - **Remote**: PostgREST-style backend client, fire-and-forget write
//!   dispatch and an outbox for failed writes
//!
//! ## Key Components
//!
//! - [`App`]: the controller owning all mutable state
//! - [`SessionTimer`]: focus-session state machine
//! - [`PlanStore`]: record collections
//! - [`Database`]: snapshot persistence
//! - [`RestClient`]: remote backend client

pub mod app;
pub mod clock;
pub mod error;
pub mod events;
pub mod format;
pub mod import;
pub mod model;
pub mod notify;
pub mod remote;
pub mod storage;
pub mod store;
pub mod sync;
pub mod timer;
pub mod views;

pub use app::App;
pub use clock::{local_today, Clock, DayRing, FixedClock, Greeting, SystemClock};
pub use error::{
    ConfigError, CoreError, DatabaseError, ImportError, NotifyError, RemoteError, TimerError,
    ValidationError,
};
pub use events::Event;
pub use import::ImportSummary;
pub use model::{Day, PersonalTask, Session, Subject, Task, TaskStatus};
pub use notify::{Notification, NotificationCategory, NotificationSink, PushSubscription};
pub use remote::{RestClient, Table};
pub use storage::{data_dir, Database, MemoryStore, Settings, Snapshot, SnapshotStore};
pub use store::PlanStore;
pub use sync::{Outbox, PullSummary, RemoteWrite, SyncDispatcher};
pub use timer::{SessionTimer, TimerState};
pub use views::{BacklogView, TodayView, WeeklyMetrics};
