//! Application controller.
//!
//! `App` is the single owner of the plan, the settings, the session timer
//! and the remote connection. Every mutation validates, applies, saves the
//! snapshot and then hands the matching remote write to the dispatcher
//! without waiting for it. A failed save or remote write is logged and
//! never undoes the local change.

use chrono::NaiveDate;
use serde_json::json;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::clock::{Clock, DayRing, SystemClock};
use crate::error::{RemoteError, Result, TimerError, ValidationError};
use crate::events::Event;
use crate::import::{read_plan, read_plan_file, ImportPlan, ImportSummary};
use crate::model::{Day, PersonalTask, Task, TaskStatus};
use crate::notify::{self, decode_server_key, Notification, NotificationCategory, PushSubscription};
use crate::remote::{RestClient, Table};
use crate::storage::{Settings, Snapshot, SnapshotStore};
use crate::store::{DayRemoval, PlanStore};
use crate::sync::{pull_all, Outbox, PullSummary, RemotePull, RemoteWrite, ReplayReport, SyncDispatcher};
use crate::timer::{SessionEnd, SessionTimer};
use crate::views::{
    session_candidates, subject_distribution, BacklogView, SubjectShare, TodayView, WeeklyMetrics,
};

/// How long an import waits for its remote inserts.
const IMPORT_SYNC_TIMEOUT: Duration = Duration::from_secs(30);

pub struct App<S: SnapshotStore, C: Clock = SystemClock> {
    store: PlanStore,
    settings: Settings,
    push_subscription: Option<PushSubscription>,
    timer: SessionTimer,
    storage: S,
    clock: C,
    sync: Option<SyncDispatcher>,
    outbox: Option<Outbox>,
}

impl<S: SnapshotStore> App<S, SystemClock> {
    pub fn load(storage: S) -> Self {
        Self::with_clock(storage, SystemClock)
    }
}

impl<S: SnapshotStore, C: Clock> App<S, C> {
    /// Restore the last snapshot. Unreadable state starts empty.
    pub fn with_clock(storage: S, clock: C) -> Self {
        let snapshot = match storage.load() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => Snapshot::default(),
            Err(e) => {
                warn!(error = %e, "stored state unreadable, starting empty");
                Snapshot::default()
            }
        };
        Self {
            store: snapshot.plan,
            settings: snapshot.settings,
            push_subscription: snapshot.push_subscription,
            timer: SessionTimer::new(),
            storage,
            clock,
            sync: None,
            outbox: None,
        }
    }

    /// Failed remote writes go to `outbox` instead of being dropped.
    pub fn with_outbox(mut self, outbox: Outbox) -> Self {
        self.outbox = Some(outbox);
        self
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn store(&self) -> &PlanStore {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn push_subscription(&self) -> Option<&PushSubscription> {
        self.push_subscription.as_ref()
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn outbox(&self) -> Option<&Outbox> {
        self.outbox.as_ref()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn is_syncing(&self) -> bool {
        self.sync.is_some()
    }

    // ── Persistence ──────────────────────────────────────────────────

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            plan: self.store.clone(),
            settings: self.settings.clone(),
            push_subscription: self.push_subscription.clone(),
        }
    }

    /// Save the full state. Failure is logged; in-memory state stays.
    pub fn persist(&self) -> bool {
        match self.storage.save(&self.snapshot()) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to save state");
                false
            }
        }
    }

    fn dispatch(&mut self, write: RemoteWrite) {
        if let Some(sync) = self.sync.as_mut() {
            sync.dispatch(write);
        }
    }

    fn dispatch_insert<T: serde::Serialize>(&mut self, table: Table, record: &T) {
        if self.sync.is_none() {
            return;
        }
        match RemoteWrite::insert(table, record) {
            Ok(write) => self.dispatch(write),
            Err(e) => warn!(table = %table, error = %e, "could not encode row"),
        }
    }

    fn commit(&mut self, write: RemoteWrite) {
        self.persist();
        self.dispatch(write);
    }

    // ── Days ─────────────────────────────────────────────────────────

    pub fn add_day(&mut self, label: &str, date: Option<NaiveDate>) -> Result<Day> {
        let day = self.store.add_day(label, date)?;
        self.persist();
        self.dispatch_insert(Table::Days, &day);
        Ok(day)
    }

    pub fn rename_day(&mut self, id: &str, label: &str) -> Result<Day> {
        let day = self.store.rename_day(id, label)?;
        self.commit(RemoteWrite::update(
            Table::Days,
            &day.id,
            json!({ "label": day.label }),
        ));
        Ok(day)
    }

    /// Delete a day and its tasks. The backend cascades on its own.
    pub fn delete_day(&mut self, id: &str) -> Result<DayRemoval> {
        let removal = self.store.delete_day(id)?;
        self.commit(RemoteWrite::delete(Table::Days, &removal.day.id));
        Ok(removal)
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn add_task(&mut self, day_id: &str, subject: &str, topic: &str, minutes: i64) -> Result<Task> {
        let task = self.store.add_task(day_id, subject, topic, minutes)?;
        self.persist();
        self.dispatch_insert(Table::Tasks, &task);
        Ok(task)
    }

    pub fn edit_task(&mut self, id: &str, topic: Option<&str>, minutes: Option<i64>) -> Result<Task> {
        let task = self.store.edit_task(id, topic, minutes)?;
        self.commit(RemoteWrite::update(
            Table::Tasks,
            &task.id,
            json!({ "topic": task.topic, "estimated_minutes": task.estimated_minutes }),
        ));
        Ok(task)
    }

    pub fn toggle_task(&mut self, id: &str) -> Result<Task> {
        let task = self.store.toggle_task(id)?;
        self.commit(RemoteWrite::update(
            Table::Tasks,
            &task.id,
            json!({ "status": task.status }),
        ));
        Ok(task)
    }

    pub fn delete_task(&mut self, id: &str) -> Result<Task> {
        let task = self.store.delete_task(id)?;
        self.commit(RemoteWrite::delete(Table::Tasks, &task.id));
        Ok(task)
    }

    pub fn reassign_task(&mut self, id: &str, day_id: &str) -> Result<Task> {
        let task = self.store.reassign_task(id, day_id)?;
        self.commit(RemoteWrite::update(
            Table::Tasks,
            &task.id,
            json!({ "day_id": task.day_id }),
        ));
        Ok(task)
    }

    // ── Personal tasks ───────────────────────────────────────────────

    pub fn add_personal_task(&mut self, text: &str) -> Result<PersonalTask> {
        let today = self.today();
        let task = self.store.add_personal_task(text, today)?;
        self.persist();
        self.dispatch_insert(Table::PersonalTasks, &task);
        Ok(task)
    }

    pub fn toggle_personal_task(&mut self, id: &str) -> Result<PersonalTask> {
        let task = self.store.toggle_personal_task(id)?;
        self.commit(RemoteWrite::update(
            Table::PersonalTasks,
            &task.id,
            json!({ "completed": task.completed }),
        ));
        Ok(task)
    }

    pub fn delete_personal_task(&mut self, id: &str) -> Result<PersonalTask> {
        let task = self.store.delete_personal_task(id)?;
        self.commit(RemoteWrite::delete(Table::PersonalTasks, &task.id));
        Ok(task)
    }

    // ── Focus session ────────────────────────────────────────────────

    pub fn start_session(&mut self, task_id: &str) -> Result<Event> {
        let task = self
            .store
            .task(task_id)
            .ok_or_else(|| ValidationError::not_found("task", task_id))?;
        let event = self.timer.start(task, self.clock.now_utc())?;
        debug!(task_id, "focus session started");
        Ok(event)
    }

    /// Recompute the displayed elapsed seconds while running.
    pub fn tick(&mut self) -> Option<u64> {
        self.timer.tick(self.clock.now_utc())
    }

    pub fn pause_session(&mut self) -> Result<Event, TimerError> {
        self.timer.pause(self.clock.now_utc())
    }

    pub fn resume_session(&mut self) -> Result<Event, TimerError> {
        self.timer.resume(self.clock.now_utc())
    }

    pub fn toggle_pause(&mut self) -> Result<Event, TimerError> {
        self.timer.toggle_pause(self.clock.now_utc())
    }

    pub fn session_snapshot(&self) -> Event {
        self.timer.snapshot(self.clock.now_utc())
    }

    /// End the active session, recording it if it ran long enough.
    pub fn end_session(&mut self) -> Result<Event, TimerError> {
        let now = self.clock.now_utc();
        match self.timer.end(now)? {
            SessionEnd::Discarded {
                task_id,
                elapsed_secs,
            } => {
                info!(task_id = %task_id, elapsed_secs, "session too short, discarded");
                Ok(Event::SessionDiscarded {
                    task_id,
                    elapsed_secs,
                    at: now,
                })
            }
            SessionEnd::Finished(finished) => {
                let task_id = finished.task_id.clone();
                let today = self.today();
                let recorded = self.store.record_session(finished, today);
                self.persist();
                self.dispatch_insert(Table::Sessions, &recorded.session);
                if let Some(completed) = &recorded.completed_task {
                    self.dispatch(RemoteWrite::update(
                        Table::Tasks,
                        completed,
                        json!({ "status": TaskStatus::Completed }),
                    ));
                }
                Ok(Event::SessionEnded {
                    session_id: recorded.session.id,
                    task_id,
                    duration_secs: recorded.session.duration_seconds,
                    task_completed: recorded.completed_task.is_some(),
                    at: now,
                })
            }
        }
    }

    // ── Views ────────────────────────────────────────────────────────

    pub fn today_view(&self) -> TodayView {
        TodayView::build(&self.store, self.today())
    }

    pub fn backlog_view(&self) -> BacklogView {
        BacklogView::build(&self.store, self.today())
    }

    pub fn weekly_metrics(&self) -> WeeklyMetrics {
        WeeklyMetrics::build(&self.store, self.today())
    }

    pub fn subject_distribution(&self) -> Vec<SubjectShare> {
        subject_distribution(&self.store, self.today())
    }

    pub fn session_candidates(&self) -> Vec<Task> {
        session_candidates(&self.store, self.today())
    }

    pub fn day_ring(&self) -> DayRing {
        let (start, end) = self.settings.day_bounds();
        DayRing::compute(self.clock.now().time(), start, end)
    }

    // ── Import ───────────────────────────────────────────────────────

    /// Import a `.csv` plan file. Nothing changes unless the whole file
    /// is valid.
    pub async fn import_file(&mut self, path: &Path) -> Result<ImportSummary> {
        let plan = read_plan_file(path, self.today())?;
        Ok(self.apply_import(plan).await)
    }

    pub async fn import_csv<R: Read>(&mut self, input: R) -> Result<ImportSummary> {
        let plan = read_plan(input, self.today())?;
        Ok(self.apply_import(plan).await)
    }

    async fn apply_import(&mut self, plan: ImportPlan) -> ImportSummary {
        let summary = plan.summary();
        let ImportPlan { days, tasks } = plan;
        if self.sync.is_some() {
            for day in &days {
                self.dispatch_insert(Table::Days, day);
            }
            for task in &tasks {
                self.dispatch_insert(Table::Tasks, task);
            }
        }
        self.store.extend(days, tasks);
        self.persist();
        info!(days = summary.days_added, tasks = summary.tasks_added, "plan imported");
        self.settle_writes(IMPORT_SYNC_TIMEOUT).await;
        summary
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub fn set_setting(&mut self, key: &str, value: &str) -> Result<()> {
        self.settings.set(key, value)?;
        self.persist();
        Ok(())
    }

    pub fn reset_settings(&mut self) {
        self.settings = Settings::default();
        self.persist();
    }

    /// Empty all four collections. Settings and the remote copy are kept.
    pub fn clear_data(&mut self) {
        self.store.clear();
        self.persist();
        info!("local data cleared");
    }

    // ── Remote ───────────────────────────────────────────────────────

    /// Start dispatching writes through `client`.
    pub fn attach_remote(&mut self, client: RestClient) {
        self.sync = Some(SyncDispatcher::new(client));
    }

    /// Attach the remote configured in settings, without any network call.
    /// Returns `false` when no remote is configured.
    pub fn attach_configured_remote(&mut self) -> Result<bool, RemoteError> {
        if !self.settings.remote.is_configured() {
            return Ok(false);
        }
        let client = RestClient::new(&self.settings.remote.url, &self.settings.remote.key)?;
        self.attach_remote(client);
        Ok(true)
    }

    /// Probe the backend, remember the credentials and pull everything.
    pub async fn connect_remote(&mut self, url: &str, key: &str) -> Result<PullSummary> {
        let client = RestClient::connect(url, key).await?;
        self.settings.remote.url = url.trim().to_string();
        self.settings.remote.key = key.trim().to_string();
        self.persist();
        self.attach_remote(client);
        self.pull().await
    }

    /// Forget the credentials and stop syncing.
    pub fn disconnect_remote(&mut self) {
        self.sync = None;
        self.settings.remote.url.clear();
        self.settings.remote.key.clear();
        self.persist();
    }

    fn client(&self) -> Result<&RestClient, RemoteError> {
        self.sync
            .as_ref()
            .map(SyncDispatcher::client)
            .ok_or(RemoteError::NotConnected)
    }

    /// Replace every local collection with its remote copy.
    pub async fn pull(&mut self) -> Result<PullSummary> {
        let client = self.client()?.clone();
        let pulled = pull_all(&client).await;
        Ok(self.apply_pull(pulled))
    }

    /// Replace each collection whose pull succeeded; keep the rest.
    pub fn apply_pull(&mut self, pulled: RemotePull) -> PullSummary {
        let mut summary = PullSummary::default();
        match pulled.days {
            Ok(days) => {
                summary.days = Some(days.len());
                self.store.replace_days(days);
            }
            Err(e) => summary.errors.push(format!("{}: {e}", Table::Days)),
        }
        match pulled.tasks {
            Ok(tasks) => {
                summary.tasks = Some(tasks.len());
                self.store.replace_tasks(tasks);
            }
            Err(e) => summary.errors.push(format!("{}: {e}", Table::Tasks)),
        }
        match pulled.sessions {
            Ok(sessions) => {
                summary.sessions = Some(sessions.len());
                self.store.replace_sessions(sessions);
            }
            Err(e) => summary.errors.push(format!("{}: {e}", Table::Sessions)),
        }
        match pulled.personal_tasks {
            Ok(personal) => {
                summary.personal_tasks = Some(personal.len());
                self.store.replace_personal_tasks(personal);
            }
            Err(e) => summary.errors.push(format!("{}: {e}", Table::PersonalTasks)),
        }
        self.persist();
        info!(rows = summary.total(), failed = summary.errors.len(), "remote pull applied");
        summary
    }

    /// Send every outbox entry again.
    pub async fn replay_outbox(&mut self) -> Result<ReplayReport> {
        let client = self.client()?.clone();
        let outbox = self
            .outbox
            .as_mut()
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "outbox".into(),
                message: "no outbox configured".into(),
            })?;
        outbox.replay(&client).await
    }

    /// Wait up to `timeout` for in-flight remote writes. Failures go to the
    /// outbox. Returns how many writes failed.
    pub async fn settle_writes(&mut self, timeout: Duration) -> usize {
        let Some(sync) = self.sync.as_mut() else {
            return 0;
        };
        let failed = sync.finish(timeout).await;
        let count = failed.len();
        if count == 0 {
            return 0;
        }
        match self.outbox.as_mut() {
            Some(outbox) => {
                for f in failed {
                    outbox.enqueue(f.write, f.error);
                }
                if let Err(e) = outbox.persist() {
                    warn!(error = %e, "failed to save outbox");
                }
            }
            None => warn!(count, "remote writes failed and no outbox is configured"),
        }
        count
    }

    // ── Notifications ────────────────────────────────────────────────

    pub fn compose_notification(&self, category: NotificationCategory) -> Result<Notification> {
        Ok(notify::compose(&self.settings.notifications, category)?)
    }

    pub fn due_notifications(&self) -> Vec<NotificationCategory> {
        notify::due_categories(&self.store, &self.settings, self.clock.now())
    }

    /// Register a push endpoint. Needs the server's VAPID key.
    pub fn subscribe_push(&mut self, subscription: PushSubscription) -> Result<()> {
        decode_server_key(&self.settings.remote.vapid_public_key)?;
        self.push_subscription = Some(subscription.clone());
        self.commit(RemoteWrite::UpsertSubscription { subscription });
        Ok(())
    }
}
