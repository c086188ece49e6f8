//! Remote writes that failed and wait for a manual replay.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::write::RemoteWrite;
use crate::error::Result;
use crate::remote::RestClient;
use crate::storage::data_dir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxEntry {
    pub write: RemoteWrite,
    pub error: String,
    pub failed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayReport {
    pub sent: usize,
    pub failed: usize,
}

/// File-backed list of failed writes, oldest first.
#[derive(Debug)]
pub struct Outbox {
    entries: Vec<OutboxEntry>,
    path: PathBuf,
}

impl Outbox {
    /// Open the outbox in the data directory.
    pub fn open() -> Result<Self> {
        Self::open_at(data_dir()?.join("outbox.json"))
    }

    /// Open an outbox stored at `path`, loading any saved entries.
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self> {
        let mut outbox = Self {
            entries: Vec::new(),
            path: path.into(),
        };
        outbox.load()?;
        Ok(outbox)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[OutboxEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn enqueue(&mut self, write: RemoteWrite, error: impl Into<String>) {
        let error = error.into();
        warn!(write = %write.describe(), %error, "remote write queued for replay");
        self.entries.push(OutboxEntry {
            write,
            error,
            failed_at: Utc::now(),
        });
    }

    /// Take every entry out of the outbox.
    pub fn drain(&mut self) -> Vec<OutboxEntry> {
        std::mem::take(&mut self.entries)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Persist outbox to disk. An empty outbox removes the file.
    pub fn persist(&self) -> Result<()> {
        if self.entries.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path)?;
            }
            return Ok(());
        }
        let data = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }

    fn load(&mut self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let content = std::fs::read_to_string(&self.path)?;
        self.entries = serde_json::from_str(&content)?;
        debug!(entries = self.entries.len(), "outbox loaded");
        Ok(())
    }

    /// Send every entry in order. Entries that fail again stay queued with
    /// their new error; the outbox is persisted afterwards.
    pub async fn replay(&mut self, client: &RestClient) -> Result<ReplayReport> {
        let mut report = ReplayReport::default();
        for entry in self.drain() {
            match entry.write.apply(client).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    report.failed += 1;
                    self.enqueue(entry.write, e.to_string());
                }
            }
        }
        self.persist()?;
        Ok(report)
    }
}
