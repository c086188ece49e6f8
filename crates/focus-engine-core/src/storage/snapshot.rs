//! The persisted application snapshot.
//!
//! One JSON document holds every collection, the settings and the push
//! subscription. It is rewritten whole after each mutation.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use super::settings::Settings;
use crate::error::{DatabaseError, Result};
use crate::notify::PushSubscription;
use crate::store::PlanStore;

/// Storage key of the snapshot document.
pub const SNAPSHOT_KEY: &str = "fe_state";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(flatten)]
    pub plan: PlanStore,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_subscription: Option<PushSubscription>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a stored document. Missing fields fall back to defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| DatabaseError::Corrupt(e.to_string()).into())
    }
}

/// Somewhere a snapshot can be kept between runs.
pub trait SnapshotStore {
    /// Load the last saved snapshot, `None` if nothing was ever saved.
    fn load(&self) -> Result<Option<Snapshot>>;

    fn save(&self, snapshot: &Snapshot) -> Result<()>;

    /// Forget the saved snapshot.
    fn clear(&self) -> Result<()>;
}

/// Snapshot store kept in memory. Used by tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    raw: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a raw document, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.lock().ok().and_then(|guard| guard.clone())
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        match self.raw() {
            Some(raw) => Snapshot::from_json(&raw).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let raw = snapshot.to_json()?;
        let mut guard = self.raw.lock().map_err(|_| DatabaseError::Locked)?;
        *guard = Some(raw);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self.raw.lock().map_err(|_| DatabaseError::Locked)?;
        *guard = None;
        Ok(())
    }
}
