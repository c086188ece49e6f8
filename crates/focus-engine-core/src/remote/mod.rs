//! Remote backend.
//!
//! A PostgREST-style REST API with one table per record type. The client
//! speaks plain JSON rows; the record structs in [`crate::model`] already
//! serialize to the row shape.

mod client;

pub use client::RestClient;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Remote tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Days,
    Tasks,
    Sessions,
    PersonalTasks,
    PushSubscriptions,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Days => "study_days",
            Table::Tasks => "study_tasks",
            Table::Sessions => "focus_sessions",
            Table::PersonalTasks => "personal_tasks",
            Table::PushSubscriptions => "push_subscriptions",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}
