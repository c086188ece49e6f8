//! One pending change to the remote backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RemoteError;
use crate::notify::PushSubscription;
use crate::remote::{RestClient, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RemoteWrite {
    Insert { table: Table, row: Value },
    Update { table: Table, id: String, patch: Value },
    Delete { table: Table, id: String },
    UpsertSubscription { subscription: PushSubscription },
}

impl RemoteWrite {
    /// Serialize `record` into an insert for `table`.
    pub fn insert<T: Serialize>(table: Table, record: &T) -> Result<Self, serde_json::Error> {
        Ok(RemoteWrite::Insert {
            table,
            row: serde_json::to_value(record)?,
        })
    }

    pub fn update(table: Table, id: impl Into<String>, patch: Value) -> Self {
        RemoteWrite::Update {
            table,
            id: id.into(),
            patch,
        }
    }

    pub fn delete(table: Table, id: impl Into<String>) -> Self {
        RemoteWrite::Delete {
            table,
            id: id.into(),
        }
    }

    pub fn table(&self) -> Table {
        match self {
            RemoteWrite::Insert { table, .. }
            | RemoteWrite::Update { table, .. }
            | RemoteWrite::Delete { table, .. } => *table,
            RemoteWrite::UpsertSubscription { .. } => Table::PushSubscriptions,
        }
    }

    /// Short human description, e.g. `insert study_days`.
    pub fn describe(&self) -> String {
        let op = match self {
            RemoteWrite::Insert { .. } => "insert",
            RemoteWrite::Update { .. } => "update",
            RemoteWrite::Delete { .. } => "delete",
            RemoteWrite::UpsertSubscription { .. } => "upsert",
        };
        format!("{op} {}", self.table())
    }

    pub async fn apply(&self, client: &RestClient) -> Result<(), RemoteError> {
        match self {
            RemoteWrite::Insert { table, row } => client.insert(*table, row).await.map(drop),
            RemoteWrite::Update { table, id, patch } => {
                client.update(*table, id, patch).await.map(drop)
            }
            RemoteWrite::Delete { table, id } => client.delete(*table, id).await,
            RemoteWrite::UpsertSubscription { subscription } => client
                .upsert_push_subscription(subscription)
                .await
                .map(drop),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Day;
    use serde_json::json;

    #[test]
    fn insert_carries_row_shape() {
        let day = Day::new("Mon", None);
        let write = RemoteWrite::insert(Table::Days, &day).unwrap();
        match &write {
            RemoteWrite::Insert { row, .. } => assert_eq!(row["label"], "Mon"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(write.describe(), "insert study_days");
    }

    #[test]
    fn tagged_json_form() {
        let write = RemoteWrite::update(Table::Tasks, "t1", json!({"status": "completed"}));
        let json = serde_json::to_value(&write).unwrap();
        assert_eq!(json["op"], "update");
        assert_eq!(json["table"], "tasks");
        let back: RemoteWrite = serde_json::from_value(json).unwrap();
        assert_eq!(back, write);
    }
}
