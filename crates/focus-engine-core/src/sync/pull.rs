//! Pull every collection from the backend at once.

use serde::Serialize;
use tracing::warn;

use crate::error::RemoteError;
use crate::model::{Day, PersonalTask, Session, Task};
use crate::remote::{RestClient, Table};

/// Result of pulling each table. A failed table leaves the local
/// collection untouched.
#[derive(Debug)]
pub struct RemotePull {
    pub days: Result<Vec<Day>, RemoteError>,
    pub tasks: Result<Vec<Task>, RemoteError>,
    pub sessions: Result<Vec<Session>, RemoteError>,
    pub personal_tasks: Result<Vec<PersonalTask>, RemoteError>,
}

/// Rows received per table; `None` where the pull failed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PullSummary {
    pub days: Option<usize>,
    pub tasks: Option<usize>,
    pub sessions: Option<usize>,
    pub personal_tasks: Option<usize>,
    pub errors: Vec<String>,
}

impl PullSummary {
    pub fn total(&self) -> usize {
        [self.days, self.tasks, self.sessions, self.personal_tasks]
            .iter()
            .flatten()
            .sum()
    }
}

pub async fn pull_all(client: &RestClient) -> RemotePull {
    let (days, tasks, sessions, personal_tasks) = tokio::join!(
        client.list::<Day>(Table::Days),
        client.list::<Task>(Table::Tasks),
        client.list::<Session>(Table::Sessions),
        client.list::<PersonalTask>(Table::PersonalTasks),
    );
    for (table, err) in [
        (Table::Days, days.as_ref().err()),
        (Table::Tasks, tasks.as_ref().err()),
        (Table::Sessions, sessions.as_ref().err()),
        (Table::PersonalTasks, personal_tasks.as_ref().err()),
    ] {
        if let Some(err) = err {
            warn!(table = %table, error = %err, "remote pull failed");
        }
    }
    RemotePull {
        days,
        tasks,
        sessions,
        personal_tasks,
    }
}
