//! Remote synchronization.
//!
//! - [`RemoteWrite`]: one change destined for the backend
//! - [`SyncDispatcher`]: fire-and-forget delivery of writes
//! - [`Outbox`]: failed writes kept on disk until `sync replay`
//! - [`pull_all`]: concurrent download of every collection

mod dispatcher;
mod outbox;
mod pull;
mod write;

pub use dispatcher::{FailedWrite, SyncDispatcher};
pub use outbox::{Outbox, OutboxEntry, ReplayReport};
pub use pull::{pull_all, PullSummary, RemotePull};
pub use write::RemoteWrite;
