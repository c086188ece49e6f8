//! Sync subcommand.
//!
//! Writes are pushed as they happen; these commands cover the rest: a full
//! pull from the backend and a manual replay of failed writes.

use clap::Subcommand;
use focus_engine_core::RemoteError;

use super::remote::print_pull;
use crate::common::{close_app, open_app, print_json, CliApp, CliResult};

#[derive(Subcommand)]
pub enum SyncAction {
    /// Replace local data with the remote copy
    Pull,
    /// Retry remote writes that failed earlier
    Replay,
    /// List remote writes waiting for a replay
    Status,
}

fn require_remote(app: &CliApp) -> CliResult {
    if app.is_syncing() {
        Ok(())
    } else {
        Err(RemoteError::NotConnected.into())
    }
}

pub async fn run(action: SyncAction, json: bool) -> CliResult {
    let mut app = open_app()?;

    match action {
        SyncAction::Pull => {
            require_remote(&app)?;
            let summary = app.pull().await?;
            print_pull(&summary, json)?;
        }
        SyncAction::Replay => {
            require_remote(&app)?;
            let report = app.replay_outbox().await?;
            if json {
                print_json(&report)?;
            } else {
                println!("Replayed {} write(s), {} still failing", report.sent, report.failed);
            }
        }
        SyncAction::Status => {
            let entries = app.outbox().map(|o| o.entries()).unwrap_or_default();
            if json {
                print_json(entries)?;
            } else if entries.is_empty() {
                println!("Nothing waiting to sync.");
            } else {
                for entry in entries {
                    println!(
                        "{}  {:<24} {}",
                        entry.failed_at.format("%Y-%m-%d %H:%M"),
                        entry.write.describe(),
                        entry.error
                    );
                }
            }
        }
    }

    close_app(app).await;
    Ok(())
}
