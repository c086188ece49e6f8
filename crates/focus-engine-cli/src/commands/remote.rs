//! Remote backend connection.

use clap::Subcommand;
use focus_engine_core::PullSummary;
use serde_json::json;

use crate::common::{close_app, open_app, print_json, CliResult};

#[derive(Subcommand)]
pub enum RemoteAction {
    /// Connect to a backend, remember it and pull all data
    Connect {
        /// Project URL, e.g. https://xyz.supabase.co
        url: String,
        /// API key
        key: String,
    },
    /// Show the configured backend
    Status,
    /// Forget the backend credentials
    Disconnect,
}

pub fn print_pull(summary: &PullSummary, json: bool) -> CliResult {
    if json {
        return print_json(summary);
    }
    match summary.total() {
        0 => println!("Already synced"),
        n => println!("Sync successful: {n} item(s) synced"),
    }
    for error in &summary.errors {
        eprintln!("  failed: {error}");
    }
    Ok(())
}

pub async fn run(action: RemoteAction, json: bool) -> CliResult {
    let mut app = open_app()?;

    match action {
        RemoteAction::Connect { url, key } => {
            let summary = app.connect_remote(&url, &key).await?;
            if !json {
                println!("Connected to {}", url.trim());
            }
            print_pull(&summary, json)?;
        }
        RemoteAction::Status => {
            let remote = &app.settings().remote;
            let pending = app.outbox().map_or(0, |o| o.len());
            if json {
                print_json(&json!({
                    "configured": remote.is_configured(),
                    "url": remote.url,
                    "pendingWrites": pending,
                }))?;
            } else if remote.is_configured() {
                println!("Remote: {}", remote.url);
                println!("Pending writes: {pending}");
            } else {
                println!("No remote configured.");
            }
        }
        RemoteAction::Disconnect => {
            app.disconnect_remote();
            println!("Remote credentials removed");
        }
    }

    close_app(app).await;
    Ok(())
}
