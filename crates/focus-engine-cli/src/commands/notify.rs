//! Study reminders in the terminal.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use clap::Subcommand;
use focus_engine_core::format::parse_minutes;
use focus_engine_core::notify::{self, PushKeys};
use focus_engine_core::{Notification, NotificationCategory, NotificationSink, PushSubscription};
use serde_json::json;

use crate::common::{close_app, open_app, print_json, CliResult};

#[derive(Subcommand)]
pub enum NotifyAction {
    /// Show a reminder, optionally after a delay
    Send {
        /// morning, inactivity, evening, consistency, brain-fog or personal
        category: NotificationCategory,
        /// Wait before showing it, e.g. 30s, 10m, 1h 30m
        #[arg(long)]
        delay: Option<String>,
    },
    /// List the reminders that apply right now
    Check {
        /// Show them as well
        #[arg(long)]
        send: bool,
    },
    /// Register a browser push subscription
    Subscribe {
        /// Push service endpoint URL
        endpoint: String,
        /// Client public key (p256dh)
        #[arg(long)]
        p256dh: String,
        /// Client auth secret
        #[arg(long)]
        auth: String,
    },
    /// Show notification toggles and the push subscription
    Status,
}

/// Prints reminders to stdout.
struct TerminalSink {
    bell: bool,
    json: bool,
}

impl NotificationSink for TerminalSink {
    fn deliver(&self, n: &Notification) {
        let mut out = std::io::stdout().lock();
        if self.json {
            let _ = writeln!(out, "{}", json!(n));
            return;
        }
        if self.bell {
            let _ = write!(out, "\x07");
        }
        let _ = writeln!(out, "{}\n  {}", n.title, n.body);
    }
}

/// Parse `30s`, or anything `parse_minutes` understands.
fn parse_delay(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if let Some(secs) = input.strip_suffix('s') {
        if let Ok(secs) = secs.trim().parse::<u64>() {
            return Ok(Duration::from_secs(secs));
        }
    }
    parse_minutes(input)
        .map(|m| Duration::from_secs(u64::from(m) * 60))
        .ok_or_else(|| format!("invalid delay '{input}'").into())
}

pub async fn run(action: NotifyAction, json: bool) -> CliResult {
    let mut app = open_app()?;
    let sink: Arc<dyn NotificationSink> = Arc::new(TerminalSink {
        bell: app.settings().sound,
        json,
    });

    match action {
        NotifyAction::Send { category, delay } => {
            let notification = app.compose_notification(category)?;
            let delay = delay.as_deref().map(parse_delay).transpose()?.unwrap_or_default();
            notify::schedule(sink, notification, delay).await?;
        }
        NotifyAction::Check { send } => {
            let due = app.due_notifications();
            if send {
                for category in &due {
                    sink.deliver(&app.compose_notification(*category)?);
                }
            } else if json {
                print_json(&due)?;
            } else if due.is_empty() {
                println!("No reminders due.");
            } else {
                for category in &due {
                    println!("{category}");
                }
            }
        }
        NotifyAction::Subscribe {
            endpoint,
            p256dh,
            auth,
        } => {
            app.subscribe_push(PushSubscription {
                endpoint,
                keys: PushKeys { p256dh, auth },
            })?;
            println!("Push subscription saved");
        }
        NotifyAction::Status => {
            let toggles = &app.settings().notifications;
            if json {
                print_json(&json!({
                    "notifications": toggles,
                    "pushSubscription": app.push_subscription(),
                }))?;
            } else {
                for category in NotificationCategory::ALL {
                    let state = if toggles.allows(category) { "on" } else { "off" };
                    println!("{:<12} {state}", category.as_str());
                }
                match app.push_subscription() {
                    Some(sub) => println!("push: {}", sub.endpoint),
                    None => println!("push: not subscribed"),
                }
            }
        }
    }

    close_app(app).await;
    Ok(())
}
