//! Shared plumbing for CLI commands.

use std::error::Error;
use std::time::Duration;

use chrono::NaiveDate;
use focus_engine_core::{App, Database, Outbox};
use serde::Serialize;
use tracing::warn;

pub type CliResult<T = ()> = Result<T, Box<dyn Error>>;

pub type CliApp = App<Database>;

/// How long the process waits for remote writes before exiting.
const WRITE_SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Open the local database and outbox and attach the configured remote.
pub fn open_app() -> CliResult<CliApp> {
    let db = Database::open()?;
    let outbox = Outbox::open()?;
    let mut app = App::load(db).with_outbox(outbox);
    if let Err(e) = app.attach_configured_remote() {
        warn!(error = %e, "remote configured but unusable, staying local");
    }
    Ok(app)
}

/// Wait for in-flight remote writes and report the ones that failed.
pub async fn close_app(mut app: CliApp) {
    let failed = app.settle_writes(WRITE_SETTLE_TIMEOUT).await;
    if failed > 0 {
        eprintln!("{failed} remote write(s) failed; run `focus-engine sync replay` to retry");
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Resolve a full id from a unique prefix.
pub fn resolve_id<'a, I>(ids: I, prefix: &str, kind: &str) -> CliResult<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(format!("{kind} id must not be empty").into());
    }
    let matches: Vec<&str> = ids.into_iter().filter(|id| id.starts_with(prefix)).collect();
    match matches.as_slice() {
        [] => Err(format!("no {kind} matches '{prefix}'").into()),
        [id] => Ok((*id).to_string()),
        _ if matches.contains(&prefix) => Ok(prefix.to_string()),
        _ => Err(format!("'{prefix}' matches {} {kind}s, use a longer prefix", matches.len()).into()),
    }
}

pub fn day_id(app: &CliApp, prefix: &str) -> CliResult<String> {
    resolve_id(app.store().days().iter().map(|d| d.id.as_str()), prefix, "day")
}

pub fn task_id(app: &CliApp, prefix: &str) -> CliResult<String> {
    resolve_id(app.store().tasks().iter().map(|t| t.id.as_str()), prefix, "task")
}

pub fn personal_id(app: &CliApp, prefix: &str) -> CliResult<String> {
    resolve_id(
        app.store().personal_tasks().iter().map(|t| t.id.as_str()),
        prefix,
        "personal task",
    )
}

/// Parse `YYYY-MM-DD`, `today`, `tomorrow` or `yesterday`.
pub fn parse_date(input: &str, today: NaiveDate) -> CliResult<NaiveDate> {
    match input.trim().to_lowercase().as_str() {
        "today" => Ok(today),
        "tomorrow" => today.succ_opt().ok_or_else(|| "date out of range".into()),
        "yesterday" => today.pred_opt().ok_or_else(|| "date out of range".into()),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .map_err(|_| format!("invalid date '{input}', expected YYYY-MM-DD").into()),
    }
}

/// First eight characters of an id, enough to type back.
pub fn short(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_unique_prefix() {
        let ids = ["abc123", "abd456", "xyz"];
        assert_eq!(resolve_id(ids, "abc", "task").unwrap(), "abc123");
        assert!(resolve_id(ids, "ab", "task").is_err());
        assert!(resolve_id(ids, "q", "task").is_err());
        assert!(resolve_id(ids, "", "task").is_err());
    }

    #[test]
    fn exact_id_wins_over_longer_matches() {
        let ids = ["abc", "abcdef"];
        assert_eq!(resolve_id(ids, "abc", "day").unwrap(), "abc");
    }

    #[test]
    fn relative_dates() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        assert_eq!(parse_date("today", today).unwrap(), today);
        assert_eq!(
            parse_date("tomorrow", today).unwrap(),
            NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()
        );
        assert_eq!(
            parse_date("2026-04-02", today).unwrap(),
            NaiveDate::from_ymd_opt(2026, 4, 2).unwrap()
        );
        assert!(parse_date("02/04/2026", today).is_err());
    }
}
