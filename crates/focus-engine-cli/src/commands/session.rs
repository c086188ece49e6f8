//! Focus session commands.
//!
//! `session start` runs the timer in the foreground. The display refreshes
//! once a second; elapsed time always comes from the session's stored
//! instants. Commands are read line by line from stdin:
//! `p` toggles pause, `e`/`q`/empty line or end of input ends the session.

use std::io::Write;
use std::time::Duration;

use chrono::{NaiveDate, TimeDelta};
use clap::Subcommand;
use focus_engine_core::format::{fmt_mins, fmt_time};
use focus_engine_core::{Event, Session};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::common::{close_app, open_app, print_json, short, task_id, CliApp, CliResult};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Start a focus session (defaults to the first pending task)
    Start {
        /// Task ID or unique prefix
        task: Option<String>,
    },
    /// Tasks you can focus on now: today's pending, then the backlog
    Candidates,
    /// Recorded focus sessions
    List {
        /// Only sessions from the last N days
        #[arg(long)]
        days: Option<i64>,
    },
}

enum Input {
    TogglePause,
    End,
    Unknown,
}

fn parse_input(line: &str) -> Input {
    match line.trim().to_lowercase().as_str() {
        "p" | "pause" | "r" | "resume" => Input::TogglePause,
        "" | "e" | "end" | "q" | "quit" => Input::End,
        _ => Input::Unknown,
    }
}

fn render(event: &Event, json: bool) -> CliResult {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }
    match event {
        Event::SessionStarted { subject, topic, .. } => {
            println!("Focusing on {subject}: {topic}");
            println!("[p] pause/resume  [e] end");
        }
        Event::SessionPaused { elapsed_secs, .. } => {
            println!("\rPaused at {}", fmt_time(*elapsed_secs));
        }
        Event::SessionResumed { paused_secs, .. } => {
            println!("\rResumed after a {} pause", fmt_time(*paused_secs));
        }
        Event::SessionEnded {
            duration_secs,
            task_completed,
            ..
        } => {
            println!("\rSession saved: {}", fmt_time(*duration_secs));
            if *task_completed {
                println!("Task completed!");
            }
        }
        Event::SessionDiscarded { elapsed_secs, .. } => {
            println!("\rSession too short to save ({}s)", elapsed_secs);
        }
        Event::StateSnapshot { elapsed_secs, .. } => {
            print!("\r{}   ", fmt_time(*elapsed_secs));
            std::io::stdout().flush()?;
        }
    }
    Ok(())
}

/// Runs the timer until the user ends it. The session is ended and saved
/// even when reading input fails; that error is returned afterwards.
async fn focus(app: &mut CliApp, task: &str, json: bool) -> CliResult {
    let started = app.start_session(task)?;
    render(&started, json)?;

    let outcome = drive(app, json).await;

    let ended = app.end_session()?;
    if app.settings().sound && !json {
        print!("\x07");
    }
    render(&ended, json)?;
    outcome
}

async fn drive(app: &mut CliApp, json: bool) -> CliResult {
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if app.tick().is_some() && !json {
                    render(&app.session_snapshot(), json)?;
                }
            }
            line = lines.next_line() => {
                let input = match line? {
                    Some(line) => parse_input(&line),
                    None => Input::End,
                };
                match input {
                    Input::TogglePause => render(&app.toggle_pause()?, json)?,
                    Input::End => break,
                    Input::Unknown => eprintln!("\r[p] pause/resume  [e] end"),
                }
            }
        }
    }
    Ok(())
}

/// First date of a trailing `days`-day window ending today. `None` when the
/// window reaches past the earliest representable date.
fn window_start(today: NaiveDate, days: i64) -> Option<NaiveDate> {
    TimeDelta::try_days(days.max(1) - 1).and_then(|back| today.checked_sub_signed(back))
}

fn print_session(s: &Session) {
    println!(
        "{}  {}  {:<8} {:<28} {}",
        short(&s.id),
        s.session_date,
        s.subject,
        s.topic,
        fmt_time(s.duration_seconds)
    );
}

pub async fn run(action: SessionAction, json: bool) -> CliResult {
    let mut app = open_app()?;
    let outcome = dispatch(&mut app, action, json).await;
    close_app(app).await;
    outcome
}

async fn dispatch(app: &mut CliApp, action: SessionAction, json: bool) -> CliResult {
    match action {
        SessionAction::Start { task } => {
            let id = match task {
                Some(prefix) => task_id(app, &prefix)?,
                None => app
                    .session_candidates()
                    .first()
                    .map(|t| t.id.clone())
                    .ok_or("no pending tasks for today or in the backlog")?,
            };
            focus(app, &id, json).await?;
        }
        SessionAction::Candidates => {
            let candidates = app.session_candidates();
            if json {
                print_json(&candidates)?;
            } else if candidates.is_empty() {
                println!("No pending tasks for today or in the backlog.");
            } else {
                for (i, t) in candidates.iter().enumerate() {
                    println!(
                        "{:>2}. {}  {:<8} {:<28} {}",
                        i + 1,
                        short(&t.id),
                        t.subject,
                        t.topic,
                        fmt_mins(t.estimated_minutes.into())
                    );
                }
            }
        }
        SessionAction::List { days } => {
            let since = days.and_then(|n| window_start(app.today(), n));
            let sessions: Vec<&Session> = app
                .store()
                .sessions()
                .iter()
                .filter(|s| since.map_or(true, |d| s.session_date >= d))
                .collect();
            if json {
                print_json(&sessions)?;
            } else if sessions.is_empty() {
                println!("No sessions recorded.");
            } else {
                for s in sessions {
                    print_session(s);
                }
            }
        }
    }
    Ok(())
}
