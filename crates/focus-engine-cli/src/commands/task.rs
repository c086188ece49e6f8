//! Study task commands.

use clap::Subcommand;
use focus_engine_core::format::{fmt_mins, parse_minutes};
use focus_engine_core::Task;

use crate::common::{close_app, day_id, open_app, print_json, short, task_id, CliApp, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to a day
    Add {
        /// Day ID or unique prefix
        day: String,
        /// Subject (Quant, LR, AR, VA, Practice, Other or any text)
        subject: String,
        /// Topic
        topic: String,
        /// Estimate, e.g. 45, 45m, 1h 30m
        minutes: String,
    },
    /// List tasks
    List {
        /// Only tasks of this day (ID or unique prefix)
        #[arg(long)]
        day: Option<String>,
        /// Only pending tasks
        #[arg(long)]
        pending: bool,
    },
    /// Edit topic and/or estimate
    Edit {
        /// Task ID or unique prefix
        id: String,
        /// New topic
        #[arg(long)]
        topic: Option<String>,
        /// New estimate
        #[arg(long)]
        minutes: Option<String>,
    },
    /// Toggle a task between pending and completed
    Toggle {
        /// Task ID or unique prefix
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID or unique prefix
        id: String,
    },
    /// Move a task to another day
    Move {
        /// Task ID or unique prefix
        id: String,
        /// Target day ID or unique prefix
        day: String,
    },
}

/// Parse an estimate. Negative numbers are passed through so validation
/// can report them.
fn estimate(input: &str) -> CliResult<i64> {
    if let Ok(n) = input.trim().parse::<i64>() {
        return Ok(n);
    }
    parse_minutes(input)
        .map(i64::from)
        .ok_or_else(|| format!("invalid estimate '{input}', expected e.g. 45, 45m or 1h 30m").into())
}

fn print_task(app: &CliApp, task: &Task) {
    let day = app
        .store()
        .day(&task.day_id)
        .map(|d| d.label.as_str())
        .unwrap_or("?");
    let mark = if task.is_completed() { "x" } else { " " };
    println!(
        "[{mark}] {}  {:<8} {:<28} {:>7}  {}",
        short(&task.id),
        task.subject,
        task.topic,
        fmt_mins(task.estimated_minutes.into()),
        day
    );
}

pub async fn run(action: TaskAction, json: bool) -> CliResult {
    let mut app = open_app()?;

    match action {
        TaskAction::Add {
            day,
            subject,
            topic,
            minutes,
        } => {
            let day = day_id(&app, &day)?;
            let task = app.add_task(&day, &subject, &topic, estimate(&minutes)?)?;
            if json {
                print_json(&task)?;
            } else {
                println!("Task created: {}", task.id);
            }
        }
        TaskAction::List { day, pending } => {
            let day = day.map(|d| day_id(&app, &d)).transpose()?;
            let tasks: Vec<&Task> = app
                .store()
                .tasks()
                .iter()
                .filter(|t| day.as_deref().map_or(true, |d| t.day_id == d))
                .filter(|t| !pending || !t.is_completed())
                .collect();
            if json {
                print_json(&tasks)?;
            } else if tasks.is_empty() {
                println!("No tasks.");
            } else {
                for task in tasks {
                    print_task(&app, task);
                }
            }
        }
        TaskAction::Edit { id, topic, minutes } => {
            if topic.is_none() && minutes.is_none() {
                return Err("nothing to change, pass --topic and/or --minutes".into());
            }
            let id = task_id(&app, &id)?;
            let minutes = minutes.as_deref().map(estimate).transpose()?;
            let task = app.edit_task(&id, topic.as_deref(), minutes)?;
            if json {
                print_json(&task)?;
            } else {
                print_task(&app, &task);
            }
        }
        TaskAction::Toggle { id } => {
            let id = task_id(&app, &id)?;
            let task = app.toggle_task(&id)?;
            if json {
                print_json(&task)?;
            } else {
                print_task(&app, &task);
            }
        }
        TaskAction::Delete { id } => {
            let id = task_id(&app, &id)?;
            let task = app.delete_task(&id)?;
            if json {
                print_json(&task)?;
            } else {
                println!("Task deleted: {}", task.topic);
            }
        }
        TaskAction::Move { id, day } => {
            let id = task_id(&app, &id)?;
            let day = day_id(&app, &day)?;
            let task = app.reassign_task(&id, &day)?;
            if json {
                print_json(&task)?;
            } else {
                print_task(&app, &task);
            }
        }
    }

    close_app(app).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimates() {
        assert_eq!(estimate("45").unwrap(), 45);
        assert_eq!(estimate("1h 30m").unwrap(), 90);
        assert_eq!(estimate("-5").unwrap(), -5);
        assert!(estimate("soon").is_err());
    }
}
