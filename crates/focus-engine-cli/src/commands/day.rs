//! Study day commands.

use clap::Subcommand;
use focus_engine_core::format::fmt_mins;
use serde::Serialize;

use crate::common::{close_app, day_id, open_app, parse_date, print_json, short, CliResult};

#[derive(Subcommand)]
pub enum DayAction {
    /// Add a study day
    Add {
        /// Day label, e.g. "Day 3" or "Mock review"
        label: String,
        /// Date (YYYY-MM-DD, today, tomorrow); defaults to today
        #[arg(long, conflicts_with = "unscheduled")]
        date: Option<String>,
        /// Add an undated template day
        #[arg(long)]
        unscheduled: bool,
    },
    /// List days with their task counts
    List,
    /// Rename a day
    Rename {
        /// Day ID or unique prefix
        id: String,
        /// New label
        label: String,
    },
    /// Delete a day and all of its tasks
    Delete {
        /// Day ID or unique prefix
        id: String,
    },
}

#[derive(Serialize)]
struct DayRow {
    id: String,
    label: String,
    date: Option<chrono::NaiveDate>,
    tasks: usize,
    done: usize,
    planned_minutes: u64,
}

pub async fn run(action: DayAction, json: bool) -> CliResult {
    let mut app = open_app()?;

    match action {
        DayAction::Add {
            label,
            date,
            unscheduled,
        } => {
            let date = if unscheduled {
                None
            } else {
                Some(match date {
                    Some(d) => parse_date(&d, app.today())?,
                    None => app.today(),
                })
            };
            let day = app.add_day(&label, date)?;
            if json {
                print_json(&day)?;
            } else {
                println!("Day created: {}", day.id);
            }
        }
        DayAction::List => {
            let rows: Vec<DayRow> = app
                .store()
                .days()
                .iter()
                .map(|day| {
                    let tasks: Vec<_> = app.store().tasks_of(&day.id).collect();
                    DayRow {
                        id: day.id.clone(),
                        label: day.label.clone(),
                        date: day.date,
                        tasks: tasks.len(),
                        done: tasks.iter().filter(|t| t.is_completed()).count(),
                        planned_minutes: tasks.iter().map(|t| u64::from(t.estimated_minutes)).sum(),
                    }
                })
                .collect();
            if json {
                print_json(&rows)?;
            } else if rows.is_empty() {
                println!("No days planned yet.");
            } else {
                for row in &rows {
                    let date = row
                        .date
                        .map(|d| d.format("%a %d %b").to_string())
                        .unwrap_or_else(|| "unscheduled".into());
                    println!(
                        "{}  {:<12} {:<20} {}/{} tasks  {}",
                        short(&row.id),
                        date,
                        row.label,
                        row.done,
                        row.tasks,
                        fmt_mins(row.planned_minutes)
                    );
                }
            }
        }
        DayAction::Rename { id, label } => {
            let id = day_id(&app, &id)?;
            let day = app.rename_day(&id, &label)?;
            if json {
                print_json(&day)?;
            } else {
                println!("Day renamed: {}", day.label);
            }
        }
        DayAction::Delete { id } => {
            let id = day_id(&app, &id)?;
            let removal = app.delete_day(&id)?;
            if json {
                print_json(&serde_json::json!({
                    "day": removal.day,
                    "removed_tasks": removal.removed_task_ids,
                }))?;
            } else {
                println!(
                    "Deleted \"{}\" and {} task(s)",
                    removal.day.label,
                    removal.removed_task_ids.len()
                );
            }
        }
    }

    close_app(app).await;
    Ok(())
}
