use clap::Subcommand;

use crate::common::{close_app, open_app, personal_id, print_json, short, CliResult};

#[derive(Subcommand)]
pub enum PersonalAction {
    /// Add a personal to-do for today
    Add {
        /// What needs doing
        text: String,
    },
    /// List personal to-dos
    List {
        /// Include to-dos from earlier days
        #[arg(long)]
        all: bool,
    },
    /// Toggle a to-do done/undone
    Toggle {
        /// To-do ID or unique prefix
        id: String,
    },
    /// Delete a to-do
    Delete {
        /// To-do ID or unique prefix
        id: String,
    },
}

pub async fn run(action: PersonalAction, json: bool) -> CliResult {
    let mut app = open_app()?;

    match action {
        PersonalAction::Add { text } => {
            let task = app.add_personal_task(&text)?;
            if json {
                print_json(&task)?;
            } else {
                println!("Added: {}", task.text);
            }
        }
        PersonalAction::List { all } => {
            let today = app.today();
            let items: Vec<_> = app
                .store()
                .personal_tasks()
                .iter()
                .filter(|t| all || t.date == today)
                .collect();
            if json {
                print_json(&items)?;
            } else if items.is_empty() {
                println!("Nothing on your list.");
            } else {
                for t in items {
                    let mark = if t.completed { "x" } else { " " };
                    println!("[{mark}] {}  {}  {}", short(&t.id), t.date, t.text);
                }
            }
        }
        PersonalAction::Toggle { id } => {
            let id = personal_id(&app, &id)?;
            let task = app.toggle_personal_task(&id)?;
            if json {
                print_json(&task)?;
            } else {
                let state = if task.completed { "done" } else { "open" };
                println!("{}: {state}", task.text);
            }
        }
        PersonalAction::Delete { id } => {
            let id = personal_id(&app, &id)?;
            let task = app.delete_personal_task(&id)?;
            if json {
                print_json(&task)?;
            } else {
                println!("Deleted: {}", task.text);
            }
        }
    }

    close_app(app).await;
    Ok(())
}
