use clap::Subcommand;

use crate::common::{open_app, print_json, CliResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a setting
    Get {
        /// Setting key (e.g. "dayEndTime", "notifications.brainFog")
        key: String,
    },
    /// Set a setting
    Set {
        /// Setting key
        key: String,
        /// New value
        value: String,
    },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> CliResult {
    let mut app = open_app()?;

    match action {
        ConfigAction::Get { key } => match app.settings().get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown key: {key}").into()),
        },
        ConfigAction::Set { key, value } => {
            app.set_setting(&key, &value)?;
            println!("ok");
        }
        ConfigAction::List => {
            print_json(app.settings())?;
        }
        ConfigAction::Reset => {
            app.reset_settings();
            println!("settings reset to defaults");
        }
    }
    Ok(())
}

/// Wipe local records. Settings and the remote copy are kept.
pub fn clear(yes: bool) -> CliResult {
    if !yes {
        return Err("this deletes all local days, tasks, sessions and to-dos; pass --yes to confirm".into());
    }
    let mut app = open_app()?;
    app.clear_data();
    println!("Data cleared");
    Ok(())
}
