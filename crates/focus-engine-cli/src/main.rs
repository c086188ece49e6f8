use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "focus-engine", version, about = "Focus Engine study planner")]
struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Study day management
    Day {
        #[command(subcommand)]
        action: commands::day::DayAction,
    },
    /// Study task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Personal to-dos
    Personal {
        #[command(subcommand)]
        action: commands::personal::PersonalAction,
    },
    /// Focus sessions
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Today's plan and progress
    Today,
    /// Overdue pending tasks
    Backlog,
    /// Weekly metrics and subject distribution
    Progress,
    /// Time left in the study day
    Clock,
    /// Import a plan from a CSV file
    Import {
        /// Path to a .csv file with day,subject,topic,estimated_minutes
        path: std::path::PathBuf,
    },
    /// Settings management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Remote backend connection
    Remote {
        #[command(subcommand)]
        action: commands::remote::RemoteAction,
    },
    /// Remote synchronization
    Sync {
        #[command(subcommand)]
        action: commands::sync::SyncAction,
    },
    /// Study reminders
    Notify {
        #[command(subcommand)]
        action: commands::notify::NotifyAction,
    },
    /// Delete all local days, tasks, sessions and personal to-dos
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FOCUS_ENGINE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let json = cli.json;
    let result = match cli.command {
        Commands::Day { action } => commands::day::run(action, json).await,
        Commands::Task { action } => commands::task::run(action, json).await,
        Commands::Personal { action } => commands::personal::run(action, json).await,
        Commands::Session { action } => commands::session::run(action, json).await,
        Commands::Today => commands::view::today(json),
        Commands::Backlog => commands::view::backlog(json),
        Commands::Progress => commands::view::progress(json),
        Commands::Clock => commands::view::clock(json),
        Commands::Import { path } => commands::import::run(&path, json).await,
        Commands::Config { action } => commands::config::run(action),
        Commands::Remote { action } => commands::remote::run(action, json).await,
        Commands::Sync { action } => commands::sync::run(action, json).await,
        Commands::Notify { action } => commands::notify::run(action, json).await,
        Commands::Clear { yes } => commands::config::clear(yes),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "focus-engine", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
