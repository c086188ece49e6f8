//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::TempDir;

struct Cli {
    home: TempDir,
}

impl Cli {
    fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("tempdir"),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_focus-engine"));
        cmd.args(args)
            .env("FOCUS_ENGINE_HOME", self.home.path())
            .env_remove("FOCUS_ENGINE_ENV")
            .env("FOCUS_ENGINE_LOG", "off");
        cmd
    }

    /// Run a CLI command and return (stdout, stderr, exit code).
    fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = self.command(args).output().expect("Failed to execute CLI command");
        (
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
            output.status.code().unwrap_or(-1),
        )
    }

    fn run_with_stdin(&self, args: &[&str], input: &str) -> (String, String, i32) {
        self.run_with_stdin_bytes(args, input.as_bytes())
    }

    fn run_with_stdin_bytes(&self, args: &[&str], input: &[u8]) -> (String, String, i32) {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn CLI");
        child
            .stdin
            .take()
            .expect("stdin")
            .write_all(input)
            .expect("write stdin");
        let output = child.wait_with_output().expect("wait");
        (
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
            output.status.code().unwrap_or(-1),
        )
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        let mut full = args.to_vec();
        full.push("--json");
        let (stdout, stderr, code) = self.run(&full);
        assert_eq!(code, 0, "{args:?} failed: {stderr}");
        serde_json::from_str(&stdout).expect("valid JSON output")
    }

    fn add_day(&self, label: &str) -> String {
        self.json(&["day", "add", label])["id"]
            .as_str()
            .expect("day id")
            .to_string()
    }

    fn add_task(&self, day: &str, minutes: &str) -> String {
        self.json(&["task", "add", day, "Quant", "Ratios", minutes])["id"]
            .as_str()
            .expect("task id")
            .to_string()
    }

    fn path(&self, name: &str) -> std::path::PathBuf {
        self.home.path().join(name)
    }
}

fn write_file(path: &Path, contents: &str) {
    std::fs::write(path, contents).expect("write file");
}

#[test]
fn test_day_add_and_list() {
    let cli = Cli::new();
    let id = cli.add_day("Day 1");

    let days = cli.json(&["day", "list"]);
    let days = days.as_array().unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0]["id"], id.as_str());
    assert_eq!(days[0]["label"], "Day 1");
    assert_eq!(days[0]["tasks"], 0);
}

#[test]
fn test_day_list_empty() {
    let cli = Cli::new();
    let (stdout, _, code) = cli.run(&["day", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("No days planned yet."));
}

#[test]
fn test_day_add_rejects_blank_label() {
    let cli = Cli::new();
    let (_, stderr, code) = cli.run(&["day", "add", "   "]);
    assert_eq!(code, 1);
    assert!(stderr.contains("must not be empty"), "{stderr}");
}

#[test]
fn test_task_add_accepts_duration_strings() {
    let cli = Cli::new();
    let day = cli.add_day("Day 1");
    cli.add_task(&day, "1h 30m");

    let tasks = cli.json(&["task", "list"]);
    assert_eq!(tasks[0]["estimated_minutes"], 90);
    assert_eq!(tasks[0]["status"], "pending");
}

#[test]
fn test_task_add_rejects_non_positive_minutes() {
    let cli = Cli::new();
    let day = cli.add_day("Day 1");

    let (_, stderr, code) = cli.run(&["task", "add", &day, "Quant", "Ratios", "--", "-5"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("must be positive"), "{stderr}");

    let (_, stderr, code) = cli.run(&["task", "add", &day, "Quant", "Ratios", "soon"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("invalid estimate"), "{stderr}");

    assert_eq!(cli.json(&["task", "list"]).as_array().unwrap().len(), 0);
}

#[test]
fn test_task_toggle_by_prefix() {
    let cli = Cli::new();
    let day = cli.add_day("Day 1");
    let task = cli.add_task(&day, "30");

    let (_, stderr, code) = cli.run(&["task", "toggle", &task[..8]]);
    assert_eq!(code, 0, "{stderr}");
    assert_eq!(cli.json(&["task", "list"])[0]["status"], "completed");
}

#[test]
fn test_day_delete_removes_tasks() {
    let cli = Cli::new();
    let day = cli.add_day("Day 1");
    cli.add_task(&day, "30");
    cli.add_task(&day, "45");

    let (stdout, _, code) = cli.run(&["day", "delete", &day]);
    assert_eq!(code, 0);
    assert!(stdout.contains("2 task(s)"));
    assert_eq!(cli.json(&["task", "list"]).as_array().unwrap().len(), 0);
}

#[test]
fn test_short_session_is_discarded() {
    let cli = Cli::new();
    let day = cli.add_day("Day 1");
    let task = cli.add_task(&day, "30");

    let (stdout, stderr, code) = cli.run_with_stdin(&["session", "start", &task], "e\n");
    assert_eq!(code, 0, "{stderr}");
    assert!(stdout.contains("Focusing on Quant: Ratios"));
    assert!(stdout.contains("too short"), "{stdout}");
    assert_eq!(cli.json(&["session", "list"]).as_array().unwrap().len(), 0);
}

#[test]
fn test_session_ends_when_input_is_unreadable() {
    let cli = Cli::new();
    let day = cli.add_day("Day 1");
    let task = cli.add_task(&day, "30");

    let (stdout, stderr, code) =
        cli.run_with_stdin_bytes(&["session", "start", &task], b"\xff\xfe\n");
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"), "{stderr}");
    assert!(stdout.contains("too short"), "{stdout}");
}

#[test]
fn test_session_list_with_huge_day_window() {
    let cli = Cli::new();
    for days in ["7", "100000000", "9223372036854775807"] {
        let (stdout, stderr, code) = cli.run(&["session", "list", "--days", days]);
        assert_eq!(code, 0, "--days {days}: {stderr}");
        assert!(stdout.contains("No sessions recorded."), "{stdout}");
    }
}

#[test]
fn test_session_start_without_tasks_fails() {
    let cli = Cli::new();
    let (_, stderr, code) = cli.run(&["session", "start"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("no pending tasks"));
}

#[test]
fn test_csv_import() {
    let cli = Cli::new();
    let csv = cli.path("plan.csv");
    write_file(
        &csv,
        "Day,Subject,Topic,Estimated Minutes\n\
         Day 1,Quant,Ratios,45\n\
         Day 1,LR,Seating,30\n\
         Day 2,VA,Reading,60\n",
    );

    let summary = cli.json(&["import", csv.to_str().unwrap()]);
    assert_eq!(summary["days_added"], 2);
    assert_eq!(summary["tasks_added"], 3);

    let days = cli.json(&["day", "list"]);
    assert_eq!(days.as_array().unwrap().len(), 2);
}

#[test]
fn test_csv_import_failure_changes_nothing() {
    let cli = Cli::new();
    let csv = cli.path("plan.csv");
    write_file(&csv, "day,subject,topic,estimated_minutes\nDay 1,Quant,Ratios,zero\n");

    let (_, stderr, code) = cli.run(&["import", csv.to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Validation failed"), "{stderr}");
    assert_eq!(cli.json(&["day", "list"]).as_array().unwrap().len(), 0);
}

#[test]
fn test_import_rejects_other_extensions() {
    let cli = Cli::new();
    let path = cli.path("plan.txt");
    write_file(&path, "day,subject,topic,estimated_minutes\n");

    let (_, stderr, code) = cli.run(&["import", path.to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Not a CSV file"), "{stderr}");
}

#[test]
fn test_config_get_set() {
    let cli = Cli::new();
    let (stdout, _, code) = cli.run(&["config", "get", "dayEndTime"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("23:00"));

    let (_, _, code) = cli.run(&["config", "set", "dayEndTime", "22:30"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = cli.run(&["config", "get", "dayEndTime"]);
    assert!(stdout.contains("22:30"));

    let (_, _, code) = cli.run(&["config", "set", "dayEndTime", "late"]);
    assert_eq!(code, 1);

    let (_, stderr, code) = cli.run(&["config", "get", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_clear_requires_confirmation() {
    let cli = Cli::new();
    cli.add_day("Day 1");
    cli.run(&["config", "set", "theme", "calm"]);

    let (_, stderr, code) = cli.run(&["clear"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("--yes"));
    assert_eq!(cli.json(&["day", "list"]).as_array().unwrap().len(), 1);

    let (stdout, _, code) = cli.run(&["clear", "--yes"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Data cleared"));
    assert_eq!(cli.json(&["day", "list"]).as_array().unwrap().len(), 0);

    let (stdout, _, _) = cli.run(&["config", "get", "theme"]);
    assert!(stdout.contains("calm"));
}

#[test]
fn test_sync_pull_requires_remote() {
    let cli = Cli::new();
    let (_, stderr, code) = cli.run(&["sync", "pull"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Not connected"), "{stderr}");
}

#[test]
fn test_remote_status_unconfigured() {
    let cli = Cli::new();
    let status = cli.json(&["remote", "status"]);
    assert_eq!(status["configured"], false);
}

#[test]
fn test_notify_disabled_category() {
    let cli = Cli::new();
    let (_, _, code) = cli.run(&["config", "set", "notifications.brainFog", "true"]);
    assert_eq!(code, 0);

    let (_, stderr, code) = cli.run(&["notify", "send", "evening"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("disabled"), "{stderr}");

    let (stdout, _, code) = cli.run(&["notify", "send", "brain-fog"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Focus Engine"));
}

#[test]
fn test_completions() {
    let cli = Cli::new();
    let (stdout, _, code) = cli.run(&["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("focus-engine"));
}
