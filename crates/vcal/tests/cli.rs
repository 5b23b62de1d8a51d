//! End-to-end tests that run the `vcal` binary against a temporary vault.
//!
//! Each test gets its own vault and config file, passed through the
//! environment, so tests run in parallel.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

const TODAY: &str = "2024-03-15";

struct TestVault {
    dir: TempDir,
    config: PathBuf,
}

impl TestVault {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config").join("config.toml");
        fs::create_dir_all(dir.path().join("vault")).unwrap();
        Self { dir, config }
    }

    fn root(&self) -> PathBuf {
        self.dir.path().join("vault")
    }

    fn write(&self, path: &str, content: &str) {
        let full = self.root().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, content).unwrap();
    }

    fn read(&self, path: &str) -> String {
        fs::read_to_string(self.root().join(path)).unwrap()
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_vcal"));
        cmd.args(args)
            .env("VCAL_CONFIG", &self.config)
            .env("VCAL_VAULT", self.root())
            .env("VCAL_TODAY", TODAY)
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command(args).output().unwrap()
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let mut full = vec!["--json"];
        full.extend_from_slice(args);
        let output = self.run(&full);
        assert!(
            output.status.success(),
            "vcal {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn exists(root: &Path, path: &str) -> bool {
    root.join(path).exists()
}

#[test]
fn test_add_list_complete_reopen() {
    let vault = TestVault::new();

    let added = vault.run_json(&["add", "Buy milk", "--due", TODAY, "--priority", "high"]);
    assert_eq!(added["path"], "2024-03-15.md");
    assert_eq!(added["text"], "Buy milk 📅 2024-03-15 #high");
    assert_eq!(vault.read("2024-03-15.md"), "- [ ] Buy milk 📅 2024-03-15 #high\n");

    let listed = vault.run_json(&["tasks"]);
    let tasks = listed["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["clean_text"], "Buy milk #high");
    assert_eq!(tasks[0]["due"], TODAY);

    let done = vault.run_json(&[
        "done",
        "--path",
        "2024-03-15.md",
        "Buy milk 📅 2024-03-15 #high",
    ]);
    assert_eq!(done["status"], "completed");
    assert_eq!(vault.read("2024-03-15.md"), "- [x] Buy milk 📅 2024-03-15 #high\n");

    // Completed tasks are hidden by the default status filter
    let listed = vault.run_json(&["tasks"]);
    assert_eq!(listed["tasks"], serde_json::json!([]));
    let listed = vault.run_json(&["tasks", "--status", "done"]);
    assert_eq!(listed["tasks"][0]["completed"], true);

    vault.run_json(&["reopen", "--path", "2024-03-15.md", "Buy milk 📅 2024-03-15 #high"]);
    assert_eq!(vault.read("2024-03-15.md"), "- [ ] Buy milk 📅 2024-03-15 #high\n");
}

#[test]
fn test_tasks_filter_and_period() {
    let vault = TestVault::new();
    vault.write(
        "work/plan.md",
        "# Plan\n- [ ] Ship release 📅 2024-03-14\n- [ ] Write notes #someday\n",
    );
    vault.write("home/list.md", "- [ ] Water plants due: 2024-03-20\n");

    // Day view: due by today or undated
    let listed = vault.run_json(&["tasks"]);
    let texts: Vec<&str> = listed["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["clean_text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["Ship release", "Write notes #someday"]);

    let listed = vault.run_json(&["tasks", "--filter", "work and !#someday"]);
    assert_eq!(listed["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(listed["tasks"][0]["path"], "work/plan.md");

    // Week view: due within Monday 03-11 .. Sunday 03-17
    let listed = vault.run_json(&["tasks", "--period", "week"]);
    assert_eq!(listed["range"]["start"], "2024-03-11");
    assert_eq!(listed["range"]["end"], "2024-03-17");
    assert_eq!(listed["tasks"].as_array().unwrap().len(), 1);

    let listed = vault.run_json(&["tasks", "--period", "month"]);
    assert_eq!(listed["tasks"].as_array().unwrap().len(), 2);
}

#[test]
fn test_done_missing_task() {
    let vault = TestVault::new();
    vault.write("a.md", "- [ ] Other task\n");

    let output = vault.run(&["--json", "done", "--path", "a.md", "Buy milk"]);
    assert_eq!(output.status.code(), Some(4));
    let error: Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(error["error"]["code"], "TASK_NOT_FOUND");
    assert_eq!(vault.read("a.md"), "- [ ] Other task\n");
}

#[test]
fn test_note_commands() {
    let vault = TestVault::new();
    vault.write("templates/weekly.md", "# Week\n");

    let output = vault.run(&["config", "set", "weekly.save_path", "periodic/weekly"]);
    assert!(output.status.success());
    let output = vault.run(&["config", "set", "weekly.template_path", "templates/weekly"]);
    assert!(output.status.success());

    let path = vault.run_json(&["note", "path", "weekly", "--date", "2021-01-01"]);
    assert_eq!(path["path"], "periodic/weekly/2020-W53.md");
    assert_eq!(path["exists"], false);

    let created = vault.run_json(&["note", "create", "weekly", "--date", "2021-01-01"]);
    assert_eq!(created["created"], true);
    assert_eq!(vault.read("periodic/weekly/2020-W53.md"), "# Week\n");

    let output = vault.run(&["--json", "note", "create", "weekly", "--date", "2021-01-01"]);
    assert_eq!(output.status.code(), Some(1));
    let error: Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(error["error"]["code"], "NOTE_EXISTS");

    let opened = vault.run(&["note", "open-or-create", "daily"]);
    assert!(opened.status.success());
    assert!(stdout(&opened).trim_end().ends_with("2024-03-15.md"));
    assert!(exists(&vault.root(), "2024-03-15.md"));
}

#[test]
fn test_month_view() {
    let vault = TestVault::new();
    vault.write("2024-03-10.md", "- [ ] Pay rent 📅 2024-03-15\n");

    let output = vault.run(&["month"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("March 2024\n"));
    assert!(text.contains("10*"));
    assert!(text.contains("Tasks for 2024-03-15"));
    assert!(text.contains("Pay rent"));

    let update = vault.run_json(&["month", "--offset", "-1"]);
    assert_eq!(update["calendar"]["month"], 2);
    assert_eq!(update["calendar"]["year"], 2024);
}

#[test]
fn test_holidays_annotate_month() {
    let vault = TestVault::new();
    vault.write(
        "holidays.toml",
        "workdays = [\"2024-02-04\"]\n\n[[holidays]]\nname = \"Spring Festival\"\nstart = \"2024-02-10\"\nend = \"2024-02-17\"\n",
    );
    let output = vault.run(&["config", "set", "calendar.holidays", "holidays.toml"]);
    assert!(output.status.success());

    let update = vault.run_json(&["month", "--date", "2024-02-10"]);
    let days: Vec<&Value> = update["calendar"]["weeks"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|w| w["days"].as_array().unwrap())
        .collect();
    let festival = days.iter().find(|d| d["date"] == "2024-02-10").unwrap();
    assert_eq!(festival["workday"], "rest");
    assert_eq!(festival["label"]["text"], "Spring Festival");
    let workday = days.iter().find(|d| d["date"] == "2024-02-04").unwrap();
    assert_eq!(workday["workday"], "work");
}

#[test]
fn test_year_and_week() {
    let vault = TestVault::new();
    vault.write("2024.md", "");
    vault.write("2024-03-01.md", "");

    let year = vault.run_json(&["year"]);
    assert_eq!(year["year"], 2024);
    assert_eq!(year["yearly_note"], true);
    assert_eq!(year["months"][2]["days_with_notes"], serde_json::json!([1]));

    let week = vault.run_json(&["week", "--date", "2021-01-01"]);
    assert_eq!(week["week"], 53);
    assert_eq!(week["iso_year"], 2020);
}

#[test]
fn test_missing_vault_is_config_error() {
    let vault = TestVault::new();
    let output = vault
        .command(&["--json", "tasks"])
        .env_remove("VCAL_VAULT")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(5));
    let error: Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(error["error"]["code"], "CONFIG_ERROR");
}

#[test]
fn test_config_roundtrip() {
    let vault = TestVault::new();

    let output = vault.run(&["config", "set", "tasks.status", "all"]);
    assert!(output.status.success());
    let output = vault.run(&["config", "set", "daily.file_name_format", "YYYY/MM/DD"]);
    assert!(output.status.success());

    let shown = vault.run_json(&["config", "show"]);
    assert_eq!(shown["exists"], true);
    assert_eq!(shown["config"]["tasks"]["status"], "all");
    assert_eq!(shown["config"]["daily"]["file_name_format"], "YYYY/MM/DD");

    let added = vault.run_json(&["add", "Nested"]);
    assert_eq!(added["path"], "2024/03/15.md");

    let output = vault.run(&["config", "set", "daily.file_name_format", "[oops"]);
    assert_eq!(output.status.code(), Some(5));
}
