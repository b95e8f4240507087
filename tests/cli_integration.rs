//! Integration tests for the `tdx` CLI.
//!
//! Each test gets a temp directory used as HOME and XDG_CONFIG_HOME, runs
//! `tdx` as a subprocess, and checks stdout and/or the todo file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

const SAMPLE: &str = "\
(B) 2024-01-02 file taxes +admin
water plants @home
2024-01-12 call plumber status:inbox
(A) pay rent due:2024-01-01
x 2024-01-03 2024-01-01 old thing

buy stamps @errands
";

struct Workspace {
    tmp: TempDir,
}

impl Workspace {
    fn new(content: &str) -> Self {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("todo.txt"), content).unwrap();
        Workspace { tmp }
    }

    fn dir(&self) -> &Path {
        self.tmp.path()
    }

    fn todo(&self) -> PathBuf {
        self.dir().join("todo.txt")
    }

    fn read(&self) -> String {
        fs::read_to_string(self.todo()).unwrap()
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_tdx"));
        cmd.args(args)
            .current_dir(self.dir())
            .env("HOME", self.dir())
            .env("XDG_CONFIG_HOME", self.dir().join("config"))
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run against the workspace todo file via `--file`
    fn run(&self, args: &[&str]) -> Output {
        let todo = self.todo();
        let mut full = vec!["--file", todo.to_str().unwrap()];
        full.extend_from_slice(args);
        self.command(&full).output().expect("failed to run tdx")
    }

    /// Run with `input` piped to stdin
    fn run_with_input(&self, args: &[&str], input: &str) -> Output {
        let todo = self.todo();
        let mut full = vec!["--file", todo.to_str().unwrap()];
        full.extend_from_slice(args);
        let mut child = self
            .command(&full)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to run tdx");
        child.stdin.take().unwrap().write_all(input.as_bytes()).unwrap();
        child.wait_with_output().unwrap()
    }

    fn run_ok(&self, args: &[&str]) -> String {
        ok(args, self.run(args))
    }
}

fn ok(args: &[&str], output: Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    if !output.status.success() {
        panic!(
            "tdx {:?} failed:\nstdout: {}\nstderr: {}",
            args,
            stdout,
            String::from_utf8_lossy(&output.stderr)
        );
    }
    stdout
}

fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

// ---------------------------------------------------------------------------
// Read command tests
// ---------------------------------------------------------------------------

#[test]
fn test_list_orders_priorities_first() {
    let ws = Workspace::new(SAMPLE);
    let out = ws.run_ok(&["list"]);
    assert_eq!(
        out,
        concat!(
            "  1 (A) pay rent due:2024-01-01\n",
            "  2 (B) 2024-01-02 file taxes +admin\n",
            "  3 water plants @home\n",
            "  4 buy stamps @errands\n",
        )
    );
}

#[test]
fn test_no_arguments_lists() {
    let ws = Workspace::new(SAMPLE);
    assert_eq!(ws.run_ok(&[]), ws.run_ok(&["list"]));
}

#[test]
fn test_list_all_includes_inbox() {
    let ws = Workspace::new(SAMPLE);
    let out = ws.run_ok(&["list", "all"]);
    assert!(out.contains("  4 2024-01-12 call plumber status:inbox\n"));
    assert!(out.contains("  5 buy stamps @errands\n"));
    assert!(!out.contains("old thing"));
}

#[test]
fn test_list_filter_keeps_numbers() {
    let ws = Workspace::new(SAMPLE);
    assert_eq!(ws.run_ok(&["list", "@errands"]), "  4 buy stamps @errands\n");
    assert_eq!(
        ws.run_ok(&["list", "+admin"]),
        "  2 (B) 2024-01-02 file taxes +admin\n"
    );
}

#[test]
fn test_list_unknown_filter_fails() {
    let ws = Workspace::new(SAMPLE);
    let output = ws.run(&["list", "urgent"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("error:"));
}

#[test]
fn test_list_json() {
    let ws = Workspace::new(SAMPLE);
    let out = ws.run_ok(&["list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 4);
    assert_eq!(arr[0]["number"], 1);
    assert_eq!(arr[0]["line"], 4);
    assert_eq!(arr[0]["priority"], "A");
    assert_eq!(arr[0]["due"], "2024-01-01");
}

#[test]
fn test_missing_file_lists_nothing() {
    let ws = Workspace::new("");
    fs::remove_file(ws.todo()).unwrap();
    assert_eq!(ws.run_ok(&["list"]), "(no tasks)\n");
}

#[test]
fn test_done_without_number_lists_completed() {
    let ws = Workspace::new(SAMPLE);
    assert_eq!(ws.run_ok(&["done"]), "  1 x 2024-01-03 2024-01-01 old thing\n");
}

#[test]
fn test_inbox_lists_items_without_marker() {
    let ws = Workspace::new(SAMPLE);
    assert_eq!(ws.run_ok(&["inbox"]), "  1 2024-01-12 call plumber\n");
}

#[test]
fn test_due_views() {
    let ws = Workspace::new(&format!("{}(C) later task due:2999-12-31\n", SAMPLE));
    let out = ws.run_ok(&["due"]);
    assert_eq!(
        out,
        "  1 (A) pay rent due:2024-01-01\n  3 (C) later task due:2999-12-31\n"
    );
    assert_eq!(ws.run_ok(&["due", "overdue"]), "  1 (A) pay rent due:2024-01-01\n");
    assert_eq!(ws.run_ok(&["due", "today"]), "  1 (A) pay rent due:2024-01-01\n");
}

// ---------------------------------------------------------------------------
// Write command tests
// ---------------------------------------------------------------------------

#[test]
fn test_done_rewrites_only_the_numbered_line() {
    let ws = Workspace::new(SAMPLE);
    let out = ws.run_ok(&["done", "2"]);
    let expected_line = format!("x {} 2024-01-02 file taxes +admin", today());
    assert_eq!(out, format!("completed 2: {}\n", expected_line));
    assert_eq!(
        ws.read(),
        SAMPLE.replacen("(B) 2024-01-02 file taxes +admin", &expected_line, 1)
    );
}

#[test]
fn test_done_out_of_range_leaves_file() {
    let ws = Workspace::new(SAMPLE);
    for bad in ["9", "0", "two"] {
        let output = ws.run(&["done", bad]);
        assert!(!output.status.success(), "done {} should fail", bad);
        assert!(String::from_utf8_lossy(&output.stderr).starts_with("error:"));
    }
    assert_eq!(ws.read(), SAMPLE);
}

#[test]
fn test_done_all_reaches_inbox_numbers() {
    let ws = Workspace::new(SAMPLE);
    ws.run_ok(&["done", "--all", "4"]);
    assert!(
        ws.read()
            .contains(&format!("x {} 2024-01-12 call plumber status:inbox\n", today()))
    );
}

#[test]
fn test_delete_with_yes() {
    let ws = Workspace::new(SAMPLE);
    let out = ws.run_ok(&["xx", "3", "--yes"]);
    assert_eq!(out, "deleted 3: water plants @home\n");
    assert_eq!(ws.read(), SAMPLE.replacen("water plants @home\n", "", 1));
}

#[test]
fn test_delete_needs_confirmation() {
    let ws = Workspace::new(SAMPLE);
    // stdin is closed, so the confirmation reads as "no"
    let out = ws.run_ok(&["xx", "3"]);
    assert_eq!(out, "cancelled\n");
    assert_eq!(ws.read(), SAMPLE);

    let output = ws.run_with_input(&["xx", "3"], "y\n");
    ok(&["xx", "3"], output);
    assert!(!ws.read().contains("water plants"));
}

#[test]
fn test_bare_text_captures_to_inbox() {
    let ws = Workspace::new(SAMPLE);
    let out = ws.run_ok(&["buy", "milk"]);
    assert_eq!(out, "captured: buy milk\n");
    assert_eq!(
        ws.read(),
        format!("{}{} buy milk status:inbox\n", SAMPLE, today())
    );
}

#[test]
fn test_inbox_text_captures() {
    let ws = Workspace::new("");
    ws.run_ok(&["inbox", "call", "mom"]);
    assert_eq!(ws.read(), format!("{} call mom status:inbox\n", today()));
}

#[test]
fn test_add_with_fields() {
    let ws = Workspace::new(SAMPLE);
    let out = ws.run_ok(&[
        "add", "fix", "door", "-p", "a", "--project", "house", "--due", "2030-01-31",
    ]);
    let line = format!("(A) {} fix door +house due:2030-01-31", today());
    assert_eq!(out, format!("added 2: {}\n", line));
    assert_eq!(ws.read(), format!("{}{}\n", SAMPLE, line));
}

#[test]
fn test_add_invalid_priority_fails() {
    let ws = Workspace::new(SAMPLE);
    let output = ws.run(&["add", "fix", "door", "-p", "7"]);
    assert!(!output.status.success());
    assert_eq!(ws.read(), SAMPLE);
}

#[test]
fn test_add_invalid_due_fails() {
    let ws = Workspace::new(SAMPLE);
    let output = ws.run(&["add", "fix", "door", "--due", "2024-02-30"]);
    assert!(!output.status.success());
    assert_eq!(ws.read(), SAMPLE);
}

#[test]
fn test_process_full_pass() {
    let ws = Workspace::new(SAMPLE);
    let output = ws.run_with_input(&["process"], "d\n");
    let out = ok(&["process"], output);
    assert!(out.contains("(1 left) call plumber"));
    assert!(out.contains("inbox is empty"));
    assert!(out.contains("0 actionable, 1 deleted, 0 skipped"));
    assert_eq!(
        ws.read(),
        SAMPLE.replacen("2024-01-12 call plumber status:inbox\n", "", 1)
    );
}

#[test]
fn test_process_one_item_actionable() {
    let ws = Workspace::new(SAMPLE);
    let output = ws.run_with_input(&["process", "1"], "a\nb\n\nphone\n2030-05-01\n");
    let out = ok(&["process", "1"], output);
    let line = format!("(B) {} call plumber @phone due:2030-05-01", today());
    assert!(out.contains(&format!("actionable: {}", line)));
    assert_eq!(
        ws.read(),
        format!(
            "{}{}\n",
            SAMPLE.replacen("2024-01-12 call plumber status:inbox\n", "", 1),
            line
        )
    );
}

#[test]
fn test_process_eof_leaves_file() {
    let ws = Workspace::new(SAMPLE);
    let out = ok(&["process"], ws.run(&["process"]));
    assert!(out.contains("0 actionable, 0 deleted, 0 skipped"));
    assert_eq!(ws.read(), SAMPLE);
}

// ---------------------------------------------------------------------------
// Configuration tests
// ---------------------------------------------------------------------------

#[test]
fn test_default_file_in_home() {
    let ws = Workspace::new("");
    ok(&["add", "x"], ws.command(&["add", "first"]).output().unwrap());
    assert_eq!(ws.read(), format!("{} first\n", today()));
}

#[test]
fn test_config_sets_todo_file() {
    let ws = Workspace::new(SAMPLE);
    let elsewhere = ws.dir().join("elsewhere.txt");
    let elsewhere_str = elsewhere.to_str().unwrap();

    ok(&["config"], ws.command(&["config", elsewhere_str]).output().unwrap());
    let out = ok(&["config"], ws.command(&["config"]).output().unwrap());
    assert!(out.contains(&format!("todo file: {}", elsewhere_str)));

    ok(&["add"], ws.command(&["add", "hello"]).output().unwrap());
    assert_eq!(
        fs::read_to_string(&elsewhere).unwrap(),
        format!("{} hello\n", today())
    );
    // the original file is untouched
    assert_eq!(ws.read(), SAMPLE);

    // --file still wins over the config
    ws.run_ok(&["add", "override"]);
    assert!(ws.read().ends_with(&format!("{} override\n", today())));
}
