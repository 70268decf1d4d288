//! End-to-end tests for the `sqlsync` binary.
//!
//! stdout is not a terminal under the test harness, so every command answers
//! in JSON.

use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Fixture {
    _temp: TempDir,
    builds: PathBuf,
    db: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let builds = temp.path().join("builds");
        fs::create_dir_all(&builds).unwrap();
        let db = temp.path().join("target.db");
        Self {
            _temp: temp,
            builds,
            db,
        }
    }

    fn add_build(&self, folder: &str, sql: &str) {
        let dir = self.builds.join(folder);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("2.data_setup.sql"), sql).unwrap();
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("sqlsync").unwrap();
        cmd.env_remove("SQLSYNC_OPTION")
            .env_remove("SQLSYNC_START_LINE")
            .env_remove("SQLSYNC_BASE_PATH")
            .env_remove("RUST_LOG")
            .arg("--db")
            .arg(&self.db);
        cmd
    }

    fn run(&self, option: &str) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("run")
            .arg("--base-path")
            .arg(&self.builds)
            .arg("--option")
            .arg(option);
        cmd
    }

    fn row_count(&self, table: &str) -> i64 {
        let conn = rusqlite::Connection::open(&self.db).unwrap();
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap()
    }
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

fn stderr_json(output: &std::process::Output) -> Value {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let line = stderr
        .lines()
        .rev()
        .find(|line| line.starts_with('{'))
        .unwrap();
    serde_json::from_str(line).unwrap()
}

#[test]
fn test_version() {
    let output = Command::cargo_bin("sqlsync")
        .unwrap()
        .arg("version")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output)["version"],
        env!("CARGO_PKG_VERSION")
    );
}

#[test]
fn test_from_build_runs_every_later_build() {
    let fx = Fixture::new();
    fx.add_build("B9", "CREATE TABLE skipped (x INTEGER);\n");
    fx.add_build("B12", "CREATE TABLE t (x INTEGER);\nINSERT INTO t VALUES (12);\n");
    fx.add_build("B13", "INSERT INTO t VALUES (13);\nINSERT INTO t VALUES (14);\nINSERT INTO t VALUES (15);\n");

    let output = fx.run("FROM_BUILD_B12").output().unwrap();
    assert!(output.status.success());

    let outcome = stdout_json(&output);
    assert_eq!(outcome["status"], "completed");
    assert_eq!(outcome["checkpoint"]["build_version"], "B13");
    assert_eq!(outcome["checkpoint"]["line"], 3);

    assert_eq!(fx.row_count("t"), 4);
    assert_eq!(fx.row_count("build_sync_log"), 1);

    let conn = rusqlite::Connection::open(&fx.db).unwrap();
    let skipped: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE name = 'skipped'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(skipped, 0);
}

#[test]
fn test_continue_is_up_to_date_then_picks_up_new_build() {
    let fx = Fixture::new();
    fx.add_build("B1", "CREATE TABLE t (x INTEGER);\n");
    fx.run("FROM_BUILD_B1").assert().success();

    let output = fx.run("CONTINUE").output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["status"], "up_to_date");
    assert_eq!(fx.row_count("build_sync_log"), 1);

    fx.add_build("B2", "INSERT INTO t VALUES (2);\n");
    let output = fx.run("CONTINUE").output().unwrap();
    assert!(output.status.success());

    let outcome = stdout_json(&output);
    assert_eq!(outcome["status"], "completed");
    assert_eq!(outcome["checkpoint"]["build_version"], "B2");
    assert_eq!(fx.row_count("t"), 1);
    assert_eq!(fx.row_count("build_sync_log"), 2);
}

#[test]
fn test_start_line_then_continue_resumes_mid_script() {
    let fx = Fixture::new();
    fx.add_build(
        "B5",
        "CREATE TABLE t (x INTEGER);\nINSERT INTO t VALUES (1);\nINSERT INTO t VALUES (2);\n",
    );

    // Line 1 was applied by hand; start after it.
    let conn = rusqlite::Connection::open(&fx.db).unwrap();
    conn.execute_batch("CREATE TABLE t (x INTEGER);").unwrap();
    drop(conn);

    let output = fx
        .cmd()
        .args(["run", "--option", "FROM_BUILD_B5", "--start-line", "2"])
        .arg("--base-path")
        .arg(&fx.builds)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["checkpoint"]["line"], 3);
    assert_eq!(fx.row_count("t"), 2);

    // Pretend a later run only got through line 2.
    let conn = rusqlite::Connection::open(&fx.db).unwrap();
    conn.execute(
        "INSERT INTO build_sync_log (build_version, line, sync_finished_at) \
         VALUES ('B5', 2, 9999999999999)",
        [],
    )
    .unwrap();
    drop(conn);

    let output = fx.run("CONTINUE").output().unwrap();
    assert!(output.status.success());
    let outcome = stdout_json(&output);
    assert_eq!(outcome["status"], "completed");
    assert_eq!(outcome["checkpoint"]["line"], 3);
    assert_eq!(fx.row_count("t"), 3);
}

#[test]
fn test_continue_without_history_is_skipped() {
    let fx = Fixture::new();
    fx.add_build("B1", "SELECT 1;\n");

    let output = fx.run("CONTINUE").output().unwrap();
    assert!(output.status.success());

    let outcome = stdout_json(&output);
    assert_eq!(outcome["status"], "skipped");
    assert_eq!(outcome["reason"], "no_previous_sync");
    assert_eq!(fx.row_count("build_sync_log"), 0);
}

#[test]
fn test_blank_option_exits_cleanly() {
    let fx = Fixture::new();
    fx.add_build("B1", "CREATE TABLE t (x INTEGER);\n");

    let output = fx.run("").output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["status"], "invalid_configuration");
    assert!(!fx.db.exists());
}

#[test]
fn test_unknown_build_fails_without_checkpoint() {
    let fx = Fixture::new();
    fx.add_build("B1", "SELECT 1;\n");

    let output = fx.run("FROM_BUILD_B20").output().unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert_eq!(stderr_json(&output)["error"]["code"], "INVALID_BUILD");
    assert_eq!(fx.row_count("build_sync_log"), 0);
}

#[test]
fn test_failing_script_records_last_good_build() {
    let fx = Fixture::new();
    fx.add_build("B1", "CREATE TABLE t (x INTEGER);\nINSERT INTO t VALUES (1);\n");
    fx.add_build("B2", "INSERT INTO missing_table VALUES (1);\n");
    fx.add_build("B3", "INSERT INTO t VALUES (3);\n");

    let output = fx.run("FROM_BUILD_B1").output().unwrap();
    assert_eq!(output.status.code(), Some(6));

    let outcome = stdout_json(&output);
    assert_eq!(outcome["status"], "halted");
    assert_eq!(outcome["checkpoint"]["build_version"], "B1");
    assert_eq!(outcome["checkpoint"]["line"], 2);
    assert_eq!(outcome["failure"]["version"], "B2");
    assert_eq!(stderr_json(&output)["error"]["code"], "EXECUTION_FAILURE");

    // B3 never ran.
    assert_eq!(fx.row_count("t"), 1);
}

#[test]
fn test_status_and_history_after_run() {
    let fx = Fixture::new();
    fx.add_build("B7", "CREATE TABLE t (x INTEGER);\n");
    fx.run("FROM_BUILD_B7").assert().success();

    let output = fx
        .cmd()
        .arg("status")
        .arg("--base-path")
        .arg(&fx.builds)
        .output()
        .unwrap();
    assert!(output.status.success());
    let status = stdout_json(&output);
    assert_eq!(status["checkpoint"]["build_version"], "B7");
    assert_eq!(status["next"]["kind"], "nothing_left");

    let output = fx.cmd().arg("history").output().unwrap();
    assert!(output.status.success());
    let history = stdout_json(&output);
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[test]
fn test_status_requires_existing_database() {
    let fx = Fixture::new();

    let output = fx.cmd().arg("status").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stderr_json(&output)["error"]["code"], "DATABASE_NOT_FOUND");
}

#[test]
fn test_missing_db_flag() {
    let output = Command::cargo_bin("sqlsync")
        .unwrap()
        .env_remove("SQLSYNC_DB")
        .arg("history")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
}

#[test]
fn test_init_is_idempotent() {
    let fx = Fixture::new();
    fx.cmd().arg("init").assert().success();
    fx.cmd().arg("init").assert().success();
    assert_eq!(fx.row_count("build_sync_log"), 0);
}

#[test]
fn test_builds_lists_in_execution_order() {
    let fx = Fixture::new();
    fx.add_build("B100", "SELECT 100;\n");
    fx.add_build("B99", "SELECT 99;\nSELECT 99;\n");
    fx.add_build("B3", "SELECT 3;\n");

    let output = Command::cargo_bin("sqlsync")
        .unwrap()
        .args(["builds", "--from", "B10", "--base-path"])
        .arg(&fx.builds)
        .output()
        .unwrap();
    assert!(output.status.success());

    let builds = stdout_json(&output);
    let labels: Vec<_> = builds
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["build"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(labels, vec!["B99", "B100"]);
    assert_eq!(builds[0]["lines"], 2);
}

#[test]
fn test_log_dir_receives_run_log() {
    let fx = Fixture::new();
    fx.add_build("B1", "SELECT 1;\n");
    let logs = fx.builds.parent().map(Path::to_path_buf).unwrap().join("logs");

    fx.run("FROM_BUILD_B1")
        .arg("--log-dir")
        .arg(&logs)
        .assert()
        .success();

    let entries: Vec<_> = fs::read_dir(&logs).unwrap().collect();
    assert_eq!(entries.len(), 1);
    let name = entries[0].as_ref().unwrap().file_name();
    let name = name.to_string_lossy();
    assert!(name.starts_with("sync-") && name.ends_with(".log"));
}
