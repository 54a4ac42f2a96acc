#[allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

// ─── helpers ───────────────────────────────────────────────────────

struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        let env = Self {
            dir: TempDir::new().expect("create tempdir"),
        };
        env.run_ok(&["init"]);
        env
    }

    fn new_uninitialized() -> Self {
        Self {
            dir: TempDir::new().expect("create tempdir"),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("weekload").expect("binary");
        cmd.current_dir(self.dir.path());
        cmd
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let mut a: Vec<&str> = args.to_vec();
        a.push("--json");
        let output = self.cmd().args(&a).output().expect("run");
        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("parse JSON failed: {e}\nstdout: {stdout}"))
    }

    fn run_ok(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], true, "expected success=true: {v}");
        v
    }

    fn run_err(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], false, "expected success=false: {v}");
        v
    }

    /// A board with one resource (Alice, #1) and one client (Acme, #1).
    fn seed(&self) {
        self.run_ok(&["resource", "add", "Alice", "--color", "#ff0000"]);
        self.run_ok(&["client", "add", "Acme"]);
    }

    fn add_task(&self, name: &str, week: &str, extra: &[&str]) -> i64 {
        let mut args = vec![
            "task", "add", name, "-r", "1", "-c", "1", "--week", week, "--year", "2025",
        ];
        args.extend_from_slice(extra);
        let v = self.run_ok(&args);
        v["data"]["task"]["id"].as_i64().expect("task id")
    }

    fn week_tasks(&self, week: &str) -> Vec<Value> {
        let v = self.run_ok(&["task", "list", "--week", week, "--year", "2025"]);
        v["data"]["tasks"].as_array().expect("tasks array").clone()
    }
}

// ─── init & setup ──────────────────────────────────────────────────

#[test]
fn init_creates_store() {
    let env = TestEnv::new_uninitialized();
    let v = env.run_ok(&["init"]);
    assert!(v["data"]["path"]
        .as_str()
        .unwrap()
        .ends_with("weekload.db"));
}

#[test]
fn commands_fail_before_init() {
    let env = TestEnv::new_uninitialized();
    let v = env.run_err(&["task", "list", "--week", "10", "--year", "2025"]);
    assert_eq!(v["error"]["code"], "NOT_INITIALIZED");
}

#[test]
fn init_rejects_unknown_role() {
    let env = TestEnv::new_uninitialized();
    let v = env.run_err(&["init", "--role", "root"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

// ─── resources & clients ───────────────────────────────────────────

#[test]
fn resource_crud_and_dashboard_flag() {
    let env = TestEnv::new();
    let v = env.run_ok(&["resource", "add", "Alice", "--color", "#ff0000"]);
    assert_eq!(v["data"]["resource"]["show_on_dashboard"], true);

    env.run_ok(&[
        "resource",
        "add",
        "Bob",
        "--color",
        "#00ff00",
        "--no-dashboard",
    ]);
    let v = env.run_ok(&["resource", "list"]);
    let resources = v["data"]["resources"].as_array().unwrap();
    assert_eq!(resources.len(), 2);
    // Alphabetized.
    assert_eq!(resources[0]["name"], "Alice");
    assert_eq!(resources[1]["show_on_dashboard"], false);

    env.run_ok(&["resource", "dashboard", "2", "true"]);
    let v = env.run_ok(&["resource", "list"]);
    assert_eq!(v["data"]["resources"][1]["show_on_dashboard"], true);

    let v = env.run_err(&["resource", "dashboard", "99", "true"]);
    assert_eq!(v["error"]["code"], "RESOURCE_NOT_FOUND");
}

#[test]
fn client_activity_hides_without_deleting() {
    let env = TestEnv::new();
    env.run_ok(&["client", "add", "Acme"]);
    env.run_ok(&["client", "add", "Globex", "--color", "#123456"]);

    env.run_ok(&["client", "active", "1", "false"]);
    let v = env.run_ok(&["client", "list"]);
    assert_eq!(v["data"]["clients"].as_array().unwrap().len(), 1);
    let v = env.run_ok(&["client", "list", "--all"]);
    assert_eq!(v["data"]["clients"].as_array().unwrap().len(), 2);

    env.run_ok(&["client", "color", "2", "#abcdef"]);
    let v = env.run_ok(&["client", "list", "--all"]);
    assert_eq!(v["data"]["clients"][1]["color"], "#abcdef");
}

#[test]
fn resource_and_client_mutations_require_admin() {
    let env = TestEnv::new_uninitialized();
    env.run_ok(&["init", "--role", "user"]);

    let v = env.run_err(&["resource", "add", "Alice", "--color", "#ff0000"]);
    assert_eq!(v["error"]["code"], "UNAUTHORIZED");
    let v = env.run_err(&["client", "add", "Acme"]);
    assert_eq!(v["error"]["code"], "UNAUTHORIZED");

    // Reads stay open to everyone.
    env.run_ok(&["client", "list"]);
}

// ─── task lifecycle ────────────────────────────────────────────────

#[test]
fn task_create_applies_defaults() {
    let env = TestEnv::new();
    env.seed();
    let id = env.add_task("Write report", "10", &[]);

    let v = env.run_ok(&["task", "show", &id.to_string()]);
    let task = &v["data"]["task"];
    assert_eq!(task["workload"], 0);
    assert_eq!(task["estimated_days"], 0);
    assert_eq!(task["task_type"], "oneshot");
    assert_eq!(task["is_completed"], false);
    assert_eq!(task["week_number"], 10);
}

#[test]
fn task_create_validates_references_and_ranges() {
    let env = TestEnv::new();
    env.seed();

    let v = env.run_err(&[
        "task", "add", "Bad", "-r", "99", "-c", "1", "--week", "10", "--year", "2025",
    ]);
    assert_eq!(v["error"]["code"], "RESOURCE_NOT_FOUND");

    let v = env.run_err(&[
        "task", "add", "Bad", "-r", "1", "-c", "99", "--week", "10", "--year", "2025",
    ]);
    assert_eq!(v["error"]["code"], "CLIENT_NOT_FOUND");

    let v = env.run_err(&[
        "task", "add", "Bad", "-r", "1", "-c", "1", "--week", "53", "--year", "2025",
    ]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");

    let v = env.run_err(&[
        "task", "add", "Bad", "-r", "1", "-c", "1", "--week", "10", "--year", "2025",
        "--workload", "-1",
    ]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

#[test]
fn task_update_is_partial() {
    let env = TestEnv::new();
    env.seed();
    let id = env.add_task("Initial", "10", &["--notes", "keep me"]);
    let id_str = id.to_string();

    env.run_ok(&["task", "update", &id_str, "--workload", "3"]);
    let v = env.run_ok(&["task", "show", &id_str]);
    let task = &v["data"]["task"];
    assert_eq!(task["workload"], 3);
    assert_eq!(task["workload_days"], 1.5);
    // Untouched fields survive.
    assert_eq!(task["name"], "Initial");
    assert_eq!(task["notes"], "keep me");

    let v = env.run_err(&["task", "update", "999", "--workload", "1"]);
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");
}

#[test]
fn task_deadline_set_and_clear() {
    let env = TestEnv::new();
    env.seed();
    let id = env.add_task("Deadline", "10", &["--deadline", "2025-03-14"]);
    let id_str = id.to_string();

    let v = env.run_ok(&["task", "show", &id_str]);
    assert_eq!(v["data"]["task"]["deadline"], "2025-03-14");

    env.run_ok(&["task", "update", &id_str, "--clear-deadline"]);
    let v = env.run_ok(&["task", "show", &id_str]);
    assert!(v["data"]["task"]["deadline"].is_null());
}

#[test]
fn task_delete_is_strict() {
    let env = TestEnv::new();
    env.seed();
    let id = env.add_task("Short-lived", "10", &[]);
    env.run_ok(&["task", "delete", &id.to_string()]);

    let v = env.run_err(&["task", "delete", &id.to_string()]);
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");
}

#[test]
fn task_list_is_scoped_to_week_in_creation_order() {
    let env = TestEnv::new();
    env.seed();
    env.add_task("First", "10", &[]);
    env.add_task("Second", "10", &[]);
    env.add_task("Elsewhere", "11", &[]);

    let tasks = env.week_tasks("10");
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["name"], "First");
    assert_eq!(tasks[1]["name"], "Second");
}

// ─── rollover ──────────────────────────────────────────────────────

#[test]
fn rollover_carries_open_tasks_and_resets_workload() {
    let env = TestEnv::new();
    env.seed();
    let done_id = env.add_task("Finished", "10", &["--workload", "4"]);
    env.add_task("Open", "10", &["--workload", "3", "--estimated-days", "2"]);
    env.run_ok(&["task", "done", &done_id.to_string()]);

    let v = env.run_ok(&[
        "week", "reset", "--from-week", "10", "--from-year", "2025", "--to-week", "11",
        "--to-year", "2025",
    ]);
    assert_eq!(v["data"]["count"], 1);

    let tasks = env.week_tasks("11");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["name"], "Open");
    assert_eq!(tasks[0]["workload"], 0);
    assert_eq!(tasks[0]["estimated_days"], 2);
    assert_eq!(tasks[0]["is_completed"], false);

    // Source week untouched.
    assert_eq!(env.week_tasks("10").len(), 2);
}

#[test]
fn rollover_duplicates_when_forced_twice() {
    let env = TestEnv::new();
    env.seed();
    env.add_task("Open", "10", &[]);

    let reset_args = [
        "week", "reset", "--from-week", "10", "--from-year", "2025", "--to-week", "11",
        "--to-year", "2025",
    ];
    env.run_ok(&reset_args);

    // Second run without --force is refused: the destination has tasks.
    let v = env.run_err(&reset_args);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");

    // With --force the engine's no-dedup contract shows: duplicates.
    let mut forced: Vec<&str> = reset_args.to_vec();
    forced.push("--force");
    let v = env.run_ok(&forced);
    assert_eq!(v["data"]["count"], 1);
    assert_eq!(env.week_tasks("11").len(), 2);
}

#[test]
fn rollover_of_empty_week_reports_zero() {
    let env = TestEnv::new();
    env.seed();
    let v = env.run_ok(&[
        "week", "reset", "--from-week", "20", "--from-year", "2025", "--to-week", "21",
        "--to-year", "2025",
    ]);
    assert_eq!(v["data"]["count"], 0);
}

// ─── aggregation ───────────────────────────────────────────────────

#[test]
fn weekly_totals_group_by_resource() {
    let env = TestEnv::new();
    env.seed();
    env.run_ok(&["resource", "add", "Bob", "--color", "#00ff00"]);
    env.add_task("A", "10", &["--workload", "2"]);
    env.add_task("B", "10", &["--workload", "3"]);
    env.run_ok(&[
        "task", "add", "C", "-r", "2", "-c", "1", "--week", "10", "--year", "2025",
        "--workload", "1",
    ]);

    let v = env.run_ok(&["week", "totals", "--week", "10", "--year", "2025"]);
    let totals = v["data"]["totals"].as_array().unwrap();
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0]["resource_id"], 1);
    assert_eq!(totals[0]["total_workload"], 5);
    assert_eq!(totals[0]["total_days"], 2.5);
    assert_eq!(totals[1]["resource_id"], 2);
    assert_eq!(totals[1]["total_workload"], 1);
}

#[test]
fn weekly_kpis_variance_sign() {
    let env = TestEnv::new();
    env.seed();
    env.add_task("A", "10", &["--workload", "6", "--estimated-days", "3"]);
    env.add_task("B", "10", &["--workload", "4", "--estimated-days", "1"]);

    let v = env.run_ok(&["week", "kpis", "--week", "10", "--year", "2025"]);
    let kpis = &v["data"]["kpis"];
    assert_eq!(kpis["total_estimated"], 4.0);
    assert_eq!(kpis["total_actual"], 5.0);
    assert_eq!(kpis["variance"], 1.0);
}

#[test]
fn annual_by_client_buckets_weeks_into_months() {
    let env = TestEnv::new();
    env.seed();
    env.add_task("January-ish", "1", &["--workload", "2"]);
    env.add_task("February-ish", "5", &["--workload", "3"]);
    env.add_task("February-ish too", "5", &["--workload", "1"]);

    let v = env.run_ok(&["annual", "by-client", "--year", "2025"]);
    let rows = v["data"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["month"], 1);
    assert_eq!(rows[0]["total_workload"], 2);
    assert_eq!(rows[1]["month"], 2);
    assert_eq!(rows[1]["total_workload"], 4);
    assert_eq!(rows[1]["total_days"], 2.0);
}

#[test]
fn annual_by_resource_carries_estimates() {
    let env = TestEnv::new();
    env.seed();
    env.add_task("A", "10", &["--workload", "4", "--estimated-days", "3"]);
    env.add_task("B", "10", &["--workload", "2", "--estimated-days", "1"]);

    let v = env.run_ok(&["annual", "by-resource", "--year", "2025"]);
    let rows = v["data"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["resource_id"], 1);
    assert_eq!(rows[0]["month"], 3);
    assert_eq!(rows[0]["total_workload"], 6);
    assert_eq!(rows[0]["total_estimated"], 4);
}

// ─── interactive board: undo/redo end to end ───────────────────────

fn board_cmd(env: &TestEnv, week: &str, script: &str) -> String {
    let output = env
        .cmd()
        .args(["board", "--week", week, "--year", "2025"])
        .write_stdin(script.to_string())
        .output()
        .expect("board run");
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn board_add_then_undo_removes_the_task() {
    let env = TestEnv::new();
    env.seed();

    board_cmd(&env, "10", "add -r 1 -c 1 Ephemeral task\nundo\nquit\n");
    assert!(env.week_tasks("10").is_empty());
}

#[test]
fn board_delete_then_undo_restores_with_new_identity() {
    let env = TestEnv::new();
    env.seed();
    let id = env.add_task("Restore me", "10", &["--workload", "3"]);

    board_cmd(&env, "10", &format!("del {id}\nundo\nquit\n"));

    let tasks = env.week_tasks("10");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["name"], "Restore me");
    assert_eq!(tasks[0]["workload"], 3);
    // Recreated under a fresh id.
    assert_ne!(tasks[0]["id"].as_i64().unwrap(), id);
}

#[test]
fn board_undo_of_update_restores_previous_workload() {
    let env = TestEnv::new();
    env.seed();
    let id = env.add_task("Workload", "10", &["--workload", "2"]);

    board_cmd(&env, "10", &format!("log {id} +3\nundo\nquit\n"));
    let v = env.run_ok(&["task", "show", &id.to_string()]);
    assert_eq!(v["data"]["task"]["workload"], 2);

    // Redo replays the forward delta.
    board_cmd(&env, "10", &format!("log {id} +3\nundo\nredo\nquit\n"));
    let v = env.run_ok(&["task", "show", &id.to_string()]);
    assert_eq!(v["data"]["task"]["workload"], 5);
}

#[test]
fn board_edit_renames_and_undo_restores_the_name() {
    let env = TestEnv::new();
    env.seed();
    let id = env.add_task("Old name", "10", &[]);

    board_cmd(&env, "10", &format!("edit {id} New name\nquit\n"));
    let v = env.run_ok(&["task", "show", &id.to_string()]);
    assert_eq!(v["data"]["task"]["name"], "New name");

    board_cmd(&env, "10", &format!("edit {id} Other\nundo\nquit\n"));
    let v = env.run_ok(&["task", "show", &id.to_string()]);
    assert_eq!(v["data"]["task"]["name"], "New name");
}

#[test]
fn board_undo_with_empty_history_is_a_noop() {
    let env = TestEnv::new();
    env.seed();
    let out = board_cmd(&env, "10", "undo\nredo\nquit\n");
    assert!(out.contains("Nothing to undo."));
    assert!(out.contains("Nothing to redo."));
}

#[test]
fn board_week_navigation_wraps() {
    let env = TestEnv::new();
    env.seed();
    let out = board_cmd(&env, "52", "next\nquit\n");
    assert!(predicate::str::contains("S1>").eval(&out));
}

// ─── graceful degradation ──────────────────────────────────────────

#[test]
fn unreadable_store_degrades_reads_to_empty() {
    let env = TestEnv::new();
    env.seed();
    env.add_task("Hidden", "10", &[]);

    // Replace the database file with a directory: open fails, but the
    // data dir still resolves, so this reads as the store being down.
    let db = env.dir.path().join(".weekload").join("weekload.db");
    std::fs::remove_file(&db).unwrap();
    std::fs::remove_dir_all(env.dir.path().join(".weekload").join("weekload.db-wal")).ok();
    std::fs::create_dir(&db).unwrap();

    let v = env.run_ok(&["task", "list", "--week", "10", "--year", "2025"]);
    assert_eq!(v["data"]["tasks"].as_array().unwrap().len(), 0);
    let v = env.run_ok(&["week", "kpis", "--week", "10", "--year", "2025"]);
    assert_eq!(v["data"]["kpis"]["total_actual"], 0.0);

    // Writes fail hard.
    let v = env.run_err(&[
        "task", "add", "New", "-r", "1", "-c", "1", "--week", "10", "--year", "2025",
    ]);
    assert_eq!(v["error"]["code"], "STORE_UNAVAILABLE");
}
