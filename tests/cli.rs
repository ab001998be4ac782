//! End-to-end tests for the `jobsync` binary.
//!
//! Stdout is not a terminal under the test harness, so every command runs in
//! JSON mode.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn db(&self) -> PathBuf {
        self.dir.path().join("jobs.db")
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("jobsync").unwrap();
        cmd.env_remove("JOBSYNC_DB")
            .env_remove("JOBSYNC_TEST_DB")
            .env_remove("RUST_LOG")
            .env("JOBSYNC_CONFIG", self.path("config.json"))
            .arg("--db")
            .arg(self.db());
        cmd
    }

    fn init(&self) {
        self.cmd().arg("init").assert().success();
    }

    fn write(&self, name: &str, xml: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, xml).unwrap();
        path
    }
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

fn sync(ws: &Workspace, file: &Path) -> serde_json::Value {
    let output = ws.cmd().arg("sync").arg(file).output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    stdout_json(&output)
}

const TWO_JOBS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<jobs>
  <job><depCode>D1</depCode><depJob>Engineer</depJob><description>Builds</description></job>
  <job><depCode>D2</depCode><depJob>Clerk</depJob></job>
</jobs>
"#;

#[test]
fn init_creates_database_and_config_template() {
    let ws = Workspace::new();

    let output = ws.cmd().arg("init").output().unwrap();

    assert!(output.status.success());
    assert!(ws.db().exists());
    assert!(ws.path("config.json").exists());
    let json = stdout_json(&output);
    assert_eq!(json["database"], ws.db().display().to_string());
}

#[test]
fn init_twice_requires_force() {
    let ws = Workspace::new();
    ws.init();

    ws.cmd().arg("init").assert().code(2);
    ws.cmd().args(["init", "--force"]).assert().success();
}

#[test]
fn sync_without_database_fails_with_not_initialized() {
    let ws = Workspace::new();
    let file = ws.write("jobs.xml", TWO_JOBS);

    let output = ws.cmd().arg("sync").arg(&file).output().unwrap();

    assert_eq!(output.status.code(), Some(2));
    let err: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(err["error"]["code"], "NOT_INITIALIZED");
    assert!(!ws.db().exists());
}

#[test]
fn sync_applies_inserts_updates_and_deletes() {
    let ws = Workspace::new();
    ws.init();

    let first = sync(&ws, &ws.write("jobs.xml", TWO_JOBS));
    assert_eq!(first["stats"]["inserted"], 2);
    assert_eq!(first["stats"]["total"], 2);

    let changed = ws.write(
        "changed.xml",
        "<jobs><job><depCode>D1</depCode><depJob>Engineer</depJob><description>Designs</description></job>\
         <job><depCode>D3</depCode><depJob>Driver</depJob></job></jobs>",
    );
    let second = sync(&ws, &changed);
    assert_eq!(second["stats"]["inserted"], 1);
    assert_eq!(second["stats"]["updated"], 1);
    assert_eq!(second["stats"]["deleted"], 1);
    assert_eq!(second["stats"]["unchanged"], 0);
    assert_eq!(second["stats"]["total"], 2);
}

#[test]
fn sync_same_file_twice_changes_nothing() {
    let ws = Workspace::new();
    ws.init();
    let file = ws.write("jobs.xml", TWO_JOBS);
    sync(&ws, &file);

    let again = sync(&ws, &file);

    assert_eq!(again["stats"]["inserted"], 0);
    assert_eq!(again["stats"]["updated"], 0);
    assert_eq!(again["stats"]["deleted"], 0);
    assert_eq!(again["stats"]["unchanged"], 2);
}

#[test]
fn dry_run_leaves_table_untouched() {
    let ws = Workspace::new();
    ws.init();
    let file = ws.write("jobs.xml", TWO_JOBS);

    let output = ws
        .cmd()
        .arg("--dry-run")
        .arg("sync")
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["dry_run"], true);

    let status = ws.cmd().arg("status").output().unwrap();
    assert_eq!(stdout_json(&status)["status"]["stored_jobs"], 0);
}

#[test]
fn invalid_documents_exit_with_format_code() {
    let ws = Workspace::new();
    ws.init();

    let cases = [
        ("root.xml", "<staff><job/></staff>"),
        ("dup.xml", "<jobs><job><depCode>D1</depCode><depJob>A</depJob></job>\
                     <job><depCode>D1</depCode><depJob>A</depJob></job></jobs>"),
        ("long.xml", "<jobs><job><depCode>ABCDEFGHIJKLMNOPQRSTU</depCode><depJob>A</depJob></job></jobs>"),
        ("broken.xml", "<jobs><job><depCode>D1</depCode>"),
    ];

    for (name, xml) in cases {
        let file = ws.write(name, xml);
        ws.cmd().arg("sync").arg(&file).assert().code(4);
    }
}

#[test]
fn failed_sync_keeps_previous_rows() {
    let ws = Workspace::new();
    ws.init();
    sync(&ws, &ws.write("jobs.xml", TWO_JOBS));

    let bad = ws.write("bad.xml", "<jobs><job><depCode>D9</depCode></job></jobs>");
    ws.cmd().arg("sync").arg(&bad).assert().code(4);

    let status = ws.cmd().arg("status").output().unwrap();
    assert_eq!(stdout_json(&status)["status"]["stored_jobs"], 2);
}

#[test]
fn missing_input_file_exits_with_io_code() {
    let ws = Workspace::new();
    ws.init();

    ws.cmd()
        .arg("sync")
        .arg(ws.path("absent.xml"))
        .assert()
        .code(8);
}

#[test]
fn save_then_sync_round_trips() {
    let ws = Workspace::new();
    ws.init();
    sync(&ws, &ws.write("jobs.xml", TWO_JOBS));
    let out = ws.path("export").join("saved.xml");

    let output = ws.cmd().arg("save").arg(&out).output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["stats"]["jobs"], 2);

    let xml = fs::read_to_string(&out).unwrap();
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains("<depCode>D2</depCode>"));

    let again = sync(&ws, &out);
    assert_eq!(again["stats"]["unchanged"], 2);
    assert_eq!(again["stats"]["inserted"], 0);
}

#[test]
fn status_reports_pending_changes() {
    let ws = Workspace::new();
    ws.init();
    let file = ws.write("jobs.xml", TWO_JOBS);

    let output = ws.cmd().arg("status").arg(&file).output().unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["status"]["stored_jobs"], 0);
    assert_eq!(json["status"]["pending"]["stats"]["inserted"], 2);
}

#[test]
fn read_only_commands_leave_uninitialized_file_untouched() {
    let ws = Workspace::new();
    fs::write(ws.db(), b"").unwrap();
    let file = ws.write("jobs.xml", TWO_JOBS);

    ws.cmd().arg("status").assert().code(2);
    ws.cmd()
        .args(["--dry-run", "sync"])
        .arg(&file)
        .assert()
        .code(2);
    ws.cmd().arg("save").arg(ws.path("out.xml")).assert().code(2);

    assert_eq!(fs::metadata(ws.db()).unwrap().len(), 0);
    assert!(!ws.path("out.xml").exists());
}

#[test]
fn sync_accepts_utf16_document() {
    let ws = Workspace::new();
    ws.init();
    let xml = TWO_JOBS.replace("UTF-8", "UTF-16");
    let mut bytes = vec![0xFF, 0xFE];
    for unit in xml.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    let file = ws.path("utf16.xml");
    fs::write(&file, bytes).unwrap();

    let json = sync(&ws, &file);

    assert_eq!(json["stats"]["inserted"], 2);
}
