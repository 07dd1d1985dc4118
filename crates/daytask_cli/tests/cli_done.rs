use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};
use time::{OffsetDateTime, UtcOffset};

fn temp_store_dir(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("daytask-{nanos}-{label}"))
}

fn today_key() -> String {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let date = OffsetDateTime::now_utc().to_offset(offset).date();
    format!(
        "tasks-{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

fn seed_single_task(dir: &PathBuf, completed: bool) {
    std::fs::create_dir_all(dir).unwrap();
    let tasks = serde_json::json!([{
        "id": "t-1",
        "name": "demo",
        "completed": completed,
        "createdAt": "2025-08-21T08:00:00Z",
        "completedAt": if completed { serde_json::json!("2025-08-21T09:00:00Z") } else { serde_json::Value::Null },
        "dueAt": "2099-01-01T00:00:00Z",
        "priority": "medium",
    }]);
    std::fs::write(
        dir.join(format!("{}.json", today_key())),
        serde_json::to_string_pretty(&tasks).unwrap(),
    )
    .unwrap();
}

fn load_tasks(dir: &PathBuf) -> serde_json::Value {
    let content = std::fs::read_to_string(dir.join(format!("{}.json", today_key()))).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn done_marks_a_pending_task_complete_with_timestamp() {
    let exe = env!("CARGO_BIN_EXE_daytask");
    let dir = temp_store_dir("done");
    seed_single_task(&dir, false);

    let output = Command::new(exe)
        .args(["done", "t-1"])
        .env("DAYTASK_STORE_DIR", &dir)
        .output()
        .expect("failed to run done command");

    let tasks = load_tasks(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Completed task: demo"));
    assert_eq!(tasks[0]["completed"], true);
    assert!(tasks[0]["completedAt"].as_str().is_some());
}

#[test]
fn done_on_a_completed_task_reopens_it() {
    let exe = env!("CARGO_BIN_EXE_daytask");
    let dir = temp_store_dir("reopen");
    seed_single_task(&dir, true);

    let output = Command::new(exe)
        .args(["done", "t-1"])
        .env("DAYTASK_STORE_DIR", &dir)
        .output()
        .expect("failed to run done command");

    let tasks = load_tasks(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Reopened task: demo"));
    assert_eq!(tasks[0]["completed"], false);
    assert_eq!(tasks[0]["completedAt"], serde_json::Value::Null);
}

#[test]
fn done_with_unknown_id_is_a_reported_noop() {
    let exe = env!("CARGO_BIN_EXE_daytask");
    let dir = temp_store_dir("done-missing");
    seed_single_task(&dir, false);

    let before = std::fs::read_to_string(dir.join(format!("{}.json", today_key()))).unwrap();

    let output = Command::new(exe)
        .args(["done", "no-such-id"])
        .env("DAYTASK_STORE_DIR", &dir)
        .output()
        .expect("failed to run done command");

    let after = std::fs::read_to_string(dir.join(format!("{}.json", today_key()))).unwrap();
    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No task with id no-such-id"));
    assert_eq!(before, after);
}
