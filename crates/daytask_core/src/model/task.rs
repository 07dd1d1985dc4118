use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Task names longer than this are rejected by the repository.
pub const MAX_NAME_LEN: usize = 45;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Ordinal used by the sort rule: high (3) > medium (2) > low (1).
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(AppError::invalid_input(format!(
                "unknown priority '{other}'"
            ))),
        }
    }
}

/// One to-do item in the current day's list. Wire names are camelCase
/// and timestamps are RFC 3339, matching the persisted layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub completed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub due_at: OffsetDateTime,
    pub priority: Priority,
}

/// Trims a candidate task name and enforces the length bounds. `None`
/// means the name is unusable and the operation should not happen.
pub fn normalize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_NAME_LEN {
        return None;
    }
    Some(trimmed.to_string())
}

/// Sort rule applied on every read: incomplete tasks first, then
/// priority descending, then most recently created first. Stable and
/// idempotent; the input is never mutated.
pub fn sort_tasks(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(|a, b| {
        a.completed
            .cmp(&b.completed)
            .then(b.priority.rank().cmp(&a.priority.rank()))
            .then(b.created_at.cmp(&a.created_at))
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::{Priority, Task, sort_tasks};
    use time::OffsetDateTime;
    use time::macros::datetime;

    fn task(id: &str, completed: bool, priority: Priority, created_at: OffsetDateTime) -> Task {
        Task {
            id: id.to_string(),
            name: id.to_string(),
            completed,
            created_at,
            completed_at: None,
            due_at: datetime!(2025-08-21 23:59:59 UTC),
            priority,
        }
    }

    #[test]
    fn priority_rank_orders_high_over_low() {
        assert!(Priority::High.rank() > Priority::Medium.rank());
        assert!(Priority::Medium.rank() > Priority::Low.rank());
    }

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(" medium ".parse::<Priority>().unwrap(), Priority::Medium);
        let err = "urgent".parse::<Priority>().unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn sort_puts_incomplete_before_completed() {
        let tasks = vec![
            task("done-high", true, Priority::High, datetime!(2025-08-21 10:00 UTC)),
            task("open-low", false, Priority::Low, datetime!(2025-08-21 09:00 UTC)),
        ];

        let sorted = sort_tasks(&tasks);
        assert_eq!(sorted[0].id, "open-low");
        assert_eq!(sorted[1].id, "done-high");
    }

    #[test]
    fn sort_orders_by_priority_within_status() {
        let tasks = vec![
            task("low", false, Priority::Low, datetime!(2025-08-21 10:00 UTC)),
            task("high", false, Priority::High, datetime!(2025-08-21 08:00 UTC)),
            task("medium", false, Priority::Medium, datetime!(2025-08-21 09:00 UTC)),
        ];

        let sorted = sort_tasks(&tasks);
        let ids: Vec<&str> = sorted.iter().map(|task| task.id.as_str()).collect();
        assert_eq!(ids, vec!["high", "medium", "low"]);
    }

    #[test]
    fn sort_orders_newest_first_within_priority() {
        let tasks = vec![
            task("older", false, Priority::Medium, datetime!(2025-08-21 08:00 UTC)),
            task("newer", false, Priority::Medium, datetime!(2025-08-21 11:00 UTC)),
        ];

        let sorted = sort_tasks(&tasks);
        assert_eq!(sorted[0].id, "newer");
        assert_eq!(sorted[1].id, "older");
    }

    #[test]
    fn sort_is_idempotent_and_preserves_tasks() {
        let tasks = vec![
            task("a", true, Priority::Low, datetime!(2025-08-21 08:00 UTC)),
            task("b", false, Priority::High, datetime!(2025-08-21 09:00 UTC)),
            task("c", false, Priority::Low, datetime!(2025-08-21 10:00 UTC)),
        ];

        let once = sort_tasks(&tasks);
        let twice = sort_tasks(&once);
        assert_eq!(once, twice);
        assert_eq!(once.len(), tasks.len());
        for original in &tasks {
            assert!(once.contains(original));
        }
    }

    #[test]
    fn task_serializes_with_camel_case_wire_names() {
        let task = Task {
            id: "task-1".to_string(),
            name: "demo".to_string(),
            completed: false,
            created_at: datetime!(2025-08-21 10:30:00 UTC),
            completed_at: None,
            due_at: datetime!(2025-08-22 00:00:00 UTC),
            priority: Priority::Medium,
        };

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["createdAt"], "2025-08-21T10:30:00Z");
        assert_eq!(json["dueAt"], "2025-08-22T00:00:00Z");
        assert_eq!(json["completedAt"], serde_json::Value::Null);
        assert_eq!(json["priority"], "medium");
    }

    #[test]
    fn task_round_trips_through_json() {
        let task = Task {
            id: "task-1".to_string(),
            name: "demo".to_string(),
            completed: true,
            created_at: datetime!(2025-08-21 10:30:00 UTC),
            completed_at: Some(datetime!(2025-08-21 15:45:00 UTC)),
            due_at: datetime!(2025-08-22 00:00:00 UTC),
            priority: Priority::High,
        };

        let json = serde_json::to_string(&task).unwrap();
        let parsed: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, task);
    }

    #[test]
    fn task_accepts_record_without_completed_at() {
        let json = r#"{
            "id": "task-1",
            "name": "demo",
            "completed": false,
            "createdAt": "2025-08-21T10:30:00Z",
            "dueAt": "2025-08-22T00:00:00Z",
            "priority": "low"
        }"#;

        let parsed: Task = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.completed_at, None);
        assert_eq!(parsed.priority, Priority::Low);
    }
}
