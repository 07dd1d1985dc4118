pub mod clock;
pub mod config;
pub mod error;
pub mod goal;
pub mod model;
pub mod repository;
pub mod storage;

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::model::{Priority, Task};
    use time::macros::datetime;

    #[test]
    fn task_has_required_fields() {
        let task = Task {
            id: "task-1".to_string(),
            name: "demo".to_string(),
            completed: false,
            created_at: datetime!(2025-08-21 10:30:00 UTC),
            completed_at: None,
            due_at: datetime!(2025-08-22 00:00:00 UTC),
            priority: Priority::Medium,
        };

        assert_eq!(task.id, "task-1");
        assert_eq!(task.name, "demo");
        assert!(!task.completed);
        assert_eq!(task.completed_at, None);
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn app_error_exposes_code() {
        let err = AppError::invalid_input("missing name");
        assert_eq!(err.code(), "invalid_input");

        let err = AppError::storage("quota exceeded");
        assert_eq!(err.code(), "storage_error");
    }
}
