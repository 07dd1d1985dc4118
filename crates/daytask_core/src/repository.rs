use crate::clock::{TimeSource, end_of_day};
use crate::model::{Priority, Task, normalize_name, sort_tasks};
use crate::storage::{self, KeyValueStore};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use uuid::Uuid;

const DAY_KEY_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Store key for one calendar day's task list, e.g. `tasks-2025-08-21`.
pub fn day_key(date: Date) -> String {
    match date.format(&DAY_KEY_FORMAT) {
        Ok(formatted) => format!("tasks-{formatted}"),
        // The format description is static; reaching this means the
        // date itself is unformattable, so fall back to Display.
        Err(_) => format!("tasks-{date}"),
    }
}

/// Owns the authoritative task list for the current calendar day.
///
/// The store and the time source are injected; the repository loads the
/// day's list once at construction and persists the full list after
/// every mutation, best-effort. Lookup misses and invalid names are
/// silent no-ops: the worst outcome of any operation is that nothing
/// changed.
pub struct TaskRepository<S: KeyValueStore, T: TimeSource> {
    store: S,
    time: T,
    key: String,
    tasks: Vec<Task>,
}

impl<S: KeyValueStore, T: TimeSource> TaskRepository<S, T> {
    /// Opens the repository for whatever day the time source says it
    /// is. A missing or unreadable stored list starts the day empty.
    pub fn open(store: S, time: T) -> Self {
        let key = day_key(time.now().date());
        let tasks = storage::read_json(&store, &key, Vec::new());
        Self {
            store,
            time,
            key,
            tasks: sort_tasks(&tasks),
        }
    }

    pub fn day_key(&self) -> &str {
        &self.key
    }

    /// The day's list in display order.
    pub fn tasks(&self) -> Vec<Task> {
        sort_tasks(&self.tasks)
    }

    pub fn total(&self) -> usize {
        self.tasks.len()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    pub fn pending_count(&self) -> usize {
        self.total() - self.completed_count()
    }

    /// Adds a task due at the end of the current calendar day. Blank
    /// or over-length names are a no-op returning `None`.
    pub fn add(&mut self, name: &str, priority: Priority) -> Option<Task> {
        let name = normalize_name(name)?;
        let now = self.time.now();

        let task = Task {
            id: Uuid::new_v4().to_string(),
            name,
            completed: false,
            created_at: now,
            completed_at: None,
            due_at: end_of_day(now),
            priority,
        };

        self.tasks.push(task.clone());
        self.persist_sorted();
        Some(task)
    }

    /// Flips completion. The completion timestamp is set on the way to
    /// complete and cleared on the way back.
    pub fn toggle_complete(&mut self, id: &str) -> Option<Task> {
        let now = self.time.now();
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;

        task.completed = !task.completed;
        task.completed_at = task.completed.then_some(now);
        let updated = task.clone();

        self.persist_sorted();
        Some(updated)
    }

    /// Renames a task. Validation lives here, not in the caller: blank
    /// or over-length names are a no-op.
    pub fn rename(&mut self, id: &str, new_name: &str) -> Option<Task> {
        let name = normalize_name(new_name)?;
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;

        task.name = name;
        let updated = task.clone();

        self.persist_sorted();
        Some(updated)
    }

    /// Deletes a task permanently. The surviving order is untouched.
    pub fn remove(&mut self, id: &str) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        let removed = self.tasks.remove(index);

        storage::write_json(&self.store, &self.key, &self.tasks);
        Some(removed)
    }

    pub fn set_priority(&mut self, id: &str, priority: Priority) -> Option<Task> {
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;

        task.priority = priority;
        let updated = task.clone();

        self.persist_sorted();
        Some(updated)
    }

    /// Empties the day's list and persists the empty list.
    pub fn clear(&mut self) {
        self.tasks.clear();
        storage::write_json(&self.store, &self.key, &self.tasks);
    }

    fn persist_sorted(&mut self) {
        self.tasks = sort_tasks(&self.tasks);
        storage::write_json(&self.store, &self.key, &self.tasks);
    }
}
