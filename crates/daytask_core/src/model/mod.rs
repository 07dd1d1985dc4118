mod task;

pub use task::{MAX_NAME_LEN, Priority, Task, normalize_name, sort_tasks};
