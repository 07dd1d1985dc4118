use crate::model::{Priority, Task};

/// Completion percentage the day is measured against unless the
/// configuration says otherwise.
pub const DEFAULT_GOAL_PERCENT: u8 = 80;

fn completed_count(tasks: &[Task]) -> usize {
    tasks.iter().filter(|task| task.completed).count()
}

/// Percentage of the day's tasks marked complete, rounded to the
/// nearest integer. An empty list counts as 0.
pub fn progress(tasks: &[Task]) -> u8 {
    if tasks.is_empty() {
        return 0;
    }

    let ratio = completed_count(tasks) as f64 / tasks.len() as f64;
    (ratio * 100.0).round() as u8
}

/// How many more completions are needed to reach the target
/// percentage. Never negative; 0 once the target is met.
pub fn tasks_remaining_for_goal(tasks: &[Task], target_percent: u8) -> usize {
    let needed = (target_percent as usize * tasks.len()).div_ceil(100);
    needed.saturating_sub(completed_count(tasks))
}

/// Vacuously true when the list has no high-priority tasks.
pub fn all_high_priority_complete(tasks: &[Task]) -> bool {
    tasks
        .iter()
        .filter(|task| task.priority == Priority::High)
        .all(|task| task.completed)
}

/// The goal requires both the percentage threshold and every
/// high-priority task done. A single open high-priority task keeps the
/// goal unmet even at 100% overall progress.
pub fn goal_met(tasks: &[Task], target_percent: u8) -> bool {
    progress(tasks) >= target_percent && all_high_priority_complete(tasks)
}

/// One fixed message per progress band. The split at the target keys
/// off the high-priority gate, not just the percentage.
pub fn motivational_message(tasks: &[Task], target_percent: u8) -> &'static str {
    let progress = progress(tasks);
    if progress == 0 {
        return "Let's get the day started!";
    }
    if progress < 25 {
        return "You've got this! Keep going!";
    }
    if progress < 50 {
        return "Good pace! Don't stop now!";
    }
    if progress < 75 {
        return "Almost there! You're doing great!";
    }
    if progress < target_percent {
        return "So close to hitting the goal!";
    }
    if !all_high_priority_complete(tasks) {
        return "Goal percentage reached! Now finish your high-priority tasks!";
    }
    if progress == 100 {
        return "Perfect! The day is 100% complete!";
    }
    "Congratulations! Goal achieved!"
}
