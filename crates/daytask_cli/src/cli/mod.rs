use clap::{Parser, Subcommand};
use daytask_core::model::Priority;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override the daily goal percentage (1-100)
    #[arg(long, global = true, value_name = "PERCENT")]
    pub goal: Option<u8>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a task to today's list
    ///
    /// Example: daytask add "Buy milk" --priority high
    Add {
        name: String,
        #[arg(long, default_value = "medium")]
        priority: Priority,
    },
    /// Toggle a task between pending and completed
    ///
    /// Example: daytask done 6f9ad2
    Done {
        id: String,
    },
    /// Rename a task
    ///
    /// Example: daytask edit 6f9ad2 "Buy organic milk"
    Edit {
        id: String,
        new_name: String,
    },
    /// Delete a task permanently
    ///
    /// Example: daytask delete 6f9ad2
    Delete {
        id: String,
    },
    /// Change a task's priority
    ///
    /// Example: daytask priority 6f9ad2 high
    Priority {
        id: String,
        level: Priority,
    },
    /// Delete every task on today's list
    Clear,
    /// Show today's tasks in display order
    List,
    /// Show progress toward the daily goal
    ///
    /// Example: daytask status --goal 60
    Status,
    /// Show the countdown to midnight
    ///
    /// Example: daytask countdown --watch
    Countdown {
        /// Refresh once per second until midnight
        #[arg(long)]
        watch: bool,
    },
}
