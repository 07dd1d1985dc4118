use clap::{CommandFactory, Parser};
use daytask_cli::cli::{Cli, Command};
use daytask_core::clock::{Countdown, DeadlineClock, SystemTimeSource};
use daytask_core::config;
use daytask_core::error::AppError;
use daytask_core::goal;
use daytask_core::model::{Task, normalize_name};
use daytask_core::repository::TaskRepository;
use daytask_core::storage::JsonFileStore;
use std::io::{self, BufRead};
use tabled::{Table, Tabled};
use time::format_description::well_known::Rfc3339;
use tracing_subscriber::EnvFilter;

type Repo = TaskRepository<JsonFileStore, SystemTimeSource>;

fn open_repo() -> Result<Repo, AppError> {
    let store = JsonFileStore::open_default()?;
    Ok(TaskRepository::open(store, SystemTimeSource))
}

fn goal_percent(override_percent: Option<u8>) -> Result<u8, AppError> {
    let loaded = config::load_config_with_fallback();
    if let Some(err) = loaded.error {
        eprintln!("WARNING: {err}");
    }
    config::effective_goal_percent(&loaded.config, override_percent)
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Task")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Created")]
    created_at: String,
}

fn task_row(task: &Task) -> TaskRow {
    TaskRow {
        id: task.id.clone(),
        name: task.name.clone(),
        status: if task.completed { "completed" } else { "pending" }.to_string(),
        priority: task.priority.label().to_string(),
        created_at: task
            .created_at
            .format(&Rfc3339)
            .unwrap_or_else(|_| "-".to_string()),
    }
}

fn print_tasks_plain(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks for today yet.");
        return;
    }

    let rows: Vec<TaskRow> = tasks.iter().map(task_row).collect();
    println!("{}", Table::new(rows));
}

fn print_tasks_json(tasks: &[Task]) -> Result<(), AppError> {
    let payload =
        serde_json::to_string(tasks).map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{payload}");
    Ok(())
}

fn print_task_json(task: &Task) -> Result<(), AppError> {
    let payload =
        serde_json::to_string(task).map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{payload}");
    Ok(())
}

fn report_miss(json: bool, id: &str) {
    if json {
        println!("null");
    } else {
        println!("No task with id {id}");
    }
}

fn print_status(tasks: &[Task], target: u8, json: bool) -> Result<(), AppError> {
    let progress = goal::progress(tasks);
    let completed = tasks.iter().filter(|task| task.completed).count();
    let remaining = goal::tasks_remaining_for_goal(tasks, target);
    let high_done = goal::all_high_priority_complete(tasks);
    let met = goal::goal_met(tasks, target);
    let message = goal::motivational_message(tasks, target);

    if json {
        let payload = serde_json::json!({
            "progress": progress,
            "total": tasks.len(),
            "completed": completed,
            "goalPercent": target,
            "goalMet": met,
            "tasksRemainingForGoal": remaining,
            "allHighPriorityComplete": high_done,
            "message": message,
        });
        println!("{payload}");
        return Ok(());
    }

    println!(
        "Progress: {progress}% ({completed}/{} complete)",
        tasks.len()
    );
    println!(
        "Goal: {target}% - {}",
        if met { "met" } else { "not met" }
    );
    if remaining > 0 {
        println!("Tasks left to reach the goal: {remaining}");
    }
    if !high_done {
        println!("High-priority tasks are still pending");
    }
    println!("{message}");
    Ok(())
}

fn print_countdown(remaining: Countdown, json: bool) {
    if json {
        let payload = serde_json::json!({
            "countdown": remaining.to_string(),
            "deadlineReached": remaining == Countdown::DeadlineReached,
        });
        println!("{payload}");
    } else {
        match remaining {
            Countdown::Remaining { .. } => println!("Time left today: {remaining}"),
            Countdown::DeadlineReached => println!("{remaining}"),
        }
    }
}

fn is_display_request(err: &clap::Error) -> bool {
    matches!(
        err.kind(),
        clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
    )
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn run_command(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Add { name, priority } => {
            let mut repo = open_repo()?;
            match repo.add(&name, priority) {
                Some(task) => {
                    if cli.json {
                        print_task_json(&task)?;
                    } else {
                        println!("Added task: {} ({})", task.name, task.id);
                    }
                }
                None => {
                    return Err(AppError::invalid_input(
                        "task name must be 1-45 characters after trimming",
                    ));
                }
            }
        }
        Command::Done { id } => {
            let mut repo = open_repo()?;
            match repo.toggle_complete(&id) {
                Some(task) => {
                    if cli.json {
                        print_task_json(&task)?;
                    } else if task.completed {
                        println!("Completed task: {} ({})", task.name, task.id);
                    } else {
                        println!("Reopened task: {} ({})", task.name, task.id);
                    }
                }
                None => report_miss(cli.json, &id),
            }
        }
        Command::Edit { id, new_name } => {
            let mut repo = open_repo()?;
            if normalize_name(&new_name).is_none() {
                return Err(AppError::invalid_input(
                    "task name must be 1-45 characters after trimming",
                ));
            }
            match repo.rename(&id, &new_name) {
                Some(task) => {
                    if cli.json {
                        print_task_json(&task)?;
                    } else {
                        println!("Renamed task: {} ({})", task.name, task.id);
                    }
                }
                None => report_miss(cli.json, &id),
            }
        }
        Command::Delete { id } => {
            let mut repo = open_repo()?;
            match repo.remove(&id) {
                Some(task) => {
                    if cli.json {
                        print_task_json(&task)?;
                    } else {
                        println!("Deleted task: {} ({})", task.name, task.id);
                    }
                }
                None => report_miss(cli.json, &id),
            }
        }
        Command::Priority { id, level } => {
            let mut repo = open_repo()?;
            match repo.set_priority(&id, level) {
                Some(task) => {
                    if cli.json {
                        print_task_json(&task)?;
                    } else {
                        println!(
                            "Set priority of {} ({}) to {}",
                            task.name,
                            task.id,
                            task.priority.label()
                        );
                    }
                }
                None => report_miss(cli.json, &id),
            }
        }
        Command::Clear => {
            let mut repo = open_repo()?;
            repo.clear();
            if cli.json {
                print_tasks_json(&repo.tasks())?;
            } else {
                println!("Cleared all tasks for today");
            }
        }
        Command::List => {
            let repo = open_repo()?;
            let tasks = repo.tasks();
            if cli.json {
                print_tasks_json(&tasks)?;
            } else {
                print_tasks_plain(&tasks);
            }
        }
        Command::Status => {
            let repo = open_repo()?;
            let target = goal_percent(cli.goal)?;
            print_status(&repo.tasks(), target, cli.json)?;
        }
        Command::Countdown { watch } => {
            let clock = DeadlineClock::new(SystemTimeSource);
            if !watch {
                print_countdown(clock.remaining(), cli.json);
                return Ok(());
            }

            loop {
                let remaining = clock.remaining();
                print_countdown(remaining, cli.json);
                if remaining == Countdown::DeadlineReached {
                    break;
                }
                std::thread::sleep(std::time::Duration::from_secs(1));
            }
        }
    }

    Ok(())
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(current.clone());
                current.clear();
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_interactive() -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::storage(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {err}");
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("daytask".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                if is_display_request(&err) {
                    println!("{err}");
                } else {
                    eprintln!("ERROR: {}", normalize_parse_error(err));
                }
                continue;
            }
        };

        if let Err(err) = run_command(cli) {
            eprintln!("ERROR: {err}");
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive() {
            eprintln!("ERROR: {err}");
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if is_display_request(&err) {
                err.exit();
            }
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(cli) {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}
