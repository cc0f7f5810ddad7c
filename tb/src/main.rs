//! Taskboard - kanban board with a recycle bin
//!
//! CLI entry point: each invocation loads the board from the store, applies
//! one command, and waits for the result to be written back.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use boardstore::FileStore;
use taskboard::cli::{Cli, Command, OutputFormat};
use taskboard::config::Config;
use taskboard::domain::{Priority, Task, TaskPatch, generate_task_id};
use taskboard::session::Session;
use taskboard::state::StateManager;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskboard")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("taskboard.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    // Setup logging with priority: CLI > config > INFO default
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let store_dir = cli
        .store
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.storage.store_dir));
    info!(store_dir = %store_dir.display(), "Taskboard starting");

    let store = FileStore::open(&store_dir).context(format!("Failed to open store at {}", store_dir.display()))?;
    let session = Session::open(Arc::new(store), &config);

    let result = dispatch(session.manager(), cli.command).await;

    // Always flush the final snapshot, even if the command failed
    session.close().await.context("Failed to close session")?;
    result
}

async fn dispatch(manager: &StateManager, command: Option<Command>) -> Result<()> {
    debug!(?command, "main: dispatching command");
    match command {
        Some(Command::Show { format }) => cmd_show(manager, format).await,
        Some(Command::AddTask {
            column,
            title,
            id,
            description,
            priority,
            due,
            assignee,
        }) => {
            debug!(%column, %title, "main: matched AddTask command");
            let mut task = Task::new(id.unwrap_or_else(generate_task_id), title);
            if let Some(description) = description {
                task = task.with_description(description);
            }
            if let Some(priority) = priority {
                task = task.with_priority(priority);
            }
            if let Some(due) = due {
                task = task.with_due_date(due);
            }
            if let Some(assignee) = assignee {
                task = task.with_assignee(assignee);
            }
            let task_id = task.id.clone();
            if manager.add_task(&column, task).await? {
                println!("{} Added task {}", "✓".green(), task_id.cyan());
            } else {
                println!("{} Task {} already exists in that column", "!".yellow(), task_id);
            }
            Ok(())
        }
        Some(Command::UpdateTask {
            column,
            task_id,
            title,
            description,
            priority,
            due,
            assignee,
        }) => {
            debug!(%column, %task_id, "main: matched UpdateTask command");
            let patch = TaskPatch {
                title,
                description,
                priority,
                due_date: due,
                assignee,
            };
            if patch.is_empty() {
                println!("{} Nothing to update", "!".yellow());
                return Ok(());
            }
            report(
                manager.update_task(&column, &task_id, patch).await?,
                "Updated task",
                &task_id,
                "task not found in that column",
            );
            Ok(())
        }
        Some(Command::MoveTask { from, to, task_id }) => {
            debug!(%from, %to, %task_id, "main: matched MoveTask command");
            report(
                manager.move_task(&from, &to, &task_id).await?,
                "Moved task",
                &task_id,
                "unknown column, task not in source, or already in destination",
            );
            Ok(())
        }
        Some(Command::DeleteTask { column, task_id }) => {
            debug!(%column, %task_id, "main: matched DeleteTask command");
            report(
                manager.delete_task(&column, &task_id).await?,
                "Moved to recycle bin:",
                &task_id,
                "task not found in that column",
            );
            Ok(())
        }
        Some(Command::AddColumn { title }) => {
            debug!(%title, "main: matched AddColumn command");
            let column_id = manager.add_column(&title).await?;
            println!("{} Added column {} ({})", "✓".green(), title, column_id.cyan());
            Ok(())
        }
        Some(Command::RenameColumn { column, title }) => {
            debug!(%column, %title, "main: matched RenameColumn command");
            report(
                manager.rename_column(&column, &title).await?,
                "Renamed column",
                &column,
                "column not found",
            );
            Ok(())
        }
        Some(Command::MoveColumn { from, to }) => {
            debug!(from, to, "main: matched MoveColumn command");
            let label = format!("{} -> {}", from, to);
            report(
                manager.move_column(from, to).await?,
                "Moved column",
                &label,
                "index out of range or already in place",
            );
            Ok(())
        }
        Some(Command::DeleteColumn { column }) => {
            debug!(%column, "main: matched DeleteColumn command");
            report(manager.delete_column(&column).await?, "Deleted column", &column, "column not found");
            Ok(())
        }
        Some(Command::Bin { format }) => cmd_bin(manager, format).await,
        Some(Command::Restore { task_id }) => {
            debug!(%task_id, "main: matched Restore command");
            report(
                manager.restore_task(&task_id).await?,
                "Restored task",
                &task_id,
                "not in the recycle bin, or target column already holds it",
            );
            Ok(())
        }
        Some(Command::Purge { task_id }) => {
            debug!(%task_id, "main: matched Purge command");
            report(
                manager.permanently_delete_task(&task_id).await?,
                "Permanently deleted",
                &task_id,
                "not in the recycle bin",
            );
            Ok(())
        }
        Some(Command::EmptyBin) => {
            debug!("main: matched EmptyBin command");
            let count = manager.empty_bin().await?;
            println!("{} Emptied recycle bin ({} tasks)", "✓".green(), count);
            Ok(())
        }
        None => {
            debug!("main: no command specified, showing board");
            cmd_show(manager, OutputFormat::Text).await
        }
    }
}

/// Print the outcome of a lenient mutation; `reason` explains a no-op
fn report(changed: bool, action: &str, target: &str, reason: &str) {
    if changed {
        println!("{} {} {}", "✓".green(), action, target.cyan());
    } else {
        println!("{} No change to {}: {}", "!".yellow(), target, reason);
    }
}

fn priority_label(priority: Priority) -> ColoredString {
    match priority {
        Priority::High => "high".red(),
        Priority::Medium => "medium".yellow(),
        Priority::Low => "low".dimmed(),
    }
}

async fn cmd_show(manager: &StateManager, format: OutputFormat) -> Result<()> {
    debug!(%format, "cmd_show: called");
    let board = manager.board().await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&board)?);
        }
        OutputFormat::Text => {
            for (index, column) in board.columns.iter().enumerate() {
                println!(
                    "{} {} {} ({})",
                    format!("[{}]", index).dimmed(),
                    column.title.bold(),
                    column.id.dimmed(),
                    column.tasks.len()
                );
                for task in &column.tasks {
                    let mut line = format!("  {} {} [{}]", task.id.cyan(), task.title, priority_label(task.priority));
                    if !task.due_date.is_empty() {
                        line.push_str(&format!(" due {}", task.due_date));
                    }
                    if !task.assignee.is_empty() {
                        line.push_str(&format!(" @{}", task.assignee));
                    }
                    println!("{}", line);
                }
            }
        }
    }
    Ok(())
}

async fn cmd_bin(manager: &StateManager, format: OutputFormat) -> Result<()> {
    debug!(%format, "cmd_bin: called");
    let bin = manager.bin().await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&bin)?);
        }
        OutputFormat::Text => {
            if bin.deleted_tasks.is_empty() {
                println!("Recycle bin is empty");
                return Ok(());
            }
            for entry in &bin.deleted_tasks {
                println!(
                    "{} {} from {} deleted {}",
                    entry.task.id.cyan(),
                    entry.task.title,
                    entry.task.column_id.dimmed(),
                    entry.deleted_at.format("%Y-%m-%d %H:%M:%S UTC")
                );
            }
        }
    }
    Ok(())
}
