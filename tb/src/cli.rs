//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::Priority;

/// Taskboard - kanban board with a recycle bin
#[derive(Parser)]
#[command(
    name = "tb",
    about = "Kanban task board with soft-delete recycle bin",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Store directory (overrides storage.store-dir)
    #[arg(short, long, global = true, help = "Store directory (overrides storage.store-dir)")]
    pub store: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the board
    Show {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a task to a column
    AddTask {
        /// Column id (falls back to the first column if unknown)
        column: String,

        /// Task title
        title: String,

        /// Task id (generated if omitted)
        #[arg(long)]
        id: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// Priority (low, medium, high)
        #[arg(short, long)]
        priority: Option<Priority>,

        /// Due date, e.g. 2024-06-01
        #[arg(long)]
        due: Option<String>,

        #[arg(short, long)]
        assignee: Option<String>,
    },

    /// Edit fields of a task
    UpdateTask {
        column: String,
        task_id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// Priority (low, medium, high)
        #[arg(short, long)]
        priority: Option<Priority>,

        #[arg(long)]
        due: Option<String>,

        #[arg(short, long)]
        assignee: Option<String>,
    },

    /// Move a task to the end of another column
    MoveTask {
        from: String,
        to: String,
        task_id: String,
    },

    /// Soft-delete a task into the recycle bin
    DeleteTask { column: String, task_id: String },

    /// Append a new column
    AddColumn { title: String },

    /// Rename a column
    RenameColumn { column: String, title: String },

    /// Reorder a column by index
    MoveColumn { from: usize, to: usize },

    /// Delete a column, moving its tasks to the recycle bin
    DeleteColumn { column: String },

    /// List the recycle bin, most recent first
    Bin {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Restore a task from the recycle bin
    Restore { task_id: String },

    /// Permanently delete a task from the recycle bin
    Purge { task_id: String },

    /// Permanently delete everything in the recycle bin
    EmptyBin,
}

/// Output format for show/bin commands
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("PLAIN".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("table".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_parse_add_task() {
        let cli = Cli::try_parse_from([
            "tb", "--store", "/tmp/b", "add-task", "todo", "Write docs", "-p", "high", "--due", "2024-06-01",
        ])
        .unwrap();

        assert_eq!(cli.store, Some(PathBuf::from("/tmp/b")));
        match cli.command {
            Some(Command::AddTask {
                column,
                title,
                priority,
                due,
                id,
                ..
            }) => {
                assert_eq!(column, "todo");
                assert_eq!(title, "Write docs");
                assert_eq!(priority, Some(Priority::High));
                assert_eq!(due.as_deref(), Some("2024-06-01"));
                assert!(id.is_none());
            }
            other => panic!("Expected AddTask, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_bad_priority() {
        assert!(Cli::try_parse_from(["tb", "add-task", "todo", "x", "-p", "urgent"]).is_err());
    }

    #[test]
    fn test_parse_move_column_indices() {
        let cli = Cli::try_parse_from(["tb", "move-column", "0", "2"]).unwrap();
        assert!(matches!(cli.command, Some(Command::MoveColumn { from: 0, to: 2 })));
    }
}
