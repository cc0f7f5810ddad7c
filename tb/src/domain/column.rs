//! Columns and the persisted snapshot shapes

use serde::{Deserialize, Serialize};

use super::id::generate_column_id;
use super::{DeletedTask, Task};

/// Id of the first default column, also the default restore fallback
pub const DEFAULT_COLUMN_ID: &str = "todo";

/// Title of the first default column
pub const DEFAULT_COLUMN_TITLE: &str = "To Do";

/// A workflow stage holding an ordered list of tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Column {
    /// Create an empty column
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tasks: Vec::new(),
        }
    }

    /// Create an empty column with a freshly generated id
    pub fn with_generated_id(title: impl Into<String>) -> Self {
        Self::new(generate_column_id(), title)
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn task_index(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }

    pub fn contains_task(&self, task_id: &str) -> bool {
        self.task_index(task_id).is_some()
    }

    /// The three columns a new board starts with
    pub fn defaults() -> Vec<Column> {
        vec![
            Column::new(DEFAULT_COLUMN_ID, DEFAULT_COLUMN_TITLE),
            Column::new("in-progress", "In Progress"),
            Column::new("done", "Done"),
        ]
    }
}

/// Persisted form of the board: `{ "columns": [...] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub columns: Vec<Column>,
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self {
            columns: Column::defaults(),
        }
    }
}

/// Persisted form of the recycle bin: `{ "deletedTasks": [...] }`, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinSnapshot {
    pub deleted_tasks: Vec<DeletedTask>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_columns() {
        let columns = Column::defaults();
        let titles: Vec<&str> = columns.iter().map(|c| c.title.as_str()).collect();
        let ids: Vec<&str> = columns.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(titles, vec!["To Do", "In Progress", "Done"]);
        assert_eq!(ids, vec!["todo", "in-progress", "done"]);
        assert!(columns.iter().all(|c| c.tasks.is_empty()));
    }

    #[test]
    fn test_generated_ids_differ() {
        let a = Column::with_generated_id("A");
        let b = Column::with_generated_id("A");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_task_lookup() {
        let mut column = Column::new("todo", "To Do");
        column.tasks.push(Task::new("t1", "one"));
        column.tasks.push(Task::new("t2", "two"));

        assert_eq!(column.task_index("t2"), Some(1));
        assert_eq!(column.task("t1").map(|t| t.title.as_str()), Some("one"));
        assert!(!column.contains_task("t3"));
    }

    #[test]
    fn test_board_snapshot_json_shape() {
        let json = serde_json::to_value(BoardSnapshot::default()).unwrap();
        assert_eq!(json["columns"].as_array().unwrap().len(), 3);
        assert_eq!(json["columns"][0]["id"], "todo");
        assert_eq!(json["columns"][0]["tasks"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_bin_snapshot_json_shape() {
        let json = serde_json::to_value(BinSnapshot::default()).unwrap();
        assert!(json["deletedTasks"].as_array().unwrap().is_empty());

        let parsed: BinSnapshot = serde_json::from_str(r#"{"deletedTasks":[]}"#).unwrap();
        assert!(parsed.deleted_tasks.is_empty());
    }
}
