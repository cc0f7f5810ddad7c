//! Task, partial task updates, and soft-deleted tasks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Priority;

/// A card on the board
///
/// `column_id` records the owning column while the task is active, and the
/// last owning column once it has been soft-deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub assignee: String,
    #[serde(default)]
    pub column_id: String,
}

impl Task {
    /// Create a task with the given id and title; every other field is empty
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            due_date: String::new(),
            assignee: String::new(),
            column_id: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = due_date.into();
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = assignee.into();
        self
    }
}

/// Partial update for a task
///
/// Only fields set to `Some` are written. Identity (`id`) and ownership
/// (`column_id`) are not editable here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<String>,
    pub assignee: Option<String>,
}

impl TaskPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    pub fn assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// True if the patch carries no fields
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.assignee.is_none()
    }

    /// Merge the present fields into `task`
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = &self.due_date {
            task.due_date = due_date.clone();
        }
        if let Some(assignee) = &self.assignee {
            task.assignee = assignee.clone();
        }
    }
}

/// A soft-deleted task waiting in the recycle bin
///
/// Serializes flat: the task's own fields plus `deletedAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedTask {
    #[serde(flatten)]
    pub task: Task,
    pub deleted_at: DateTime<Utc>,
}

impl DeletedTask {
    /// Wrap a task removed from the board just now
    pub fn now(task: Task) -> Self {
        Self::at(task, Utc::now())
    }

    pub fn at(task: Task, deleted_at: DateTime<Utc>) -> Self {
        Self { task, deleted_at }
    }

    pub fn id(&self) -> &str {
        &self.task.id
    }

    /// The column the task was removed from
    pub fn origin_column(&self) -> &str {
        &self.task.column_id
    }

    /// Drop the deletion metadata and hand back the plain task
    pub fn into_task(self) -> Task {
        self.task
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_builder() {
        let task = Task::new("t1", "Write docs")
            .with_description("All of them")
            .with_priority(Priority::High)
            .with_due_date("2024-12-31")
            .with_assignee("sam");

        assert_eq!(task.id, "t1");
        assert_eq!(task.title, "Write docs");
        assert_eq!(task.description, "All of them");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due_date, "2024-12-31");
        assert_eq!(task.assignee, "sam");
        assert!(task.column_id.is_empty());
    }

    #[test]
    fn test_task_json_shape() {
        let mut task = Task::new("t1", "X").with_due_date("2024-01-01");
        task.column_id = "todo".to_string();

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["id"], "t1");
        assert_eq!(value["dueDate"], "2024-01-01");
        assert_eq!(value["columnId"], "todo");
        assert_eq!(value["priority"], "medium");
        assert!(value.get("due_date").is_none());
    }

    #[test]
    fn test_task_deserialize_partial() {
        let task: Task = serde_json::from_str(r#"{"id":"task1","title":"Test","priority":"medium"}"#).unwrap();
        assert_eq!(task.id, "task1");
        assert!(task.description.is_empty());
        assert!(task.column_id.is_empty());
    }

    #[test]
    fn test_patch_apply_leaves_absent_fields() {
        let mut task = Task::new("t1", "Original")
            .with_description("keep me")
            .with_priority(Priority::Low);
        task.column_id = "todo".to_string();

        TaskPatch::new().title("Updated").priority(Priority::High).apply(&mut task);

        assert_eq!(task.title, "Updated");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.description, "keep me");
        assert_eq!(task.column_id, "todo");
        assert_eq!(task.id, "t1");
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(TaskPatch::new().is_empty());
        assert!(!TaskPatch::new().assignee("a").is_empty());
    }

    #[test]
    fn test_deleted_task_flat_json() {
        let mut task = Task::new("t1", "X");
        task.column_id = "done".to_string();
        let deleted = DeletedTask::now(task.clone());

        let value = serde_json::to_value(&deleted).unwrap();
        assert_eq!(value["id"], "t1");
        assert_eq!(value["columnId"], "done");
        assert!(value["deletedAt"].as_str().is_some_and(|s| !s.is_empty()));
        assert!(value.get("task").is_none());

        let back: DeletedTask = serde_json::from_value(value).unwrap();
        assert_eq!(back, deleted);
        assert_eq!(back.origin_column(), "done");
        assert_eq!(back.into_task(), task);
    }
}
