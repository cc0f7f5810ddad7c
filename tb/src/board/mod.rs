//! Board state - the ordered columns and their active tasks
//!
//! Every operation is lenient: ids that don't resolve leave the board
//! untouched and the call reports that nothing changed. Callers that need to
//! tell "missing" from "done" re-query afterwards.

use tracing::{debug, info, warn};

use crate::domain::{BoardSnapshot, Column, DEFAULT_COLUMN_ID, DEFAULT_COLUMN_TITLE, Task, TaskPatch};

/// Ordered columns, each owning an ordered list of tasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    columns: Vec<Column>,
    /// Column used when a task has nowhere else to go
    fallback_id: String,
    fallback_title: String,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new(Column::defaults())
    }
}

impl BoardState {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            fallback_id: DEFAULT_COLUMN_ID.to_string(),
            fallback_title: DEFAULT_COLUMN_TITLE.to_string(),
        }
    }

    pub fn from_snapshot(snapshot: BoardSnapshot) -> Self {
        Self::new(snapshot.columns)
    }

    /// Override the fallback column used by restore and by adds to an empty board
    pub fn with_fallback(mut self, id: impl Into<String>, title: impl Into<String>) -> Self {
        self.fallback_id = id.into();
        self.fallback_title = title.into();
        self
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            columns: self.columns.clone(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn column_index(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == column_id)
    }

    /// First task with this id anywhere on the board
    pub fn find_task(&self, task_id: &str) -> Option<&Task> {
        self.columns.iter().find_map(|c| c.task(task_id))
    }

    pub fn fallback_column_id(&self) -> &str {
        &self.fallback_id
    }

    /// Append `task` to a column and stamp its `column_id`
    ///
    /// An unknown `column_id` falls back to the first column; an empty board
    /// gets the fallback column first. Returns the column the task landed in,
    /// or `None` when that column already holds a task with the same id.
    pub fn add_task(&mut self, column_id: &str, task: Task) -> Option<String> {
        debug!(%column_id, task_id = %task.id, "add_task: called");
        let index = match self.column_index(column_id) {
            Some(index) => index,
            None if !self.columns.is_empty() => {
                debug!(%column_id, fallback = %self.columns[0].id, "add_task: column not found, using first column");
                0
            }
            None => self.ensure_fallback_column(),
        };
        self.place_at(index, task)
    }

    /// Merge `patch` into a task in place
    pub fn update_task(&mut self, column_id: &str, task_id: &str, patch: &TaskPatch) -> bool {
        debug!(%column_id, %task_id, "update_task: called");
        let Some(task) = self
            .columns
            .iter_mut()
            .find(|c| c.id == column_id)
            .and_then(|c| c.tasks.iter_mut().find(|t| t.id == task_id))
        else {
            debug!(%column_id, %task_id, "update_task: not found, ignoring");
            return false;
        };
        patch.apply(task);
        true
    }

    /// Move a task to the tail of another column
    ///
    /// Moving within the same column sends the task to the tail of that column.
    pub fn move_task(&mut self, from_column_id: &str, to_column_id: &str, task_id: &str) -> bool {
        debug!(%from_column_id, %to_column_id, %task_id, "move_task: called");
        let (Some(from), Some(to)) = (self.column_index(from_column_id), self.column_index(to_column_id)) else {
            debug!("move_task: column not found, ignoring");
            return false;
        };
        let Some(task_index) = self.columns[from].task_index(task_id) else {
            debug!("move_task: task not in source column, ignoring");
            return false;
        };
        if from != to && self.columns[to].contains_task(task_id) {
            warn!(%to_column_id, %task_id, "move_task: destination already holds this task id, ignoring");
            return false;
        }

        let mut task = self.columns[from].tasks.remove(task_index);
        task.column_id = self.columns[to].id.clone();
        self.columns[to].tasks.push(task);
        true
    }

    /// Append a new empty column, returning its generated id
    pub fn add_column(&mut self, title: impl Into<String>) -> String {
        let column = Column::with_generated_id(title);
        let id = column.id.clone();
        debug!(column_id = %id, title = %column.title, "add_column: called");
        self.columns.push(column);
        id
    }

    pub fn rename_column(&mut self, column_id: &str, title: impl Into<String>) -> bool {
        debug!(%column_id, "rename_column: called");
        match self.columns.iter_mut().find(|c| c.id == column_id) {
            Some(column) => {
                column.title = title.into();
                true
            }
            None => false,
        }
    }

    /// Remove the column at `from_index` and reinsert it at `to_index`
    ///
    /// Either index out of range is a no-op, as is `from == to`.
    pub fn move_column(&mut self, from_index: usize, to_index: usize) -> bool {
        debug!(from_index, to_index, "move_column: called");
        let len = self.columns.len();
        if from_index >= len || to_index >= len {
            debug!(len, "move_column: index out of range, ignoring");
            return false;
        }
        if from_index == to_index {
            return false;
        }
        let column = self.columns.remove(from_index);
        self.columns.insert(to_index, column);
        true
    }

    /// Detach a task from a column and hand it to the caller
    pub fn take_task(&mut self, column_id: &str, task_id: &str) -> Option<Task> {
        debug!(%column_id, %task_id, "take_task: called");
        let column = self.columns.iter_mut().find(|c| c.id == column_id)?;
        let index = column.task_index(task_id)?;
        Some(column.tasks.remove(index))
    }

    /// Detach a whole column, tasks included
    pub fn remove_column(&mut self, column_id: &str) -> Option<Column> {
        debug!(%column_id, "remove_column: called");
        let index = self.column_index(column_id)?;
        Some(self.columns.remove(index))
    }

    /// Where a restored task with this origin would land, if it can
    ///
    /// The origin column if it still exists, else the fallback column. A
    /// missing fallback column will be recreated empty, so it always accepts.
    pub fn can_restore(&self, origin_column_id: &str, task_id: &str) -> bool {
        match self
            .column(origin_column_id)
            .or_else(|| self.column(&self.fallback_id))
        {
            Some(column) => !column.contains_task(task_id),
            None => true,
        }
    }

    /// Append a task coming back from the recycle bin
    ///
    /// Targets the task's recorded `column_id`, falling back to the fallback
    /// column (recreated if needed). Returns the column it landed in.
    pub fn place_restored(&mut self, task: Task) -> Option<String> {
        debug!(task_id = %task.id, origin = %task.column_id, "place_restored: called");
        let index = match self.column_index(&task.column_id) {
            Some(index) => index,
            None => {
                debug!(origin = %task.column_id, fallback = %self.fallback_id, "place_restored: origin column gone");
                self.ensure_fallback_column()
            }
        };
        self.place_at(index, task)
    }

    fn place_at(&mut self, index: usize, mut task: Task) -> Option<String> {
        let column = &mut self.columns[index];
        if column.contains_task(&task.id) {
            warn!(column_id = %column.id, task_id = %task.id, "Column already holds this task id, ignoring");
            return None;
        }
        task.column_id = column.id.clone();
        column.tasks.push(task);
        Some(column.id.clone())
    }

    /// Index of the fallback column, recreating it at the front if absent
    fn ensure_fallback_column(&mut self) -> usize {
        if let Some(index) = self.column_index(&self.fallback_id) {
            return index;
        }
        info!(column_id = %self.fallback_id, "Recreating fallback column");
        self.columns
            .insert(0, Column::new(self.fallback_id.clone(), self.fallback_title.clone()));
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;

    fn ids(board: &BoardState) -> Vec<&str> {
        board.columns().iter().map(|c| c.id.as_str()).collect()
    }

    fn task_ids<'a>(board: &'a BoardState, column_id: &str) -> Vec<&'a str> {
        board
            .column(column_id)
            .map(|c| c.tasks.iter().map(|t| t.id.as_str()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_default_board() {
        let board = BoardState::default();
        assert_eq!(ids(&board), vec!["todo", "in-progress", "done"]);
        assert_eq!(board.fallback_column_id(), "todo");
    }

    #[test]
    fn test_add_task_sets_column_id() {
        let mut board = BoardState::default();
        let landed = board.add_task("in-progress", Task::new("t1", "X"));

        assert_eq!(landed.as_deref(), Some("in-progress"));
        assert_eq!(task_ids(&board, "in-progress"), vec!["t1"]);
        assert_eq!(board.find_task("t1").unwrap().column_id, "in-progress");
    }

    #[test]
    fn test_add_task_appends() {
        let mut board = BoardState::default();
        board.add_task("todo", Task::new("t1", "one"));
        board.add_task("todo", Task::new("t2", "two"));
        assert_eq!(task_ids(&board, "todo"), vec!["t1", "t2"]);
    }

    #[test]
    fn test_add_task_unknown_column_uses_first() {
        let mut board = BoardState::default();
        board.move_column(2, 0);

        let landed = board.add_task("nope", Task::new("t1", "X"));

        assert_eq!(landed.as_deref(), Some("done"));
        assert_eq!(board.find_task("t1").unwrap().column_id, "done");
    }

    #[test]
    fn test_add_task_empty_board_creates_fallback() {
        let mut board = BoardState::new(Vec::new());
        let landed = board.add_task("anything", Task::new("t1", "X"));

        assert_eq!(landed.as_deref(), Some("todo"));
        assert_eq!(ids(&board), vec!["todo"]);
        assert_eq!(board.columns()[0].title, "To Do");
    }

    #[test]
    fn test_add_task_duplicate_id_in_column_ignored() {
        let mut board = BoardState::default();
        board.add_task("todo", Task::new("t1", "first"));
        let landed = board.add_task("todo", Task::new("t1", "second"));

        assert!(landed.is_none());
        assert_eq!(task_ids(&board, "todo"), vec!["t1"]);
        assert_eq!(board.find_task("t1").unwrap().title, "first");
    }

    #[test]
    fn test_update_task_merges() {
        let mut board = BoardState::default();
        board.add_task("todo", Task::new("t1", "Original").with_assignee("sam"));

        let changed = board.update_task("todo", "t1", &TaskPatch::new().title("Updated"));

        assert!(changed);
        let task = board.find_task("t1").unwrap();
        assert_eq!(task.title, "Updated");
        assert_eq!(task.assignee, "sam");
    }

    #[test]
    fn test_update_task_missing_is_noop() {
        let mut board = BoardState::default();
        board.add_task("todo", Task::new("t1", "Original"));
        let before = board.clone();

        assert!(!board.update_task("done", "t1", &TaskPatch::new().title("x")));
        assert!(!board.update_task("todo", "t9", &TaskPatch::new().title("x")));
        assert!(!board.update_task("nope", "t1", &TaskPatch::new().title("x")));
        assert_eq!(board, before);
    }

    #[test]
    fn test_move_task_to_tail() {
        let mut board = BoardState::default();
        board.add_task("todo", Task::new("t1", "one"));
        board.add_task("done", Task::new("t2", "two"));

        assert!(board.move_task("todo", "done", "t1"));

        assert!(task_ids(&board, "todo").is_empty());
        assert_eq!(task_ids(&board, "done"), vec!["t2", "t1"]);
        assert_eq!(board.find_task("t1").unwrap().column_id, "done");
    }

    #[test]
    fn test_move_task_same_column_goes_to_tail() {
        let mut board = BoardState::default();
        board.add_task("todo", Task::new("t1", "one"));
        board.add_task("todo", Task::new("t2", "two"));

        assert!(board.move_task("todo", "todo", "t1"));
        assert_eq!(task_ids(&board, "todo"), vec!["t2", "t1"]);
    }

    #[test]
    fn test_move_task_noops() {
        let mut board = BoardState::default();
        board.add_task("todo", Task::new("t1", "one"));
        board.add_task("done", Task::new("t1", "clash"));
        let before = board.clone();

        assert!(!board.move_task("nope", "done", "t1"));
        assert!(!board.move_task("todo", "nope", "t1"));
        assert!(!board.move_task("in-progress", "done", "t1"));
        assert!(!board.move_task("todo", "done", "t1"));
        assert_eq!(board, before);
    }

    #[test]
    fn test_add_and_rename_column() {
        let mut board = BoardState::default();
        let id = board.add_column("Review");

        assert_eq!(board.columns().len(), 4);
        assert_eq!(board.columns()[3].id, id);
        assert_eq!(board.columns()[3].title, "Review");
        assert!(board.columns()[3].tasks.is_empty());

        assert!(board.rename_column(&id, "QA"));
        assert_eq!(board.column(&id).unwrap().title, "QA");
        assert!(!board.rename_column("nope", "QA"));
    }

    #[test]
    fn test_move_column_splice_semantics() {
        let mut board = BoardState::default();
        assert!(board.move_column(0, 2));
        assert_eq!(ids(&board), vec!["in-progress", "done", "todo"]);

        assert!(board.move_column(2, 0));
        assert_eq!(ids(&board), vec!["todo", "in-progress", "done"]);

        assert!(board.move_column(0, 1));
        assert_eq!(ids(&board), vec!["in-progress", "todo", "done"]);
    }

    #[test]
    fn test_move_column_out_of_range() {
        let mut board = BoardState::default();
        assert!(!board.move_column(3, 0));
        assert!(!board.move_column(0, 3));
        assert!(!board.move_column(1, 1));
        assert_eq!(ids(&board), vec!["todo", "in-progress", "done"]);
    }

    #[test]
    fn test_take_task_and_remove_column() {
        let mut board = BoardState::default();
        board.add_task("todo", Task::new("t1", "one").with_priority(Priority::High));

        let task = board.take_task("todo", "t1").unwrap();
        assert_eq!(task.priority, Priority::High);
        assert!(board.take_task("todo", "t1").is_none());

        let column = board.remove_column("done").unwrap();
        assert_eq!(column.title, "Done");
        assert!(board.remove_column("done").is_none());
        assert_eq!(ids(&board), vec!["todo", "in-progress"]);
    }

    #[test]
    fn test_place_restored_origin_and_fallback() {
        let mut board = BoardState::default();

        let mut task = Task::new("t1", "back");
        task.column_id = "done".to_string();
        assert_eq!(board.place_restored(task).as_deref(), Some("done"));

        let mut orphan = Task::new("t2", "orphan");
        orphan.column_id = "deleted-column".to_string();
        assert_eq!(board.place_restored(orphan).as_deref(), Some("todo"));
        assert_eq!(board.find_task("t2").unwrap().column_id, "todo");
    }

    #[test]
    fn test_place_restored_recreates_fallback() {
        let mut board = BoardState::default();
        board.remove_column("todo");

        let mut orphan = Task::new("t1", "orphan");
        orphan.column_id = "gone".to_string();
        assert_eq!(board.place_restored(orphan).as_deref(), Some("todo"));
        assert_eq!(ids(&board), vec!["todo", "in-progress", "done"]);
    }

    #[test]
    fn test_custom_fallback() {
        let mut board = BoardState::new(Vec::new()).with_fallback("inbox", "Inbox");
        board.add_task("x", Task::new("t1", "X"));
        assert_eq!(ids(&board), vec!["inbox"]);
        assert_eq!(board.columns()[0].title, "Inbox");
    }

    #[test]
    fn test_can_restore() {
        let mut board = BoardState::default();
        board.add_task("done", Task::new("t1", "active"));

        assert!(!board.can_restore("done", "t1"));
        assert!(board.can_restore("done", "t2"));
        assert!(board.can_restore("gone", "t1"));

        board.remove_column("todo");
        assert!(board.can_restore("gone", "t1"));
    }
}
