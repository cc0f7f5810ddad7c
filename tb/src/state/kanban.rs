//! KanbanState - board and recycle bin behind one mutation surface
//!
//! Tasks only cross between the board and the bin here, so a task is never
//! present in both at once. Each operation records the events it caused;
//! the owner drains them after the call and decides what to publish.

use tracing::{debug, warn};

use crate::board::BoardState;
use crate::domain::{Task, TaskPatch};
use crate::recycle::RecycleBin;

use super::messages::{StateEvent, StateSnapshot};

#[derive(Debug, Clone, Default)]
pub struct KanbanState {
    board: BoardState,
    bin: RecycleBin,
    events: Vec<StateEvent>,
}

impl KanbanState {
    pub fn new(board: BoardState, bin: RecycleBin) -> Self {
        Self {
            board,
            bin,
            events: Vec::new(),
        }
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn bin(&self) -> &RecycleBin {
        &self.bin
    }

    pub fn snapshot(&self, version: u64) -> StateSnapshot {
        StateSnapshot {
            version,
            board: self.board.snapshot(),
            bin: self.bin.snapshot(),
        }
    }

    /// Events recorded since the last drain, in the order they happened
    pub fn drain_events(&mut self) -> Vec<StateEvent> {
        std::mem::take(&mut self.events)
    }

    // === Board operations ===

    pub fn add_task(&mut self, column_id: &str, task: Task) -> bool {
        let task_id = task.id.clone();
        match self.board.add_task(column_id, task) {
            Some(column_id) => {
                self.events.push(StateEvent::TaskAdded { column_id, task_id });
                true
            }
            None => false,
        }
    }

    pub fn update_task(&mut self, column_id: &str, task_id: &str, patch: &TaskPatch) -> bool {
        let changed = self.board.update_task(column_id, task_id, patch);
        if changed {
            self.events.push(StateEvent::TaskUpdated {
                column_id: column_id.to_string(),
                task_id: task_id.to_string(),
            });
        }
        changed
    }

    pub fn move_task(&mut self, from_column_id: &str, to_column_id: &str, task_id: &str) -> bool {
        let changed = self.board.move_task(from_column_id, to_column_id, task_id);
        if changed {
            self.events.push(StateEvent::TaskMoved {
                from_column_id: from_column_id.to_string(),
                to_column_id: to_column_id.to_string(),
                task_id: task_id.to_string(),
            });
        }
        changed
    }

    pub fn add_column(&mut self, title: &str) -> String {
        let column_id = self.board.add_column(title);
        self.events.push(StateEvent::ColumnAdded {
            column_id: column_id.clone(),
        });
        column_id
    }

    pub fn rename_column(&mut self, column_id: &str, title: &str) -> bool {
        let changed = self.board.rename_column(column_id, title);
        if changed {
            self.events.push(StateEvent::ColumnRenamed {
                column_id: column_id.to_string(),
            });
        }
        changed
    }

    pub fn move_column(&mut self, from_index: usize, to_index: usize) -> bool {
        let changed = self.board.move_column(from_index, to_index);
        if changed {
            self.events.push(StateEvent::ColumnMoved { from_index, to_index });
        }
        changed
    }

    /// Remove a column, routing every task it holds into the recycle bin
    pub fn delete_column(&mut self, column_id: &str) -> bool {
        debug!(%column_id, "delete_column: called");
        let Some(column) = self.board.remove_column(column_id) else {
            debug!(%column_id, "delete_column: column not found, ignoring");
            return false;
        };

        let task_count = column.tasks.len();
        for task in column.tasks {
            self.soft_delete(task);
        }
        self.events.push(StateEvent::ColumnDeleted {
            column_id: column.id,
            task_count,
        });
        true
    }

    // === Recycle bin operations ===

    /// Soft-delete a task into the recycle bin
    pub fn delete_task(&mut self, column_id: &str, task_id: &str) -> bool {
        debug!(%column_id, %task_id, "delete_task: called");
        match self.board.take_task(column_id, task_id) {
            Some(task) => {
                self.soft_delete(task);
                true
            }
            None => {
                debug!(%column_id, %task_id, "delete_task: not found, ignoring");
                false
            }
        }
    }

    /// Move the most recent bin entry with this id back onto the board
    ///
    /// Lands in the original column if it still exists, otherwise in the
    /// fallback column. Left in the bin if the target column already holds a
    /// task with the same id.
    pub fn restore_task(&mut self, task_id: &str) -> bool {
        debug!(%task_id, "restore_task: called");
        let Some(entry) = self.bin.get(task_id) else {
            debug!(%task_id, "restore_task: not in recycle bin, ignoring");
            return false;
        };
        if !self.board.can_restore(entry.origin_column(), task_id) {
            warn!(%task_id, origin = %entry.origin_column(), "restore_task: target column already holds this task id");
            return false;
        }

        let Some(entry) = self.bin.take(task_id) else {
            return false;
        };
        match self.board.place_restored(entry.into_task()) {
            Some(column_id) => {
                self.events.push(StateEvent::TaskRestored {
                    column_id,
                    task_id: task_id.to_string(),
                });
                true
            }
            None => {
                // can_restore ruled this out above
                warn!(%task_id, "restore_task: placement refused after check");
                false
            }
        }
    }

    pub fn permanently_delete_task(&mut self, task_id: &str) -> bool {
        debug!(%task_id, "permanently_delete_task: called");
        match self.bin.take(task_id) {
            Some(_) => {
                self.events.push(StateEvent::TaskPurged {
                    task_id: task_id.to_string(),
                });
                true
            }
            None => false,
        }
    }

    pub fn empty_bin(&mut self) -> usize {
        let count = self.bin.clear();
        if count > 0 {
            self.events.push(StateEvent::BinEmptied { count });
        }
        count
    }

    fn soft_delete(&mut self, task: Task) {
        let column_id = task.column_id.clone();
        let task_id = task.id.clone();
        let evicted = self.bin.intake(task);
        self.events.push(StateEvent::TaskDeleted { column_id, task_id });
        if let Some(entry) = evicted {
            self.events.push(StateEvent::TaskEvicted {
                task_id: entry.task.id,
            });
        }
    }
}
