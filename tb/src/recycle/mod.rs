//! Recycle bin - bounded, most-recent-first store of soft-deleted tasks
//!
//! New entries go to the front; once the bin is over capacity the oldest
//! entry (the back) is evicted for good.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::domain::{BinSnapshot, DeletedTask, Task};

/// Default number of soft-deleted tasks kept
pub const DEFAULT_CAPACITY: usize = 50;

/// Largest capacity accepted from configuration
pub const MAX_CAPACITY: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecycleBin {
    entries: VecDeque<DeletedTask>,
    capacity: usize,
}

impl Default for RecycleBin {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl RecycleBin {
    /// Create an empty bin; a capacity of zero is treated as one
    ///
    /// Storage grows with the entries, not with `capacity`.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        debug!(capacity, "RecycleBin::new: called");
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    /// Rebuild a bin from its persisted form, dropping the oldest entries
    /// beyond `capacity`
    pub fn from_snapshot(snapshot: BinSnapshot, capacity: usize) -> Self {
        let mut bin = Self::new(capacity);
        let total = snapshot.deleted_tasks.len();
        bin.entries.extend(snapshot.deleted_tasks.into_iter().take(bin.capacity));
        if total > bin.capacity {
            info!(dropped = total - bin.capacity, capacity = bin.capacity, "Truncated recycle bin on load");
        }
        bin
    }

    pub fn snapshot(&self) -> BinSnapshot {
        BinSnapshot {
            deleted_tasks: self.entries.iter().cloned().collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries, newest first
    pub fn iter(&self) -> impl Iterator<Item = &DeletedTask> {
        self.entries.iter()
    }

    /// Most recent entry with this task id
    pub fn get(&self, task_id: &str) -> Option<&DeletedTask> {
        self.entries.iter().find(|e| e.id() == task_id)
    }

    /// Soft-delete `task` now; returns the evicted entry, if any
    pub fn intake(&mut self, task: Task) -> Option<DeletedTask> {
        self.intake_at(task, Utc::now())
    }

    pub fn intake_at(&mut self, task: Task, deleted_at: DateTime<Utc>) -> Option<DeletedTask> {
        debug!(task_id = %task.id, origin = %task.column_id, "intake: called");
        self.entries.push_front(DeletedTask::at(task, deleted_at));
        if self.entries.len() > self.capacity {
            let evicted = self.entries.pop_back();
            if let Some(entry) = &evicted {
                debug!(task_id = %entry.id(), capacity = self.capacity, "intake: evicted oldest entry");
            }
            return evicted;
        }
        None
    }

    /// Remove and return the most recent entry with this task id
    pub fn take(&mut self, task_id: &str) -> Option<DeletedTask> {
        debug!(%task_id, "take: called");
        let index = self.entries.iter().position(|e| e.id() == task_id)?;
        self.entries.remove(index)
    }

    /// Discard everything, returning how many entries were dropped
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        debug!(count, "clear: called");
        self.entries.clear();
        count
    }
}
