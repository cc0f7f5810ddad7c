//! State manager messages
//!
//! Commands and responses for the actor pattern, plus what the actor
//! publishes after each change.

use serde::Serialize;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::domain::{BinSnapshot, BoardSnapshot, Task, TaskPatch};

/// Errors from state operations
///
/// Lookups that miss are not errors; they come back as `Ok(false)`.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Channel error")]
    ChannelError,
}

/// Response from state operations
pub type StateResponse<T> = Result<T, StateError>;

/// Commands sent to the StateManager actor
///
/// Mutations reply with whether the state changed.
#[derive(Debug)]
pub enum StateCommand {
    // Board operations
    AddTask {
        column_id: String,
        task: Task,
        reply: oneshot::Sender<bool>,
    },
    UpdateTask {
        column_id: String,
        task_id: String,
        patch: TaskPatch,
        reply: oneshot::Sender<bool>,
    },
    MoveTask {
        from_column_id: String,
        to_column_id: String,
        task_id: String,
        reply: oneshot::Sender<bool>,
    },
    AddColumn {
        title: String,
        reply: oneshot::Sender<String>,
    },
    RenameColumn {
        column_id: String,
        title: String,
        reply: oneshot::Sender<bool>,
    },
    MoveColumn {
        from_index: usize,
        to_index: usize,
        reply: oneshot::Sender<bool>,
    },
    DeleteColumn {
        column_id: String,
        reply: oneshot::Sender<bool>,
    },

    // Recycle bin operations
    DeleteTask {
        column_id: String,
        task_id: String,
        reply: oneshot::Sender<bool>,
    },
    RestoreTask {
        task_id: String,
        reply: oneshot::Sender<bool>,
    },
    PermanentlyDeleteTask {
        task_id: String,
        reply: oneshot::Sender<bool>,
    },
    EmptyBin {
        reply: oneshot::Sender<usize>,
    },

    // Queries
    GetSnapshot {
        reply: oneshot::Sender<StateSnapshot>,
    },

    // Shutdown
    Shutdown,
}

/// Everything an observer needs to render or persist the current state
///
/// `version` increases by one for every command that changed state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    pub version: u64,
    pub board: BoardSnapshot,
    pub bin: BinSnapshot,
}

/// Event broadcast after a change, one per observable effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateEvent {
    TaskAdded { column_id: String, task_id: String },
    TaskUpdated { column_id: String, task_id: String },
    TaskMoved {
        from_column_id: String,
        to_column_id: String,
        task_id: String,
    },
    /// A task was soft-deleted into the recycle bin
    TaskDeleted { column_id: String, task_id: String },
    TaskRestored { column_id: String, task_id: String },
    /// A task was permanently removed from the recycle bin
    TaskPurged { task_id: String },
    /// The bin went over capacity and dropped its oldest entry
    TaskEvicted { task_id: String },
    BinEmptied { count: usize },
    ColumnAdded { column_id: String },
    ColumnRenamed { column_id: String },
    ColumnMoved { from_index: usize, to_index: usize },
    ColumnDeleted { column_id: String, task_count: usize },
}
