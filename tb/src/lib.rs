//! Taskboard - kanban task board state engine
//!
//! An ordered set of columns, each holding an ordered list of tasks, with a
//! two-tier deletion model: tasks are soft-deleted into a bounded recycle bin
//! from which they can be restored or purged. State is mirrored to a durable
//! key-value store after every change.
//!
//! # Core Concepts
//!
//! - **Lenient mutations**: ids that don't resolve make an operation a no-op,
//!   reported as `false`, never an error
//! - **One owner**: the [`StateManager`] actor is the only mutation surface
//! - **Write-through**: the [`PersistenceBridge`] follows published snapshots
//!   and writes the latest one, without the caller awaiting durability
//!
//! # Modules
//!
//! - [`domain`] - Task, column and snapshot types
//! - [`board`] - Ordered columns and their active tasks
//! - [`recycle`] - Bounded most-recent-first recycle bin
//! - [`state`] - State container and its actor
//! - [`persistence`] - Snapshot load/save and the write-through bridge
//! - [`session`] - Wires a store, the actor and the bridge together
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod board;
pub mod cli;
pub mod config;
pub mod domain;
pub mod persistence;
pub mod recycle;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use board::BoardState;
pub use config::Config;
pub use domain::{BinSnapshot, BoardSnapshot, Column, DeletedTask, Priority, Task, TaskPatch};
pub use persistence::{BIN_KEY, BOARD_KEY, PersistenceBridge, load_bin, load_board, save_bin, save_board};
pub use recycle::RecycleBin;
pub use session::Session;
pub use state::{KanbanState, StateError, StateEvent, StateManager, StateResponse, StateSnapshot};
