//! Domain types for the task board
//!
//! - [`Task`] / [`TaskPatch`] - cards and partial edits
//! - [`Column`] - ordered task lists
//! - [`DeletedTask`] - a task parked in the recycle bin
//! - [`BoardSnapshot`] / [`BinSnapshot`] - the persisted shapes

mod column;
mod id;
mod priority;
mod task;

pub use column::{BinSnapshot, BoardSnapshot, Column, DEFAULT_COLUMN_ID, DEFAULT_COLUMN_TITLE};
pub use id::{generate_column_id, generate_task_id};
pub use priority::Priority;
pub use task::{DeletedTask, Task, TaskPatch};
