//! State management for the board and the recycle bin
//!
//! [`KanbanState`] is the synchronous core. [`StateManager`] wraps it in an
//! actor so that every mutation is serialized through one channel.

mod kanban;
mod manager;
mod messages;

pub use kanban::KanbanState;
pub use manager::StateManager;
pub use messages::{StateCommand, StateError, StateEvent, StateResponse, StateSnapshot};
