//! StateManager - actor that owns the board and the recycle bin
//!
//! Processes commands via channels so every mutation runs to completion
//! before the next one starts. After each change the actor publishes a fresh
//! snapshot on a watch channel (latest value wins) and broadcasts the events
//! the change produced.

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, info};

use crate::domain::{BinSnapshot, BoardSnapshot, Task, TaskPatch};

use super::kanban::KanbanState;
use super::messages::{StateCommand, StateError, StateEvent, StateResponse, StateSnapshot};

/// Command queue depth
const COMMAND_CHANNEL_CAPACITY: usize = 256;

/// Event broadcast buffer; slow subscribers lag rather than block the actor
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Handle to send commands to the StateManager
#[derive(Clone)]
pub struct StateManager {
    tx: mpsc::Sender<StateCommand>,
    /// Broadcast sender for state change notifications
    event_tx: broadcast::Sender<StateEvent>,
    snapshot_rx: watch::Receiver<StateSnapshot>,
}

impl StateManager {
    /// Spawn a new StateManager actor owning `state`
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(state: KanbanState) -> Self {
        debug!(
            columns = state.board().columns().len(),
            deleted = state.bin().len(),
            "spawn: called"
        );
        let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(state.snapshot(0));

        let actor = Actor {
            state,
            version: 0,
            snapshot_tx,
            event_tx: event_tx.clone(),
        };
        tokio::spawn(actor.run(rx));

        info!("StateManager spawned");

        Self {
            tx,
            event_tx,
            snapshot_rx,
        }
    }

    /// Subscribe to state change events
    pub fn subscribe_events(&self) -> broadcast::Receiver<StateEvent> {
        self.event_tx.subscribe()
    }

    /// Subscribe to snapshots; the receiver always holds the latest state
    ///
    /// The channel closes once the actor stops, after the final snapshot.
    pub fn subscribe_snapshots(&self) -> watch::Receiver<StateSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Most recently published snapshot, without a round trip to the actor
    pub fn latest(&self) -> StateSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> StateCommand) -> StateResponse<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(command(reply_tx))
            .await
            .map_err(|_| StateError::ChannelError)?;
        reply_rx.await.map_err(|_| StateError::ChannelError)
    }

    // === Board operations ===

    /// Append a task to a column (first column if the id doesn't resolve)
    pub async fn add_task(&self, column_id: &str, task: Task) -> StateResponse<bool> {
        debug!(%column_id, task_id = %task.id, "add_task: called");
        let column_id = column_id.to_string();
        self.request(|reply| StateCommand::AddTask { column_id, task, reply })
            .await
    }

    /// Merge the fields present in `patch` into a task
    pub async fn update_task(&self, column_id: &str, task_id: &str, patch: TaskPatch) -> StateResponse<bool> {
        debug!(%column_id, %task_id, "update_task: called");
        let (column_id, task_id) = (column_id.to_string(), task_id.to_string());
        self.request(|reply| StateCommand::UpdateTask {
            column_id,
            task_id,
            patch,
            reply,
        })
        .await
    }

    /// Move a task to the tail of another column
    pub async fn move_task(&self, from_column_id: &str, to_column_id: &str, task_id: &str) -> StateResponse<bool> {
        debug!(%from_column_id, %to_column_id, %task_id, "move_task: called");
        let (from_column_id, to_column_id, task_id) = (
            from_column_id.to_string(),
            to_column_id.to_string(),
            task_id.to_string(),
        );
        self.request(|reply| StateCommand::MoveTask {
            from_column_id,
            to_column_id,
            task_id,
            reply,
        })
        .await
    }

    /// Append a new empty column, returning its id
    pub async fn add_column(&self, title: &str) -> StateResponse<String> {
        debug!(%title, "add_column: called");
        let title = title.to_string();
        self.request(|reply| StateCommand::AddColumn { title, reply }).await
    }

    pub async fn rename_column(&self, column_id: &str, title: &str) -> StateResponse<bool> {
        debug!(%column_id, %title, "rename_column: called");
        let (column_id, title) = (column_id.to_string(), title.to_string());
        self.request(|reply| StateCommand::RenameColumn {
            column_id,
            title,
            reply,
        })
        .await
    }

    /// Reorder columns: remove at `from_index`, reinsert at `to_index`
    pub async fn move_column(&self, from_index: usize, to_index: usize) -> StateResponse<bool> {
        debug!(from_index, to_index, "move_column: called");
        self.request(|reply| StateCommand::MoveColumn {
            from_index,
            to_index,
            reply,
        })
        .await
    }

    /// Delete a column, soft-deleting every task it holds
    pub async fn delete_column(&self, column_id: &str) -> StateResponse<bool> {
        debug!(%column_id, "delete_column: called");
        let column_id = column_id.to_string();
        self.request(|reply| StateCommand::DeleteColumn { column_id, reply })
            .await
    }

    // === Recycle bin operations ===

    /// Soft-delete a task into the recycle bin
    pub async fn delete_task(&self, column_id: &str, task_id: &str) -> StateResponse<bool> {
        debug!(%column_id, %task_id, "delete_task: called");
        let (column_id, task_id) = (column_id.to_string(), task_id.to_string());
        self.request(|reply| StateCommand::DeleteTask {
            column_id,
            task_id,
            reply,
        })
        .await
    }

    /// Bring a soft-deleted task back onto the board
    pub async fn restore_task(&self, task_id: &str) -> StateResponse<bool> {
        debug!(%task_id, "restore_task: called");
        let task_id = task_id.to_string();
        self.request(|reply| StateCommand::RestoreTask { task_id, reply })
            .await
    }

    /// Drop a soft-deleted task for good
    pub async fn permanently_delete_task(&self, task_id: &str) -> StateResponse<bool> {
        debug!(%task_id, "permanently_delete_task: called");
        let task_id = task_id.to_string();
        self.request(|reply| StateCommand::PermanentlyDeleteTask { task_id, reply })
            .await
    }

    /// Drop everything in the recycle bin, returning how many entries went
    pub async fn empty_bin(&self) -> StateResponse<usize> {
        debug!("empty_bin: called");
        self.request(|reply| StateCommand::EmptyBin { reply }).await
    }

    // === Queries ===

    pub async fn snapshot(&self) -> StateResponse<StateSnapshot> {
        debug!("snapshot: called");
        self.request(|reply| StateCommand::GetSnapshot { reply }).await
    }

    pub async fn board(&self) -> StateResponse<BoardSnapshot> {
        Ok(self.snapshot().await?.board)
    }

    pub async fn bin(&self) -> StateResponse<BinSnapshot> {
        Ok(self.snapshot().await?.bin)
    }

    /// Shutdown the StateManager
    ///
    /// Commands already queued are processed first.
    pub async fn shutdown(&self) -> StateResponse<()> {
        debug!("shutdown: called");
        self.tx
            .send(StateCommand::Shutdown)
            .await
            .map_err(|_| StateError::ChannelError)
    }
}

/// The actor side: sole owner of the mutable state
struct Actor {
    state: KanbanState,
    version: u64,
    snapshot_tx: watch::Sender<StateSnapshot>,
    event_tx: broadcast::Sender<StateEvent>,
}

impl Actor {
    async fn run(mut self, mut rx: mpsc::Receiver<StateCommand>) {
        debug!("StateManager actor started");

        while let Some(cmd) = rx.recv().await {
            match cmd {
                StateCommand::AddTask { column_id, task, reply } => {
                    debug!(%column_id, task_id = %task.id, "actor_loop: AddTask command");
                    let changed = self.state.add_task(&column_id, task);
                    self.publish();
                    let _ = reply.send(changed);
                }

                StateCommand::UpdateTask {
                    column_id,
                    task_id,
                    patch,
                    reply,
                } => {
                    debug!(%column_id, %task_id, "actor_loop: UpdateTask command");
                    let changed = self.state.update_task(&column_id, &task_id, &patch);
                    self.publish();
                    let _ = reply.send(changed);
                }

                StateCommand::MoveTask {
                    from_column_id,
                    to_column_id,
                    task_id,
                    reply,
                } => {
                    debug!(%from_column_id, %to_column_id, %task_id, "actor_loop: MoveTask command");
                    let changed = self.state.move_task(&from_column_id, &to_column_id, &task_id);
                    self.publish();
                    let _ = reply.send(changed);
                }

                StateCommand::AddColumn { title, reply } => {
                    debug!(%title, "actor_loop: AddColumn command");
                    let column_id = self.state.add_column(&title);
                    self.publish();
                    let _ = reply.send(column_id);
                }

                StateCommand::RenameColumn {
                    column_id,
                    title,
                    reply,
                } => {
                    debug!(%column_id, "actor_loop: RenameColumn command");
                    let changed = self.state.rename_column(&column_id, &title);
                    self.publish();
                    let _ = reply.send(changed);
                }

                StateCommand::MoveColumn {
                    from_index,
                    to_index,
                    reply,
                } => {
                    debug!(from_index, to_index, "actor_loop: MoveColumn command");
                    let changed = self.state.move_column(from_index, to_index);
                    self.publish();
                    let _ = reply.send(changed);
                }

                StateCommand::DeleteColumn { column_id, reply } => {
                    debug!(%column_id, "actor_loop: DeleteColumn command");
                    let changed = self.state.delete_column(&column_id);
                    self.publish();
                    let _ = reply.send(changed);
                }

                StateCommand::DeleteTask {
                    column_id,
                    task_id,
                    reply,
                } => {
                    debug!(%column_id, %task_id, "actor_loop: DeleteTask command");
                    let changed = self.state.delete_task(&column_id, &task_id);
                    self.publish();
                    let _ = reply.send(changed);
                }

                StateCommand::RestoreTask { task_id, reply } => {
                    debug!(%task_id, "actor_loop: RestoreTask command");
                    let changed = self.state.restore_task(&task_id);
                    self.publish();
                    let _ = reply.send(changed);
                }

                StateCommand::PermanentlyDeleteTask { task_id, reply } => {
                    debug!(%task_id, "actor_loop: PermanentlyDeleteTask command");
                    let changed = self.state.permanently_delete_task(&task_id);
                    self.publish();
                    let _ = reply.send(changed);
                }

                StateCommand::EmptyBin { reply } => {
                    debug!("actor_loop: EmptyBin command");
                    let count = self.state.empty_bin();
                    self.publish();
                    let _ = reply.send(count);
                }

                StateCommand::GetSnapshot { reply } => {
                    debug!("actor_loop: GetSnapshot command");
                    let _ = reply.send(self.state.snapshot(self.version));
                }

                StateCommand::Shutdown => {
                    debug!("actor_loop: Shutdown command");
                    info!(version = self.version, "StateManager shutting down");
                    break;
                }
            }
        }

        debug!("StateManager actor stopped");
    }

    /// Publish a new snapshot and the pending events, if anything changed
    ///
    /// Runs before the reply is sent, so a caller that awaited a mutation
    /// already sees its effect in `latest()`.
    fn publish(&mut self) {
        let events = self.state.drain_events();
        if events.is_empty() {
            return;
        }

        self.version += 1;
        debug!(version = self.version, events = events.len(), "publish: new snapshot");
        self.snapshot_tx.send_replace(self.state.snapshot(self.version));
        for event in events {
            // No subscribers is fine
            let _ = self.event_tx.send(event);
        }
    }
}
