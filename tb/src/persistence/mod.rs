//! Persistence bridge - mirrors state snapshots into a durable store
//!
//! The board and the bin live under two independent keys. They are written
//! board first, then bin, with no transaction between them, so a crash in
//! between can leave the persisted copies at different versions.

use std::sync::Arc;
use std::time::Duration;

use boardstore::{KvStore, read_json, write_json};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::{BinSnapshot, BoardSnapshot};
use crate::recycle::RecycleBin;
use crate::state::StateSnapshot;

/// Store key holding the board snapshot
pub const BOARD_KEY: &str = "board-snapshot";

/// Store key holding the recycle bin snapshot
pub const BIN_KEY: &str = "bin-snapshot";

/// Load the persisted board, or the default board if absent or unreadable
pub fn load_board(store: &dyn KvStore) -> BoardSnapshot {
    debug!(key = BOARD_KEY, "load_board: called");
    match read_json::<BoardSnapshot>(store, BOARD_KEY) {
        Ok(Some(board)) => {
            debug!(columns = board.columns.len(), "load_board: loaded");
            board
        }
        Ok(None) => {
            debug!("load_board: no snapshot, using default board");
            BoardSnapshot::default()
        }
        Err(e) => {
            warn!(key = BOARD_KEY, error = %e, "Unreadable board snapshot, using default board");
            BoardSnapshot::default()
        }
    }
}

/// Load the persisted bin, or an empty bin if absent or unreadable
///
/// Entries beyond `capacity` are dropped, oldest first.
pub fn load_bin(store: &dyn KvStore, capacity: usize) -> RecycleBin {
    debug!(key = BIN_KEY, capacity, "load_bin: called");
    let snapshot = match read_json::<BinSnapshot>(store, BIN_KEY) {
        Ok(Some(bin)) => bin,
        Ok(None) => {
            debug!("load_bin: no snapshot, using empty bin");
            BinSnapshot::default()
        }
        Err(e) => {
            warn!(key = BIN_KEY, error = %e, "Unreadable bin snapshot, using empty bin");
            BinSnapshot::default()
        }
    };
    RecycleBin::from_snapshot(snapshot, capacity)
}

pub fn save_board(store: &dyn KvStore, board: &BoardSnapshot) -> boardstore::Result<()> {
    debug!(columns = board.columns.len(), "save_board: called");
    write_json(store, BOARD_KEY, board)
}

pub fn save_bin(store: &dyn KvStore, bin: &BinSnapshot) -> boardstore::Result<()> {
    debug!(entries = bin.deleted_tasks.len(), "save_bin: called");
    write_json(store, BIN_KEY, bin)
}

/// Background writer that follows the state manager's snapshot channel
///
/// Only keys whose content differs from the last successful write are
/// touched. A failed write leaves the remembered value stale, so the key is
/// retried on the next change rather than immediately.
pub struct PersistenceBridge {
    store: Arc<dyn KvStore>,
    debounce: Duration,
    last_board: Option<BoardSnapshot>,
    last_bin: Option<BinSnapshot>,
}

impl PersistenceBridge {
    pub fn new(store: Arc<dyn KvStore>, debounce: Duration) -> Self {
        debug!(debounce_ms = debounce.as_millis() as u64, "PersistenceBridge::new: called");
        Self {
            store,
            debounce,
            last_board: None,
            last_bin: None,
        }
    }

    /// Treat `snapshot` as already persisted
    ///
    /// Used after loading so that an unchanged state is not written back.
    pub fn seed(mut self, snapshot: &StateSnapshot) -> Self {
        self.last_board = Some(snapshot.board.clone());
        self.last_bin = Some(snapshot.bin.clone());
        self
    }

    /// Write the keys of `snapshot` that changed; returns how many were written
    pub fn write_snapshot(&mut self, snapshot: &StateSnapshot) -> usize {
        debug!(version = snapshot.version, "write_snapshot: called");
        let mut written = 0;

        if self.last_board.as_ref() != Some(&snapshot.board) {
            match save_board(self.store.as_ref(), &snapshot.board) {
                Ok(()) => {
                    self.last_board = Some(snapshot.board.clone());
                    written += 1;
                }
                Err(e) => {
                    error!(key = BOARD_KEY, version = snapshot.version, error = %e, "Failed to persist board snapshot");
                }
            }
        }

        if self.last_bin.as_ref() != Some(&snapshot.bin) {
            match save_bin(self.store.as_ref(), &snapshot.bin) {
                Ok(()) => {
                    self.last_bin = Some(snapshot.bin.clone());
                    written += 1;
                }
                Err(e) => {
                    error!(key = BIN_KEY, version = snapshot.version, error = %e, "Failed to persist bin snapshot");
                }
            }
        }

        debug!(version = snapshot.version, written, "write_snapshot: done");
        written
    }

    /// Follow `rx` until the sender is dropped, then write the final state
    pub async fn run(mut self, mut rx: watch::Receiver<StateSnapshot>) {
        info!("PersistenceBridge started");

        loop {
            if rx.changed().await.is_err() {
                debug!("run: snapshot channel closed");
                break;
            }
            if !self.debounce.is_zero() {
                // Let a burst of changes settle; only the latest is written
                tokio::time::sleep(self.debounce).await;
            }
            let snapshot = rx.borrow_and_update().clone();
            self.write_snapshot(&snapshot);
        }

        let snapshot = rx.borrow().clone();
        self.write_snapshot(&snapshot);
        info!(version = snapshot.version, "PersistenceBridge stopped");
    }

    /// Run the bridge on its own task
    ///
    /// Awaiting the handle after the state manager shuts down guarantees the
    /// final snapshot has been written (or its failure logged).
    pub fn spawn(self, rx: watch::Receiver<StateSnapshot>) -> JoinHandle<()> {
        tokio::spawn(self.run(rx))
    }
}
