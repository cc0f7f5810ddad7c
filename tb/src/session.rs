//! Session - wires a store, the state manager and the persistence bridge
//!
//! This is the application root: it owns the state container and hands out
//! the manager handle to whoever needs to read or mutate the board.

use std::sync::Arc;

use boardstore::KvStore;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::board::BoardState;
use crate::config::Config;
use crate::persistence::{PersistenceBridge, load_bin, load_board};
use crate::state::{KanbanState, StateManager, StateResponse};

pub struct Session {
    manager: StateManager,
    persistence: JoinHandle<()>,
}

impl Session {
    /// Load persisted state from `store` and start the actor and the bridge
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(store: Arc<dyn KvStore>, config: &Config) -> Self {
        debug!(capacity = config.recycle.capacity, "Session::open: called");
        let board = BoardState::from_snapshot(load_board(&*store))
            .with_fallback(&config.recycle.fallback_column, &config.recycle.fallback_title);
        let bin = load_bin(&*store, config.recycle.capacity);

        let manager = StateManager::spawn(KanbanState::new(board, bin));
        let persistence = PersistenceBridge::new(store, config.persistence.debounce())
            .seed(&manager.latest())
            .spawn(manager.subscribe_snapshots());

        info!("Session opened");
        Self { manager, persistence }
    }

    pub fn manager(&self) -> &StateManager {
        &self.manager
    }

    /// Stop the state manager and wait until the final snapshot is written
    pub async fn close(self) -> StateResponse<()> {
        debug!("Session::close: called");
        self.manager.shutdown().await?;
        if let Err(e) = self.persistence.await {
            warn!(error = %e, "Persistence task ended abnormally");
        }
        info!("Session closed");
        Ok(())
    }
}
