//! Write-behind session saver.
//!
//! Session persistence never blocks a chat turn: callers enqueue a full
//! snapshot and move on. A single background worker drains the channel
//! and writes whatever snapshot is newest. A watch channel gives exactly
//! the coalescing the store contract wants — intermediate snapshots are
//! dropped, the latest always wins, and at most one save is in flight.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};
use unihelp_core::message::ChatSession;
use unihelp_core::store::DocumentStore;

/// Enqueues best-effort, last-write-wins session saves.
#[derive(Clone)]
pub struct SessionSaver {
    tx: watch::Sender<Option<ChatSession>>,
}

impl SessionSaver {
    /// Spawn the background worker against the given store.
    pub fn spawn(store: Arc<dyn DocumentStore>) -> Self {
        let (tx, mut rx) = watch::channel(None::<ChatSession>);

        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let snapshot = rx.borrow_and_update().clone();
                let Some(session) = snapshot else { continue };

                match store.save_session(&session).await {
                    Ok(()) => debug!(session = %session.id, "Session saved"),
                    // Save failures never surface to the chat flow.
                    Err(e) => warn!(session = %session.id, error = %e, "Session save failed"),
                }
            }
        });

        Self { tx }
    }

    /// Enqueue a snapshot. Replaces any snapshot still waiting.
    pub fn enqueue(&self, session: ChatSession) {
        self.tx.send_replace(Some(session));
    }
}
