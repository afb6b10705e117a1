//! Session state holder.
//!
//! Owns the single in-flight chat session: the append-only message list,
//! the loading gate that serializes turns, the active search filters,
//! and the owner identity. Every mutation that changes the message list
//! enqueues a write-behind save through [`SessionSaver`].

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use unihelp_core::evaluation::SearchFilters;
use unihelp_core::message::{ChatMessage, ChatSession, Feedback, Role, SessionId};
use unihelp_core::store::DocumentStore;
use unihelp_core::validation::{ValidationResponse, ValidationVerdict};

use crate::saver::SessionSaver;

const VALIDATION_THANKS: &str = "✅ Thanks! Your answer helps keep UniHelp up to date.";

struct SessionInner {
    session: ChatSession,
    is_loading: bool,
    filters: SearchFilters,
}

/// Shared handle to the live session state. Cheap to clone.
#[derive(Clone)]
pub struct SessionHolder {
    inner: Arc<RwLock<SessionInner>>,
    saver: SessionSaver,
    store: Arc<dyn DocumentStore>,
}

impl SessionHolder {
    /// Create a fresh session (greeting only) for the given owner.
    pub fn new(store: Arc<dyn DocumentStore>, owner_id: Option<String>) -> Self {
        let saver = SessionSaver::spawn(store.clone());
        Self {
            inner: Arc::new(RwLock::new(SessionInner {
                session: ChatSession::new(owner_id),
                is_loading: false,
                filters: SearchFilters::default(),
            })),
            saver,
            store,
        }
    }

    /// Atomically claim the loading gate. Returns `false` when a turn is
    /// already in flight; the caller must then drop the submission.
    pub async fn try_begin_turn(&self) -> bool {
        let mut inner = self.inner.write().await;
        if inner.is_loading {
            return false;
        }
        inner.is_loading = true;
        true
    }

    /// Release the loading gate at the end of a turn, success or failure.
    pub async fn end_turn(&self) {
        self.inner.write().await.is_loading = false;
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.read().await.is_loading
    }

    /// Snapshot of the message list.
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.inner.read().await.session.messages.clone()
    }

    pub async fn session_id(&self) -> SessionId {
        self.inner.read().await.session.id.clone()
    }

    pub async fn filters(&self) -> SearchFilters {
        self.inner.read().await.filters.clone()
    }

    pub async fn set_filters(&self, filters: SearchFilters) {
        self.inner.write().await.filters = filters;
    }

    /// Append the student's message and enqueue a save.
    pub async fn append_user_turn(&self, text: impl Into<String>) {
        self.append(ChatMessage::user(text)).await;
    }

    /// Append a bot-side message (answer, fallback, or validation prompt)
    /// and enqueue a save.
    pub async fn append_bot_turn(&self, message: ChatMessage) {
        self.append(message).await;
    }

    async fn append(&self, message: ChatMessage) {
        let snapshot = {
            let mut inner = self.inner.write().await;
            inner.session.push(message);
            inner.session.clone()
        };
        self.saver.enqueue(snapshot);
    }

    /// Set or replace feedback on the bot message at `index`.
    ///
    /// The greeting (index 0) never takes feedback, out-of-range indices
    /// and user messages are ignored, and only the feedback field of the
    /// targeted message changes.
    pub async fn record_feedback(&self, index: usize, feedback: Feedback) {
        let snapshot = {
            let mut inner = self.inner.write().await;
            if index == 0 {
                return;
            }
            let Some(message) = inner.session.messages.get_mut(index) else {
                debug!(index, "Feedback index out of range; ignoring");
                return;
            };
            if message.role != Role::Model {
                return;
            }
            message.feedback = Some(feedback);
            inner.session.clone()
        };
        self.saver.enqueue(snapshot);
    }

    /// Record the student's verdict on a validation prompt: append the
    /// acknowledgement message, then persist the response best-effort in
    /// the background.
    pub async fn record_validation_response(&self, claim_id: u32, verdict: ValidationVerdict) {
        let owner_id = self.inner.read().await.session.owner_id.clone();
        self.append(ChatMessage::model(VALIDATION_THANKS)).await;

        let store = self.store.clone();
        let response = ValidationResponse::new(claim_id, verdict, owner_id);
        tokio::spawn(async move {
            if let Err(e) = store.record_validation(&response).await {
                warn!(claim_id = response.claim_id, error = %e, "Validation response not persisted");
            }
        });
    }

    /// Discard the current session and start a fresh one (greeting only).
    /// The loading gate and filters reset with it.
    pub async fn reset_session(&self, owner_id: Option<String>) {
        let snapshot = {
            let mut inner = self.inner.write().await;
            inner.session = ChatSession::new(owner_id);
            inner.is_loading = false;
            inner.filters = SearchFilters::default();
            inner.session.clone()
        };
        self.saver.enqueue(snapshot);
    }

    /// Replace the live session with a persisted one, atomically.
    /// Returns `false` when the id is unknown; the live session is then
    /// left untouched.
    pub async fn load_session(&self, id: &SessionId) -> Result<bool, unihelp_core::error::StoreError> {
        let Some(loaded) = self.store.load_session(id).await? else {
            return Ok(false);
        };
        info!(session = %loaded.id, messages = loaded.messages.len(), "Session restored");
        let mut inner = self.inner.write().await;
        inner.session = loaded;
        inner.is_loading = false;
        Ok(true)
    }
}
