//! DocumentStore trait — the persisted-document collaborator.
//!
//! Three logical collections: evaluations, chat sessions, validation
//! responses. The store is trusted to serialize concurrent writes at the
//! document level; session saves are create-or-overwrite with
//! last-write-wins and no version check.

use crate::error::StoreError;
use crate::evaluation::{EvaluationQuery, EvaluationRecord, NewEvaluation};
use crate::message::{ChatSession, SessionId};
use crate::validation::ValidationResponse;
use async_trait::async_trait;

/// The document store seam.
///
/// Implementations: in-memory (demo/tests), SQLite.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// The backend name (e.g., "in_memory", "sqlite").
    fn name(&self) -> &str;

    /// The most recent evaluations matching the query's equality filters,
    /// newest first, capped at `query.limit`.
    async fn recent_evaluations(
        &self,
        query: &EvaluationQuery,
    ) -> std::result::Result<Vec<EvaluationRecord>, StoreError>;

    /// Store a new evaluation; returns the store-assigned record id.
    async fn submit_evaluation(
        &self,
        record: NewEvaluation,
    ) -> std::result::Result<String, StoreError>;

    /// Create-or-overwrite the session document. Last write wins.
    async fn save_session(&self, session: &ChatSession) -> std::result::Result<(), StoreError>;

    /// Load a session by id, if it exists.
    async fn load_session(
        &self,
        id: &SessionId,
    ) -> std::result::Result<Option<ChatSession>, StoreError>;

    /// Persist a validation response as a standalone write-only record.
    async fn record_validation(
        &self,
        response: &ValidationResponse,
    ) -> std::result::Result<(), StoreError>;
}
