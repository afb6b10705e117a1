//! In-memory store — the demo fallback and the test backend.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use unihelp_core::error::StoreError;
use unihelp_core::evaluation::{EvaluationQuery, EvaluationRecord, NewEvaluation};
use unihelp_core::message::{ChatSession, SessionId};
use unihelp_core::store::DocumentStore;
use unihelp_core::validation::ValidationResponse;
use uuid::Uuid;

#[derive(Default)]
struct Collections {
    evaluations: Vec<EvaluationRecord>,
    sessions: HashMap<String, ChatSession>,
    validations: Vec<ValidationResponse>,
}

/// An in-memory store backed by plain Vecs and a session map.
/// Used when no persistent store is configured, and in tests.
pub struct InMemoryStore {
    collections: Arc<RwLock<Collections>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            collections: Arc::new(RwLock::new(Collections::default())),
        }
    }

    /// Number of persisted validation responses (test observability).
    pub async fn validation_count(&self) -> usize {
        self.collections.read().await.validations.len()
    }

    /// Number of persisted sessions (test observability).
    pub async fn session_count(&self) -> usize {
        self.collections.read().await.sessions.len()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn recent_evaluations(
        &self,
        query: &EvaluationQuery,
    ) -> Result<Vec<EvaluationRecord>, StoreError> {
        let collections = self.collections.read().await;

        let mut results: Vec<EvaluationRecord> = collections
            .evaluations
            .iter()
            .filter(|e| e.matches(&query.filters))
            .cloned()
            .collect();

        results.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        results.truncate(query.limit);

        Ok(results)
    }

    async fn submit_evaluation(&self, record: NewEvaluation) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let stored = EvaluationRecord {
            id: id.clone(),
            subject: record.subject,
            instructor: record.instructor,
            term: record.term,
            clarity_rating: record.clarity_rating,
            alignment_rating: record.alignment_rating,
            free_text: record.free_text,
            submitted_at: chrono::Utc::now(),
            submitter_id: record.submitter_id,
        };
        self.collections.write().await.evaluations.push(stored);
        Ok(id)
    }

    async fn save_session(&self, session: &ChatSession) -> Result<(), StoreError> {
        self.collections
            .write()
            .await
            .sessions
            .insert(session.id.0.clone(), session.clone());
        Ok(())
    }

    async fn load_session(&self, id: &SessionId) -> Result<Option<ChatSession>, StoreError> {
        Ok(self.collections.read().await.sessions.get(&id.0).cloned())
    }

    async fn record_validation(&self, response: &ValidationResponse) -> Result<(), StoreError> {
        self.collections
            .write()
            .await
            .validations
            .push(response.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unihelp_core::evaluation::SearchFilters;
    use unihelp_core::validation::{ValidationResponse, ValidationVerdict};

    fn evaluation(subject: &str, instructor: &str, text: &str) -> NewEvaluation {
        NewEvaluation {
            subject: subject.into(),
            instructor: instructor.into(),
            term: "2024.2".into(),
            clarity_rating: 4,
            alignment_rating: 3,
            free_text: text.into(),
            submitter_id: None,
        }
    }

    #[tokio::test]
    async fn submit_assigns_stable_id() {
        let store = InMemoryStore::new();
        let id = store
            .submit_evaluation(evaluation("Calculus 1", "Ana Paula", "allows one page of notes"))
            .await
            .unwrap();
        assert!(!id.is_empty());

        let results = store
            .recent_evaluations(&EvaluationQuery::new(SearchFilters::default()))
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, id);
    }

    #[tokio::test]
    async fn query_filters_by_equality() {
        let store = InMemoryStore::new();
        store
            .submit_evaluation(evaluation("Calculus 1", "Ana Paula", "tough exams"))
            .await
            .unwrap();
        store
            .submit_evaluation(evaluation("Ethics", "Carlos Silva", "no final exam"))
            .await
            .unwrap();

        let filters = SearchFilters {
            subject: Some("Calculus 1".into()),
            ..Default::default()
        };
        let results = store
            .recent_evaluations(&EvaluationQuery::new(filters))
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].subject, "Calculus 1");
    }

    #[tokio::test]
    async fn query_is_recency_ordered_and_capped() {
        let store = InMemoryStore::new();
        for i in 0..15 {
            store
                .submit_evaluation(evaluation("Algorithms", "Fernanda Lima", &format!("opinion {i}")))
                .await
                .unwrap();
        }

        let results = store
            .recent_evaluations(&EvaluationQuery::new(SearchFilters::default()))
            .await
            .unwrap();
        assert_eq!(results.len(), 10);
        // Newest first
        for pair in results.windows(2) {
            assert!(pair[0].submitted_at >= pair[1].submitted_at);
        }
    }

    #[tokio::test]
    async fn session_save_is_last_write_wins() {
        let store = InMemoryStore::new();
        let mut session = ChatSession::new(Some("u1".into()));
        store.save_session(&session).await.unwrap();

        session.push(unihelp_core::ChatMessage::user("hello"));
        store.save_session(&session).await.unwrap();

        let loaded = store.load_session(&session.id).await.unwrap().unwrap();
        assert_eq!(loaded.messages.len(), 2);
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn load_missing_session_is_none() {
        let store = InMemoryStore::new();
        let loaded = store.load_session(&SessionId::new()).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn validation_responses_are_write_only() {
        let store = InMemoryStore::new();
        store
            .record_validation(&ValidationResponse::new(2, ValidationVerdict::True, None))
            .await
            .unwrap();
        store
            .record_validation(&ValidationResponse::new(2, ValidationVerdict::Myth, None))
            .await
            .unwrap();

        // Both kept — no tally, no de-duplication
        assert_eq!(store.validation_count().await, 2);
    }
}
