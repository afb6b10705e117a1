//! Shared test doubles for the pipeline crates' tests.

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use unihelp_config::ChatConfig;
use unihelp_core::completion::CompletionClient;
use unihelp_core::error::{CompletionError, StoreError};
use unihelp_core::evaluation::{EvaluationQuery, EvaluationRecord, NewEvaluation};
use unihelp_core::message::{ChatSession, SessionId};
use unihelp_core::store::DocumentStore;
use unihelp_core::validation::{ValidationClaim, ValidationResponse};

use crate::validation::ValidationPolicy;

pub fn chat_config() -> ChatConfig {
    ChatConfig::default()
}

/// A completion client that replays scripted responses in order.
pub struct ScriptedClient {
    script: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new(mut responses: Vec<String>) -> Self {
        responses.reverse(); // pop from the back
        Self {
            script: Mutex::new(responses),
        }
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        self.script
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| CompletionError::Upstream("script exhausted".into()))
    }
}

/// A completion client that always fails with a fixed error.
pub struct FailingClient {
    error: CompletionError,
}

impl FailingClient {
    pub fn transport(reason: &str) -> Self {
        Self {
            error: CompletionError::Transport(reason.into()),
        }
    }
}

#[async_trait]
impl CompletionClient for FailingClient {
    fn name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        Err(self.error.clone())
    }
}

/// A policy that injects a validation prompt after every turn.
pub struct AlwaysPolicy;

impl ValidationPolicy for AlwaysPolicy {
    fn should_inject(&self) -> bool {
        true
    }

    fn pick<'a>(&self, claims: &'a [ValidationClaim]) -> Option<&'a ValidationClaim> {
        claims.first()
    }
}

/// A policy that never injects.
pub struct NeverPolicy;

impl ValidationPolicy for NeverPolicy {
    fn should_inject(&self) -> bool {
        false
    }

    fn pick<'a>(&self, _claims: &'a [ValidationClaim]) -> Option<&'a ValidationClaim> {
        None
    }
}

/// A read-only store pre-seeded with evaluation records with known ids.
pub struct StubStore {
    records: Vec<EvaluationRecord>,
}

pub fn record(id: &str, subject: &str, instructor: &str, free_text: &str) -> EvaluationRecord {
    EvaluationRecord {
        id: id.into(),
        subject: subject.into(),
        instructor: instructor.into(),
        term: "2024.2".into(),
        clarity_rating: 4,
        alignment_rating: 4,
        free_text: free_text.into(),
        submitted_at: Utc::now(),
        submitter_id: None,
    }
}

/// Build a [`StubStore`] from `(id, subject, instructor, free_text)` rows.
pub async fn seeded_store(rows: Vec<(&str, &str, &str, &str)>) -> Arc<dyn DocumentStore> {
    let records = rows
        .into_iter()
        .map(|(id, subject, instructor, text)| record(id, subject, instructor, text))
        .collect();
    Arc::new(StubStore { records })
}

#[async_trait]
impl DocumentStore for StubStore {
    fn name(&self) -> &str {
        "stub"
    }

    async fn recent_evaluations(
        &self,
        query: &EvaluationQuery,
    ) -> Result<Vec<EvaluationRecord>, StoreError> {
        let mut results: Vec<EvaluationRecord> = self
            .records
            .iter()
            .filter(|r| r.matches(&query.filters))
            .cloned()
            .collect();
        results.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        results.truncate(query.limit);
        Ok(results)
    }

    async fn submit_evaluation(&self, _record: NewEvaluation) -> Result<String, StoreError> {
        Err(StoreError::Storage("stub store is read-only".into()))
    }

    async fn save_session(&self, _session: &ChatSession) -> Result<(), StoreError> {
        Ok(())
    }

    async fn load_session(&self, _id: &SessionId) -> Result<Option<ChatSession>, StoreError> {
        Ok(None)
    }

    async fn record_validation(&self, _response: &ValidationResponse) -> Result<(), StoreError> {
        Ok(())
    }
}

/// A store whose every operation fails.
pub struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    fn name(&self) -> &str {
        "failing"
    }

    async fn recent_evaluations(
        &self,
        _query: &EvaluationQuery,
    ) -> Result<Vec<EvaluationRecord>, StoreError> {
        Err(StoreError::QueryUnavailable("index missing".into()))
    }

    async fn submit_evaluation(&self, _record: NewEvaluation) -> Result<String, StoreError> {
        Err(StoreError::Storage("store unreachable".into()))
    }

    async fn save_session(&self, _session: &ChatSession) -> Result<(), StoreError> {
        Err(StoreError::Storage("store unreachable".into()))
    }

    async fn load_session(&self, _id: &SessionId) -> Result<Option<ChatSession>, StoreError> {
        Err(StoreError::Storage("store unreachable".into()))
    }

    async fn record_validation(&self, _response: &ValidationResponse) -> Result<(), StoreError> {
        Err(StoreError::Storage("store unreachable".into()))
    }
}
