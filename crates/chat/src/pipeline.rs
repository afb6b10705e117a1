//! The turn pipeline: fetch knowledge, compose the prompt, request the
//! completion, append the result.
//!
//! One submission runs the four stages strictly in order and touches the
//! session exactly twice on the happy path (user message in, bot message
//! out), plus an optional delayed validation prompt.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};
use unihelp_config::ChatConfig;
use unihelp_core::completion::CompletionClient;
use unihelp_core::store::DocumentStore;

use crate::knowledge::KnowledgeFetcher;
use crate::prompt::PromptComposer;
use crate::requester::CompletionRequester;
use crate::session::SessionHolder;
use crate::validation::{validation_message, RandomPolicy, ValidationPolicy};

/// The assembled chat pipeline. Clone-cheap via its shared session handle.
pub struct ChatPipeline {
    fetcher: KnowledgeFetcher,
    composer: PromptComposer,
    requester: CompletionRequester,
    session: SessionHolder,
    validation_delay: Duration,
}

impl ChatPipeline {
    /// Wire the pipeline from configuration, with the production
    /// random-injection policy.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        client: Arc<dyn CompletionClient>,
        config: &ChatConfig,
        owner_id: Option<String>,
    ) -> Self {
        let policy = Box::new(RandomPolicy::new(config.validation_probability));
        Self::from_parts(store, client, policy, config, owner_id)
    }

    /// Wire the pipeline with an explicit validation policy.
    pub fn from_parts(
        store: Arc<dyn DocumentStore>,
        client: Arc<dyn CompletionClient>,
        policy: Box<dyn ValidationPolicy>,
        config: &ChatConfig,
        owner_id: Option<String>,
    ) -> Self {
        Self {
            fetcher: KnowledgeFetcher::new(store.clone(), config.knowledge_limit),
            composer: PromptComposer::new(config.transcript_window),
            requester: CompletionRequester::new(client, policy),
            session: SessionHolder::new(store, owner_id),
            validation_delay: Duration::from_millis(config.validation_delay_ms),
        }
    }

    /// The session handle, for state queries and the non-turn operations
    /// (feedback, validation verdicts, reset, load).
    pub fn session(&self) -> &SessionHolder {
        &self.session
    }

    /// Run one full turn for the given submission.
    ///
    /// Returns `false` when the submission is dropped without side
    /// effects: blank text, or a turn already in flight. A `true` return
    /// means both the user message and exactly one bot message (answer or
    /// fallback) were appended, and the loading gate was released.
    pub async fn send(&self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        if !self.session.try_begin_turn().await {
            debug!("Turn already in flight; submission dropped");
            return false;
        }

        // Snapshot before appending, so the new utterance appears once.
        let transcript = self.session.messages().await;
        self.session.append_user_turn(text).await;

        let filters = self.session.filters().await;
        let knowledge = self.fetcher.fetch(&filters).await;
        let prompt = self.composer.compose(&knowledge, &filters, &transcript, text);

        match self.requester.request(&prompt).await {
            Ok(turn) => {
                info!(sources = turn.message.sources.len(), "Turn completed");
                self.session.append_bot_turn(turn.message).await;

                if let Some(claim) = turn.validation {
                    let session = self.session.clone();
                    let delay = self.validation_delay;
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        session.append_bot_turn(validation_message(&claim)).await;
                    });
                }
            }
            Err(e) => {
                let fallback = self.requester.fallback_message(&e);
                self.session.append_bot_turn(fallback).await;
            }
        }

        self.session.end_turn().await;
        true
    }
}
