//! Completion requester — one call to the completion endpoint per turn.
//!
//! Wraps the raw client with the per-turn post-processing: citation
//! extraction, source labeling, and the validation-prompt decision. No
//! retries, no streaming; a failed call surfaces as a single error
//! message for that turn.

use std::sync::Arc;

use tracing::{debug, warn};
use unihelp_core::completion::CompletionClient;
use unihelp_core::error::CompletionError;
use unihelp_core::message::ChatMessage;
use unihelp_core::validation::{claim_catalog, ValidationClaim};

use crate::citations::extract_citations;
use crate::validation::ValidationPolicy;

/// The text shown to the student when a turn fails, whatever the cause.
const FALLBACK_TEXT: &str = "Connection error. Please try sending your message again.";

/// The outcome of a successful completion turn.
#[derive(Debug)]
pub struct BotTurn {
    /// The bot message: stripped text plus ordered source labels.
    pub message: ChatMessage,

    /// A claim to inject after this turn, when the policy fired.
    pub validation: Option<ValidationClaim>,
}

/// Calls the completion client and shapes its output into a bot turn.
pub struct CompletionRequester {
    client: Arc<dyn CompletionClient>,
    policy: Box<dyn ValidationPolicy>,
    claims: Vec<ValidationClaim>,
}

impl CompletionRequester {
    pub fn new(client: Arc<dyn CompletionClient>, policy: Box<dyn ValidationPolicy>) -> Self {
        Self {
            client,
            policy,
            claims: claim_catalog(),
        }
    }

    /// Send one prompt. On success the raw text has its citation markers
    /// extracted and stripped, and the validation policy decides whether
    /// a claim follows.
    pub async fn request(&self, prompt: &str) -> Result<BotTurn, CompletionError> {
        debug!(provider = self.client.name(), chars = prompt.len(), "Requesting completion");

        let raw = self.client.complete(prompt).await?;
        let extracted = extract_citations(&raw);

        let mut message = ChatMessage::model(extracted.text);
        message.sources = extracted.sources;

        let validation = if self.policy.should_inject() {
            self.policy.pick(&self.claims).cloned()
        } else {
            None
        };

        Ok(BotTurn {
            message,
            validation,
        })
    }

    /// The single chat message a failed turn produces. The concrete
    /// failure is logged locally; the student sees one generic line.
    pub fn fallback_message(&self, error: &CompletionError) -> ChatMessage {
        warn!(error = %error, "Completion failed; substituting fallback message");
        ChatMessage::error(FALLBACK_TEXT)
    }
}
