//! Validation prompt injection policy.
//!
//! After a successful bot turn the pipeline may inject one synthetic
//! crowd-claim message asking the student for a true/myth/skip verdict.
//! The decision and the claim pick sit behind a trait so tests can force
//! either outcome.

use rand::Rng;
use unihelp_core::message::ChatMessage;
use unihelp_core::validation::ValidationClaim;

/// Decides whether a turn gets a validation prompt, and which claim.
pub trait ValidationPolicy: Send + Sync {
    /// Whether this successful turn should be followed by a prompt.
    fn should_inject(&self) -> bool;

    /// Pick a claim from the catalog. `None` suppresses the prompt.
    fn pick<'a>(&self, claims: &'a [ValidationClaim]) -> Option<&'a ValidationClaim>;
}

/// The production policy: inject with a fixed probability, pick a claim
/// uniformly at random.
pub struct RandomPolicy {
    probability: f64,
}

impl RandomPolicy {
    pub fn new(probability: f64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
        }
    }
}

impl ValidationPolicy for RandomPolicy {
    fn should_inject(&self) -> bool {
        rand::rng().random_bool(self.probability)
    }

    fn pick<'a>(&self, claims: &'a [ValidationClaim]) -> Option<&'a ValidationClaim> {
        if claims.is_empty() {
            return None;
        }
        let index = rand::rng().random_range(0..claims.len());
        claims.get(index)
    }
}

/// Render a claim as the chat message the session holder appends.
pub fn validation_message(claim: &ValidationClaim) -> ChatMessage {
    let text = format!(
        "🤔 **Help the community:**\n\n\"{}\"\n\nDoes this check out?",
        claim.text
    );
    ChatMessage::validation_prompt(text, claim.id)
}
