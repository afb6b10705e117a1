//! The chat session & retrieval-augmented prompt assembly pipeline.
//!
//! One turn flows strictly one direction:
//!
//! 1. **Knowledge fetcher** — recent evaluation records, rendered into a
//!    flat text block tagged with stable identifiers
//! 2. **Prompt composer** — preamble + knowledge + filters + transcript +
//!    the new utterance, concatenated deterministically
//! 3. **Completion requester** — one call to the completion endpoint,
//!    citation markers extracted and stripped, validation prompt decided
//! 4. **Session holder** — appends the result and schedules a
//!    best-effort, write-behind save
//!
//! There is no feedback loop, no caching, no retry: every failure is
//! terminal for that turn only and surfaces as a single chat message.

pub mod citations;
pub mod knowledge;
pub mod pipeline;
pub mod prompt;
pub mod requester;
pub mod saver;
pub mod session;
pub mod validation;

pub use citations::{extract_citations, ExtractedCitations};
pub use knowledge::{KnowledgeBlock, KnowledgeFetcher};
pub use pipeline::ChatPipeline;
pub use prompt::PromptComposer;
pub use requester::{BotTurn, CompletionRequester};
pub use saver::SessionSaver;
pub use session::SessionHolder;
pub use validation::{validation_message, RandomPolicy, ValidationPolicy};

#[cfg(test)]
pub(crate) mod test_helpers;
