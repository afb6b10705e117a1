//! Prompt composer — deterministic assembly of the completion prompt.
//!
//! The composer is pure: same inputs, same prompt, byte for byte. The
//! section order is fixed and every section is plain concatenation;
//! nothing is summarized, truncated mid-message, or reordered.

use unihelp_core::evaluation::SearchFilters;
use unihelp_core::message::{ChatMessage, MessageKind, Role};

use crate::knowledge::KnowledgeBlock;

const PERSONA: &str = "You are UniHelp, a friendly assistant that helps university students \
    with questions about courses, professors, and exams. Answer in a concise, helpful tone.";

const CITATION_INSTRUCTION: &str = "When a statement is supported by one of the evaluation \
    records below, append its marker in the exact form [ID:<record id>] immediately after \
    the statement. Only cite records from the list; never invent markers for general knowledge.";

const KNOWLEDGE_HEADER: &str = "Recent evaluations from other students:";
const EMPTY_KNOWLEDGE: &str = "(no evaluations available)";

/// Assembles the full prompt for one turn.
pub struct PromptComposer {
    transcript_window: usize,
}

impl PromptComposer {
    pub fn new(transcript_window: usize) -> Self {
        Self { transcript_window }
    }

    /// Compose the prompt: persona, citation instruction, knowledge block,
    /// active filters, a sliding window of the transcript, and the new
    /// utterance, in that fixed order.
    ///
    /// `transcript` is the session as it stood before this turn's user
    /// message was appended. Validation prompts and error messages are
    /// skipped; they are UI artifacts, not conversation.
    pub fn compose(
        &self,
        knowledge: &KnowledgeBlock,
        filters: &SearchFilters,
        transcript: &[ChatMessage],
        new_text: &str,
    ) -> String {
        let mut sections: Vec<String> = Vec::new();

        sections.push(PERSONA.to_string());
        sections.push(CITATION_INSTRUCTION.to_string());

        let body = if knowledge.text.is_empty() {
            EMPTY_KNOWLEDGE
        } else {
            knowledge.text.as_str()
        };
        sections.push(format!("{KNOWLEDGE_HEADER}\n{body}"));

        if let Some(line) = filters.describe() {
            sections.push(line);
        }

        let window = self.transcript_lines(transcript);
        if !window.is_empty() {
            sections.push(format!("Conversation so far:\n{}", window.join("\n")));
        }

        sections.push(format!("Student: {new_text}\nUniHelp:"));

        sections.join("\n\n")
    }

    /// The last N conversational messages, rendered one per line.
    fn transcript_lines(&self, transcript: &[ChatMessage]) -> Vec<String> {
        let mut lines: Vec<String> = transcript
            .iter()
            .filter(|m| m.kind != MessageKind::ValidationPrompt && !m.is_error)
            .map(|m| match m.role {
                Role::User => format!("Student: {}", m.text),
                Role::Model => format!("UniHelp: {}", m.text),
            })
            .collect();

        if lines.len() > self.transcript_window {
            lines.drain(..lines.len() - self.transcript_window);
        }
        lines
    }
}
