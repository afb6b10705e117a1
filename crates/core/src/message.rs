//! Chat message and session domain types.
//!
//! These are the core value objects that flow through the pipeline:
//! the student sends a message → knowledge is fetched → a prompt is
//! composed → the completion endpoint answers → the session holder
//! appends the resulting bot message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The fixed greeting shown as the very first message of every session.
pub const GREETING: &str =
    "Hi, I'm UniHelp! I can answer questions about your courses or help you validate \
     information other students have shared.";

/// Unique identifier for a persisted chat session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The student
    User,
    /// The assistant
    Model,
}

/// What kind of message this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// An ordinary chat turn.
    Plain,
    /// A synthetic crowd-claim injected to solicit a true/myth/skip answer.
    ValidationPrompt,
}

/// User-supplied after-the-fact feedback on a bot message.
///
/// Purely observational — it never affects pipeline behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Helpful,
    NotHelpful,
}

/// A resolved citation: a record identifier paired with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// The stable record identifier the marker referenced.
    pub record_id: String,

    /// Position-based display label ("Source #1", "Source #2", …).
    pub label: String,
}

/// A single message in a chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content. Citation markers have already been stripped;
    /// lightweight markup (bold, lists) is left for the renderer.
    pub text: String,

    /// Plain turn or injected validation prompt
    #[serde(default = "MessageKind::plain")]
    pub kind: MessageKind,

    /// For validation prompts: which crowd-claim this message carries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_id: Option<u32>,

    /// After-the-fact user feedback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,

    /// Marks a pipeline failure message
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,

    /// Citations extracted from the model output, in order of first mention
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceRef>,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl MessageKind {
    fn plain() -> Self {
        MessageKind::Plain
    }
}

impl ChatMessage {
    /// Create a new user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            text: text.into(),
            kind: MessageKind::Plain,
            validation_id: None,
            feedback: None,
            is_error: false,
            sources: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new model message.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::Model,
            text: text.into(),
            kind: MessageKind::Plain,
            validation_id: None,
            feedback: None,
            is_error: false,
            sources: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Create the fixed greeting message (always index 0 of a session).
    pub fn greeting() -> Self {
        Self::model(GREETING)
    }

    /// Create a pipeline-failure message.
    pub fn error(text: impl Into<String>) -> Self {
        let mut msg = Self::model(text);
        msg.is_error = true;
        msg
    }

    /// Create a validation prompt carrying the given claim.
    pub fn validation_prompt(text: impl Into<String>, claim_id: u32) -> Self {
        let mut msg = Self::model(text);
        msg.kind = MessageKind::ValidationPrompt;
        msg.validation_id = Some(claim_id);
        msg
    }
}

/// A persisted chat session: an ordered, append-only sequence of messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique session ID
    pub id: SessionId,

    /// The signed-in user who owns this session, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,

    /// Ordered messages; index 0 is the fixed greeting
    pub messages: Vec<ChatMessage>,

    /// When the last message was appended
    pub last_activity_at: DateTime<Utc>,
}

impl ChatSession {
    /// Create a new session containing only the greeting.
    pub fn new(owner_id: Option<String>) -> Self {
        Self {
            id: SessionId::new(),
            owner_id,
            messages: vec![ChatMessage::greeting()],
            last_activity_at: Utc::now(),
        }
    }

    /// Append a message and touch the activity timestamp.
    pub fn push(&mut self, message: ChatMessage) {
        self.last_activity_at = Utc::now();
        self.messages.push(message);
    }
}
