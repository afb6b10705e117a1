//! CompletionClient trait — the abstraction over the generative-language
//! endpoint.
//!
//! A client takes one composed prompt and returns the raw completion text.
//! Citation post-processing happens downstream in the requester, so
//! implementations stay wire-level only.

use crate::error::CompletionError;
use async_trait::async_trait;

/// The completion endpoint seam.
///
/// Implementations: Gemini-style `generateContent` HTTP client, scripted
/// test doubles.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// A human-readable name for this client (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send the composed prompt and return the completion text.
    ///
    /// Must fail with [`CompletionError::MissingCredential`] before any
    /// network I/O when no API credential is configured.
    async fn complete(&self, prompt: &str) -> std::result::Result<String, CompletionError>;
}
