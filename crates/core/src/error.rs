//! Error types for the UniHelp domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each external collaborator has its own error enum; all failure reasons
//! in the pipeline are non-fatal and surface as a chat message, never as a
//! fault that halts the session.

use thiserror::Error;

/// The top-level error type for all UniHelp operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Completion endpoint errors ---
    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    // --- Document store errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Identity provider errors ---
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Collaborator errors ---

/// Failure reasons on the completion path.
///
/// All three map to a single user-visible fallback message appended in
/// place of a successful bot turn.
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    /// No API credential is configured. Detected before any network call.
    #[error("No completion API key configured")]
    MissingCredential,

    /// The network call itself failed.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The endpoint returned a structured error payload.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The response body could not be interpreted.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The composed query cannot be served (e.g. a missing index).
    /// The knowledge fetcher fails soft on this.
    #[error("Query unavailable: {0}")]
    QueryUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Identity provider not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_error_displays_correctly() {
        let err = Error::Completion(CompletionError::Upstream("quota exceeded".into()));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn missing_credential_is_distinguishable() {
        let err = CompletionError::MissingCredential;
        assert!(matches!(err, CompletionError::MissingCredential));
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn store_error_rolls_up() {
        let err: Error = StoreError::QueryUnavailable("missing index on (subject, submitted_at)".into()).into();
        assert!(err.to_string().contains("missing index"));
    }
}
