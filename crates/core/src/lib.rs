//! # UniHelp Core
//!
//! Domain types, traits, and error definitions for the UniHelp chat
//! assistant. This crate has **zero framework dependencies** — it defines
//! the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (completion endpoint, document store,
//! identity provider) is defined as a trait here. Implementations live in
//! their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with scripted/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod auth;
pub mod catalog;
pub mod completion;
pub mod error;
pub mod evaluation;
pub mod message;
pub mod store;
pub mod validation;

// Re-export key types at crate root for ergonomics
pub use auth::{AuthUser, IdentityProvider};
pub use completion::CompletionClient;
pub use error::{AuthError, CompletionError, Error, Result, StoreError};
pub use evaluation::{EvaluationQuery, EvaluationRecord, NewEvaluation, SearchFilters};
pub use message::{ChatMessage, ChatSession, Feedback, MessageKind, Role, SessionId, SourceRef};
pub use store::DocumentStore;
pub use validation::{ValidationClaim, ValidationResponse, ValidationVerdict};
