//! Completion endpoint client for UniHelp.
//!
//! One implementation: the Gemini-style `generateContent` HTTP API.

pub mod gemini;

pub use gemini::GeminiClient;
