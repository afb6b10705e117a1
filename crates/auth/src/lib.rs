//! Identity provider implementations for UniHelp.
//!
//! The demo provider keeps everything local and accepts any credentials —
//! the path used when no identity project is configured. The REST provider
//! speaks an Identity-Toolkit-style password API.

pub mod demo;
pub mod rest;

pub use demo::DemoIdentity;
pub use rest::RestIdentity;
