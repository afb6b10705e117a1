//! Document store implementations for UniHelp.
//!
//! Three logical collections: evaluations, chat sessions, and validation
//! responses. The in-memory backend serves the demo fallback and tests;
//! the SQLite backend gives local durability.

pub mod in_memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use in_memory::InMemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
