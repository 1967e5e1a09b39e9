//! Storage backends for ProfileOS.
//!
//! Every backend implements the three store traits from
//! `profileos_core::store`: profiles, the interaction log, and theses.
//! Backends: SQLite (default) and in-memory (tests, ephemeral sessions).

pub mod in_memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use in_memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
