//! The advisory core of ProfileOS: turn a stored profile plus recent
//! interaction history into a personalized prompt, run it through a
//! completion provider, and log the exchange.
//!
//! Everything here is storage- and transport-agnostic: stores and the
//! completion provider arrive as trait objects, so the same engine runs
//! against SQLite in production and the in-memory backend in tests.

pub mod context;
pub mod query;
pub mod thesis;

pub use context::{AssembledPrompt, ContextAssembler, HISTORY_WINDOW};
pub use query::{QueryEngine, QueryOutcome};
pub use thesis::{ThesisDraft, ThesisManager};
