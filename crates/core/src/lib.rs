//! # ProfileOS Core
//!
//! Domain types, traits, and error definitions for the ProfileOS
//! personalization backend. This crate has **zero framework dependencies** —
//! it defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Storage and the completion service are defined as traits here.
//! Implementations live in their respective crates. This enables:
//! - Swapping backends via configuration
//! - Easy testing with stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod completion;
pub mod error;
pub mod interaction;
pub mod message;
pub mod profile;
pub mod store;
pub mod thesis;

// Re-export key types at crate root for ergonomics
pub use completion::{CompletionProvider, CompletionRequest};
pub use error::{CompletionError, Error, Result, StoreError};
pub use interaction::Interaction;
pub use message::{ChatMessage, ChatRole};
pub use profile::{NewProfile, Profile, RiskProfile, TimeHorizon};
pub use store::{InteractionLog, ProfileStore, ThesisStore};
pub use thesis::{NewThesis, Thesis, ThesisPatch, ThesisStatus};
