//! Storage traits — the contracts the core consumes for persistence.
//!
//! The storage backend is an injected collaborator: the core holds no
//! authoritative in-memory copies between requests and re-reads what it
//! needs on every operation. Implementations: SQLite, in-memory (tests
//! and ephemeral sessions).

use async_trait::async_trait;

use crate::error::StoreError;
use crate::interaction::Interaction;
use crate::profile::{NewProfile, Profile};
use crate::thesis::{NewThesis, Thesis, ThesisPatch};

/// Persistence for user profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Persist a new profile, assigning its id. Always succeeds for any
    /// (possibly empty) field set, barring storage failure.
    async fn create(&self, new: NewProfile) -> Result<Profile, StoreError>;

    /// Fetch a profile by id. `None` when it does not exist.
    async fn get(&self, id: &str) -> Result<Option<Profile>, StoreError>;
}

/// Append-only persistence for question/answer exchanges.
#[async_trait]
pub trait InteractionLog: Send + Sync {
    /// Record one exchange, assigning id and timestamp.
    async fn append(
        &self,
        user_id: &str,
        question: &str,
        answer: &str,
    ) -> Result<Interaction, StoreError>;

    /// The `limit` most recent interactions for a user, newest-first.
    /// A user with no history yields an empty Vec, never an error.
    async fn recent(&self, user_id: &str, limit: usize) -> Result<Vec<Interaction>, StoreError>;
}

/// Persistence for investment theses.
#[async_trait]
pub trait ThesisStore: Send + Sync {
    /// Persist a validated thesis, assigning id and timestamp.
    async fn insert(&self, new: NewThesis) -> Result<Thesis, StoreError>;

    /// Fetch a thesis by id.
    async fn get(&self, id: &str) -> Result<Option<Thesis>, StoreError>;

    /// All theses for a user, newest-first.
    async fn list(&self, user_id: &str) -> Result<Vec<Thesis>, StoreError>;

    /// Apply a partial update. Returns the updated record, or `None` when
    /// no record with that id exists — existence is reported by the
    /// update itself, never inferred from a secondary read.
    async fn update(&self, id: &str, patch: &ThesisPatch) -> Result<Option<Thesis>, StoreError>;
}
