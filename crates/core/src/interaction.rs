//! Interaction domain type — one persisted question/answer exchange.
//!
//! Interactions are append-only: created exactly once by the query
//! orchestrator after a successful completion call, never mutated or
//! deleted. Per user they are totally ordered by `created_at`, with ties
//! broken by insertion order in the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single question/answer exchange tied to a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Unique interaction ID, assigned per exchange.
    pub id: String,

    /// The owning user profile.
    pub user_id: String,

    /// The question as asked.
    pub question: String,

    /// The completion service's answer.
    pub answer: String,

    /// Creation timestamp, used for recency ordering.
    pub created_at: DateTime<Utc>,
}
