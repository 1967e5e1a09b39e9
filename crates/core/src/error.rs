//! Error types for the ProfileOS domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant, and the caller-facing
//! kinds (invalid input, not found, completion failure, storage failure)
//! stay distinct all the way to the HTTP boundary.

use thiserror::Error;

/// The top-level error type for all ProfileOS operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A required field was missing or empty. Detected before any store
    /// or completion call; never partially applied.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The referenced user profile does not exist.
    #[error("User not found: {user_id}")]
    UserNotFound { user_id: String },

    /// The referenced thesis does not exist.
    #[error("Thesis not found: {id}")]
    ThesisNotFound { id: String },

    // --- Completion errors ---
    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    // --- Storage errors ---
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build an `InvalidInput` error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

// --- Bounded context errors ---

/// Errors from the external language-model completion service.
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by completion service, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Completion returned no text content")]
    EmptyCompletion,

    #[error("Completion service not configured: {0}")]
    NotConfigured(String),
}

/// Errors from the storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_error_displays_correctly() {
        let err = Error::Completion(CompletionError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn invalid_input_displays_message() {
        let err = Error::invalid_input("question is required");
        assert!(err.to_string().contains("question is required"));
    }

    #[test]
    fn not_found_carries_ids() {
        let err = Error::UserNotFound {
            user_id: "u-123".into(),
        };
        assert!(err.to_string().contains("u-123"));

        let err = Error::ThesisNotFound { id: "t-9".into() };
        assert!(err.to_string().contains("t-9"));
    }

    #[test]
    fn store_error_converts_to_top_level() {
        let err: Error = StoreError::QueryFailed("boom".into()).into();
        assert!(matches!(err, Error::Store(_)));
    }
}
