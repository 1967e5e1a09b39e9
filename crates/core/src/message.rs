//! Chat message value types for the completion collaborator.
//!
//! The core only ever sends a two-turn exchange: a system-context message
//! followed by the user's question. Messages carry no ids or timestamps —
//! the assembled prompt must be byte-identical across calls for the same
//! store state.

use serde::{Deserialize, Serialize};

/// The role of a message in the completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// System instructions (profile context, guidelines)
    System,
    /// The end user's question
    User,
}

/// A single message in the completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}
