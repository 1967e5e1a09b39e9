//! Thesis domain types — a user's tracked investment rationale for an
//! asset, with a mutable status.
//!
//! The status vocabulary is deliberately open: `open` and `closed` are
//! the known states, but any caller-supplied string is preserved as-is
//! via `ThesisStatus::Custom`. No transition graph is enforced — any
//! status may follow any status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a thesis.
///
/// Serialized as a plain string so the wire format stays identical to an
/// untyped status column, while the two known states remain matchable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ThesisStatus {
    #[default]
    Open,
    Closed,
    Custom(String),
}

impl ThesisStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Custom(s) => s,
        }
    }
}

impl From<String> for ThesisStatus {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "open" => Self::Open,
            "closed" => Self::Closed,
            _ => Self::Custom(s),
        }
    }
}

impl From<&str> for ThesisStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<ThesisStatus> for String {
    fn from(status: ThesisStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for ThesisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored investment thesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thesis {
    /// Unique thesis ID.
    pub id: String,

    /// The owning user profile.
    pub user_id: String,

    /// Asset ticker, uppercased at write time.
    pub asset_symbol: String,

    /// Short title for the thesis.
    pub title: String,

    /// Free-text rationale. Defaults to empty.
    pub body: String,

    /// Lifecycle status. Defaults to `open`.
    pub status: ThesisStatus,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A validated, normalized thesis ready for insertion. The store assigns
/// id and created_at.
#[derive(Debug, Clone)]
pub struct NewThesis {
    pub user_id: String,
    pub asset_symbol: String,
    pub title: String,
    pub body: String,
    pub status: ThesisStatus,
}

/// A partial update to a thesis. Present fields are written
/// independently; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThesisPatch {
    #[serde(default)]
    pub status: Option<ThesisStatus>,

    #[serde(default)]
    pub body: Option<String>,
}

impl ThesisPatch {
    /// True when neither field is present (a no-op patch).
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.body.is_none()
    }
}
