//! Thesis lifecycle — create, patch, and list investment theses.
//!
//! Validation and normalization live here so every storage backend
//! receives the same already-clean records: trimmed required fields,
//! uppercased symbol, defaulted body and status.

use profileos_core::error::{Error, Result};
use profileos_core::store::ThesisStore;
use profileos_core::thesis::{NewThesis, Thesis, ThesisPatch, ThesisStatus};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Caller-supplied fields for a new thesis.
#[derive(Debug, Clone, Deserialize)]
pub struct ThesisDraft {
    pub user_id: String,
    pub asset_symbol: String,
    pub title: String,

    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub status: Option<String>,
}

/// Manages thesis records for all users.
pub struct ThesisManager {
    theses: Arc<dyn ThesisStore>,
}

impl ThesisManager {
    pub fn new(theses: Arc<dyn ThesisStore>) -> Self {
        Self { theses }
    }

    /// Create a thesis from a draft.
    ///
    /// `user_id`, `asset_symbol`, and `title` must be non-blank. The
    /// symbol is uppercased, body defaults to empty, and a missing or
    /// blank status becomes `open`. Any non-blank status string is
    /// accepted verbatim.
    pub async fn create(&self, draft: ThesisDraft) -> Result<Thesis> {
        let user_id = draft.user_id.trim();
        let asset_symbol = draft.asset_symbol.trim();
        let title = draft.title.trim();

        if user_id.is_empty() || asset_symbol.is_empty() || title.is_empty() {
            return Err(Error::invalid_input(
                "user_id, asset_symbol and title are required",
            ));
        }

        let status = match draft.status.as_deref().map(str::trim) {
            None | Some("") => ThesisStatus::Open,
            Some(s) => ThesisStatus::from(s),
        };

        let thesis = self
            .theses
            .insert(NewThesis {
                user_id: user_id.to_string(),
                asset_symbol: asset_symbol.to_ascii_uppercase(),
                title: title.to_string(),
                body: draft.body.unwrap_or_default(),
                status,
            })
            .await?;

        info!(thesis_id = %thesis.id, user_id = %thesis.user_id, "Created thesis");
        Ok(thesis)
    }

    /// Apply a partial update. Present fields are written independently;
    /// an empty patch returns the current record unchanged.
    pub async fn patch(&self, id: &str, patch: ThesisPatch) -> Result<Thesis> {
        self.theses
            .update(id, &patch)
            .await?
            .ok_or_else(|| Error::ThesisNotFound { id: id.to_string() })
    }

    /// All theses for a user, newest first.
    pub async fn list(&self, user_id: &str) -> Result<Vec<Thesis>> {
        Ok(self.theses.list(user_id).await?)
    }
}
