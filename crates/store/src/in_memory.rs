//! In-memory backend — useful for testing and ephemeral sessions.
//!
//! Kept behind the same trait contracts as the durable backend so that
//! callers and tests never depend on which one is wired in.

use async_trait::async_trait;
use chrono::Utc;
use profileos_core::error::StoreError;
use profileos_core::interaction::Interaction;
use profileos_core::profile::{NewProfile, Profile};
use profileos_core::store::{InteractionLog, ProfileStore, ThesisStore};
use profileos_core::thesis::{NewThesis, Thesis, ThesisPatch};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    profiles: Vec<Profile>,
    interactions: Vec<Interaction>,
    theses: Vec<Thesis>,
}

/// An in-memory store keeping all entities in Vecs.
///
/// Vec order is insertion order, which doubles as the tiebreaker for
/// equal `created_at` values.
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn create(&self, new: NewProfile) -> Result<Profile, StoreError> {
        let profile = Profile {
            id: Uuid::new_v4().to_string(),
            external_address: new.external_address,
            risk_profile: new.risk_profile,
            time_horizon: new.time_horizon,
            style: new.style,
        };
        self.inner.write().await.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn get(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.profiles.iter().find(|p| p.id == id).cloned())
    }
}

#[async_trait]
impl InteractionLog for MemoryStore {
    async fn append(
        &self,
        user_id: &str,
        question: &str,
        answer: &str,
    ) -> Result<Interaction, StoreError> {
        let interaction = Interaction {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
            created_at: Utc::now(),
        };
        self.inner
            .write()
            .await
            .interactions
            .push(interaction.clone());
        Ok(interaction)
    }

    async fn recent(&self, user_id: &str, limit: usize) -> Result<Vec<Interaction>, StoreError> {
        let inner = self.inner.read().await;
        // Vec order is insertion order; walking it backwards gives
        // newest-first with ties already broken correctly.
        Ok(inner
            .interactions
            .iter()
            .rev()
            .filter(|i| i.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ThesisStore for MemoryStore {
    async fn insert(&self, new: NewThesis) -> Result<Thesis, StoreError> {
        let thesis = Thesis {
            id: Uuid::new_v4().to_string(),
            user_id: new.user_id,
            asset_symbol: new.asset_symbol,
            title: new.title,
            body: new.body,
            status: new.status,
            created_at: Utc::now(),
        };
        self.inner.write().await.theses.push(thesis.clone());
        Ok(thesis)
    }

    async fn get(&self, id: &str) -> Result<Option<Thesis>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.theses.iter().find(|t| t.id == id).cloned())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<Thesis>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .theses
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: &str, patch: &ThesisPatch) -> Result<Option<Thesis>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(thesis) = inner.theses.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        if let Some(status) = &patch.status {
            thesis.status = status.clone();
        }
        if let Some(body) = &patch.body {
            thesis.body = body.clone();
        }

        Ok(Some(thesis.clone()))
    }
}
