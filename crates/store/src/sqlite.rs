//! SQLite backend.
//!
//! A single database file with three tables:
//! - `profiles`     — one row per user profile
//! - `interactions` — append-only question/answer log
//! - `theses`       — investment theses with mutable status/body
//!
//! Interactions and theses carry an integer rowid alias (`iid`) so that
//! recency ordering has a stable tiebreaker for equal timestamps.

use async_trait::async_trait;
use chrono::Utc;
use profileos_core::error::StoreError;
use profileos_core::interaction::Interaction;
use profileos_core::profile::{NewProfile, Profile};
use profileos_core::store::{InteractionLog, ProfileStore, ThesisStore};
use profileos_core::thesis::{NewThesis, Thesis, ThesisPatch, ThesisStatus};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

/// A production SQLite store backing all three entity types.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store from a file path.
    ///
    /// The database and all tables/indexes are created automatically.
    /// Pass `":memory:"` for an in-process ephemeral database (useful for tests).
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| StoreError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON");

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite store initialized at {path}");
        Ok(store)
    }

    /// Run schema migrations — creates tables and indexes.
    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                id               TEXT PRIMARY KEY,
                external_address TEXT,
                risk_profile     TEXT,
                time_horizon     TEXT,
                style            TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("profiles table: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS interactions (
                iid        INTEGER PRIMARY KEY AUTOINCREMENT,
                id         TEXT UNIQUE NOT NULL,
                user_id    TEXT NOT NULL,
                question   TEXT NOT NULL,
                answer     TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("interactions table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_interactions_user_recency
             ON interactions(user_id, created_at DESC)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("interactions index: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS theses (
                iid          INTEGER PRIMARY KEY AUTOINCREMENT,
                id           TEXT UNIQUE NOT NULL,
                user_id      TEXT NOT NULL,
                asset_symbol TEXT NOT NULL,
                title        TEXT NOT NULL,
                body         TEXT NOT NULL DEFAULT '',
                status       TEXT NOT NULL DEFAULT 'open',
                created_at   TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("theses table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_theses_user_recency
             ON theses(user_id, created_at DESC)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("theses index: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    fn row_to_profile(row: &sqlx::sqlite::SqliteRow) -> Result<Profile, StoreError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| StoreError::QueryFailed(format!("id column: {e}")))?;
        let external_address: Option<String> = row
            .try_get("external_address")
            .map_err(|e| StoreError::QueryFailed(format!("external_address column: {e}")))?;
        let risk_profile: Option<String> = row
            .try_get("risk_profile")
            .map_err(|e| StoreError::QueryFailed(format!("risk_profile column: {e}")))?;
        let time_horizon: Option<String> = row
            .try_get("time_horizon")
            .map_err(|e| StoreError::QueryFailed(format!("time_horizon column: {e}")))?;
        let style: Option<String> = row
            .try_get("style")
            .map_err(|e| StoreError::QueryFailed(format!("style column: {e}")))?;

        Ok(Profile {
            id,
            external_address,
            risk_profile: risk_profile.and_then(|s| s.parse().ok()),
            time_horizon: time_horizon.and_then(|s| s.parse().ok()),
            style,
        })
    }

    fn row_to_interaction(row: &sqlx::sqlite::SqliteRow) -> Result<Interaction, StoreError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| StoreError::QueryFailed(format!("id column: {e}")))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| StoreError::QueryFailed(format!("user_id column: {e}")))?;
        let question: String = row
            .try_get("question")
            .map_err(|e| StoreError::QueryFailed(format!("question column: {e}")))?;
        let answer: String = row
            .try_get("answer")
            .map_err(|e| StoreError::QueryFailed(format!("answer column: {e}")))?;
        let created_at_str: String = row
            .try_get("created_at")
            .map_err(|e| StoreError::QueryFailed(format!("created_at column: {e}")))?;

        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StoreError::QueryFailed(format!("created_at parse: {e}")))?;

        Ok(Interaction {
            id,
            user_id,
            question,
            answer,
            created_at,
        })
    }

    fn row_to_thesis(row: &sqlx::sqlite::SqliteRow) -> Result<Thesis, StoreError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| StoreError::QueryFailed(format!("id column: {e}")))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| StoreError::QueryFailed(format!("user_id column: {e}")))?;
        let asset_symbol: String = row
            .try_get("asset_symbol")
            .map_err(|e| StoreError::QueryFailed(format!("asset_symbol column: {e}")))?;
        let title: String = row
            .try_get("title")
            .map_err(|e| StoreError::QueryFailed(format!("title column: {e}")))?;
        let body: String = row
            .try_get("body")
            .map_err(|e| StoreError::QueryFailed(format!("body column: {e}")))?;
        let status: String = row
            .try_get("status")
            .map_err(|e| StoreError::QueryFailed(format!("status column: {e}")))?;
        let created_at_str: String = row
            .try_get("created_at")
            .map_err(|e| StoreError::QueryFailed(format!("created_at column: {e}")))?;

        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StoreError::QueryFailed(format!("created_at parse: {e}")))?;

        Ok(Thesis {
            id,
            user_id,
            asset_symbol,
            title,
            body,
            status: ThesisStatus::from(status),
            created_at,
        })
    }
}

#[async_trait]
impl ProfileStore for SqliteStore {
    async fn create(&self, new: NewProfile) -> Result<Profile, StoreError> {
        let profile = Profile {
            id: Uuid::new_v4().to_string(),
            external_address: new.external_address,
            risk_profile: new.risk_profile,
            time_horizon: new.time_horizon,
            style: new.style,
        };

        sqlx::query(
            r#"
            INSERT INTO profiles (id, external_address, risk_profile, time_horizon, style)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.external_address)
        .bind(profile.risk_profile.map(|r| r.to_string()))
        .bind(profile.time_horizon.map(|h| h.to_string()))
        .bind(&profile.style)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("profile INSERT failed: {e}")))?;

        debug!(user_id = %profile.id, "Created profile");
        Ok(profile)
    }

    async fn get(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        let row = sqlx::query("SELECT * FROM profiles WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("profile GET: {e}")))?;

        match row {
            Some(ref r) => Ok(Some(Self::row_to_profile(r)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl InteractionLog for SqliteStore {
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

        sqlx::query(
            r#"
            INSERT INTO interactions (id, user_id, question, answer, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&interaction.id)
        .bind(&interaction.user_id)
        .bind(&interaction.question)
        .bind(&interaction.answer)
        .bind(interaction.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("interaction INSERT failed: {e}")))?;

        debug!(user_id = %user_id, interaction_id = %interaction.id, "Appended interaction");
        Ok(interaction)
    }

    async fn recent(&self, user_id: &str, limit: usize) -> Result<Vec<Interaction>, StoreError> {
        // iid breaks ties between equal timestamps (insertion order)
        let rows = sqlx::query(
            "SELECT * FROM interactions WHERE user_id = ?1
             ORDER BY created_at DESC, iid DESC LIMIT ?2",
        )
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("interaction recent: {e}")))?;

        rows.iter().map(Self::row_to_interaction).collect()
    }
}

#[async_trait]
impl ThesisStore for SqliteStore {
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

        sqlx::query(
            r#"
            INSERT INTO theses (id, user_id, asset_symbol, title, body, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&thesis.id)
        .bind(&thesis.user_id)
        .bind(&thesis.asset_symbol)
        .bind(&thesis.title)
        .bind(&thesis.body)
        .bind(thesis.status.as_str())
        .bind(thesis.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("thesis INSERT failed: {e}")))?;

        debug!(user_id = %thesis.user_id, thesis_id = %thesis.id, "Inserted thesis");
        Ok(thesis)
    }

    async fn get(&self, id: &str) -> Result<Option<Thesis>, StoreError> {
        let row = sqlx::query("SELECT * FROM theses WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("thesis GET: {e}")))?;

        match row {
            Some(ref r) => Ok(Some(Self::row_to_thesis(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self, user_id: &str) -> Result<Vec<Thesis>, StoreError> {
        let rows = sqlx::query(
            "SELECT * FROM theses WHERE user_id = ?1 ORDER BY created_at DESC, iid DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("thesis LIST: {e}")))?;

        rows.iter().map(Self::row_to_thesis).collect()
    }

    async fn update(&self, id: &str, patch: &ThesisPatch) -> Result<Option<Thesis>, StoreError> {
        // The UPDATE itself reports whether the row existed; existence is
        // never inferred from the follow-up read.
        let result = match (&patch.status, &patch.body) {
            (Some(status), Some(body)) => {
                sqlx::query("UPDATE theses SET status = ?1, body = ?2 WHERE id = ?3")
                    .bind(status.as_str())
                    .bind(body)
                    .bind(id)
                    .execute(&self.pool)
                    .await
            }
            (Some(status), None) => sqlx::query("UPDATE theses SET status = ?1 WHERE id = ?2")
                .bind(status.as_str())
                .bind(id)
                .execute(&self.pool)
                .await,
            (None, Some(body)) => sqlx::query("UPDATE theses SET body = ?1 WHERE id = ?2")
                .bind(body)
                .bind(id)
                .execute(&self.pool)
                .await,
            // Empty patch: no write, just return the current record
            (None, None) => return ThesisStore::get(self, id).await,
        };

        let result =
            result.map_err(|e| StoreError::Storage(format!("thesis UPDATE failed: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        ThesisStore::get(self, id).await
    }
}
