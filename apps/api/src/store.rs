//! Resume persistence behind a narrow trait.
//!
//! The export path only needs to load a resume its caller owns and, when
//! persistence is enabled, remember where the exported file went.
//! `AppState` holds an `Arc<dyn ResumeStore>`; tests swap in `MemoryResumeStore`.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;

#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// The resume `id` if it belongs to `user_id`.
    async fn fetch_owned(&self, id: Uuid, user_id: Uuid) -> Result<Option<ResumeRow>, AppError>;

    async fn record_file_url(&self, id: Uuid, user_id: Uuid, url: &str) -> Result<(), AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgResumeStore {
    db: PgPool,
}

impl PgResumeStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn fetch_owned(&self, id: Uuid, user_id: Uuid) -> Result<Option<ResumeRow>, AppError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn record_file_url(&self, id: Uuid, user_id: Uuid, url: &str) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE resumes SET file_url = $1, updated_at = NOW() WHERE id = $2 AND user_id = $3",
        )
        .bind(url)
        .bind(id)
        .bind(user_id)
        .execute(&self.db)
        .await?;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory (tests)
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub use memory::MemoryResumeStore;
