//! SQLite-backed store.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::SqliteConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::{ContributionRecord, SuggestionFeedback, SuggestionStatus, WriteSet};
use crate::store::ContributionStore;

/// Store persisting to a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and apply migrations.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        info!(path = %path.display(), "Opened contribution store");
        Self::from_pool(pool).await
    }

    /// Private in-memory database, for tests and dry runs.
    ///
    /// Uses a single connection that is never recycled; every connection
    /// to `:memory:` would otherwise see its own empty database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::from_pool(pool).await
    }

    /// Wrap an existing pool and apply migrations.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

async fn insert_contribution(
    conn: &mut SqliteConnection,
    record: &ContributionRecord,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO contribution (username, campaign_id, file, edit_type, edit_action, country, \
         depict_item, depict_prominent, caption_language, caption_text, date) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&record.username)
    .bind(record.campaign_id)
    .bind(&record.file)
    .bind(record.edit_type)
    .bind(record.edit_action)
    .bind(&record.country)
    .bind(&record.depict_item)
    .bind(record.depict_prominent)
    .bind(&record.caption_language)
    .bind(&record.caption_text)
    .bind(record.date)
    .execute(conn)
    .await?;
    Ok(())
}

async fn insert_suggestion(
    conn: &mut SqliteConnection,
    record: &SuggestionFeedback,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO suggestion (campaign_id, username, file_name, depict_item, update_status, \
         google_vision, google_vision_confidence, metadata_to_concept, \
         metadata_to_concept_confidence, google_vision_submitted, \
         metadata_to_concept_submitted, date) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(record.campaign_id)
    .bind(&record.username)
    .bind(&record.file_name)
    .bind(&record.depict_item)
    .bind(record.status)
    .bind(record.google_vision)
    .bind(record.google_vision_confidence)
    .bind(record.metadata_to_concept)
    .bind(record.metadata_to_concept_confidence)
    .bind(record.google_vision_submitted)
    .bind(record.metadata_to_concept_submitted)
    .bind(record.date)
    .execute(conn)
    .await?;
    Ok(())
}

const SUGGESTION_COLUMNS: &str = "campaign_id, username, file_name, depict_item, update_status, \
     google_vision, google_vision_confidence, metadata_to_concept, \
     metadata_to_concept_confidence, google_vision_submitted, metadata_to_concept_submitted, date";

#[async_trait]
impl ContributionStore for SqliteStore {
    async fn commit(&self, writes: &WriteSet) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for record in &writes.contributions {
            insert_contribution(&mut tx, record).await?;
        }
        for record in &writes.suggestions {
            insert_suggestion(&mut tx, record).await?;
        }

        tx.commit().await?;
        info!(
            contributions = writes.contributions.len(),
            suggestions = writes.suggestions.len(),
            "Committed write set"
        );
        Ok(())
    }

    async fn record_rejection(&self, rejection: &SuggestionFeedback) -> Result<(), StoreError> {
        // One write statement: the earlier rejections are counted under the
        // write lock.
        sqlx::query(
            "INSERT INTO suggestion (campaign_id, username, file_name, depict_item, \
             update_status, google_vision, google_vision_confidence, metadata_to_concept, \
             metadata_to_concept_confidence, google_vision_submitted, \
             metadata_to_concept_submitted, date) \
             SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, \
             CASE WHEN previous.n > 1 THEN ? ELSE 0 END, \
             CASE WHEN previous.n > 1 THEN ? ELSE 0 END, ? \
             FROM (SELECT COUNT(*) AS n FROM suggestion \
             WHERE file_name = ? AND depict_item = ? AND update_status = 0) AS previous",
        )
        .bind(rejection.campaign_id)
        .bind(&rejection.username)
        .bind(&rejection.file_name)
        .bind(&rejection.depict_item)
        .bind(SuggestionStatus::Rejected)
        .bind(rejection.google_vision)
        .bind(rejection.google_vision_confidence)
        .bind(rejection.metadata_to_concept)
        .bind(rejection.metadata_to_concept_confidence)
        .bind(rejection.google_vision)
        .bind(rejection.metadata_to_concept)
        .bind(rejection.date)
        .bind(&rejection.file_name)
        .bind(&rejection.depict_item)
        .execute(&self.pool)
        .await?;

        debug!(
            file = %rejection.file_name,
            depict_item = ?rejection.depict_item,
            "Recorded rejected suggestion"
        );
        Ok(())
    }

    async fn rejected_depicts(
        &self,
        username: &str,
        file: &str,
    ) -> Result<Vec<String>, StoreError> {
        let items: Vec<String> = sqlx::query_scalar(
            "SELECT depict_item FROM suggestion \
             WHERE username = ? AND file_name = ? AND update_status = 0 \
             AND depict_item IS NOT NULL ORDER BY id",
        )
        .bind(username)
        .bind(file)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn contributions(&self, username: &str) -> Result<Vec<ContributionRecord>, StoreError> {
        let records = sqlx::query_as::<_, ContributionRecord>(
            "SELECT username, campaign_id, file, edit_action, edit_type, country, depict_item, \
             depict_prominent, caption_language, caption_text, date \
             FROM contribution WHERE username = ? ORDER BY id",
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn suggestions(&self, file: &str) -> Result<Vec<SuggestionFeedback>, StoreError> {
        let query =
            format!("SELECT {SUGGESTION_COLUMNS} FROM suggestion WHERE file_name = ? ORDER BY id");
        let records = sqlx::query_as::<_, SuggestionFeedback>(&query)
            .bind(file)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }
}
