// ABOUTME: Video ownership ledger database operations
// ABOUTME: Record storage and listing with the author identity joined in

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::Video;
use crate::pagination::Page;
use sqlx::Row;
use uuid::Uuid;

/// A ledger entry together with its author's username
#[derive(Debug, Clone)]
pub struct VideoWithAuthor {
    pub video: Video,
    pub author: String,
}

impl Database {
    /// Create the videos table
    pub(super) async fn migrate_videos(&self) -> anyhow::Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS videos (
                id TEXT PRIMARY KEY,
                author_id TEXT NOT NULL REFERENCES users(id),
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                tags TEXT NOT NULL,
                filename TEXT NOT NULL,
                created_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_videos_author_id ON videos(author_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a new ledger entry
    ///
    /// # Errors
    /// Returns an error if the insert fails
    pub async fn insert_video(&self, video: &Video) -> AppResult<()> {
        let tags = serde_json::to_string(&video.tags)
            .map_err(|e| AppError::internal(format!("Failed to serialize tags: {e}")))?;

        sqlx::query(
            r"
            INSERT INTO videos (id, author_id, name, description, tags, filename, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(video.id.to_string())
        .bind(video.author_id.to_string())
        .bind(&video.name)
        .bind(&video.description)
        .bind(tags)
        .bind(&video.filename)
        .bind(video.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a ledger entry by id
    ///
    /// # Errors
    /// Returns an error if the database query fails
    pub async fn get_video(&self, video_id: Uuid) -> AppResult<Option<Video>> {
        let row = sqlx::query(
            r"
            SELECT id, author_id, name, description, tags, filename, created_at
            FROM videos WHERE id = $1
            ",
        )
        .bind(video_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| Self::row_to_video(&row)).transpose()
    }

    /// List every video with its author's username, newest first.
    ///
    /// Count and rows are read inside one transaction; the page and its
    /// `total` always describe the same snapshot of the ledger.
    ///
    /// # Errors
    /// Returns an error if the database queries fail
    pub async fn list_videos(&self) -> AppResult<Page<VideoWithAuthor>> {
        let mut tx = self.pool.begin().await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos")
            .fetch_one(&mut *tx)
            .await?;

        let rows = sqlx::query(
            r"
            SELECT v.id, v.author_id, v.name, v.description, v.tags, v.filename, v.created_at,
                   u.username AS author
            FROM videos v
            JOIN users u ON u.id = v.author_id
            ORDER BY v.created_at DESC, v.rowid DESC
            ",
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let videos = rows
            .iter()
            .map(|row| {
                Ok(VideoWithAuthor {
                    video: Self::row_to_video(row)?,
                    author: row.get("author"),
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Page::new(total, videos))
    }

    /// Remove a ledger entry
    ///
    /// # Errors
    /// Returns `NotFound` if the video does not exist
    pub async fn delete_video(&self, video_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(video_id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Video"));
        }
        Ok(())
    }

    fn row_to_video(row: &sqlx::sqlite::SqliteRow) -> AppResult<Video> {
        let id: String = row.get("id");
        let author_id: String = row.get("author_id");
        let tags: String = row.get("tags");

        Ok(Video {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::internal(format!("Corrupt video id: {e}")))?,
            author_id: Uuid::parse_str(&author_id)
                .map_err(|e| AppError::internal(format!("Corrupt author id: {e}")))?,
            name: row.get("name"),
            description: row.get("description"),
            tags: serde_json::from_str(&tags)
                .map_err(|e| AppError::internal(format!("Corrupt tag list: {e}")))?,
            filename: row.get("filename"),
            created_at: row.get("created_at"),
        })
    }
}
