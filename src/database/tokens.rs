// ABOUTME: Bearer token database operations
// ABOUTME: Token pair storage, revocation, and atomic refresh consumption

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::BearerToken;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the token table
    pub(super) async fn migrate_tokens(&self) -> anyhow::Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS oauth_tokens (
                access_token TEXT PRIMARY KEY,
                refresh_token TEXT UNIQUE NOT NULL,
                user_id TEXT NOT NULL REFERENCES users(id),
                client_id TEXT NOT NULL,
                issued_at DATETIME NOT NULL,
                access_expires_at DATETIME NOT NULL,
                refresh_expires_at DATETIME NOT NULL,
                revoked BOOLEAN NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_oauth_tokens_user_id ON oauth_tokens(user_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Store a freshly issued token pair
    ///
    /// # Errors
    /// Returns an error if the insert fails
    pub async fn insert_token(&self, token: &BearerToken) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO oauth_tokens (
                access_token, refresh_token, user_id, client_id,
                issued_at, access_expires_at, refresh_expires_at, revoked
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(&token.access_token)
        .bind(&token.refresh_token)
        .bind(token.user_id.to_string())
        .bind(&token.client_id)
        .bind(token.issued_at)
        .bind(token.access_expires_at)
        .bind(token.refresh_expires_at)
        .bind(token.revoked)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Look up a token pair by its access token value
    ///
    /// # Errors
    /// Returns an error if the database query fails
    pub async fn get_token_by_access(&self, access_token: &str) -> AppResult<Option<BearerToken>> {
        let row = sqlx::query(
            r"
            SELECT access_token, refresh_token, user_id, client_id,
                   issued_at, access_expires_at, refresh_expires_at, revoked
            FROM oauth_tokens WHERE access_token = $1
            ",
        )
        .bind(access_token)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| Self::row_to_token(&row)).transpose()
    }

    /// Mark a token pair revoked. Idempotent: revoking an already-revoked
    /// or unknown value changes nothing.
    ///
    /// # Errors
    /// Returns an error if the database update fails
    pub async fn revoke_access_token(&self, access_token: &str) -> AppResult<()> {
        sqlx::query("UPDATE oauth_tokens SET revoked = 1 WHERE access_token = $1")
            .bind(access_token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Atomically consume a refresh token for rotation.
    ///
    /// A single guarded UPDATE revokes the pair only when it is still
    /// live, bound to the calling client, and within its refresh window;
    /// two concurrent rotations of the same value cannot both succeed.
    /// Returns the consumed pair, or `None` when the token was unknown,
    /// revoked, expired, or issued to another client.
    ///
    /// # Errors
    /// Returns an error if the database queries fail
    pub async fn consume_refresh_token(
        &self,
        refresh_token: &str,
        client_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<BearerToken>> {
        let result = sqlx::query(
            r"
            UPDATE oauth_tokens SET revoked = 1
            WHERE refresh_token = $1 AND client_id = $2 AND revoked = 0
              AND refresh_expires_at > $3
            ",
        )
        .bind(refresh_token)
        .bind(client_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        // A user-deletion cascade may remove the row between the two
        // statements; treat that as a dead token, not an internal error
        let row = sqlx::query(
            r"
            SELECT access_token, refresh_token, user_id, client_id,
                   issued_at, access_expires_at, refresh_expires_at, revoked
            FROM oauth_tokens WHERE refresh_token = $1
            ",
        )
        .bind(refresh_token)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| Self::row_to_token(&row)).transpose()
    }

    fn row_to_token(row: &sqlx::sqlite::SqliteRow) -> AppResult<BearerToken> {
        let user_id: String = row.get("user_id");

        Ok(BearerToken {
            access_token: row.get("access_token"),
            refresh_token: row.get("refresh_token"),
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| AppError::internal(format!("Corrupt token owner id: {e}")))?,
            client_id: row.get("client_id"),
            issued_at: row.get("issued_at"),
            access_expires_at: row.get("access_expires_at"),
            refresh_expires_at: row.get("refresh_expires_at"),
            revoked: row.get("revoked"),
        })
    }
}
