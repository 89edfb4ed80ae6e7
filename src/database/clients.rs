// ABOUTME: OAuth client registry database operations
// ABOUTME: Stores provisioned client identities with hashed secrets and grant allow-lists

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::OAuthClient;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the OAuth client table
    pub(super) async fn migrate_clients(&self) -> anyhow::Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS oauth_clients (
                id TEXT PRIMARY KEY,
                client_id TEXT UNIQUE NOT NULL,
                client_secret_hash TEXT NOT NULL,
                grant_types TEXT NOT NULL,
                created_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_oauth_clients_client_id ON oauth_clients(client_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Store a provisioned client. Clients are immutable once created.
    ///
    /// # Errors
    /// Returns a validation error if the client id is already registered
    pub async fn create_client(&self, client: &OAuthClient) -> AppResult<()> {
        let grant_types = serde_json::to_string(&client.grant_types)
            .map_err(|e| AppError::internal(format!("Failed to serialize grant types: {e}")))?;

        let result = sqlx::query(
            r"
            INSERT INTO oauth_clients (id, client_id, client_secret_hash, grant_types, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(client.id.to_string())
        .bind(&client.client_id)
        .bind(&client.client_secret_hash)
        .bind(grant_types)
        .bind(client.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::validation(
                format!("Client {} is already registered", client.client_id),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a client by its public identifier
    ///
    /// # Errors
    /// Returns an error if the database query fails
    pub async fn get_client(&self, client_id: &str) -> AppResult<Option<OAuthClient>> {
        let row = sqlx::query(
            r"
            SELECT id, client_id, client_secret_hash, grant_types, created_at
            FROM oauth_clients WHERE client_id = $1
            ",
        )
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| Self::row_to_client(&row)).transpose()
    }

    /// Count provisioned clients (used by first-run bootstrap)
    ///
    /// # Errors
    /// Returns an error if the database query fails
    pub async fn count_clients(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM oauth_clients")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    fn row_to_client(row: &sqlx::sqlite::SqliteRow) -> AppResult<OAuthClient> {
        let id: String = row.get("id");
        let grant_types: String = row.get("grant_types");

        Ok(OAuthClient {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::internal(format!("Corrupt client id: {e}")))?,
            client_id: row.get("client_id"),
            client_secret_hash: row.get("client_secret_hash"),
            grant_types: serde_json::from_str(&grant_types)
                .map_err(|e| AppError::internal(format!("Corrupt grant type list: {e}")))?,
            created_at: row.get("created_at"),
        })
    }
}
