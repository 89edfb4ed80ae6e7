// ABOUTME: Pod relationship database operations
// ABOUTME: Stores federation links keyed by peer host with their state machine position

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{PodRelationship, PodState};
use crate::pagination::Page;
use chrono::{DateTime, Utc};
use sqlx::Row;

impl Database {
    /// Create the pod relationship table
    pub(super) async fn migrate_pods(&self) -> anyhow::Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS pod_relationships (
                host TEXT PRIMARY KEY,
                state TEXT NOT NULL CHECK (state IN ('pending', 'active', 'terminated')),
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a relationship, or reset a terminated one back to the given
    /// state. A live (pending or active) relationship is left untouched
    /// and reported as a conflict.
    ///
    /// # Errors
    /// Returns a validation error if a live relationship already exists
    pub async fn insert_pod(&self, pod: &PodRelationship) -> AppResult<()> {
        let result = sqlx::query(
            r"
            INSERT INTO pod_relationships (host, state, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(host) DO UPDATE SET
                state = excluded.state,
                updated_at = excluded.updated_at
            WHERE pod_relationships.state = 'terminated'
            ",
        )
        .bind(&pod.host)
        .bind(pod.state.as_str())
        .bind(pod.created_at)
        .bind(pod.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::validation(format!(
                "A relationship with {} already exists",
                pod.host
            )));
        }
        Ok(())
    }

    /// Get a relationship by peer host
    ///
    /// # Errors
    /// Returns an error if the database query fails
    pub async fn get_pod(&self, host: &str) -> AppResult<Option<PodRelationship>> {
        let row = sqlx::query(
            "SELECT host, state, created_at, updated_at FROM pod_relationships WHERE host = $1",
        )
        .bind(host)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| Self::row_to_pod(&row)).transpose()
    }

    /// Transition a relationship from `expected` to `next`.
    ///
    /// The state check lives inside the UPDATE itself, so two concurrent
    /// transitions of the same link cannot both succeed.
    ///
    /// # Errors
    /// Returns `NotFound` when the relationship is absent or not in the
    /// expected state
    pub async fn transition_pod(
        &self,
        host: &str,
        expected: PodState,
        next: PodState,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r"
            UPDATE pod_relationships SET state = $3, updated_at = $4
            WHERE host = $1 AND state = $2
            ",
        )
        .bind(host)
        .bind(expected.as_str())
        .bind(next.as_str())
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "{} relationship with {host}",
                expected.as_str()
            )));
        }
        Ok(())
    }

    /// List relationships in the order they were first requested
    ///
    /// # Errors
    /// Returns an error if the database queries fail
    pub async fn list_pods(&self) -> AppResult<Page<PodRelationship>> {
        let mut tx = self.pool.begin().await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pod_relationships")
            .fetch_one(&mut *tx)
            .await?;

        let rows = sqlx::query(
            r"
            SELECT host, state, created_at, updated_at
            FROM pod_relationships ORDER BY created_at ASC, rowid ASC
            ",
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let pods = rows
            .iter()
            .map(Self::row_to_pod)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Page::new(total, pods))
    }

    fn row_to_pod(row: &sqlx::sqlite::SqliteRow) -> AppResult<PodRelationship> {
        let state: String = row.get("state");

        Ok(PodRelationship {
            host: row.get("host"),
            state: state
                .parse::<PodState>()
                .map_err(|e| AppError::internal(e.to_string()))?,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
