// ABOUTME: User directory database operations
// ABOUTME: Account storage, paginated listing, and the transactional deletion cascade

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{User, UserRole};
use crate::pagination::{Page, PaginationParams, UserSort};
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the users table
    pub(super) async fn migrate_users(&self) -> anyhow::Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('admin', 'user')),
                created_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_username ON users(username)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a new user
    ///
    /// # Errors
    /// Returns a validation error if the username is already taken, or a
    /// database error if the insert fails
    pub async fn create_user(&self, user: &User) -> AppResult<Uuid> {
        let result = sqlx::query(
            r"
            INSERT INTO users (id, username, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(user.id),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::validation(
                format!("Username {} is already taken", user.username),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a user by id
    ///
    /// # Errors
    /// Returns an error if the database query fails
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<Option<User>> {
        self.get_user_impl("id", &user_id.to_string()).await
    }

    /// Get a user by username (case-sensitive)
    ///
    /// # Errors
    /// Returns an error if the database query fails
    pub async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.get_user_impl("username", username).await
    }

    async fn get_user_impl(&self, field: &str, value: &str) -> AppResult<Option<User>> {
        let query = format!(
            "SELECT id, username, password_hash, role, created_at FROM users WHERE {field} = $1"
        );

        let row = sqlx::query(&query).bind(value).fetch_optional(&self.pool).await?;

        row.map(|row| Self::row_to_user(&row)).transpose()
    }

    /// List users as one point-in-time snapshot of total and page.
    ///
    /// Both the count and the page rows are read inside a single
    /// transaction so `total` can never disagree with the page contents.
    ///
    /// # Errors
    /// Returns an error if the database queries fail
    pub async fn list_users(
        &self,
        params: PaginationParams,
        sort: UserSort,
    ) -> AppResult<Page<User>> {
        let mut tx = self.pool.begin().await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "SELECT id, username, password_hash, role, created_at FROM users \
             ORDER BY {} LIMIT $1 OFFSET $2",
            sort.to_order_by()
        );

        let rows = sqlx::query(&query)
            .bind(params.count)
            .bind(params.start)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        let users = rows
            .iter()
            .map(Self::row_to_user)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Page::new(total, users))
    }

    /// Count user accounts (used by first-run bootstrap)
    ///
    /// # Errors
    /// Returns an error if the database query fails
    pub async fn count_users(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Replace a user's stored credential hash
    ///
    /// # Errors
    /// Returns `NotFound` if the user does not exist
    pub async fn update_user_password(&self, user_id: Uuid, password_hash: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(user_id.to_string())
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User"));
        }
        Ok(())
    }

    /// Delete a user and cascade to everything the account owns.
    ///
    /// One transaction removes the user's tokens (immediate invalidation),
    /// the videos it authored, and finally the account itself. A failure
    /// at any step rolls the whole cascade back; concurrent readers see
    /// either the full old state or the full new state.
    ///
    /// # Errors
    /// Returns `NotFound` if the user does not exist
    pub async fn delete_user_cascade(&self, user_id: Uuid) -> AppResult<()> {
        let id = user_id.to_string();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM oauth_tokens WHERE user_id = $1")
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM videos WHERE author_id = $1")
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls back the token/video deletes
            return Err(AppError::not_found("User"));
        }

        tx.commit().await?;

        tracing::info!(user_id = %user_id, "User deleted with owned tokens and videos");
        Ok(())
    }

    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> AppResult<User> {
        let id: String = row.get("id");
        let role: String = row.get("role");

        Ok(User {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::internal(format!("Corrupt user id: {e}")))?,
            username: row.get("username"),
            password_hash: row.get("password_hash"),
            role: role
                .parse::<UserRole>()
                .map_err(|e| AppError::internal(e.to_string()))?,
            created_at: row.get("created_at"),
        })
    }
}
