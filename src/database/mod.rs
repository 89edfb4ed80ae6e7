// ABOUTME: Database management for the pod core
// ABOUTME: Owns the SQLite pool, runs migrations, and hosts per-entity operations
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vidpod.org

//! # Database Management
//!
//! `Database` wraps an sqlx SQLite pool and is the single source of truth
//! for every entity store. Operations are grouped into one file per
//! entity; multi-row invariants (the user-deletion cascade, refresh token
//! rotation) run inside transactions so concurrent readers never observe
//! a partial state.

mod clients;
mod pods;
mod tokens;
mod users;
mod videos;

pub use videos::VideoWithAuthor;

use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite, SqlitePool};

/// Database manager for users, tokens, videos, clients, and pod links
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    /// Returns an error if the pool cannot be opened or a migration fails
    pub async fn new(database_url: &str) -> Result<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") && !database_url.contains('?')
        {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_string()
        };

        // An in-memory SQLite database exists per connection; a pool wider
        // than one would hand every caller a different empty store.
        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect(&connection_options)
                .await?
        } else {
            SqlitePool::connect(&connection_options).await?
        };

        let db = Self { pool };

        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    /// Returns an error if table or index creation fails
    pub async fn migrate(&self) -> Result<()> {
        self.migrate_users().await?;
        self.migrate_clients().await?;
        self.migrate_tokens().await?;
        self.migrate_videos().await?;
        self.migrate_pods().await?;

        Ok(())
    }
}
