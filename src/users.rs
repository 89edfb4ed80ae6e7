// ABOUTME: User directory service: registration, lookup, listing, password updates, deletion
// ABOUTME: Validation happens here before any write reaches the database
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vidpod.org

//! # User Directory
//!
//! Account lifecycle for the pod. Every write validates its payload
//! first; the deletion cascade is delegated to the database layer where
//! it runs as a single transaction.

use crate::constants::limits::{MAX_USERNAME_LENGTH, MIN_PASSWORD_LENGTH};
use crate::crypto;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{User, UserRole};
use crate::pagination::{Page, PaginationParams, UserSort};
use std::sync::Arc;
use uuid::Uuid;

/// User directory service
#[derive(Clone)]
pub struct UserService {
    database: Arc<Database>,
}

impl UserService {
    #[must_use]
    pub const fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    /// Register a new account. The password is bcrypt-hashed before
    /// anything is stored; the plaintext never leaves this function.
    ///
    /// # Errors
    /// Returns a validation error for a malformed payload or a username
    /// that is already taken (uniqueness is case-sensitive)
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        role: UserRole,
    ) -> AppResult<User> {
        tracing::info!(username = %username, "User registration attempt");

        if username.is_empty() {
            return Err(AppError::validation("Username must not be empty"));
        }
        if username.len() > MAX_USERNAME_LENGTH {
            return Err(AppError::validation(format!(
                "Username must not exceed {MAX_USERNAME_LENGTH} characters"
            )));
        }
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(AppError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let password_hash = crypto::hash_password(password)?;
        let user = User::new(username.to_owned(), password_hash, role);

        // The UNIQUE constraint on username makes this race-free even if
        // two registrations of the same name arrive together.
        let user_id = self.database.create_user(&user).await?;

        tracing::info!(username = %username, user_id = %user_id, "User registered");

        Ok(user)
    }

    /// Get an account by id
    ///
    /// # Errors
    /// Returns `NotFound` when the id does not exist
    pub async fn get(&self, user_id: Uuid) -> AppResult<User> {
        self.database
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))
    }

    /// List accounts: one sorted page plus the full directory size
    ///
    /// # Errors
    /// Returns an error if the snapshot read fails
    pub async fn list(&self, params: PaginationParams, sort: UserSort) -> AppResult<Page<User>> {
        self.database.list_users(params, sort).await
    }

    /// Replace an account's password. Outstanding tokens keep their own
    /// validity window; a password change is not a forced logout.
    ///
    /// # Errors
    /// Returns a validation error for a short password, `NotFound` for an
    /// unknown account
    pub async fn update_password(&self, user_id: Uuid, new_password: &str) -> AppResult<()> {
        if new_password.len() < MIN_PASSWORD_LENGTH {
            return Err(AppError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let password_hash = crypto::hash_password(new_password)?;
        self.database
            .update_user_password(user_id, &password_hash)
            .await?;

        tracing::info!(user_id = %user_id, "User password updated");
        Ok(())
    }

    /// Delete an account and everything it owns: tokens are invalidated
    /// and authored videos removed in the same transaction as the account
    /// row itself.
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown account
    pub async fn delete(&self, user_id: Uuid) -> AppResult<()> {
        self.database.delete_user_cascade(user_id).await
    }
}
