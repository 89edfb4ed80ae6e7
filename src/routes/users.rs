// ABOUTME: User directory handlers: create, read, list, password update, delete
// ABOUTME: Ownership-sensitive operations go through the guard before the service runs
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vidpod.org

use crate::errors::AppResult;
use crate::middleware::{AuthGuard, Capability};
use crate::models::{User, UserRole};
use crate::pagination::{Page, PaginationParams, UserSort};
use crate::users::UserService;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// User creation request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
}

/// User creation response
#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub id: Uuid,
}

/// Password update request
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePasswordRequest {
    pub password: String,
}

/// Public view of an account; the credential hash never appears here
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
    #[serde(rename = "createdDate")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Handlers for the users endpoint group
#[derive(Clone)]
pub struct UserRoutes {
    guard: Arc<AuthGuard>,
    users: Arc<UserService>,
}

impl UserRoutes {
    #[must_use]
    pub const fn new(guard: Arc<AuthGuard>, users: Arc<UserService>) -> Self {
        Self { guard, users }
    }

    /// Create a user (authenticated callers only)
    ///
    /// # Errors
    /// 401 without a valid token; 400 on a duplicate username or
    /// malformed payload
    pub async fn create(
        &self,
        authorization: Option<&str>,
        request: CreateUserRequest,
    ) -> AppResult<CreateUserResponse> {
        self.guard
            .require(authorization, Capability::Authenticated)
            .await?;

        let user = self
            .users
            .register(&request.username, &request.password, UserRole::User)
            .await?;

        Ok(CreateUserResponse { id: user.id })
    }

    /// Get one account by id (public)
    ///
    /// # Errors
    /// 404 for an unknown id
    pub async fn get(&self, user_id: Uuid) -> AppResult<UserResponse> {
        self.users.get(user_id).await.map(UserResponse::from)
    }

    /// Resolve the caller's own account from its bearer token
    ///
    /// # Errors
    /// 401 without a valid token
    pub async fn me(&self, authorization: Option<&str>) -> AppResult<UserResponse> {
        self.guard
            .authenticate(authorization)
            .await
            .map(UserResponse::from)
    }

    /// List accounts with pagination and sorting (public)
    ///
    /// # Errors
    /// 400 for a negative window or unknown sort field
    pub async fn list(
        &self,
        start: Option<i64>,
        count: Option<i64>,
        sort: Option<&str>,
    ) -> AppResult<Page<UserResponse>> {
        let defaults = PaginationParams::default();
        let params = PaginationParams::new(
            start.unwrap_or(defaults.start),
            count.unwrap_or(defaults.count),
        )?;
        let sort = sort.map_or_else(|| Ok(UserSort::default()), UserSort::parse)?;

        let page = self.users.list(params, sort).await?;

        Ok(Page::new(
            page.total,
            page.data.into_iter().map(UserResponse::from).collect(),
        ))
    }

    /// Update an account's password (account owner or admin)
    ///
    /// # Errors
    /// 401 without a valid token, 403 for another user's account
    pub async fn update_password(
        &self,
        authorization: Option<&str>,
        user_id: Uuid,
        request: UpdatePasswordRequest,
    ) -> AppResult<()> {
        self.guard
            .require(authorization, Capability::AccountOwner(user_id))
            .await?;

        self.users.update_password(user_id, &request.password).await
    }

    /// Delete an account (account owner or admin); cascades to the
    /// account's tokens and videos
    ///
    /// # Errors
    /// 401 without a valid token, 403 for another user's account,
    /// 404 for an unknown id
    pub async fn delete(&self, authorization: Option<&str>, user_id: Uuid) -> AppResult<()> {
        self.guard
            .require(authorization, Capability::AccountOwner(user_id))
            .await?;

        self.users.delete(user_id).await
    }
}
