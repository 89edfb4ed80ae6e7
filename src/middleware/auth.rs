// ABOUTME: Authorization guard in front of every protected operation
// ABOUTME: Validates bearer tokens and enforces ownership before business logic runs
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vidpod.org

//! # Authorization Guard
//!
//! Every mutating or federation operation passes through [`AuthGuard`]
//! before any business logic executes: first the bearer token resolves to
//! a live user or the call dies with 401, then the requested
//! [`Capability`] is checked against that user or the call dies with 403.
//! Ownership rules live here, in one place, instead of being repeated in
//! every handler.

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{User, Video};
use crate::oauth2::OAuth2TokenService;
use std::sync::Arc;
use uuid::Uuid;

/// What a protected operation requires of the caller
#[derive(Debug, Clone, Copy)]
pub enum Capability {
    /// Any valid, non-expired token
    Authenticated,
    /// The token subject must be this account (or an admin)
    AccountOwner(Uuid),
    /// The token subject must have authored this video (or be an admin)
    VideoOwner(Uuid),
    /// The token subject must hold the admin role
    Admin,
}

/// Authorization guard shared by every protected route
#[derive(Clone)]
pub struct AuthGuard {
    token_service: Arc<OAuth2TokenService>,
    database: Arc<Database>,
}

impl AuthGuard {
    #[must_use]
    pub const fn new(token_service: Arc<OAuth2TokenService>, database: Arc<Database>) -> Self {
        Self {
            token_service,
            database,
        }
    }

    /// Pull the token out of an `Authorization` header value
    ///
    /// # Errors
    /// Returns `Unauthenticated` when the header is missing or does not
    /// carry a bearer token
    pub fn extract_bearer(authorization: Option<&str>) -> AppResult<&str> {
        let header =
            authorization.ok_or_else(|| AppError::unauthenticated("Missing Authorization header"))?;

        header
            .strip_prefix("Bearer ")
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::unauthenticated("Malformed Authorization header"))
    }

    /// Authenticate a request from its `Authorization` header value.
    ///
    /// # Errors
    /// Returns `Unauthenticated` (401) for a missing, malformed, unknown,
    /// revoked, or expired token
    pub async fn authenticate(&self, authorization: Option<&str>) -> AppResult<User> {
        let token = Self::extract_bearer(authorization)?;
        self.token_service.validate_access_token(token).await
    }

    /// Check a capability against an already-authenticated user.
    ///
    /// # Errors
    /// Returns `Forbidden` (403) on an ownership or role mismatch, and
    /// `NotFound` when a referenced video does not exist
    pub async fn authorize(&self, user: &User, capability: Capability) -> AppResult<()> {
        match capability {
            Capability::Authenticated => Ok(()),
            Capability::Admin => {
                if user.role.is_admin() {
                    Ok(())
                } else {
                    tracing::warn!(user = %user.username, "Admin capability denied");
                    Err(AppError::forbidden("Administrator role required"))
                }
            }
            Capability::AccountOwner(account_id) => {
                if user.id == account_id || user.role.is_admin() {
                    Ok(())
                } else {
                    tracing::warn!(
                        user = %user.username,
                        account = %account_id,
                        "Account ownership denied"
                    );
                    Err(AppError::forbidden("Cannot manage another user's account"))
                }
            }
            Capability::VideoOwner(video_id) => {
                self.authorize_video_owner(user, video_id).await.map(|_| ())
            }
        }
    }

    /// Authenticate and authorize in one step, returning the caller
    ///
    /// # Errors
    /// 401 before 403: a bad token never learns whether the resource
    /// exists or who owns it
    pub async fn require(
        &self,
        authorization: Option<&str>,
        capability: Capability,
    ) -> AppResult<User> {
        let user = self.authenticate(authorization).await?;
        self.authorize(&user, capability).await?;
        Ok(user)
    }

    /// Video ownership check that hands back the loaded video so callers
    /// do not re-read it
    ///
    /// # Errors
    /// `NotFound` for an unknown video, `Forbidden` for a non-author
    pub async fn authorize_video_owner(&self, user: &User, video_id: Uuid) -> AppResult<Video> {
        let Some(video) = self.database.get_video(video_id).await? else {
            return Err(AppError::not_found("Video"));
        };

        if video.author_id == user.id || user.role.is_admin() {
            Ok(video)
        } else {
            tracing::warn!(
                user = %user.username,
                video = %video_id,
                "Video ownership denied"
            );
            Err(AppError::forbidden("Cannot modify another user's video"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_extract_bearer() {
        assert_eq!(
            AuthGuard::extract_bearer(Some("Bearer abc123")).unwrap(),
            "abc123"
        );
    }

    #[test]
    fn test_extract_bearer_rejects_missing_and_malformed() {
        for header in [None, Some(""), Some("abc123"), Some("Basic abc123"), Some("Bearer ")] {
            let err = AuthGuard::extract_bearer(header).unwrap_err();
            assert_eq!(err.code, ErrorCode::Unauthenticated, "header: {header:?}");
        }
    }
}
