// ABOUTME: Token endpoint and logout handlers
// ABOUTME: Thin wrappers over the token service with the guard in front of revocation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vidpod.org

use crate::errors::AppResult;
use crate::middleware::AuthGuard;
use crate::oauth2::{OAuth2TokenService, TokenRequest, TokenResponse};
use std::sync::Arc;

/// Handlers for the token and revocation endpoints
#[derive(Clone)]
pub struct AuthRoutes {
    token_service: Arc<OAuth2TokenService>,
    guard: Arc<AuthGuard>,
}

impl AuthRoutes {
    #[must_use]
    pub const fn new(token_service: Arc<OAuth2TokenService>, guard: Arc<AuthGuard>) -> Self {
        Self {
            token_service,
            guard,
        }
    }

    /// POST token endpoint: password or refresh_token grant
    ///
    /// # Errors
    /// `invalid_client`, `invalid_grant`, `unauthorized_client`, or
    /// `unsupported_grant_type`, each mapping to a 400 with the
    /// `{"error": ...}` body
    pub async fn token(&self, request: TokenRequest) -> AppResult<TokenResponse> {
        self.token_service.token(request).await
    }

    /// POST revoke endpoint (logout). The token must still validate;
    /// revoking an already-dead token is a 401, matching the behavior of
    /// every other protected call.
    ///
    /// # Errors
    /// `Unauthenticated` when the presented token is already invalid
    pub async fn logout(&self, authorization: Option<&str>) -> AppResult<()> {
        let token = AuthGuard::extract_bearer(authorization)?;
        self.token_service.validate_access_token(token).await?;
        self.token_service.revoke(token).await
    }

    /// Underlying guard, shared with the other route groups
    #[must_use]
    pub const fn guard(&self) -> &Arc<AuthGuard> {
        &self.guard
    }
}
