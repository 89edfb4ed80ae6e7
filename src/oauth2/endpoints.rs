// ABOUTME: Token endpoint implementation: password and refresh_token grants
// ABOUTME: Issues, rotates, revokes, and validates opaque bearer token pairs
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vidpod.org

use super::client_registration::ClientRegistrationManager;
use super::models::{TokenRequest, TokenResponse};
use crate::config::AuthConfig;
use crate::constants::identifiers::{GRANT_PASSWORD, GRANT_REFRESH_TOKEN, TOKEN_TYPE_BEARER};
use crate::crypto;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{BearerToken, OAuthClient, User};
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Token service: the only issuer of bearer credentials on this pod
pub struct OAuth2TokenService {
    client_manager: ClientRegistrationManager,
    database: Arc<Database>,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
}

impl OAuth2TokenService {
    #[must_use]
    pub fn new(database: Arc<Database>, auth: &AuthConfig) -> Self {
        let client_manager = ClientRegistrationManager::new(database.clone());

        Self {
            client_manager,
            database,
            access_token_ttl: Duration::seconds(auth.access_token_ttl_secs),
            refresh_token_ttl: Duration::seconds(auth.refresh_token_ttl_secs),
        }
    }

    /// Access to the client registry behind this service
    #[must_use]
    pub const fn client_manager(&self) -> &ClientRegistrationManager {
        &self.client_manager
    }

    /// Handle a token request (POST to the token endpoint).
    ///
    /// Client credentials are validated for every grant type before the
    /// grant itself is even looked at; a caller with a bad client learns
    /// nothing about user credentials.
    ///
    /// # Errors
    /// `invalid_client` for unknown/mismatched client credentials,
    /// `invalid_grant` for bad user credentials or a dead refresh token,
    /// `unsupported_grant_type` for anything this pod does not issue
    pub async fn token(&self, request: TokenRequest) -> AppResult<TokenResponse> {
        let client = self
            .client_manager
            .validate_client(&request.client_id, &request.client_secret)
            .await?;

        if !client.allows_grant(&request.grant_type) {
            tracing::warn!(
                client_id = %client.client_id,
                grant_type = %request.grant_type,
                "Client requested a grant type it is not registered for"
            );
            return Err(AppError::unauthorized_client(format!(
                "Client may not use the {} grant",
                request.grant_type
            )));
        }

        match request.grant_type.as_str() {
            GRANT_PASSWORD => self.handle_password_grant(&client, request).await,
            GRANT_REFRESH_TOKEN => self.handle_refresh_token_grant(&client, request).await,
            _ => Err(AppError::unsupported_grant_type()),
        }
    }

    /// Resource-owner password grant
    async fn handle_password_grant(
        &self,
        client: &OAuthClient,
        request: TokenRequest,
    ) -> AppResult<TokenResponse> {
        let username = request
            .username
            .ok_or_else(|| AppError::invalid_request("Missing username"))?;
        let password = request
            .password
            .ok_or_else(|| AppError::invalid_request("Missing password"))?;

        // Unknown username and wrong password take the same exit so the
        // response cannot be used for account enumeration.
        let Some(user) = self.database.get_user_by_username(&username).await? else {
            tracing::warn!(username = %username, "Password grant for unknown username");
            return Err(AppError::invalid_grant());
        };

        if !crypto::verify_password(&password, &user.password_hash).await? {
            tracing::warn!(username = %username, "Password grant with wrong password");
            return Err(AppError::invalid_grant());
        }

        let response = self.issue_pair(user.id, &client.client_id).await?;

        tracing::info!(
            username = %username,
            client_id = %client.client_id,
            "Issued token pair via password grant"
        );

        Ok(response)
    }

    /// Refresh grant with rotation: the presented refresh token is
    /// atomically consumed, which also kills its access token, and a
    /// fresh pair bound to the same user replaces it.
    async fn handle_refresh_token_grant(
        &self,
        client: &OAuthClient,
        request: TokenRequest,
    ) -> AppResult<TokenResponse> {
        let refresh_token = request
            .refresh_token
            .ok_or_else(|| AppError::invalid_request("Missing refresh_token"))?;

        let Some(old_pair) = self
            .database
            .consume_refresh_token(&refresh_token, &client.client_id, Utc::now())
            .await?
        else {
            tracing::warn!(
                client_id = %client.client_id,
                "Refresh grant with unknown, revoked, or expired token"
            );
            return Err(AppError::invalid_grant());
        };

        let response = self.issue_pair(old_pair.user_id, &client.client_id).await?;

        tracing::info!(
            user_id = %old_pair.user_id,
            client_id = %client.client_id,
            "Rotated token pair via refresh grant"
        );

        Ok(response)
    }

    /// Generate and persist a fresh pair for (user, client)
    async fn issue_pair(&self, user_id: Uuid, client_id: &str) -> AppResult<TokenResponse> {
        let now = Utc::now();

        let token = BearerToken {
            access_token: crypto::generate_token_value()?,
            refresh_token: crypto::generate_token_value()?,
            user_id,
            client_id: client_id.to_owned(),
            issued_at: now,
            access_expires_at: now + self.access_token_ttl,
            refresh_expires_at: now + self.refresh_token_ttl,
            revoked: false,
        };

        self.database.insert_token(&token).await?;

        Ok(TokenResponse {
            access_token: token.access_token,
            token_type: TOKEN_TYPE_BEARER.to_owned(),
            expires_in: self.access_token_ttl.num_seconds(),
            refresh_token: token.refresh_token,
        })
    }

    /// Revoke an access token (logout). Idempotent.
    ///
    /// # Errors
    /// Returns an error if the database update fails
    pub async fn revoke(&self, access_token: &str) -> AppResult<()> {
        self.database.revoke_access_token(access_token).await?;
        tracing::info!("Access token revoked");
        Ok(())
    }

    /// Resolve an access token to its owning user.
    ///
    /// # Errors
    /// Returns `Unauthenticated` when the token is unknown, revoked, past
    /// expiry, or its owner no longer exists
    pub async fn validate_access_token(&self, access_token: &str) -> AppResult<User> {
        let Some(token) = self.database.get_token_by_access(access_token).await? else {
            return Err(AppError::unauthenticated("Unknown access token"));
        };

        if token.revoked {
            return Err(AppError::unauthenticated("Access token has been revoked"));
        }

        if token.is_access_expired(Utc::now()) {
            return Err(AppError::unauthenticated("Access token has expired"));
        }

        // The cascade deletes a user's tokens with the account, so this
        // lookup only misses when a deletion raced the validation.
        let Some(user) = self.database.get_user(token.user_id).await? else {
            return Err(AppError::unauthenticated("Token owner no longer exists"));
        };

        Ok(user)
    }
}
