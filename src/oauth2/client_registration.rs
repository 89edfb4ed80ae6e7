// ABOUTME: OAuth client registry: provisioning and credential validation
// ABOUTME: Secrets are argon2-hashed at registration and never stored in the clear
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vidpod.org

use crate::constants::identifiers::{GRANT_PASSWORD, GRANT_REFRESH_TOKEN};
use crate::crypto;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::OAuthClient;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Registration response, the only place the plaintext secret ever appears
#[derive(Debug, Clone, Serialize)]
pub struct ClientRegistrationResponse {
    /// Public client identifier
    pub client_id: String,
    /// Client secret; shown once, stored only as a hash
    pub client_secret: String,
    /// Grant types the client may use
    pub grant_types: Vec<String>,
}

/// OAuth client registry
pub struct ClientRegistrationManager {
    database: Arc<Database>,
}

impl ClientRegistrationManager {
    /// Creates a new client registration manager
    #[must_use]
    pub const fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    /// Provision a new client. There is no update operation; credentials
    /// are fixed for the lifetime of the client.
    ///
    /// # Errors
    /// Returns an error if secret generation or storage fails
    pub async fn register_client(
        &self,
        grant_types: Option<Vec<String>>,
    ) -> AppResult<ClientRegistrationResponse> {
        let client_id = crypto::generate_client_id();
        let client_secret = crypto::generate_client_secret()?;
        let client_secret_hash = crypto::hash_client_secret(&client_secret)?;

        let grant_types = grant_types.unwrap_or_else(|| {
            vec![GRANT_PASSWORD.to_owned(), GRANT_REFRESH_TOKEN.to_owned()]
        });

        let client = OAuthClient {
            id: Uuid::new_v4(),
            client_id: client_id.clone(),
            client_secret_hash,
            grant_types: grant_types.clone(),
            created_at: Utc::now(),
        };

        self.database.create_client(&client).await?;

        tracing::info!(client_id = %client_id, "OAuth client provisioned");

        Ok(ClientRegistrationResponse {
            client_id,
            client_secret,
            grant_types,
        })
    }

    /// Validate client credentials.
    ///
    /// Unknown id and wrong secret produce the same `invalid_client`
    /// error; the distinction only reaches the log.
    ///
    /// # Errors
    /// Returns `invalid_client` when the id is unknown or the secret does
    /// not match
    pub async fn validate_client(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> AppResult<OAuthClient> {
        tracing::debug!(client_id = %client_id, "Validating OAuth client");

        let Some(client) = self.database.get_client(client_id).await? else {
            tracing::warn!(client_id = %client_id, "Unknown OAuth client");
            return Err(AppError::invalid_client());
        };

        if !crypto::verify_client_secret(client_secret, &client.client_secret_hash) {
            tracing::warn!(client_id = %client_id, "OAuth client secret validation failed");
            return Err(AppError::invalid_client());
        }

        Ok(client)
    }
}
