// ABOUTME: OAuth2 request and response structures for the token endpoint
// ABOUTME: Resource-owner password and refresh_token grant shapes

use serde::{Deserialize, Serialize};

/// Token endpoint request
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    /// Grant type (`password` or `refresh_token`)
    pub grant_type: String,
    /// Client ID
    pub client_id: String,
    /// Client secret
    pub client_secret: String,
    /// Username (for the `password` grant)
    pub username: Option<String>,
    /// Password (for the `password` grant)
    pub password: Option<String>,
    /// Refresh token (for the `refresh_token` grant)
    pub refresh_token: Option<String>,
}

impl TokenRequest {
    /// Build a password-grant request
    #[must_use]
    pub fn password(client_id: &str, client_secret: &str, username: &str, password: &str) -> Self {
        Self {
            grant_type: "password".to_owned(),
            client_id: client_id.to_owned(),
            client_secret: client_secret.to_owned(),
            username: Some(username.to_owned()),
            password: Some(password.to_owned()),
            refresh_token: None,
        }
    }

    /// Build a refresh-grant request
    #[must_use]
    pub fn refresh(client_id: &str, client_secret: &str, refresh_token: &str) -> Self {
        Self {
            grant_type: "refresh_token".to_owned(),
            client_id: client_id.to_owned(),
            client_secret: client_secret.to_owned(),
            username: None,
            password: None,
            refresh_token: Some(refresh_token.to_owned()),
        }
    }
}

/// Token endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Opaque access token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    /// Opaque refresh token for session extension
    pub refresh_token: String,
}
