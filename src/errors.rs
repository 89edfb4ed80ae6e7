// ABOUTME: Unified error handling for the pod core
// ABOUTME: Defines error codes, HTTP status mapping, and the OAuth2-style wire error body
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vidpod.org

//! # Unified Error Handling
//!
//! Every fallible operation in the pod core returns [`AppResult`]. The
//! [`ErrorCode`] carries the HTTP status a transport layer should answer
//! with; the token endpoint additionally serializes the code itself as the
//! OAuth2 error body `{"error": "<code>"}`.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the pod core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Token endpoint (RFC 6749 §5.2 wire codes)
    #[serde(rename = "invalid_request")]
    InvalidRequest,
    #[serde(rename = "invalid_client")]
    InvalidClient,
    #[serde(rename = "invalid_grant")]
    InvalidGrant,
    #[serde(rename = "unauthorized_client")]
    UnauthorizedClient,
    #[serde(rename = "unsupported_grant_type")]
    UnsupportedGrantType,

    // Protected resources
    #[serde(rename = "unauthenticated")]
    Unauthenticated,
    #[serde(rename = "forbidden")]
    Forbidden,

    // Payload validation
    #[serde(rename = "invalid_input")]
    InvalidInput,

    // Resource lookup
    #[serde(rename = "not_found")]
    NotFound,

    // Internal failures
    #[serde(rename = "internal_error")]
    InternalError,
    #[serde(rename = "database_error")]
    DatabaseError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            // 400 Bad Request
            Self::InvalidRequest
            | Self::InvalidClient
            | Self::InvalidGrant
            | Self::UnauthorizedClient
            | Self::UnsupportedGrantType
            | Self::InvalidInput => 400,

            // 401 Unauthorized
            Self::Unauthenticated => 401,

            // 403 Forbidden
            Self::Forbidden => 403,

            // 404 Not Found
            Self::NotFound => 404,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError => 500,
        }
    }

    /// Wire representation of the code, as serialized into the error body
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::InvalidClient => "invalid_client",
            Self::InvalidGrant => "invalid_grant",
            Self::UnauthorizedClient => "unauthorized_client",
            Self::UnsupportedGrantType => "unsupported_grant_type",
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden => "forbidden",
            Self::InvalidInput => "invalid_input",
            Self::NotFound => "not_found",
            Self::InternalError => "internal_error",
            Self::DatabaseError => "database_error",
        }
    }
}

/// Unified error type for the pod core
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message, never sent to unauthenticated callers
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new error with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Malformed token request (missing grant parameters)
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Unknown client id or wrong client secret
    #[must_use]
    pub fn invalid_client() -> Self {
        Self::new(ErrorCode::InvalidClient, "Client authentication failed")
    }

    /// Unknown user, wrong password, or invalid/expired refresh token.
    /// The message is identical for every cause so callers cannot probe
    /// which half of the credential pair was wrong.
    #[must_use]
    pub fn invalid_grant() -> Self {
        Self::new(ErrorCode::InvalidGrant, "Invalid grant")
    }

    /// Client is not allowed to use the requested grant type
    pub fn unauthorized_client(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnauthorizedClient, message)
    }

    /// Grant type this pod does not issue tokens for
    #[must_use]
    pub fn unsupported_grant_type() -> Self {
        Self::new(ErrorCode::UnsupportedGrantType, "Grant type not supported")
    }

    /// Missing, malformed, expired, or revoked bearer token
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthenticated, message)
    }

    /// Valid token, but the subject does not own the targeted resource
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Malformed payload or constraint violation (e.g. duplicate username)
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Resource id does not exist
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::NotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database operation failed
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Wire error body: `{"error": "<code>"}`.
///
/// The token endpoint answers with this body for `invalid_client` /
/// `invalid_grant`; other endpoints signal authentication failures with
/// the status code alone and may omit the body entirely.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorCode,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        Self { error: error.code }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        Self::database(error.to_string()).with_source(error)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::InvalidClient.http_status(), 400);
        assert_eq!(ErrorCode::InvalidGrant.http_status(), 400);
        assert_eq!(ErrorCode::Unauthenticated.http_status(), 401);
        assert_eq!(ErrorCode::Forbidden.http_status(), 403);
        assert_eq!(ErrorCode::NotFound.http_status(), 404);
        assert_eq!(ErrorCode::InternalError.http_status(), 500);
    }

    #[test]
    fn test_error_response_serialization() {
        let error = AppError::invalid_client();
        let body = serde_json::to_string(&ErrorResponse::from(&error)).unwrap();
        assert_eq!(body, r#"{"error":"invalid_client"}"#);

        let error = AppError::invalid_grant();
        let body = serde_json::to_string(&ErrorResponse::from(&error)).unwrap();
        assert_eq!(body, r#"{"error":"invalid_grant"}"#);
    }

    #[test]
    fn test_grant_errors_are_indistinguishable() {
        let unknown_user = AppError::invalid_grant();
        let wrong_password = AppError::invalid_grant();
        assert_eq!(unknown_user.code, wrong_password.code);
        assert_eq!(unknown_user.message, wrong_password.message);
    }
}
