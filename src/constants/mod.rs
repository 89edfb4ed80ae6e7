// ABOUTME: Application constants organized by domain
// ABOUTME: Token lifetimes, pagination bounds, identifiers, and environment helpers

//! Constants module
//!
//! Constants are grouped into logical domains rather than being scattered
//! through the code that uses them.

use std::env;

/// Token and pagination limits
pub mod limits {
    /// Lifetime of an access token in seconds (1 hour)
    pub const ACCESS_TOKEN_TTL_SECS: i64 = 3600;

    /// Lifetime of a refresh token in seconds (30 days)
    pub const REFRESH_TOKEN_TTL_SECS: i64 = 30 * 24 * 3600;

    /// Page size used when a listing request does not specify `count`
    pub const DEFAULT_PAGE_SIZE: i64 = 15;

    /// Upper bound on a single listing page
    pub const MAX_PAGE_SIZE: i64 = 100;

    /// Random bytes behind every opaque token value (256 bits)
    pub const TOKEN_ENTROPY_BYTES: usize = 32;

    /// Minimum accepted password length
    pub const MIN_PASSWORD_LENGTH: usize = 6;

    /// Maximum accepted username length
    pub const MAX_USERNAME_LENGTH: usize = 50;
}

/// Well-known identifiers
pub mod identifiers {
    /// Username of the account provisioned at first start
    pub const ROOT_USERNAME: &str = "root";

    /// Grant types issued by this pod
    pub const GRANT_PASSWORD: &str = "password";
    pub const GRANT_REFRESH_TOKEN: &str = "refresh_token";

    /// Token type reported alongside every issued pair
    pub const TOKEN_TYPE_BEARER: &str = "Bearer";
}

/// Environment-based configuration helpers
pub mod env_config {
    use super::env;

    /// Get the database URL from the environment or default
    #[must_use]
    pub fn database_url() -> String {
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:data/vidpod.sqlite".to_string())
    }

    /// Get the public hostname of this pod from the environment or default
    #[must_use]
    pub fn pod_host() -> String {
        env::var("POD_HOST").unwrap_or_else(|_| "localhost:9000".to_string())
    }

    /// Get the access token TTL in seconds from the environment or default
    #[must_use]
    pub fn access_token_ttl_secs() -> i64 {
        env::var("ACCESS_TOKEN_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(super::limits::ACCESS_TOKEN_TTL_SECS)
    }

    /// Get the refresh token TTL in seconds from the environment or default
    #[must_use]
    pub fn refresh_token_ttl_secs() -> i64 {
        env::var("REFRESH_TOKEN_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(super::limits::REFRESH_TOKEN_TTL_SECS)
    }
}
