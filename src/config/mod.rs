// ABOUTME: Environment-driven server configuration
// ABOUTME: All settings come from environment variables with sensible defaults
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vidpod.org

//! Server configuration, environment-only. Every knob has a default so a
//! bare `ServerConfig::from_env()` yields a runnable development pod.

use crate::constants::env_config;
use anyhow::Result;
use std::env;

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Database settings
    pub database: DatabaseConfig,
    /// Token issuance settings
    pub auth: AuthConfig,
    /// First-run provisioning settings
    pub bootstrap: BootstrapConfig,
    /// Public address of this pod, exchanged with peers
    pub pod_host: String,
}

/// Database settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// sqlx connection URL (sqlite)
    pub url: String,
}

/// Token issuance settings
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Access token lifetime in seconds
    pub access_token_ttl_secs: i64,
    /// Refresh token lifetime in seconds
    pub refresh_token_ttl_secs: i64,
}

/// First-run provisioning settings
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Password given to the root account when it is first created.
    /// When unset, a random password is generated and logged once.
    pub root_password: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a present variable fails to parse.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database: DatabaseConfig {
                url: env_config::database_url(),
            },
            auth: AuthConfig {
                access_token_ttl_secs: env_config::access_token_ttl_secs(),
                refresh_token_ttl_secs: env_config::refresh_token_ttl_secs(),
            },
            bootstrap: BootstrapConfig {
                root_password: env::var("ROOT_PASSWORD").ok(),
            },
            pod_host: env_config::pod_host(),
        })
    }
}
