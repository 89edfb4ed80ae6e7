// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides a throwaway pod fixture with bootstrapped credentials
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vidpod.org
#![allow(dead_code)]

use anyhow::Result;
use std::sync::Once;
use tempfile::TempDir;
use vidpod::{
    config::{AuthConfig, BootstrapConfig, DatabaseConfig, ServerConfig},
    errors::AppResult,
    oauth2::{TokenRequest, TokenResponse},
    resources::{BootstrapCredentials, ServerResources},
};

/// Root password every test pod is provisioned with
pub const ROOT_PASSWORD: &str = "test-root-password";

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// A bootstrapped pod over a temporary database
pub struct TestPod {
    pub resources: ServerResources,
    pub credentials: BootstrapCredentials,
    _tmp: TempDir,
}

impl TestPod {
    /// Spawn a pod with production-like token lifetimes
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_ttls(3600, 30 * 24 * 3600).await
    }

    /// Spawn a pod with custom token lifetimes (0 issues already-expired
    /// access tokens, which is how expiry paths are tested without
    /// sleeping)
    pub async fn spawn_with_ttls(access_ttl_secs: i64, refresh_ttl_secs: i64) -> Result<Self> {
        init_test_logging();

        let tmp = tempfile::tempdir()?;
        let url = format!("sqlite:{}", tmp.path().join("vidpod.sqlite").display());

        let config = ServerConfig {
            database: DatabaseConfig { url },
            auth: AuthConfig {
                access_token_ttl_secs: access_ttl_secs,
                refresh_token_ttl_secs: refresh_ttl_secs,
            },
            bootstrap: BootstrapConfig {
                root_password: Some(ROOT_PASSWORD.to_owned()),
            },
            pod_host: "localhost:9000".to_owned(),
        };

        let resources = ServerResources::new(config).await?;
        let credentials = resources
            .bootstrap()
            .await?
            .expect("fresh pod must bootstrap");

        Ok(Self {
            resources,
            credentials,
            _tmp: tmp,
        })
    }

    /// Issue a token pair through the password grant with the pod's
    /// default client
    pub async fn login(&self, username: &str, password: &str) -> AppResult<TokenResponse> {
        self.resources
            .auth_routes
            .token(TokenRequest::password(
                &self.credentials.client_id,
                &self.credentials.client_secret,
                username,
                password,
            ))
            .await
    }

    /// Log in as the bootstrapped root administrator
    pub async fn login_root(&self) -> TokenResponse {
        self.login(&self.credentials.root_username, ROOT_PASSWORD)
            .await
            .expect("root login must succeed")
    }

    /// Create a regular user through the routes, authenticated as root
    pub async fn create_user(&self, username: &str, password: &str) -> uuid::Uuid {
        let root_token = self.login_root().await;
        self.resources
            .user_routes
            .create(
                Some(&bearer(&root_token)),
                vidpod::routes::CreateUserRequest {
                    username: username.to_owned(),
                    password: password.to_owned(),
                },
            )
            .await
            .expect("user creation must succeed")
            .id
    }
}

/// Authorization header value for a token pair
pub fn bearer(token: &TokenResponse) -> String {
    format!("Bearer {}", token.access_token)
}
