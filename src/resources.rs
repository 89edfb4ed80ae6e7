// ABOUTME: Server resource wiring and first-run bootstrap
// ABOUTME: Builds the database, services, guard, and route groups behind shared Arcs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vidpod.org

//! # Server Resources
//!
//! One constructor assembles every shared component of the pod core. A
//! transport layer receives a `ServerResources` and mounts the route
//! groups; tests build one against a throwaway database.

use crate::config::ServerConfig;
use crate::constants::identifiers::ROOT_USERNAME;
use crate::crypto;
use crate::database::Database;
use crate::federation::FederationService;
use crate::middleware::AuthGuard;
use crate::oauth2::OAuth2TokenService;
use crate::routes::{AuthRoutes, PodRoutes, UserRoutes, VideoRoutes};
use crate::users::UserService;
use crate::videos::VideoService;
use anyhow::Result;
use std::sync::Arc;

/// Credentials provisioned by a first-run bootstrap
#[derive(Debug, Clone)]
pub struct BootstrapCredentials {
    /// Public id of the default OAuth client
    pub client_id: String,
    /// Secret of the default OAuth client; only available here, the
    /// store keeps a hash
    pub client_secret: String,
    /// Username of the administrator account
    pub root_username: String,
    /// Password of the administrator account
    pub root_password: String,
}

/// Shared components of the pod core
#[derive(Clone)]
pub struct ServerResources {
    pub database: Arc<Database>,
    pub token_service: Arc<OAuth2TokenService>,
    pub guard: Arc<AuthGuard>,
    pub user_service: Arc<UserService>,
    pub video_service: Arc<VideoService>,
    pub federation_service: Arc<FederationService>,
    pub auth_routes: AuthRoutes,
    pub user_routes: UserRoutes,
    pub video_routes: VideoRoutes,
    pub pod_routes: PodRoutes,
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Open the database and wire every service with proper Arc sharing
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated
    pub async fn new(config: ServerConfig) -> Result<Self> {
        let database = Arc::new(Database::new(&config.database.url).await?);
        let config = Arc::new(config);

        let token_service = Arc::new(OAuth2TokenService::new(database.clone(), &config.auth));
        let guard = Arc::new(AuthGuard::new(token_service.clone(), database.clone()));

        let user_service = Arc::new(UserService::new(database.clone()));
        let video_service = Arc::new(VideoService::new(database.clone()));
        let federation_service = Arc::new(FederationService::new(database.clone()));

        let auth_routes = AuthRoutes::new(token_service.clone(), guard.clone());
        let user_routes = UserRoutes::new(guard.clone(), user_service.clone());
        let video_routes = VideoRoutes::new(guard.clone(), video_service.clone());
        let pod_routes = PodRoutes::new(guard.clone(), federation_service.clone());

        Ok(Self {
            database,
            token_service,
            guard,
            user_service,
            video_service,
            federation_service,
            auth_routes,
            user_routes,
            video_routes,
            pod_routes,
            config,
        })
    }

    /// Provision the default OAuth client and the root administrator on a
    /// fresh pod. Idempotent: an already-provisioned pod returns `None`
    /// and nothing changes.
    ///
    /// # Errors
    /// Returns an error if provisioning writes fail
    pub async fn bootstrap(&self) -> Result<Option<BootstrapCredentials>> {
        let has_clients = self.database.count_clients().await? > 0;
        let has_users = self.database.count_users().await? > 0;
        if has_clients || has_users {
            return Ok(None);
        }

        let client = self
            .token_service
            .client_manager()
            .register_client(None)
            .await?;

        let root_password = match &self.config.bootstrap.root_password {
            Some(password) => password.clone(),
            None => crypto::generate_token_value()?,
        };

        let root = self
            .user_service
            .register(ROOT_USERNAME, &root_password, crate::models::UserRole::Admin)
            .await?;

        tracing::info!(
            client_id = %client.client_id,
            root_user = %root.username,
            "Fresh pod bootstrapped; client credentials follow"
        );
        tracing::info!(client_secret = %client.client_secret, "Default client secret");

        Ok(Some(BootstrapCredentials {
            client_id: client.client_id,
            client_secret: client.client_secret,
            root_username: root.username,
            root_password,
        }))
    }
}
