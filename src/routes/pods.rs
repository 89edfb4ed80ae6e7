// ABOUTME: Federation endpoint handlers: make friends, quit friends, list relationships
// ABOUTME: Both mutations sit behind the authorization guard
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vidpod.org

use crate::errors::AppResult;
use crate::federation::FederationService;
use crate::middleware::{AuthGuard, Capability};
use crate::models::PodRelationship;
use crate::pagination::Page;
use serde::Deserialize;
use std::sync::Arc;

/// Friendship request payload
#[derive(Debug, Clone, Deserialize)]
pub struct FriendRequest {
    /// Peer pod address, e.g. `http://pod2.example.com:9000`
    pub host: String,
}

/// Handlers for the pods endpoint group
#[derive(Clone)]
pub struct PodRoutes {
    guard: Arc<AuthGuard>,
    federation: Arc<FederationService>,
}

impl PodRoutes {
    #[must_use]
    pub const fn new(guard: Arc<AuthGuard>, federation: Arc<FederationService>) -> Self {
        Self { guard, federation }
    }

    /// Request a friendship with a peer pod (authenticated callers only)
    ///
    /// # Errors
    /// 401 without a valid token; no relationship is created on a
    /// rejected call
    pub async fn make_friends(
        &self,
        authorization: Option<&str>,
        request: FriendRequest,
    ) -> AppResult<PodRelationship> {
        self.guard
            .require(authorization, Capability::Authenticated)
            .await?;

        self.federation.add_friend(&request.host).await
    }

    /// Quit an active friendship (authenticated callers only)
    ///
    /// # Errors
    /// 401 without a valid token, 404 without an active relationship
    pub async fn quit_friends(
        &self,
        authorization: Option<&str>,
        request: FriendRequest,
    ) -> AppResult<()> {
        self.guard
            .require(authorization, Capability::Authenticated)
            .await?;

        self.federation.quit_friend(&request.host).await
    }

    /// List pod relationships (public)
    ///
    /// # Errors
    /// Internal errors only
    pub async fn list(&self) -> AppResult<Page<PodRelationship>> {
        self.federation.list().await
    }
}
