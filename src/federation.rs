// ABOUTME: Federation gate: pod relationship state machine behind the authorization guard
// ABOUTME: Tracks pending/active/terminated links; the transfer protocol itself is external
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vidpod.org

//! # Federation Gate
//!
//! Establishing or terminating a relationship with a peer pod is a
//! privileged action: the guard authenticates the caller before any of
//! these methods run. The handshake and content exchange with the peer
//! happen elsewhere; this module owns only the relationship ledger and
//! its state machine (absent -> pending -> active -> terminated).

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{PodRelationship, PodState};
use crate::pagination::Page;
use chrono::Utc;
use std::sync::Arc;
use url::Url;

/// Federation relationship service
#[derive(Clone)]
pub struct FederationService {
    database: Arc<Database>,
}

impl FederationService {
    #[must_use]
    pub const fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    /// Normalize a peer address to `host[:port]`.
    ///
    /// # Errors
    /// Returns a validation error unless the address is an http(s) URL
    /// with a host
    fn normalize_peer_address(peer_address: &str) -> AppResult<String> {
        let url = Url::parse(peer_address)
            .map_err(|e| AppError::validation(format!("Invalid peer address: {e}")))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(AppError::validation(
                "Peer address must use the http or https scheme",
            ));
        }

        let host = url
            .host_str()
            .ok_or_else(|| AppError::validation("Peer address is missing a host"))?;

        Ok(match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_owned(),
        })
    }

    /// Request a friendship with a peer pod: absent -> pending.
    ///
    /// A terminated relationship may be re-requested; a live one is a
    /// conflict.
    ///
    /// # Errors
    /// Returns a validation error for a malformed address or an existing
    /// live relationship
    pub async fn add_friend(&self, peer_address: &str) -> AppResult<PodRelationship> {
        let host = Self::normalize_peer_address(peer_address)?;
        let now = Utc::now();

        let pod = PodRelationship {
            host: host.clone(),
            state: PodState::Pending,
            created_at: now,
            updated_at: now,
        };

        self.database.insert_pod(&pod).await?;

        tracing::info!(peer = %host, "Friendship requested");

        // Re-read so a reset terminated link reports its original created_at
        self.database
            .get_pod(&host)
            .await?
            .ok_or_else(|| AppError::internal("Pod relationship vanished after insert"))
    }

    /// Peer accepted the request: pending -> active
    ///
    /// # Errors
    /// Returns `NotFound` when no pending relationship exists for the peer
    pub async fn accept_friend(&self, peer_address: &str) -> AppResult<()> {
        let host = Self::normalize_peer_address(peer_address)?;
        self.database
            .transition_pod(&host, PodState::Pending, PodState::Active, Utc::now())
            .await?;

        tracing::info!(peer = %host, "Friendship active");
        Ok(())
    }

    /// Quit an active friendship: active -> terminated
    ///
    /// # Errors
    /// Returns `NotFound` when no active relationship exists for the peer
    pub async fn quit_friend(&self, peer_address: &str) -> AppResult<()> {
        let host = Self::normalize_peer_address(peer_address)?;
        self.database
            .transition_pod(&host, PodState::Active, PodState::Terminated, Utc::now())
            .await?;

        tracing::info!(peer = %host, "Friendship terminated");
        Ok(())
    }

    /// List relationships in the order they were first requested
    ///
    /// # Errors
    /// Returns an error if the snapshot read fails
    pub async fn list(&self) -> AppResult<Page<PodRelationship>> {
        self.database.list_pods().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_peer_address() {
        assert_eq!(
            FederationService::normalize_peer_address("http://pod2.example.com:9000").unwrap(),
            "pod2.example.com:9000"
        );
        assert_eq!(
            FederationService::normalize_peer_address("https://pod2.example.com").unwrap(),
            "pod2.example.com"
        );
    }

    #[test]
    fn test_normalize_rejects_bad_addresses() {
        assert!(FederationService::normalize_peer_address("not a url").is_err());
        assert!(FederationService::normalize_peer_address("ftp://pod.example.com").is_err());
        assert!(FederationService::normalize_peer_address("http://").is_err());
    }
}
