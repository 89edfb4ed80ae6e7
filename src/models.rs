// ABOUTME: Core domain models for the pod: users, videos, OAuth clients, tokens, pod links
// ABOUTME: Pure data structures with constructors; persistence lives in the database module
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vidpod.org

//! # Domain Models
//!
//! The identity core of the pod revolves around five records: the
//! [`OAuthClient`] that authenticates the calling application, the
//! [`User`] account, the [`BearerToken`] pair binding the two, the
//! [`Video`] ledger entry owned by exactly one user, and the
//! [`PodRelationship`] describing a federation link to a peer pod.

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// User role for the permission system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Pod administrator, passes every ownership check
    Admin,
    /// Regular account
    User,
}

impl UserRole {
    /// Database representation of the role
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Whether this role passes ownership checks on any resource
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(anyhow!("Unknown user role: {other}")),
        }
    }
}

/// A user account on this pod
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Unique, case-sensitive username
    pub username: String,
    /// bcrypt hash of the password; the plaintext is never stored
    pub password_hash: String,
    /// Role for the permission system
    pub role: UserRole,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh id and the current timestamp
    #[must_use]
    pub fn new(username: String, password_hash: String, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            role,
            created_at: Utc::now(),
        }
    }
}

/// A video ledger entry, bound to exactly one authoring user
#[derive(Debug, Clone)]
pub struct Video {
    /// Unique video identifier
    pub id: Uuid,
    /// Owning user; fixed at creation, no reassignment operation exists
    pub author_id: Uuid,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Ordered tag list
    pub tags: Vec<String>,
    /// Reference to the stored artifact (storage pipeline is external)
    pub filename: String,
    /// When the record was created
    pub created_at: DateTime<Utc>,
}

impl Video {
    /// Create a new video record owned by `author_id`
    #[must_use]
    pub fn new(
        author_id: Uuid,
        name: String,
        description: String,
        tags: Vec<String>,
        filename: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            name,
            description,
            tags,
            filename,
            created_at: Utc::now(),
        }
    }
}

/// An OAuth client identity, authenticating the calling application
///
/// Provisioned once; there is no update operation.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    /// Internal record id
    pub id: Uuid,
    /// Public client identifier presented on every token request
    pub client_id: String,
    /// argon2 hash of the client secret
    pub client_secret_hash: String,
    /// Grant types this client may use
    pub grant_types: Vec<String>,
    /// When the client was provisioned
    pub created_at: DateTime<Utc>,
}

impl OAuthClient {
    /// Whether the client is allowed to use the given grant type
    #[must_use]
    pub fn allows_grant(&self, grant_type: &str) -> bool {
        self.grant_types.iter().any(|g| g == grant_type)
    }
}

/// A bearer token pair bound to one (client, user) pair
#[derive(Debug, Clone)]
pub struct BearerToken {
    /// Opaque access token value (primary key of the token store)
    pub access_token: String,
    /// Opaque refresh token value
    pub refresh_token: String,
    /// Owning user; must always resolve to a live account
    pub user_id: Uuid,
    /// Issuing client
    pub client_id: String,
    /// When the pair was issued
    pub issued_at: DateTime<Utc>,
    /// When the access token stops validating
    pub access_expires_at: DateTime<Utc>,
    /// When the refresh token stops rotating
    pub refresh_expires_at: DateTime<Utc>,
    /// Set on logout, rotation, or owner deletion
    pub revoked: bool,
}

impl BearerToken {
    /// Whether the access token is past its expiry at `now`
    #[must_use]
    pub fn is_access_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.access_expires_at
    }

    /// Whether the refresh token is past its expiry at `now`
    #[must_use]
    pub fn is_refresh_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.refresh_expires_at
    }
}

/// State of a federation link with a peer pod
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PodState {
    /// Friendship requested, not yet accepted by the peer
    Pending,
    /// Link is live; metadata exchange is permitted
    Active,
    /// Link was quit; no further exchange
    Terminated,
}

impl PodState {
    /// Database representation of the state
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Terminated => "terminated",
        }
    }
}

impl FromStr for PodState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "terminated" => Ok(Self::Terminated),
            other => Err(anyhow!("Unknown pod relationship state: {other}")),
        }
    }
}

/// A federation relationship between this pod and a peer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodRelationship {
    /// Normalized peer address (scheme + host + port)
    pub host: String,
    /// Current state of the link
    pub state: PodState,
    /// When the relationship was first requested
    pub created_at: DateTime<Utc>,
    /// Last state transition
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!(UserRole::Admin.as_str(), "admin");
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::User.is_admin());
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_token_expiry_windows() {
        let now = Utc::now();
        let token = BearerToken {
            access_token: "a".into(),
            refresh_token: "r".into(),
            user_id: Uuid::new_v4(),
            client_id: "c".into(),
            issued_at: now,
            access_expires_at: now + chrono::Duration::hours(1),
            refresh_expires_at: now + chrono::Duration::days(30),
            revoked: false,
        };
        assert!(!token.is_access_expired(now));
        assert!(token.is_access_expired(now + chrono::Duration::hours(2)));
        assert!(!token.is_refresh_expired(now + chrono::Duration::hours(2)));
        assert!(token.is_refresh_expired(now + chrono::Duration::days(31)));
    }

    #[test]
    fn test_client_grant_allow_list() {
        let client = OAuthClient {
            id: Uuid::new_v4(),
            client_id: "cid".into(),
            client_secret_hash: "hash".into(),
            grant_types: vec!["password".into(), "refresh_token".into()],
            created_at: Utc::now(),
        };
        assert!(client.allows_grant("password"));
        assert!(!client.allows_grant("client_credentials"));
    }
}
