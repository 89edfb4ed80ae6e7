// ABOUTME: Main library entry point for the Vidpod federated video pod
// ABOUTME: Identity, token issuance, ownership enforcement, and federation gating
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vidpod.org

#![deny(unsafe_code)]

//! # Vidpod
//!
//! The identity and access-control core of a federated video-sharing pod.
//! Each pod manages its own accounts and media, issues delegated bearer
//! tokens, enforces per-resource ownership, and gates federation actions
//! with peer pods.
//!
//! ## Architecture
//!
//! - **`oauth2`**: client registry and token endpoint (password and
//!   refresh grants, rotation, revocation)
//! - **`middleware`**: the authorization guard every protected call
//!   passes through before business logic runs
//! - **`users`** / **`videos`** / **`federation`**: the user directory,
//!   the video ownership ledger, and the pod relationship state machine
//! - **`database`**: SQLite-backed single source of truth
//! - **`routes`**: framework-free handlers a transport layer mounts
//!
//! The file storage pipeline, the peer-to-peer transfer protocol, and the
//! HTTP framework are external collaborators consumed through the narrow
//! interfaces in this crate.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use vidpod::config::ServerConfig;
//! use vidpod::resources::ServerResources;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let resources = ServerResources::new(config).await?;
//!
//!     // A fresh pod gets a default client and a root administrator
//!     if let Some(credentials) = resources.bootstrap().await? {
//!         println!("client id: {}", credentials.client_id);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constants;
pub mod crypto;
pub mod database;
pub mod errors;
pub mod federation;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod oauth2;
pub mod pagination;
pub mod resources;
pub mod routes;
pub mod users;
pub mod videos;
