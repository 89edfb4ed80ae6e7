// ABOUTME: Framework-free request handlers for the pod's HTTP-style surface
// ABOUTME: DTOs in, DTOs out; the HTTP framework itself is an external collaborator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vidpod.org

//! # Route Handlers
//!
//! Thin wrappers that pair each public operation with its authorization
//! requirement and its wire DTOs. A transport layer maps these calls onto
//! paths and verbs and turns [`crate::errors::AppError::http_status`]
//! into response codes; nothing in here depends on any HTTP framework.

pub mod auth;
pub mod pods;
pub mod users;
pub mod videos;

pub use auth::AuthRoutes;
pub use pods::{FriendRequest, PodRoutes};
pub use users::{CreateUserRequest, UpdatePasswordRequest, UserResponse, UserRoutes};
pub use videos::{UploadVideoRequest, VideoResponse, VideoRoutes};
