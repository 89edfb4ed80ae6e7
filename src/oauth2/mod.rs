// ABOUTME: OAuth2-style token issuance for the pod
// ABOUTME: Client registry plus the password and refresh_token grant flows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vidpod.org

//! # Token Issuance
//!
//! A caller authenticates its application through the client registry and
//! its end user through the resource-owner password grant; the resulting
//! opaque bearer pair is what every protected operation on the pod
//! requires. Refresh rotation extends a session without re-presenting the
//! password.

pub mod client_registration;
pub mod endpoints;
pub mod models;

pub use client_registration::{ClientRegistrationManager, ClientRegistrationResponse};
pub use endpoints::OAuth2TokenService;
pub use models::{TokenRequest, TokenResponse};
