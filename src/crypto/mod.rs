// ABOUTME: Credential hashing and opaque token generation
// ABOUTME: bcrypt for user passwords, argon2 for client secrets, ring for token entropy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vidpod.org

//! Credential primitives shared by the token service and the user
//! directory. User passwords use bcrypt; client secrets use argon2;
//! token values are 256 random bits, base64url-encoded.

use crate::constants::limits::TOKEN_ENTROPY_BYTES;
use crate::errors::{AppError, AppResult};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use ring::rand::{SecureRandom, SystemRandom};
use uuid::Uuid;

/// Hash a user password with bcrypt
///
/// # Errors
/// Returns an error if bcrypt fails (e.g. cost parameter rejected)
pub fn hash_password(password: &str) -> AppResult<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
}

/// Verify a user password against its stored bcrypt hash.
///
/// bcrypt verification is CPU-bound, so it runs on the blocking pool
/// rather than stalling the async executor.
///
/// # Errors
/// Returns an error if the blocking task is cancelled or the stored hash
/// is not a valid bcrypt string.
pub async fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(&password, &password_hash))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Password verification error: {e}")))
}

/// Hash a client secret with argon2
///
/// # Errors
/// Returns an error if argon2 hashing fails
pub fn hash_client_secret(secret: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("Client secret hashing failed: {e}")))
}

/// Verify a client secret against its stored argon2 hash
///
/// An unparsable stored hash counts as a failed verification; the caller
/// only learns that authentication failed.
#[must_use]
pub fn verify_client_secret(secret: &str, secret_hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(secret_hash) else {
        tracing::error!("Stored client secret hash is not a valid argon2 string");
        return false;
    };

    Argon2::default()
        .verify_password(secret.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Generate an opaque token value: 256 random bits, base64url without padding
///
/// # Errors
/// Returns an error if the system random source fails
pub fn generate_token_value() -> AppResult<String> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; TOKEN_ENTROPY_BYTES];
    rng.fill(&mut bytes)
        .map_err(|_| AppError::internal("System random source failed"))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Generate a public client identifier
#[must_use]
pub fn generate_client_id() -> String {
    format!("vidpod-{}", Uuid::new_v4().simple())
}

/// Generate a high-entropy client secret
///
/// # Errors
/// Returns an error if the system random source fails
pub fn generate_client_secret() -> AppResult<String> {
    generate_token_value()
}
