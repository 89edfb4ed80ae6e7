// ABOUTME: Request middleware for the pod core
// ABOUTME: Bearer authentication and capability-based authorization

pub mod auth;

pub use auth::{AuthGuard, Capability};
