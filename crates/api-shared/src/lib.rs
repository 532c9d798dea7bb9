//! # API Shared
//!
//! Shared utilities and definitions for the tracker APIs.
//!
//! Contains:
//! - JSON wire types with OpenAPI schemas (`wire` module)
//! - Shared services like `HealthService`
//! - Password hashing for staff sign-in
//!
//! Used by `api-rest` and the `tracker` CLI.

pub mod auth;
pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
