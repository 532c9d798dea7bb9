//! # API REST
//!
//! HTTP surface of the patient tracker.
//!
//! Handles:
//! - public pages: the patient list and export, report intake, corrections, district lookup
//! - staff pages behind a session login: the report queue and the review workflow
//! - OpenAPI/Swagger documentation
//!
//! Responses are JSON; form posts redirect with `303 See Other`. Uses `api-shared` for the
//! wire types and `tracker-core` for storage and validation.

#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod router;
pub mod session;
pub mod state;
pub mod views;

pub use config::RestConfig;
pub use error::ApiError;
pub use router::router;
pub use state::AppState;

#[cfg(test)]
mod tests;
