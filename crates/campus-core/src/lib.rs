//! Core application state and infrastructure for the Campus platform.
//!
//! Holds the process-wide [`app::AppState`], the [`token::TokenEngine`]
//! (issuance and validation of signed access/refresh tokens) and the
//! [`rate_limit::RateLimitManager`] guarding the authentication entry points.

pub mod app;
pub mod rate_limit;
pub mod token;

mod prelude;

pub use app::{App, AppState};

// vim: ts=4
