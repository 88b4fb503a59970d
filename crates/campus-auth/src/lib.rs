//! Authentication coordinator for the Core service.
//!
//! Orchestrates credential checks, token issuance and refresh, and exposes
//! the two validation primitives (`validate-token`, `validate-permission`)
//! that dependent services call remotely instead of keeping their own user
//! store.

pub mod handler;
pub mod middleware;
pub mod rbac;

mod prelude;

// vim: ts=4
