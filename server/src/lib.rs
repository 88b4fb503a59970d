//! Campus Core server
//!
//! The single source of truth for identity, RBAC decisions and the service
//! registry. Dependent services hold no credential data; they turn bearer
//! tokens into trust payloads by calling this server's validation endpoints.

#![forbid(unsafe_code)]

pub mod bootstrap;
pub mod config;
pub mod routes;

pub mod prelude;

// vim: ts=4
