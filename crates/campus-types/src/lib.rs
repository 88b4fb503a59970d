//! Shared types, adapter traits, and core utilities for the Campus platform.
//!
//! This crate contains the foundational types shared between the Core server
//! and all adapter implementations. Extracting these into a separate crate
//! allows adapter crates to compile in parallel with the feature modules.

pub mod credential_adapter;
pub mod error;
pub mod extract;
pub mod prelude;
pub mod registry_adapter;
pub mod types;

// vim: ts=4
