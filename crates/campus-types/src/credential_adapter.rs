//! Adapter that owns User, Role and Permission records.
//!
//! The Credential Store is the only component allowed to touch credential
//! rows; everything else consumes it through this trait. All operations are
//! read-only except password verification, which is read-only too but runs
//! the hash comparison.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::prelude::*;
use crate::types::UserView;

/// A role: a named group of permissions, shared by many users
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Role {
	pub id: i64,
	pub name: Box<str>,
}

/// Atomic unit of authorization: an exact (resource, action) pair.
/// No wildcards, no hierarchy.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Permission {
	pub id: i64,
	pub resource: Box<str>,
	pub action: Box<str>,
}

/// Context struct for an authenticated user, injected into request extensions
#[derive(Clone, Debug)]
pub struct AuthCtx {
	pub user: UserView,
}

#[async_trait]
pub trait CredentialAdapter: Send + Sync {
	/// Load a user with role names by username. `Err(NotFound)` if absent.
	async fn read_user_view(&self, username: &str) -> CpResult<UserView>;

	/// Verify a password against the stored hash.
	///
	/// Fails with `InvalidCredentials` on unknown username or hash mismatch,
	/// without distinguishing the two. Does NOT check `is_active` - that is
	/// the coordinator's decision.
	async fn check_user_password(&self, username: &str, password: &str) -> CpResult<UserView>;

	/// Roles granted to a user (order irrelevant)
	async fn read_user_roles(&self, user_id: i64) -> CpResult<Vec<Role>>;

	/// Permissions granted to a role (order irrelevant)
	async fn read_role_permissions(&self, role_id: i64) -> CpResult<Vec<Permission>>;
}

// vim: ts=4
