//! Permission Evaluator
//!
//! Flat allow-list semantics: a user is authorized for (resource, action)
//! iff one of their roles carries that exact permission. No partial matches,
//! no resource hierarchies, no deny-overrides-allow. Read-only against the
//! Credential Store and safe under concurrent invocation; the decision is
//! never cached, so role edits take effect on the next check.

use crate::prelude::*;
use campus_types::credential_adapter::CredentialAdapter;
use campus_types::types::UserView;

pub async fn authorize(
	credentials: &dyn CredentialAdapter,
	user: &UserView,
	resource: &str,
	action: &str,
) -> CpResult<bool> {
	// Superusers bypass the traversal entirely
	if user.is_superuser {
		return Ok(true);
	}

	for role in credentials.read_user_roles(user.id).await? {
		for permission in credentials.read_role_permissions(role.id).await? {
			if permission.resource.as_ref() == resource && permission.action.as_ref() == action {
				return Ok(true);
			}
		}
	}

	Ok(false)
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use campus_types::credential_adapter::{Permission, Role};
	use campus_types::types::RoleView;
	use std::collections::HashMap;
	use std::sync::Mutex;

	/// In-memory credential store for evaluator tests
	#[derive(Default)]
	struct StubCredentials {
		user_roles: Mutex<HashMap<i64, Vec<Role>>>,
		role_permissions: Mutex<HashMap<i64, Vec<Permission>>>,
	}

	impl StubCredentials {
		fn grant_role(&self, user_id: i64, role: Role) {
			self.user_roles.lock().unwrap().entry(user_id).or_default().push(role);
		}

		fn grant_permission(&self, role_id: i64, permission: Permission) {
			self.role_permissions.lock().unwrap().entry(role_id).or_default().push(permission);
		}
	}

	#[async_trait]
	impl CredentialAdapter for StubCredentials {
		async fn read_user_view(&self, _username: &str) -> CpResult<UserView> {
			Err(Error::NotFound)
		}

		async fn check_user_password(&self, _u: &str, _p: &str) -> CpResult<UserView> {
			Err(Error::InvalidCredentials)
		}

		async fn read_user_roles(&self, user_id: i64) -> CpResult<Vec<Role>> {
			Ok(self.user_roles.lock().unwrap().get(&user_id).cloned().unwrap_or_default())
		}

		async fn read_role_permissions(&self, role_id: i64) -> CpResult<Vec<Permission>> {
			Ok(self.role_permissions.lock().unwrap().get(&role_id).cloned().unwrap_or_default())
		}
	}

	fn user(id: i64, superuser: bool) -> UserView {
		UserView {
			id,
			username: "test".into(),
			email: "test@example.com".into(),
			is_active: true,
			is_superuser: superuser,
			roles: vec![RoleView { id: 1, name: "member".into() }],
		}
	}

	fn perm(id: i64, resource: &str, action: &str) -> Permission {
		Permission { id, resource: resource.into(), action: action.into() }
	}

	#[tokio::test]
	async fn test_superuser_bypasses_traversal() {
		// No roles or permissions set up at all - superuser is still allowed
		let store = StubCredentials::default();
		assert!(authorize(&store, &user(1, true), "anything", "whatever").await.unwrap());
	}

	#[tokio::test]
	async fn test_exact_match_required() {
		let store = StubCredentials::default();
		store.grant_role(1, Role { id: 10, name: "librarian".into() });
		store.grant_permission(10, perm(1, "book", "read"));

		let u = user(1, false);
		assert!(authorize(&store, &u, "book", "read").await.unwrap());
		assert!(!authorize(&store, &u, "book", "write").await.unwrap());
		assert!(!authorize(&store, &u, "books", "read").await.unwrap());
	}

	#[tokio::test]
	async fn test_no_roles_means_denied() {
		let store = StubCredentials::default();
		assert!(!authorize(&store, &user(1, false), "book", "read").await.unwrap());
	}

	#[tokio::test]
	async fn test_any_role_can_carry_the_permission() {
		let store = StubCredentials::default();
		store.grant_role(1, Role { id: 10, name: "reader".into() });
		store.grant_role(1, Role { id: 11, name: "editor".into() });
		store.grant_permission(11, perm(1, "book", "write"));

		assert!(authorize(&store, &user(1, false), "book", "write").await.unwrap());
	}

	#[tokio::test]
	async fn test_grant_flips_next_decision() {
		// Decisions are not cached: adding the permission changes the very
		// next call
		let store = StubCredentials::default();
		store.grant_role(1, Role { id: 10, name: "reader".into() });

		let u = user(1, false);
		assert!(!authorize(&store, &u, "post", "create").await.unwrap());

		store.grant_permission(10, perm(1, "post", "create"));
		assert!(authorize(&store, &u, "post", "create").await.unwrap());
	}
}

// vim: ts=4
