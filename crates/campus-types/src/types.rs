//! Common wire and value types.

use serde::{Deserialize, Serialize};

/// Unix timestamp in seconds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Self {
		let secs = std::time::SystemTime::now()
			.duration_since(std::time::UNIX_EPOCH)
			.map(|d| d.as_secs() as i64)
			.unwrap_or(0);
		Self(secs)
	}

	/// A timestamp `secs` seconds in the future
	pub fn from_now(secs: i64) -> Self {
		Self(Self::now().0 + secs)
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Access/refresh token pair returned by login and refresh
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TokenPair {
	pub access_token: Box<str>,
	pub refresh_token: Box<str>,
	pub token_type: Box<str>,
}

/// Role reference carried in the trust payload
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RoleView {
	pub id: i64,
	pub name: Box<str>,
}

/// The trust payload dependent services act on.
///
/// Returned by `validate-token` and `validate-permission`; carries no
/// permission snapshot so role edits take effect on the next check.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct UserView {
	pub id: i64,
	pub username: Box<str>,
	pub email: Box<str>,
	pub is_active: bool,
	pub is_superuser: bool,
	pub roles: Vec<RoleView>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_timestamp_ordering() {
		let now = Timestamp::now();
		let later = Timestamp::from_now(60);
		assert!(now < later);
		assert!(Timestamp(0) < now);
	}

	#[test]
	fn test_user_view_roundtrip() {
		let view = UserView {
			id: 7,
			username: "alice".into(),
			email: "alice@example.com".into(),
			is_active: true,
			is_superuser: false,
			roles: vec![RoleView { id: 1, name: "librarian".into() }],
		};
		let json = serde_json::to_string(&view).unwrap();
		let back: UserView = serde_json::from_str(&json).unwrap();
		assert_eq!(back.username.as_ref(), "alice");
		assert_eq!(back.roles[0].name.as_ref(), "librarian");
	}
}

// vim: ts=4
