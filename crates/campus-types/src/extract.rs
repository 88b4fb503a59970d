//! Custom extractors for Campus-specific request data

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::credential_adapter::AuthCtx;
use crate::prelude::*;

// Auth //
//******//
/// Extracts the authenticated user context inserted by the auth middleware.
/// Rejects with `Unauthorized` when the middleware did not run or failed.
#[derive(Debug, Clone)]
pub struct Auth(pub AuthCtx);

impl<S> FromRequestParts<S> for Auth
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		if let Some(auth) = parts.extensions.get::<Auth>().cloned() {
			Ok(auth)
		} else {
			Err(Error::Unauthorized)
		}
	}
}

// Superuser //
//***********//
/// Like [`Auth`], but rejects with `PermissionDenied` unless the
/// authenticated user is a superuser. Used to gate registry writes.
#[derive(Debug, Clone)]
pub struct Superuser(pub AuthCtx);

impl<S> FromRequestParts<S> for Superuser
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		let auth = parts.extensions.get::<Auth>().cloned().ok_or(Error::Unauthorized)?;
		if auth.0.user.is_superuser {
			Ok(Superuser(auth.0))
		} else {
			Err(Error::PermissionDenied)
		}
	}
}

// vim: ts=4
