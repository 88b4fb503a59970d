//! Bearer-token middleware
//!
//! Validates the access token, loads the subject from the Credential Store
//! and injects an [`Auth`] context into the request extensions. A subject
//! that no longer exists or was deactivated fails the same way an invalid
//! token does.

use axum::{
	body::Body,
	extract::State,
	http::{header, Request},
	middleware::Next,
	response::Response,
};

use crate::prelude::*;
use campus_core::token::TokenType;
use campus_types::credential_adapter::AuthCtx;
use campus_types::extract::Auth;

fn bearer_token(req: &Request<Body>) -> CpResult<&str> {
	let auth_header = req
		.headers()
		.get(header::AUTHORIZATION)
		.and_then(|h| h.to_str().ok())
		.ok_or(Error::Unauthorized)?;

	auth_header.strip_prefix("Bearer ").ok_or(Error::Unauthorized)
}

pub async fn require_auth(
	State(app): State<App>,
	mut req: Request<Body>,
	next: Next,
) -> CpResult<Response> {
	let token = bearer_token(&req)?;
	let claims = app.token_engine.validate(token, TokenType::Access)?;

	let user = app
		.credential_adapter
		.read_user_view(&claims.sub)
		.await
		.map_err(|_| Error::Unauthorized)?;

	if !user.is_active {
		return Err(Error::Unauthorized);
	}

	req.extensions_mut().insert(Auth(AuthCtx { user }));

	Ok(next.run(req).await)
}

// vim: ts=4
