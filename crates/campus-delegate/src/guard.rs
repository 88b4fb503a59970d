//! Route guard middleware for dependent services
//!
//! Forwards the inbound bearer token to the Core service and maps the
//! remote decision onto the local response: remote status codes pass
//! through verbatim, transport failure becomes 503 (fail-closed), and a
//! successful validation injects the same [`Auth`] context the Core service
//! uses so handlers are written identically on both sides.

use axum::{
	body::Body,
	extract::State,
	http::{header, Request},
	middleware::Next,
	response::Response,
};
use std::sync::Arc;

use crate::prelude::*;
use crate::{DelegateClient, PermissionTable};
use campus_types::credential_adapter::AuthCtx;
use campus_types::extract::Auth;

#[derive(Clone)]
pub struct RouteGuard {
	pub client: Arc<DelegateClient>,
	pub table: Arc<PermissionTable>,
}

impl RouteGuard {
	pub fn new(client: Arc<DelegateClient>, table: Arc<PermissionTable>) -> Self {
		Self { client, table }
	}
}

fn bearer_token(req: &Request<Body>) -> CpResult<&str> {
	let auth_header = req
		.headers()
		.get(header::AUTHORIZATION)
		.and_then(|h| h.to_str().ok())
		.ok_or(Error::Unauthorized)?;

	auth_header.strip_prefix("Bearer ").ok_or(Error::Unauthorized)
}

/// Authentication only: any valid token passes
pub async fn require_remote_auth(
	State(guard): State<RouteGuard>,
	mut req: Request<Body>,
	next: Next,
) -> CpResult<Response> {
	let token = bearer_token(&req)?;
	let user = guard.client.validate_token(token).await.into_result()?;

	req.extensions_mut().insert(Auth(AuthCtx { user }));

	Ok(next.run(req).await)
}

/// Authentication plus a permission check for the named operation.
/// The operation's (resource, action) pair comes from the static table.
pub async fn require_remote_permission(
	State((guard, op)): State<(RouteGuard, &'static str)>,
	mut req: Request<Body>,
	next: Next,
) -> CpResult<Response> {
	let (resource, action) = guard.table.lookup(op)?;
	let token = bearer_token(&req)?;

	let user = guard.client.validate_permission(token, resource, action).await.into_result()?;

	req.extensions_mut().insert(Auth(AuthCtx { user }));

	Ok(next.run(req).await)
}

// vim: ts=4
