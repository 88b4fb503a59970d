//! Authentication endpoints
//!
//! `login` and `refresh` are the only unauthenticated entry points of the
//! Core service and sit behind the rate limiter. `validate-token` and
//! `validate-permission` are the remote validation primitives consumed by
//! dependent services; both are idempotent and side-effect-free.

use axum::{
	extract::{ConnectInfo, State},
	http::StatusCode,
	Json,
};
use serde::Deserialize;
use std::net::SocketAddr;

use crate::prelude::*;
use crate::rbac;
use campus_core::rate_limit::PenaltyReason;
use campus_core::token::TokenType;
use campus_types::extract::Auth;
use campus_types::types::{TokenPair, UserView};

/// # POST /auth/login
#[derive(Deserialize)]
pub struct LoginReq {
	username: String,
	password: String,
}

pub async fn post_login(
	State(app): State<App>,
	ConnectInfo(addr): ConnectInfo<SocketAddr>,
	Json(login): Json<LoginReq>,
) -> CpResult<(StatusCode, Json<TokenPair>)> {
	app.rate_limiter.check(&addr.ip())?;

	let user = app.credential_adapter.check_user_password(&login.username, &login.password).await;

	let user = match user {
		Ok(user) if user.is_active => user,
		_ => {
			// Unknown user, bad password and inactive user are reported
			// identically
			app.rate_limiter.penalize(&addr.ip(), PenaltyReason::AuthFailure, 1);
			tokio::time::sleep(std::time::Duration::from_secs(1)).await;
			return Err(Error::InvalidCredentials);
		}
	};

	let tokens = app.token_engine.issue(&user.username)?;
	app.rate_limiter.grant(&addr.ip(), 1);

	info!("User {} logged in", user.username);
	Ok((StatusCode::OK, Json(tokens)))
}

/// # POST /auth/refresh
#[derive(Deserialize)]
pub struct RefreshReq {
	refresh_token: String,
}

pub async fn post_refresh(
	State(app): State<App>,
	ConnectInfo(addr): ConnectInfo<SocketAddr>,
	Json(req): Json<RefreshReq>,
) -> CpResult<(StatusCode, Json<TokenPair>)> {
	app.rate_limiter.check(&addr.ip())?;

	// An access token presented here fails exactly like a forged one
	let claims = app.token_engine.validate(&req.refresh_token, TokenType::Refresh)?;
	let tokens = app.token_engine.issue(&claims.sub)?;

	debug!("Rotated token pair for {}", claims.sub);
	Ok((StatusCode::OK, Json(tokens)))
}

/// # POST /auth/validate-token
///
/// Used by dependent services to turn a bearer token into a trust payload.
/// The middleware has already validated the token and loaded the user.
pub async fn post_validate_token(Auth(auth): Auth) -> CpResult<(StatusCode, Json<UserView>)> {
	Ok((StatusCode::OK, Json(auth.user)))
}

/// # POST /auth/validate-permission
#[derive(Deserialize)]
pub struct ValidatePermissionReq {
	#[serde(default)]
	resource: Option<String>,
	#[serde(default)]
	action: Option<String>,
}

pub async fn post_validate_permission(
	State(app): State<App>,
	Auth(auth): Auth,
	Json(req): Json<ValidatePermissionReq>,
) -> CpResult<(StatusCode, Json<UserView>)> {
	let (resource, action) = match (req.resource.as_deref(), req.action.as_deref()) {
		(Some(resource), Some(action)) if !resource.is_empty() && !action.is_empty() => {
			(resource, action)
		}
		_ => return Err(Error::ValidationError("resource and action are required".into())),
	};

	if !rbac::authorize(app.credential_adapter.as_ref(), &auth.user, resource, action).await? {
		debug!(
			"Denied {} for ({}, {})",
			auth.user.username, resource, action
		);
		return Err(Error::PermissionDenied);
	}

	Ok((StatusCode::OK, Json(auth.user)))
}

// vim: ts=4
