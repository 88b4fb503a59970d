//! Shared test harness
//!
//! Builds a full application over temporary SQLite databases and exposes a
//! small request helper. Connection info is mocked so rate limiting sees a
//! stable client address.

use axum::extract::connect_info::MockConnectInfo;
use axum::http::StatusCode;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::util::ServiceExt;

use campus_core::app::{App, AppState};
use campus_core::rate_limit::{RateLimitConfig, RateLimitManager};
use campus_core::token::TokenEngine;
use campus_credential_adapter_sqlite::CredentialAdapterSqlite;
use campus_registry::{RegistryCache, SharedRegistryCache};
use campus_registry_adapter_sqlite::RegistryAdapterSqlite;
use campus_server::routes;

pub struct TestEnv {
	pub router: Router,
	pub credentials: Arc<CredentialAdapterSqlite>,
	_tmp: TempDir,
}

/// App with rate limiting effectively disabled (most tests)
pub async fn test_env() -> TestEnv {
	test_env_with_limit(1000).await
}

/// App with a specific login rate limit per minute
pub async fn test_env_with_limit(max_attempts: u32) -> TestEnv {
	let tmp = TempDir::new().unwrap();
	let credentials = Arc::new(
		CredentialAdapterSqlite::new(tmp.path().join("credentials.db")).await.unwrap(),
	);
	let registry =
		Arc::new(RegistryAdapterSqlite::new(tmp.path().join("registry.db")).await.unwrap());

	let token_engine = TokenEngine::new("test-secret", 1800, 604_800).unwrap();
	let rate_limiter = Arc::new(RateLimitManager::new(RateLimitConfig {
		max_attempts: NonZeroU32::new(max_attempts).unwrap(),
		window: Duration::from_secs(60),
		max_tracked_ips: 1000,
	}));

	let cache: SharedRegistryCache = Arc::new(RegistryCache::new(Duration::from_secs(300)));

	let app: App = Arc::new(AppState {
		credential_adapter: credentials.clone(),
		registry_adapter: registry,
		token_engine,
		rate_limiter,
	});

	let router = routes::init(app, cache)
		.layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))));

	TestEnv { router, credentials, _tmp: tmp }
}

impl TestEnv {
	/// Fire a single request; returns status and parsed JSON body
	/// (`null` for empty bodies).
	pub async fn request(
		&self,
		method: &str,
		uri: &str,
		token: Option<&str>,
		body: Option<Value>,
	) -> (StatusCode, Value) {
		let mut builder = axum::http::Request::builder().method(method).uri(uri);
		if let Some(token) = token {
			builder = builder.header("authorization", format!("Bearer {}", token));
		}

		let request = match body {
			Some(body) => builder
				.header("content-type", "application/json")
				.body(axum::body::Body::from(body.to_string()))
				.unwrap(),
			None => builder.body(axum::body::Body::empty()).unwrap(),
		};

		let response = self.router.clone().oneshot(request).await.unwrap();
		let status = response.status();
		let bytes = response.into_body().collect().await.unwrap().to_bytes();
		let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

		(status, value)
	}

	/// Login and return the (access, refresh) pair
	pub async fn login(&self, username: &str, password: &str) -> (String, String) {
		let (status, body) = self
			.request(
				"POST",
				"/auth/login",
				None,
				Some(json!({ "username": username, "password": password })),
			)
			.await;
		assert_eq!(status, StatusCode::OK, "login failed: {}", body);

		(
			body["access_token"].as_str().unwrap().to_string(),
			body["refresh_token"].as_str().unwrap().to_string(),
		)
	}
}

// vim: ts=4
