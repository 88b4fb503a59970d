//! Delegation contract tests against a stub Core service.
//!
//! The stub speaks the same wire format as the real Core: 2xx with a
//! UserView body, non-2xx with `{"detail": ...}`. Network failure is
//! simulated with a refused connection and with an endpoint that never
//! answers within the client timeout.

use axum::{
	http::{header, HeaderMap, StatusCode},
	routing::post,
	Json, Router,
};
use serde_json::json;
use std::time::Duration;

use campus_delegate::{DelegateClient, TrustDecision};

fn user_body() -> serde_json::Value {
	json!({
		"id": 1,
		"username": "alice",
		"email": "alice@example.com",
		"is_active": true,
		"is_superuser": false,
		"roles": [{ "id": 2, "name": "librarian" }]
	})
}

fn token_of(headers: &HeaderMap) -> Option<String> {
	headers
		.get(header::AUTHORIZATION)
		.and_then(|h| h.to_str().ok())
		.and_then(|h| h.strip_prefix("Bearer "))
		.map(String::from)
}

async fn spawn_stub_core() -> String {
	let app = Router::new()
		.route(
			"/auth/validate-token",
			post(|headers: HeaderMap| async move {
				match token_of(&headers).as_deref() {
					Some("good") => (StatusCode::OK, Json(user_body())),
					_ => (
						StatusCode::UNAUTHORIZED,
						Json(json!({ "detail": "invalid or expired token" })),
					),
				}
			}),
		)
		.route(
			"/auth/validate-permission",
			post(|headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
				if token_of(&headers).as_deref() != Some("good") {
					return (
						StatusCode::UNAUTHORIZED,
						Json(json!({ "detail": "invalid or expired token" })),
					);
				}
				if body.get("resource").and_then(|r| r.as_str()) == Some("book") {
					(StatusCode::OK, Json(user_body()))
				} else {
					(StatusCode::FORBIDDEN, Json(json!({ "detail": "not enough permissions" })))
				}
			}),
		)
		.route(
			"/slow/auth/validate-token",
			post(|| async {
				tokio::time::sleep(Duration::from_secs(30)).await;
				StatusCode::OK
			}),
		);

	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	tokio::spawn(async move {
		axum::serve(listener, app).await.unwrap();
	});

	format!("http://{}", addr)
}

#[tokio::test]
async fn test_valid_token_is_authorized() {
	let url = spawn_stub_core().await;
	let client = DelegateClient::new(&url, Duration::from_secs(5)).unwrap();

	match client.validate_token("good").await {
		TrustDecision::Authorized(user) => {
			assert_eq!(user.username.as_ref(), "alice");
			assert_eq!(user.roles[0].name.as_ref(), "librarian");
		}
		other => panic!("expected Authorized, got {:?}", other),
	}
}

#[tokio::test]
async fn test_denial_propagates_status_and_detail_verbatim() {
	let url = spawn_stub_core().await;
	let client = DelegateClient::new(&url, Duration::from_secs(5)).unwrap();

	match client.validate_token("forged").await {
		TrustDecision::Denied { status, detail } => {
			assert_eq!(status, 401);
			assert_eq!(detail, "invalid or expired token");
		}
		other => panic!("expected Denied, got {:?}", other),
	}

	match client.validate_permission("good", "post", "create").await {
		TrustDecision::Denied { status, detail } => {
			assert_eq!(status, 403);
			assert_eq!(detail, "not enough permissions");
		}
		other => panic!("expected Denied, got {:?}", other),
	}
}

#[tokio::test]
async fn test_permission_grant_returns_payload() {
	let url = spawn_stub_core().await;
	let client = DelegateClient::new(&url, Duration::from_secs(5)).unwrap();

	match client.validate_permission("good", "book", "read").await {
		TrustDecision::Authorized(user) => assert_eq!(user.id, 1),
		other => panic!("expected Authorized, got {:?}", other),
	}
}

#[tokio::test]
async fn test_refused_connection_is_unavailable_not_denied() {
	// Nothing listens on this port; the failure reflects infrastructure
	// health and must never look like a credential problem
	let client = DelegateClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();

	match client.validate_token("good").await {
		TrustDecision::Unavailable => {}
		other => panic!("expected Unavailable, got {:?}", other),
	}
}

#[tokio::test]
async fn test_timeout_is_unavailable() {
	let url = spawn_stub_core().await;
	let client = DelegateClient::new(&format!("{}/slow", url), Duration::from_millis(200)).unwrap();

	match client.validate_token("good").await {
		TrustDecision::Unavailable => {}
		other => panic!("expected Unavailable, got {:?}", other),
	}
}

mod guard {
	//! Route guard middleware wired into a dependent-service router

	use super::*;
	use axum::body::Body;
	use axum::http::Request;
	use axum::{middleware, routing::get, Router};
	use http_body_util::BodyExt;
	use std::sync::Arc;
	use tower::util::ServiceExt;

	use campus_delegate::{
		require_remote_auth, require_remote_permission, PermissionTable, RouteGuard,
	};
	use campus_types::extract::Auth;

	async fn whoami(Auth(auth): Auth) -> String {
		auth.user.username.to_string()
	}

	fn dependent_service(guard: RouteGuard) -> Router {
		Router::new()
			.route(
				"/books",
				get(whoami).layer(middleware::from_fn_with_state(
					(guard.clone(), "list_books"),
					require_remote_permission,
				)),
			)
			.route(
				"/me",
				get(whoami).layer(middleware::from_fn_with_state(guard, require_remote_auth)),
			)
	}

	async fn guard_for(core_url: &str) -> RouteGuard {
		let client = Arc::new(DelegateClient::new(core_url, Duration::from_secs(2)).unwrap());
		let table = Arc::new(PermissionTable::new(&[("list_books", "book", "read")]));
		table.verify_complete(&["list_books"]).unwrap();
		RouteGuard::new(client, table)
	}

	async fn fetch(router: &Router, path: &str, token: &str) -> (u16, String) {
		let request = Request::builder()
			.uri(path)
			.header(header::AUTHORIZATION, format!("Bearer {}", token))
			.body(Body::empty())
			.unwrap();

		let response = router.clone().oneshot(request).await.unwrap();
		let status = response.status().as_u16();
		let bytes = response.into_body().collect().await.unwrap().to_bytes();
		(status, String::from_utf8_lossy(&bytes).into_owned())
	}

	#[tokio::test]
	async fn test_guard_injects_auth_context() {
		let url = spawn_stub_core().await;
		let router = dependent_service(guard_for(&url).await);

		let (status, body) = fetch(&router, "/me", "good").await;
		assert_eq!(status, 200);
		assert_eq!(body, "alice");

		// The permission route resolves (book, read) from the table
		let (status, body) = fetch(&router, "/books", "good").await;
		assert_eq!(status, 200);
		assert_eq!(body, "alice");
	}

	#[tokio::test]
	async fn test_guard_passes_remote_denial_through() {
		let url = spawn_stub_core().await;
		let router = dependent_service(guard_for(&url).await);

		let (status, body) = fetch(&router, "/me", "forged").await;
		assert_eq!(status, 401);
		assert_eq!(body, r#"{"detail":"invalid or expired token"}"#);
	}

	#[tokio::test]
	async fn test_guard_fails_closed_when_core_is_down() {
		let router = dependent_service(guard_for("http://127.0.0.1:9").await);

		let (status, body) = fetch(&router, "/books", "good").await;
		assert_eq!(status, 503);
		assert_eq!(body, r#"{"detail":"core service unavailable"}"#);
	}
}

// vim: ts=4
