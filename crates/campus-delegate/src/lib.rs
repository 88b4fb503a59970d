//! Delegated Auth Client
//!
//! Runs inside every dependent service. Converts an inbound bearer token
//! into a trust decision by calling the Core service's validation endpoints;
//! the dependent service never touches the credential store itself.
//!
//! Transport failure is a distinct outcome, never conflated with an
//! authorization decision: on timeout, connection refusal or DNS failure the
//! call resolves to [`TrustDecision::Unavailable`] and the dependent service
//! fails the inbound request (fail-closed).

pub mod guard;
pub mod table;

mod prelude;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;
use url::Url;

use crate::prelude::*;
use campus_types::types::UserView;

pub use guard::{require_remote_auth, require_remote_permission, RouteGuard};
pub use table::PermissionTable;

/// Outcome of a remote validation call
#[derive(Debug)]
pub enum TrustDecision {
	/// 2xx from Core: the decoded trust payload
	Authorized(UserView),
	/// Non-2xx from Core; status and detail are propagated verbatim
	Denied { status: u16, detail: String },
	/// Core could not be reached; reflects infrastructure health, not the
	/// caller's credentials
	Unavailable,
}

impl TrustDecision {
	/// Collapse the decision into a result for the request pipeline.
	/// `Unavailable` maps to a 503-equivalent error (fail-closed).
	pub fn into_result(self) -> CpResult<UserView> {
		match self {
			TrustDecision::Authorized(user) => Ok(user),
			TrustDecision::Denied { status, detail } => Err(Error::Remote { status, detail }),
			TrustDecision::Unavailable => Err(Error::Unavailable("core service".into())),
		}
	}
}

pub struct DelegateClient {
	core_url: Url,
	timeout: Duration,
}

impl DelegateClient {
	pub fn new(core_url: &str, timeout: Duration) -> CpResult<Self> {
		let core_url = Url::parse(core_url)
			.map_err(|err| Error::ConfigError(format!("invalid core service URL: {}", err)))?;

		Ok(Self { core_url, timeout })
	}

	/// `POST /auth/validate-token` with the caller's bearer token
	pub async fn validate_token(&self, token: &str) -> TrustDecision {
		self.call("/auth/validate-token", token, None).await
	}

	/// `POST /auth/validate-permission` with the caller's bearer token and
	/// the required (resource, action) pair
	pub async fn validate_permission(
		&self,
		token: &str,
		resource: &str,
		action: &str,
	) -> TrustDecision {
		let body = serde_json::json!({ "resource": resource, "action": action });
		self.call("/auth/validate-permission", token, Some(body)).await
	}

	async fn call(
		&self,
		path: &str,
		token: &str,
		body: Option<serde_json::Value>,
	) -> TrustDecision {
		let uri = format!("{}{}", self.core_url.as_str().trim_end_matches('/'), path);

		let payload = match &body {
			Some(value) => value.to_string(),
			None => String::new(),
		};

		let req = hyper::Request::builder()
			.method(hyper::Method::POST)
			.uri(&uri)
			.header(header::AUTHORIZATION, format!("Bearer {}", token))
			.header(header::CONTENT_TYPE, "application/json")
			.body(Full::new(Bytes::from(payload)));

		let req = match req {
			Ok(req) => req,
			Err(err) => {
				warn!("Failed to build delegation request for {}: {}", uri, err);
				return TrustDecision::Unavailable;
			}
		};

		// One independent connection per invocation; the outer request's own
		// timeout bounds the call. No retry at this layer.
		let connector = hyper_util::client::legacy::connect::HttpConnector::new();
		let client: Client<_, Full<Bytes>> = Client::builder(TokioExecutor::new()).build(connector);

		let response = match tokio::time::timeout(self.timeout, client.request(req)).await {
			Ok(Ok(response)) => response,
			Ok(Err(err)) => {
				warn!("Core service unreachable at {}: {}", uri, err);
				return TrustDecision::Unavailable;
			}
			Err(_) => {
				warn!("Core service timed out at {}", uri);
				return TrustDecision::Unavailable;
			}
		};

		let status = response.status();
		let bytes = match response.into_body().collect().await {
			Ok(collected) => collected.to_bytes(),
			Err(err) => {
				warn!("Failed to read delegation response from {}: {}", uri, err);
				return TrustDecision::Unavailable;
			}
		};

		if status.is_success() {
			match serde_json::from_slice::<UserView>(&bytes) {
				Ok(user) => TrustDecision::Authorized(user),
				Err(err) => {
					// A 2xx we cannot decode is treated like an unreachable
					// authority, not like a denial
					warn!("Malformed trust payload from {}: {}", uri, err);
					TrustDecision::Unavailable
				}
			}
		} else {
			let detail = serde_json::from_slice::<serde_json::Value>(&bytes)
				.ok()
				.and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from))
				.unwrap_or_else(|| "authorization rejected".to_string());

			TrustDecision::Denied { status: status.as_u16(), detail }
		}
	}
}


// vim: ts=4
