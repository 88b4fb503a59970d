use axum::{
	middleware,
	routing::{get, post},
	Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::prelude::*;
use campus_auth::handler as auth;
use campus_auth::middleware::require_auth;
use campus_registry::handler as registry;
use campus_registry::SharedRegistryCache;

async fn get_health() -> Json<serde_json::Value> {
	Json(json!({ "status": "ok", "version": campus_core::app::VERSION }))
}

pub fn init(state: App, cache: SharedRegistryCache) -> Router {
	let auth_router = Router::new()
		.route("/auth/validate-token", post(auth::post_validate_token))
		.route("/auth/validate-permission", post(auth::post_validate_permission))
		.layer(middleware::from_fn_with_state(state.clone(), require_auth))
		.with_state(state.clone());

	// Registry handlers get the cache alongside the app state
	let registry_router = Router::new()
		.route("/services", get(registry::get_services).post(registry::post_service))
		.route(
			"/services/{name}",
			get(registry::get_service).put(registry::put_service).delete(registry::delete_service),
		)
		.layer(middleware::from_fn_with_state(state.clone(), require_auth))
		.with_state((state.clone(), cache));

	let public_router = Router::new()
		.route("/auth/login", post(auth::post_login))
		.route("/auth/refresh", post(auth::post_refresh))
		.route("/health", get(get_health))
		.with_state(state);

	Router::new()
		.merge(public_router)
		.merge(auth_router)
		.merge(registry_router)
		.layer(TraceLayer::new_for_http())
}

// vim: ts=4
