//! Service registry endpoints
//!
//! Reads are open to any authenticated caller and go through the versioned
//! TTL cache; writes are superuser-only, go straight to the store and
//! invalidate the cache.

use axum::{
	extract::{Path, Query, State},
	http::StatusCode,
	Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::prelude::*;
use crate::SharedRegistryCache;
use campus_types::extract::{Auth, Superuser};
use campus_types::registry_adapter::{ServiceCreate, ServiceEntry, ServiceUpdate};

const DEFAULT_LIMIT: i64 = 100;

/// # GET /services
#[derive(Deserialize)]
pub struct ListQuery {
	#[serde(default)]
	skip: i64,
	#[serde(default = "default_limit")]
	limit: i64,
}

fn default_limit() -> i64 {
	DEFAULT_LIMIT
}

pub async fn get_services(
	State((app, cache)): State<(App, SharedRegistryCache)>,
	Auth(_auth): Auth,
	Query(query): Query<ListQuery>,
) -> CpResult<(StatusCode, Json<Arc<Vec<ServiceEntry>>>)> {
	if let Some(services) = cache.get_list(query.skip, query.limit) {
		return Ok((StatusCode::OK, Json(services)));
	}

	let services = Arc::new(app.registry_adapter.list_services(query.skip, query.limit).await?);
	cache.put_list(query.skip, query.limit, services.clone());

	Ok((StatusCode::OK, Json(services)))
}

/// # GET /services/{name}
pub async fn get_service(
	State((app, cache)): State<(App, SharedRegistryCache)>,
	Auth(_auth): Auth,
	Path(name): Path<String>,
) -> CpResult<(StatusCode, Json<Arc<ServiceEntry>>)> {
	if let Some(service) = cache.get_name(&name) {
		return Ok((StatusCode::OK, Json(service)));
	}

	let service = Arc::new(app.registry_adapter.read_service_by_name(&name).await?);
	cache.put_name(&name, service.clone());

	Ok((StatusCode::OK, Json(service)))
}

/// # POST /services
pub async fn post_service(
	State((app, cache)): State<(App, SharedRegistryCache)>,
	Superuser(auth): Superuser,
	Json(service_in): Json<ServiceCreate>,
) -> CpResult<(StatusCode, Json<ServiceEntry>)> {
	if service_in.name.is_empty() || service_in.url.is_empty() {
		return Err(Error::ValidationError("name and url are required".into()));
	}

	let service = app.registry_adapter.create_service(&service_in).await?;
	cache.invalidate();

	info!("Service {} registered by {}", service.name, auth.user.username);
	Ok((StatusCode::CREATED, Json(service)))
}

/// # PUT /services/{name}
pub async fn put_service(
	State((app, cache)): State<(App, SharedRegistryCache)>,
	Superuser(auth): Superuser,
	Path(name): Path<String>,
	Json(patch): Json<ServiceUpdate>,
) -> CpResult<(StatusCode, Json<ServiceEntry>)> {
	let service = app.registry_adapter.update_service(&name, &patch).await?;
	cache.invalidate();

	info!("Service {} updated by {}", name, auth.user.username);
	Ok((StatusCode::OK, Json(service)))
}

/// # DELETE /services/{name}
pub async fn delete_service(
	State((app, cache)): State<(App, SharedRegistryCache)>,
	Superuser(auth): Superuser,
	Path(name): Path<String>,
) -> CpResult<StatusCode> {
	app.registry_adapter.delete_service(&name).await?;
	cache.invalidate();

	info!("Service {} deleted by {}", name, auth.user.username);
	Ok(StatusCode::NO_CONTENT)
}

// vim: ts=4
