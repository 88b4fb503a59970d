//! Adapter that owns the service registry rows.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::prelude::*;

/// A registered service, used for discovery and health visibility
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ServiceEntry {
	pub id: i64,
	pub name: Box<str>,
	pub url: Box<str>,
	pub description: Option<Box<str>>,
	pub is_active: bool,
	pub created_at: Timestamp,
	pub updated_at: Option<Timestamp>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ServiceCreate {
	pub name: Box<str>,
	pub url: Box<str>,
	pub description: Option<Box<str>>,
	#[serde(default = "default_active")]
	pub is_active: bool,
}

fn default_active() -> bool {
	true
}

/// Partial update; `None` fields are left untouched
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ServiceUpdate {
	pub name: Option<Box<str>>,
	pub url: Option<Box<str>>,
	pub description: Option<Box<str>>,
	pub is_active: Option<bool>,
}

#[async_trait]
pub trait RegistryAdapter: Send + Sync {
	/// List services with pagination (creation order)
	async fn list_services(&self, skip: i64, limit: i64) -> CpResult<Vec<ServiceEntry>>;

	/// `Err(NotFound)` if the name is absent
	async fn read_service_by_name(&self, name: &str) -> CpResult<ServiceEntry>;

	/// `Err(AlreadyExists)` if the name is taken
	async fn create_service(&self, service: &ServiceCreate) -> CpResult<ServiceEntry>;

	/// `Err(NotFound)` if the name is absent
	async fn update_service(&self, name: &str, patch: &ServiceUpdate) -> CpResult<ServiceEntry>;

	/// `Err(NotFound)` if the name is absent
	async fn delete_service(&self, name: &str) -> CpResult<()>;
}

// vim: ts=4
