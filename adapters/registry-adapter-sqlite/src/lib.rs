//! SQLite-backed Service Registry store
//!
//! Owns the services table. All access from the request path goes through the
//! [`RegistryAdapter`] trait; cache invalidation happens above this layer.

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use campus_types::prelude::*;
use campus_types::registry_adapter::{
	RegistryAdapter, ServiceCreate, ServiceEntry, ServiceUpdate,
};

mod schema;
mod service;
mod utils;

pub struct RegistryAdapterSqlite {
	db: SqlitePool,
}

impl RegistryAdapterSqlite {
	pub async fn new(path: impl AsRef<Path>) -> CpResult<Self> {
		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref())
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(|err| error!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		schema::init_db(&db)
			.await
			.inspect_err(|err| error!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		Ok(Self { db })
	}
}

#[async_trait]
impl RegistryAdapter for RegistryAdapterSqlite {
	async fn list_services(&self, skip: i64, limit: i64) -> CpResult<Vec<ServiceEntry>> {
		service::list_services(&self.db, skip, limit).await
	}

	async fn read_service_by_name(&self, name: &str) -> CpResult<ServiceEntry> {
		service::read_service_by_name(&self.db, name).await
	}

	async fn create_service(&self, service: &ServiceCreate) -> CpResult<ServiceEntry> {
		service::create_service(&self.db, service).await
	}

	async fn update_service(&self, name: &str, patch: &ServiceUpdate) -> CpResult<ServiceEntry> {
		service::update_service(&self.db, name, patch).await
	}

	async fn delete_service(&self, name: &str) -> CpResult<()> {
		service::delete_service(&self.db, name).await
	}
}

// vim: ts=4
