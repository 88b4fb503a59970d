//! Service registry queries

use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::utils::*;
use campus_types::prelude::*;
use campus_types::registry_adapter::{ServiceCreate, ServiceEntry, ServiceUpdate};

fn entry_from_row(row: &SqliteRow) -> Result<ServiceEntry, sqlx::Error> {
	Ok(ServiceEntry {
		id: row.try_get("service_id")?,
		name: row.try_get("name")?,
		url: row.try_get("url")?,
		description: row.try_get("description")?,
		is_active: row.try_get("is_active")?,
		created_at: Timestamp(row.try_get("created_at")?),
		updated_at: row.try_get::<Option<i64>, _>("updated_at")?.map(Timestamp),
	})
}

const SELECT_COLS: &str =
	"service_id, name, url, description, is_active, created_at, updated_at";

pub(crate) async fn list_services(
	db: &SqlitePool,
	skip: i64,
	limit: i64,
) -> CpResult<Vec<ServiceEntry>> {
	let rows = sqlx::query(&format!(
		"SELECT {} FROM services ORDER BY service_id LIMIT ?1 OFFSET ?2",
		SELECT_COLS
	))
	.bind(limit)
	.bind(skip)
	.fetch_all(db)
	.await
	.inspect_err(inspect)
	.or(Err(Error::DbError))?;

	collect_res(rows.iter().map(entry_from_row))
}

pub(crate) async fn read_service_by_name(db: &SqlitePool, name: &str) -> CpResult<ServiceEntry> {
	let res = sqlx::query(&format!("SELECT {} FROM services WHERE name = ?1", SELECT_COLS))
		.bind(name)
		.fetch_one(db)
		.await;

	match res {
		Ok(row) => entry_from_row(&row).inspect_err(inspect).or(Err(Error::DbError)),
		Err(sqlx::Error::RowNotFound) => Err(Error::NotFound),
		Err(err) => {
			inspect(&err);
			Err(Error::DbError)
		}
	}
}

pub(crate) async fn create_service(
	db: &SqlitePool,
	service: &ServiceCreate,
) -> CpResult<ServiceEntry> {
	let res = sqlx::query(
		"INSERT INTO services (name, url, description, is_active) VALUES (?1, ?2, ?3, ?4)",
	)
	.bind(service.name.as_ref())
	.bind(service.url.as_ref())
	.bind(service.description.as_deref())
	.bind(service.is_active)
	.execute(db)
	.await;

	match res {
		Ok(_) => read_service_by_name(db, &service.name).await,
		Err(err) if err.as_database_error().is_some_and(|e| e.is_unique_violation()) => {
			Err(Error::AlreadyExists(format!("service {}", service.name)))
		}
		Err(err) => {
			inspect(&err);
			Err(Error::DbError)
		}
	}
}

pub(crate) async fn update_service(
	db: &SqlitePool,
	name: &str,
	patch: &ServiceUpdate,
) -> CpResult<ServiceEntry> {
	let res = sqlx::query(
		"UPDATE services SET \
			name = COALESCE(?2, name), \
			url = COALESCE(?3, url), \
			description = COALESCE(?4, description), \
			is_active = COALESCE(?5, is_active) \
			WHERE name = ?1",
	)
	.bind(name)
	.bind(patch.name.as_deref())
	.bind(patch.url.as_deref())
	.bind(patch.description.as_deref())
	.bind(patch.is_active)
	.execute(db)
	.await;

	match res {
		Ok(done) if done.rows_affected() == 0 => Err(Error::NotFound),
		Ok(_) => {
			let current_name = patch.name.as_deref().unwrap_or(name);
			read_service_by_name(db, current_name).await
		}
		Err(err) if err.as_database_error().is_some_and(|e| e.is_unique_violation()) => {
			Err(Error::AlreadyExists(format!("service {}", patch.name.as_deref().unwrap_or(name))))
		}
		Err(err) => {
			inspect(&err);
			Err(Error::DbError)
		}
	}
}

pub(crate) async fn delete_service(db: &SqlitePool, name: &str) -> CpResult<()> {
	let res = sqlx::query("DELETE FROM services WHERE name = ?1")
		.bind(name)
		.execute(db)
		.await
		.inspect_err(inspect)
		.or(Err(Error::DbError))?;

	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	Ok(())
}

// vim: ts=4
