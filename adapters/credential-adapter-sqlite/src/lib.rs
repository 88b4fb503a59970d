//! SQLite-backed Credential Store
//!
//! Owns the users/roles/permissions tables. The request path only ever reads
//! through the [`CredentialAdapter`] trait; the provisioning methods below are
//! for bootstrap and administrative tooling.

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use campus_types::credential_adapter::{CredentialAdapter, Permission, Role};
use campus_types::prelude::*;
use campus_types::types::UserView;

mod crypto;
mod schema;
mod user;
mod utils;

pub use crypto::generate_password_hash;

pub struct CredentialAdapterSqlite {
	db: SqlitePool,
}

impl CredentialAdapterSqlite {
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

	// Provisioning. Not part of the adapter trait: the request path never
	// writes credential rows.

	pub async fn create_user(
		&self,
		username: &str,
		email: &str,
		password: &str,
		is_superuser: bool,
	) -> CpResult<i64> {
		let password_hash = crypto::generate_password_hash(password).await?;

		let res = sqlx::query(
			"INSERT INTO users (username, email, password_hash, is_superuser) \
				VALUES (?1, ?2, ?3, ?4)",
		)
		.bind(username)
		.bind(email)
		.bind(password_hash.as_ref())
		.bind(is_superuser)
		.execute(&self.db)
		.await;

		match res {
			Ok(done) => Ok(done.last_insert_rowid()),
			Err(err) if err.as_database_error().is_some_and(|e| e.is_unique_violation()) => {
				Err(Error::AlreadyExists(format!("user {}", username)))
			}
			Err(err) => {
				utils::inspect(&err);
				Err(Error::DbError)
			}
		}
	}

	pub async fn create_role(&self, name: &str) -> CpResult<i64> {
		let res = sqlx::query("INSERT INTO roles (name) VALUES (?1)")
			.bind(name)
			.execute(&self.db)
			.await;

		match res {
			Ok(done) => Ok(done.last_insert_rowid()),
			Err(err) if err.as_database_error().is_some_and(|e| e.is_unique_violation()) => {
				Err(Error::AlreadyExists(format!("role {}", name)))
			}
			Err(err) => {
				utils::inspect(&err);
				Err(Error::DbError)
			}
		}
	}

	pub async fn create_permission(&self, resource: &str, action: &str) -> CpResult<i64> {
		let res = sqlx::query("INSERT INTO permissions (resource, action) VALUES (?1, ?2)")
			.bind(resource)
			.bind(action)
			.execute(&self.db)
			.await;

		match res {
			Ok(done) => Ok(done.last_insert_rowid()),
			Err(err) if err.as_database_error().is_some_and(|e| e.is_unique_violation()) => {
				Err(Error::AlreadyExists(format!("permission {}:{}", resource, action)))
			}
			Err(err) => {
				utils::inspect(&err);
				Err(Error::DbError)
			}
		}
	}

	pub async fn assign_role(&self, user_id: i64, role_id: i64) -> CpResult<()> {
		sqlx::query("INSERT OR IGNORE INTO user_role (user_id, role_id) VALUES (?1, ?2)")
			.bind(user_id)
			.bind(role_id)
			.execute(&self.db)
			.await
			.inspect_err(utils::inspect)
			.or(Err(Error::DbError))?;
		Ok(())
	}

	pub async fn grant_permission(&self, role_id: i64, perm_id: i64) -> CpResult<()> {
		sqlx::query("INSERT OR IGNORE INTO role_permission (role_id, perm_id) VALUES (?1, ?2)")
			.bind(role_id)
			.bind(perm_id)
			.execute(&self.db)
			.await
			.inspect_err(utils::inspect)
			.or(Err(Error::DbError))?;
		Ok(())
	}

	pub async fn revoke_permission(&self, role_id: i64, perm_id: i64) -> CpResult<()> {
		sqlx::query("DELETE FROM role_permission WHERE role_id = ?1 AND perm_id = ?2")
			.bind(role_id)
			.bind(perm_id)
			.execute(&self.db)
			.await
			.inspect_err(utils::inspect)
			.or(Err(Error::DbError))?;
		Ok(())
	}

	pub async fn set_active(&self, user_id: i64, is_active: bool) -> CpResult<()> {
		let res = sqlx::query("UPDATE users SET is_active = ?2 WHERE user_id = ?1")
			.bind(user_id)
			.bind(is_active)
			.execute(&self.db)
			.await
			.inspect_err(utils::inspect)
			.or(Err(Error::DbError))?;

		if res.rows_affected() == 0 {
			return Err(Error::NotFound);
		}
		Ok(())
	}
}

#[async_trait]
impl CredentialAdapter for CredentialAdapterSqlite {
	async fn read_user_view(&self, username: &str) -> CpResult<UserView> {
		user::read_user_view(&self.db, username).await
	}

	async fn check_user_password(&self, username: &str, password: &str) -> CpResult<UserView> {
		user::check_user_password(&self.db, username, password).await
	}

	async fn read_user_roles(&self, user_id: i64) -> CpResult<Vec<Role>> {
		user::read_user_roles(&self.db, user_id).await
	}

	async fn read_role_permissions(&self, role_id: i64) -> CpResult<Vec<Permission>> {
		user::read_role_permissions(&self.db, role_id).await
	}
}

// vim: ts=4
