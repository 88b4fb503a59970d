//! User, role and permission queries

use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::crypto;
use crate::utils::*;
use campus_types::credential_adapter::{Permission, Role};
use campus_types::prelude::*;
use campus_types::types::{RoleView, UserView};

async fn build_user_view(db: &SqlitePool, row: &SqliteRow) -> CpResult<UserView> {
	let user_id: i64 = row.try_get("user_id").or(Err(Error::DbError))?;
	let roles = read_user_roles(db, user_id).await?;

	Ok(UserView {
		id: user_id,
		username: row.try_get("username").or(Err(Error::DbError))?,
		email: row.try_get("email").or(Err(Error::DbError))?,
		is_active: row.try_get("is_active").or(Err(Error::DbError))?,
		is_superuser: row.try_get("is_superuser").or(Err(Error::DbError))?,
		roles: roles.into_iter().map(|r| RoleView { id: r.id, name: r.name }).collect(),
	})
}

pub(crate) async fn read_user_view(db: &SqlitePool, username: &str) -> CpResult<UserView> {
	let res = sqlx::query(
		"SELECT user_id, username, email, is_active, is_superuser FROM users WHERE username = ?1",
	)
	.bind(username)
	.fetch_one(db)
	.await;

	let row = match res {
		Ok(row) => row,
		Err(sqlx::Error::RowNotFound) => return Err(Error::NotFound),
		Err(err) => {
			inspect(&err);
			return Err(Error::DbError);
		}
	};

	build_user_view(db, &row).await
}

pub(crate) async fn check_user_password(
	db: &SqlitePool,
	username: &str,
	password: &str,
) -> CpResult<UserView> {
	let res = sqlx::query(
		"SELECT user_id, username, email, password_hash, is_active, is_superuser \
			FROM users WHERE username = ?1",
	)
	.bind(username)
	.fetch_one(db)
	.await;

	let row = match res {
		Ok(row) => row,
		// Unknown username answers exactly like a wrong password
		Err(sqlx::Error::RowNotFound) => return Err(Error::InvalidCredentials),
		Err(err) => {
			inspect(&err);
			return Err(Error::DbError);
		}
	};

	let password_hash: Box<str> = row.try_get("password_hash").or(Err(Error::DbError))?;
	crypto::check_password(password, password_hash).await?;

	build_user_view(db, &row).await
}

pub(crate) async fn read_user_roles(db: &SqlitePool, user_id: i64) -> CpResult<Vec<Role>> {
	let rows = sqlx::query(
		"SELECT r.role_id, r.name FROM roles r \
			JOIN user_role ur ON ur.role_id = r.role_id \
			WHERE ur.user_id = ?1 ORDER BY r.role_id",
	)
	.bind(user_id)
	.fetch_all(db)
	.await
	.inspect_err(inspect)
	.or(Err(Error::DbError))?;

	collect_res(rows.into_iter().map(|row| {
		Ok(Role { id: row.try_get("role_id")?, name: row.try_get("name")? })
	}))
}

pub(crate) async fn read_role_permissions(
	db: &SqlitePool,
	role_id: i64,
) -> CpResult<Vec<Permission>> {
	let rows = sqlx::query(
		"SELECT p.perm_id, p.resource, p.action FROM permissions p \
			JOIN role_permission rp ON rp.perm_id = p.perm_id \
			WHERE rp.role_id = ?1 ORDER BY p.perm_id",
	)
	.bind(role_id)
	.fetch_all(db)
	.await
	.inspect_err(inspect)
	.or(Err(Error::DbError))?;

	collect_res(rows.into_iter().map(|row| {
		Ok(Permission {
			id: row.try_get("perm_id")?,
			resource: row.try_get("resource")?,
			action: row.try_get("action")?,
		})
	}))
}

// vim: ts=4
