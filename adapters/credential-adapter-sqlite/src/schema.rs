//! Database schema initialization and migrations

use sqlx::{Sqlite, SqlitePool, Transaction};

/// Get the current database version from vars table
async fn get_db_version(tx: &mut Transaction<'_, Sqlite>) -> i64 {
	sqlx::query_scalar::<_, String>("SELECT value FROM vars WHERE key = 'db_version'")
		.fetch_optional(&mut **tx)
		.await
		.ok()
		.flatten()
		.and_then(|v| v.parse().ok())
		.unwrap_or(0)
}

/// Set the database version in vars table
async fn set_db_version(tx: &mut Transaction<'_, Sqlite>, version: i64) {
	let _ = sqlx::query("INSERT OR REPLACE INTO vars (key, value) VALUES ('db_version', ?)")
		.bind(version.to_string())
		.execute(&mut **tx)
		.await;
}

// Current schema version - update this when adding new migrations
const CURRENT_DB_VERSION: i64 = 1;

/// Initialize the database schema and run migrations
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	// Create vars table first (needed for version tracking)
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS vars (
		key text NOT NULL,
		value text NOT NULL,
		created_at INTEGER DEFAULT (unixepoch()),
		updated_at INTEGER DEFAULT (unixepoch()),
		PRIMARY KEY(key)
	)",
	)
	.execute(&mut *tx)
	.await?;

	let version = get_db_version(&mut tx).await;

	// Schema creation - safe to run every time (uses IF NOT EXISTS)

	// Users
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS users (
			user_id INTEGER PRIMARY KEY AUTOINCREMENT,
			username text NOT NULL,
			email text NOT NULL,
			password_hash text NOT NULL,
			is_active integer NOT NULL DEFAULT 1,
			is_superuser integer NOT NULL DEFAULT 0,
			created_at INTEGER DEFAULT (unixepoch()),
			updated_at INTEGER DEFAULT (unixepoch())
		)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_users_username ON users (username)")
		.execute(&mut *tx)
		.await?;
	sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email ON users (email)")
		.execute(&mut *tx)
		.await?;

	// Roles
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS roles (
			role_id INTEGER PRIMARY KEY AUTOINCREMENT,
			name text NOT NULL,
			description text,
			created_at INTEGER DEFAULT (unixepoch()),
			updated_at INTEGER DEFAULT (unixepoch())
		)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_roles_name ON roles (name)")
		.execute(&mut *tx)
		.await?;

	// Permissions: exact (resource, action) pairs, no wildcards
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS permissions (
			perm_id INTEGER PRIMARY KEY AUTOINCREMENT,
			resource text NOT NULL,
			action text NOT NULL,
			description text,
			created_at INTEGER DEFAULT (unixepoch()),
			updated_at INTEGER DEFAULT (unixepoch())
		)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE UNIQUE INDEX IF NOT EXISTS idx_permissions_resource_action \
			ON permissions (resource, action)",
	)
	.execute(&mut *tx)
	.await?;

	// User/role assignments
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS user_role (
			user_id integer NOT NULL,
			role_id integer NOT NULL,
			created_at INTEGER DEFAULT (unixepoch()),
			PRIMARY KEY(user_id, role_id),
			FOREIGN KEY (user_id) REFERENCES users(user_id) ON DELETE CASCADE,
			FOREIGN KEY (role_id) REFERENCES roles(role_id) ON DELETE CASCADE
		)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_user_role_role ON user_role (role_id)")
		.execute(&mut *tx)
		.await?;

	// Role/permission grants
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS role_permission (
			role_id integer NOT NULL,
			perm_id integer NOT NULL,
			created_at INTEGER DEFAULT (unixepoch()),
			PRIMARY KEY(role_id, perm_id),
			FOREIGN KEY (role_id) REFERENCES roles(role_id) ON DELETE CASCADE,
			FOREIGN KEY (perm_id) REFERENCES permissions(perm_id) ON DELETE CASCADE
		)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_role_permission_perm ON role_permission (perm_id)")
		.execute(&mut *tx)
		.await?;

	// Triggers for automatic updated_at on UPDATE
	sqlx::query(
		"CREATE TRIGGER IF NOT EXISTS users_updated_at AFTER UPDATE ON users FOR EACH ROW \
			BEGIN UPDATE users SET updated_at = unixepoch() WHERE user_id = NEW.user_id; END",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE TRIGGER IF NOT EXISTS roles_updated_at AFTER UPDATE ON roles FOR EACH ROW \
			BEGIN UPDATE roles SET updated_at = unixepoch() WHERE role_id = NEW.role_id; END",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE TRIGGER IF NOT EXISTS permissions_updated_at AFTER UPDATE ON permissions FOR EACH ROW \
			BEGIN UPDATE permissions SET updated_at = unixepoch() WHERE perm_id = NEW.perm_id; END",
	)
	.execute(&mut *tx)
	.await?;

	// Fresh database: schema already has all columns
	if version == 0 {
		set_db_version(&mut tx, CURRENT_DB_VERSION).await;
	}

	tx.commit().await?;

	Ok(())
}
