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

	// Services
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS services (
			service_id INTEGER PRIMARY KEY AUTOINCREMENT,
			name text NOT NULL,
			url text NOT NULL,
			description text,
			is_active integer NOT NULL DEFAULT 1,
			created_at INTEGER DEFAULT (unixepoch()),
			updated_at INTEGER
		)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_services_name ON services (name)")
		.execute(&mut *tx)
		.await?;

	// updated_at stays NULL until the first update
	sqlx::query(
		"CREATE TRIGGER IF NOT EXISTS services_updated_at AFTER UPDATE ON services FOR EACH ROW \
			BEGIN UPDATE services SET updated_at = unixepoch() \
			WHERE service_id = NEW.service_id AND NEW.updated_at IS OLD.updated_at; END",
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
