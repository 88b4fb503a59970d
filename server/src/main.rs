use std::net::SocketAddr;
use std::sync::Arc;

use campus_core::app::{App, AppState, VERSION};
use campus_core::rate_limit::{RateLimitConfig, RateLimitManager};
use campus_core::token::TokenEngine;
use campus_credential_adapter_sqlite::CredentialAdapterSqlite;
use campus_registry::{RegistryCache, SharedRegistryCache};
use campus_registry_adapter_sqlite::RegistryAdapterSqlite;

use campus_server::config::Config;
use campus_server::prelude::*;
use campus_server::{bootstrap, routes};

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_target(false)
		.init();

	if let Err(err) = run().await {
		error!("FATAL: {}", err);
		std::process::exit(1);
	}
}

async fn run() -> CpResult<()> {
	let config = Config::from_env()?;
	info!("Campus Core V{}", VERSION);

	std::fs::create_dir_all(&config.db_dir)?;
	let credential_adapter =
		Arc::new(CredentialAdapterSqlite::new(config.db_dir.join("credentials.db")).await?);
	let registry_adapter =
		Arc::new(RegistryAdapterSqlite::new(config.db_dir.join("registry.db")).await?);

	bootstrap::seed(&credential_adapter, &config).await?;

	let token_engine =
		TokenEngine::new(&config.jwt_secret, config.access_expiry, config.refresh_expiry)?;
	let rate_limiter = Arc::new(RateLimitManager::new(RateLimitConfig {
		max_attempts: config.rate_limit_attempts,
		window: config.rate_limit_window,
		..RateLimitConfig::default()
	}));

	let cache: SharedRegistryCache = Arc::new(RegistryCache::new(config.cache_ttl));

	let app: App = Arc::new(AppState {
		credential_adapter,
		registry_adapter,
		token_engine,
		rate_limiter,
	});

	let router = routes::init(app, cache);
	let listener = tokio::net::TcpListener::bind(config.listen.as_ref()).await?;
	info!("Listening on {}", config.listen);

	axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	Ok(())
}

async fn shutdown_signal() {
	let _ = tokio::signal::ctrl_c().await;
	info!("Shutting down");
}

// vim: ts=4
