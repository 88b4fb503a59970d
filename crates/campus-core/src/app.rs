//! App state type

use std::sync::Arc;

use crate::rate_limit::RateLimitManager;
use crate::token::TokenEngine;

use campus_types::credential_adapter::CredentialAdapter;
use campus_types::registry_adapter::RegistryAdapter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Process-wide state. Constructed once at startup and read-only afterwards;
/// every handler gets it through axum's `State` extractor.
pub struct AppState {
	pub credential_adapter: Arc<dyn CredentialAdapter>,
	pub registry_adapter: Arc<dyn RegistryAdapter>,

	pub token_engine: TokenEngine,
	pub rate_limiter: Arc<RateLimitManager>,
}

pub type App = Arc<AppState>;

// vim: ts=4
