//! First-start provisioning
//!
//! Creates the configured bootstrap superuser when the credential store does
//! not know the username yet. Runs before the listener comes up so the
//! instance is never reachable without an administrator account.

use campus_credential_adapter_sqlite::CredentialAdapterSqlite;
use campus_types::credential_adapter::CredentialAdapter;

use crate::config::Config;
use crate::prelude::*;

pub async fn seed(credentials: &CredentialAdapterSqlite, config: &Config) -> CpResult<()> {
	let Some(seed) = &config.first_superuser else {
		return Ok(());
	};

	match credentials.read_user_view(&seed.username).await {
		Ok(_) => {
			debug!("Bootstrap superuser {} already exists", seed.username);
			Ok(())
		}
		Err(Error::NotFound) => {
			credentials.create_user(&seed.username, &seed.email, &seed.password, true).await?;
			info!("Created bootstrap superuser {}", seed.username);
			Ok(())
		}
		Err(err) => Err(err),
	}
}

// vim: ts=4
