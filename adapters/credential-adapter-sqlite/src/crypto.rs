//! Password hashing and verification
//!
//! bcrypt comparison takes tens of milliseconds on purpose; it runs on the
//! blocking pool so the async runtime never stalls on it.

use campus_types::prelude::*;

const BCRYPT_COST: u32 = 10;

fn check_password_sync(password: Box<str>, password_hash: Box<str>) -> CpResult<()> {
	let matches = bcrypt::verify(password.as_ref(), &password_hash)
		.map_err(|_| Error::InvalidCredentials)?;
	if matches {
		Ok(())
	} else {
		Err(Error::InvalidCredentials)
	}
}

pub(crate) async fn check_password(password: &str, password_hash: Box<str>) -> CpResult<()> {
	let password: Box<str> = password.into();
	tokio::task::spawn_blocking(move || check_password_sync(password, password_hash))
		.await
		.map_err(|_| Error::Internal("password check task failed".into()))?
}

fn generate_password_hash_sync(password: Box<str>) -> CpResult<Box<str>> {
	let hash = bcrypt::hash(password.as_ref(), BCRYPT_COST)
		.map_err(|_| Error::Internal("password hashing failed".into()))?;

	Ok(hash.into())
}

/// Hash a password for storage. Used by provisioning, not by the login path.
pub async fn generate_password_hash(password: &str) -> CpResult<Box<str>> {
	let password: Box<str> = password.into();
	tokio::task::spawn_blocking(move || generate_password_hash_sync(password))
		.await
		.map_err(|_| Error::Internal("password hashing task failed".into()))?
}


// vim: ts=4
