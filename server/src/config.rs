//! Environment-driven configuration
//!
//! Read once at startup; immutable afterwards. `CAMPUS_JWT_SECRET` is the
//! only mandatory variable, everything else has a sensible default.

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use crate::prelude::*;

pub struct Config {
	pub listen: Box<str>,
	pub db_dir: PathBuf,

	pub jwt_secret: Box<str>,
	/// Access token lifetime in seconds
	pub access_expiry: i64,
	/// Refresh token lifetime in seconds
	pub refresh_expiry: i64,

	/// Registry cache entry lifetime
	pub cache_ttl: Duration,

	/// Login/refresh attempts allowed per window, per address
	pub rate_limit_attempts: NonZeroU32,
	pub rate_limit_window: Duration,

	/// Optional bootstrap superuser, created on first start if absent
	pub first_superuser: Option<SuperuserSeed>,
}

pub struct SuperuserSeed {
	pub username: Box<str>,
	pub email: Box<str>,
	pub password: Box<str>,
}

fn var(key: &str) -> Option<String> {
	std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> CpResult<T> {
	match var(key) {
		Some(raw) => raw
			.parse()
			.map_err(|_| Error::ConfigError(format!("invalid value for {}: {}", key, raw))),
		None => Ok(default),
	}
}

impl Config {
	pub fn from_env() -> CpResult<Self> {
		let jwt_secret = var("CAMPUS_JWT_SECRET")
			.ok_or_else(|| Error::ConfigError("CAMPUS_JWT_SECRET is not set".into()))?;

		let rate_limit_attempts = NonZeroU32::new(parse_var("CAMPUS_RATE_LIMIT_ATTEMPTS", 5u32)?)
			.ok_or_else(|| Error::ConfigError("CAMPUS_RATE_LIMIT_ATTEMPTS must be > 0".into()))?;

		let first_superuser = match (var("CAMPUS_FIRST_SUPERUSER"), var("CAMPUS_FIRST_SUPERUSER_PASSWORD")) {
			(Some(username), Some(password)) => {
				let email = var("CAMPUS_FIRST_SUPERUSER_EMAIL")
					.unwrap_or_else(|| format!("{}@localhost", username));
				Some(SuperuserSeed {
					username: username.into(),
					email: email.into(),
					password: password.into(),
				})
			}
			(Some(_), None) | (None, Some(_)) => {
				return Err(Error::ConfigError(
					"CAMPUS_FIRST_SUPERUSER and CAMPUS_FIRST_SUPERUSER_PASSWORD must be set together".into(),
				))
			}
			(None, None) => None,
		};

		Ok(Self {
			listen: var("CAMPUS_LISTEN").unwrap_or_else(|| "127.0.0.1:8000".into()).into(),
			db_dir: PathBuf::from(var("CAMPUS_DB_DIR").unwrap_or_else(|| "./data".into())),
			jwt_secret: jwt_secret.into(),
			access_expiry: parse_var("CAMPUS_ACCESS_TOKEN_EXPIRY", 1800i64)?,
			refresh_expiry: parse_var("CAMPUS_REFRESH_TOKEN_EXPIRY", 604_800i64)?,
			cache_ttl: Duration::from_secs(parse_var("CAMPUS_CACHE_TTL", 300u64)?),
			rate_limit_attempts,
			rate_limit_window: Duration::from_secs(parse_var("CAMPUS_RATE_LIMIT_WINDOW", 60u64)?),
			first_superuser,
		})
	}
}

// vim: ts=4
