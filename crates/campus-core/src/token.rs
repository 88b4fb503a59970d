//! Token Engine
//!
//! Issues and validates signed, time-bounded access and refresh tokens.
//! Stateless: a pure function of the signing secret, the claims and the
//! clock. Access tokens carry no permission snapshot - permission checks
//! always go back to the Credential Store.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::prelude::*;
use campus_types::types::TokenPair;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
	Access,
	Refresh,
}

/// Signed claim set. Not persisted anywhere.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TokenClaims {
	/// Subject: username
	pub sub: Box<str>,
	#[serde(rename = "type")]
	pub typ: TokenType,
	pub iat: i64,
	pub exp: i64,
}

pub struct TokenEngine {
	encoding_key: EncodingKey,
	decoding_key: DecodingKey,
	access_expiry: i64,
	refresh_expiry: i64,
}

impl TokenEngine {
	/// Expirations are configuration inputs: access short (minutes),
	/// refresh long (days).
	pub fn new(secret: &str, access_expiry: i64, refresh_expiry: i64) -> CpResult<Self> {
		if secret.is_empty() {
			return Err(Error::ConfigError("empty token signing secret".into()));
		}

		Ok(Self {
			encoding_key: EncodingKey::from_secret(secret.as_bytes()),
			decoding_key: DecodingKey::from_secret(secret.as_bytes()),
			access_expiry,
			refresh_expiry,
		})
	}

	fn sign(&self, username: &str, typ: TokenType, expiry: i64) -> CpResult<Box<str>> {
		let issued = Timestamp::now();
		let claims = TokenClaims {
			sub: Box::from(username),
			typ,
			iat: issued.0,
			exp: Timestamp::from_now(expiry).0,
		};

		let token = jsonwebtoken::encode(
			&Header::new(Algorithm::HS256),
			&claims,
			&self.encoding_key,
		)
		.map_err(|err| Error::Internal(format!("token signing failed: {}", err)))?;

		Ok(token.into())
	}

	/// Issue an access/refresh pair for a subject
	pub fn issue(&self, username: &str) -> CpResult<TokenPair> {
		let access_token = self.sign(username, TokenType::Access, self.access_expiry)?;
		let refresh_token = self.sign(username, TokenType::Refresh, self.refresh_expiry)?;

		Ok(TokenPair { access_token, refresh_token, token_type: "bearer".into() })
	}

	/// Validate signature, expiration and token type.
	///
	/// Every failure mode collapses into `Error::Unauthorized`: leaking
	/// whether the signature, the expiry or the type was wrong would hand an
	/// attacker a discriminating oracle.
	pub fn validate(&self, token: &str, expected: TokenType) -> CpResult<TokenClaims> {
		let mut validation = Validation::new(Algorithm::HS256);
		validation.leeway = 0;

		let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &validation)
			.map_err(|_| Error::Unauthorized)?;

		if data.claims.typ != expected {
			return Err(Error::Unauthorized);
		}

		Ok(data.claims)
	}
}


// vim: ts=4
