//! Platform-wide error type.
//!
//! Authentication failures are deliberately coarse: bad signature, expiry and
//! wrong token type all collapse into [`Error::Unauthorized`] so the error
//! surface cannot be used as an oracle.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

pub type CpResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// Unknown username, wrong password or inactive user (uniform on purpose)
	InvalidCredentials,
	/// Invalid, expired or wrong-type token (single kind, no oracle)
	Unauthorized,
	PermissionDenied,
	ValidationError(String),
	RateLimited,
	AlreadyExists(String),
	NotFound,
	/// The upstream authority could not be reached (transport failure,
	/// distinct from any authorization decision)
	Unavailable(String),
	/// Verbatim pass-through of a remote service's error response
	Remote { status: u16, detail: String },
	DbError,
	ConfigError(String),
	Internal(String),

	// externals
	Io(std::io::Error),
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Error::InvalidCredentials => write!(f, "incorrect username or password"),
			Error::Unauthorized => write!(f, "invalid or expired token"),
			Error::PermissionDenied => write!(f, "not enough permissions"),
			Error::ValidationError(msg) => write!(f, "{}", msg),
			Error::RateLimited => write!(f, "too many requests"),
			Error::AlreadyExists(what) => write!(f, "{} already exists", what),
			Error::NotFound => write!(f, "not found"),
			Error::Unavailable(what) => write!(f, "{} unavailable", what),
			Error::Remote { detail, .. } => write!(f, "{}", detail),
			Error::DbError => write!(f, "database error"),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
		}
	}
}

impl std::error::Error for Error {}

impl Error {
	pub fn status(&self) -> StatusCode {
		match self {
			Error::InvalidCredentials | Error::Unauthorized => StatusCode::UNAUTHORIZED,
			Error::PermissionDenied => StatusCode::FORBIDDEN,
			Error::ValidationError(_) | Error::AlreadyExists(_) => StatusCode::BAD_REQUEST,
			Error::RateLimited => StatusCode::TOO_MANY_REQUESTS,
			Error::NotFound => StatusCode::NOT_FOUND,
			Error::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
			Error::Remote { status, .. } => {
				StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
			}
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> axum::response::Response {
		let status = self.status();

		// Internal causes are logged, never serialized to the caller
		let detail = match &self {
			Error::DbError | Error::ConfigError(_) | Error::Internal(_) | Error::Io(_) => {
				tracing::error!("internal error: {}", self);
				"internal server error".to_string()
			}
			_ => self.to_string(),
		};

		(status, Json(json!({ "detail": detail }))).into_response()
	}
}


// vim: ts=4
