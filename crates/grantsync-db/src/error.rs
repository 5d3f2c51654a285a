//! Server and backend errors

use grantsync_core::GrantError;
use thiserror::Error;

/// Server error code for "There is no such grant defined for user"
pub const NO_SUCH_GRANT: u16 = 1141;

/// Error reported by the server for a single statement
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", describe(.code, .message))]
pub struct ServerError {
	pub code: Option<u16>,
	pub message: String,
}

fn describe(code: &Option<u16>, message: &str) -> String {
	match code {
		Some(code) => format!("Error {code}: {message}"),
		None => message.to_string(),
	}
}

impl ServerError {
	pub fn new(code: u16, message: impl Into<String>) -> Self {
		Self {
			code: Some(code),
			message: message.into(),
		}
	}

	/// Error without a server code, such as an I/O failure
	pub fn other(message: impl Into<String>) -> Self {
		Self {
			code: None,
			message: message.into(),
		}
	}

	/// `1141`: the principal holds no grant on the scope, or does not exist
	///
	/// The message is only consulted when the driver reported no code.
	pub fn is_no_such_grant(&self) -> bool {
		match self.code {
			Some(code) => code == NO_SUCH_GRANT,
			None => self.message.contains(&format!("Error {NO_SUCH_GRANT}:")),
		}
	}
}

impl From<sqlx::Error> for ServerError {
	fn from(err: sqlx::Error) -> Self {
		match &err {
			sqlx::Error::Database(db_err) => Self {
				code: db_err
					.try_downcast_ref::<sqlx::mysql::MySqlDatabaseError>()
					.map(|mysql_err| mysql_err.number()),
				message: db_err.message().to_string(),
			},
			other => Self::other(other.to_string()),
		}
	}
}

/// Errors raised while connecting to or probing the server
#[derive(Debug, Error)]
pub enum BackendError {
	#[error("Server error: {0}")]
	Server(#[from] ServerError),

	#[error("Connection error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("Unrecognized server version: {0}")]
	Version(String),
}

/// Errors raised while reading the privilege report of a principal
#[derive(Debug, Error)]
pub enum SnapshotError {
	#[error("Failed to show grants: {0}")]
	Server(#[from] ServerError),

	#[error(transparent)]
	Parse(#[from] GrantError),
}

pub type Result<T> = std::result::Result<T, BackendError>;
