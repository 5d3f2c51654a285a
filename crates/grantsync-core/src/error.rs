//! Errors raised while building the grant model

use thiserror::Error;

/// Input validation and report parsing errors
///
/// Every variant is raised before any statement reaches the server.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrantError {
	/// Neither `user` + `host` nor `role` was supplied
	#[error("User with host or a role is required")]
	MissingPrincipal,

	/// A role was used against a server without role support
	#[error("Roles are only supported on MySQL 8 and above")]
	RolesUnsupported,

	/// A grant spec declares neither privileges nor roles
	#[error("One of privileges or roles is required")]
	MissingGrantables,

	/// A grant spec declares both privileges and roles
	#[error("Privileges and roles are mutually exclusive (database {database})")]
	ConflictingGrantables { database: String },

	/// A `SHOW GRANTS` line does not match the report grammar
	#[error("Failed to parse grant statement: {0}")]
	Parse(String),

	/// A resource id could not be decoded
	#[error("Invalid grant id: {0}")]
	InvalidGrantId(String),

	/// An import id is not of the form `USER@HOST`
	#[error("Wrong ID format {0} (expected USER@HOST)")]
	InvalidImportId(String),
}

pub type Result<T> = std::result::Result<T, GrantError>;
