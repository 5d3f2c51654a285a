//! Reconciliation errors

use grantsync_core::GrantError;
use grantsync_db::{BackendError, ServerError, SnapshotError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
	/// Invalid desired state or import id
	#[error(transparent)]
	Grant(#[from] GrantError),

	#[error("Failed to probe server capabilities: {0}")]
	Capability(#[from] BackendError),

	/// A planned statement was rejected by the server
	#[error("Error running SQL ({statement}): {source}")]
	Statement {
		statement: String,
		#[source]
		source: ServerError,
	},

	#[error("Failed to read grants: {0}")]
	Snapshot(#[from] SnapshotError),

	#[error("No grants found for {0}")]
	PrincipalNotFound(String),

	#[error("Grant still exists for {0}")]
	GrantStillExists(String),
}

impl ReconcileError {
	/// Server code of the underlying failure, if any
	pub fn server_code(&self) -> Option<u16> {
		match self {
			Self::Statement { source, .. } => source.code,
			Self::Snapshot(SnapshotError::Server(err)) => err.code,
			Self::Capability(BackendError::Server(err)) => err.code,
			_ => None,
		}
	}
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
