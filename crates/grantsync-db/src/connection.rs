//! Grant connection management

use std::sync::Arc;

use grantsync_core::{GrantGrammar, Principal, ServerCapabilities, ShowGrantsStatement, Statement};

use crate::backend::GrantBackend;
use crate::error::{Result, ServerError, SnapshotError};
use crate::mysql::MySqlGrantBackend;
use crate::probe::probe_capabilities;
use crate::snapshot::{Snapshot, fetch_snapshot};

/// Connection wrapper shared by every reconciliation pass
#[derive(Clone)]
pub struct GrantConnection {
	backend: Arc<dyn GrantBackend>,
}

impl GrantConnection {
	pub fn new(backend: Arc<dyn GrantBackend>) -> Self {
		Self { backend }
	}

	pub async fn connect_mysql(url: &str) -> Result<Self> {
		let backend = MySqlGrantBackend::connect(url).await?;
		Ok(Self {
			backend: Arc::new(backend),
		})
	}

	/// Probe the server version and role support
	pub async fn capabilities(&self) -> Result<ServerCapabilities> {
		probe_capabilities(self.backend.as_ref()).await
	}

	/// Execute one planned statement
	pub async fn execute(&self, statement: &Statement) -> std::result::Result<u64, ServerError> {
		self.execute_sql(&statement.to_sql()).await
	}

	pub async fn execute_sql(&self, sql: &str) -> std::result::Result<u64, ServerError> {
		tracing::debug!(sql = %sql, "Executing statement");
		self.backend.execute(sql).await
	}

	/// Raw `SHOW GRANTS` lines of `principal`
	pub async fn show_grants(
		&self,
		principal: &Principal,
	) -> std::result::Result<Vec<String>, ServerError> {
		let sql = ShowGrantsStatement::new(principal.clone()).build();
		tracing::debug!(sql = %sql, "Reading grants");
		self.backend.query_strings(&sql).await
	}

	/// Read and parse the privilege report of `principal`
	pub async fn snapshot(
		&self,
		principal: &Principal,
		grammar: &GrantGrammar,
	) -> std::result::Result<Snapshot, SnapshotError> {
		fetch_snapshot(self.backend.as_ref(), principal, grammar).await
	}
}

impl std::fmt::Debug for GrantConnection {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GrantConnection").finish_non_exhaustive()
	}
}
