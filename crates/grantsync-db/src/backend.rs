//! Backend abstraction

use async_trait::async_trait;

use crate::error::ServerError;

/// Minimal server surface needed to reconcile grants
///
/// Implementations run one statement at a time; callers await each result
/// before issuing the next statement.
#[async_trait]
pub trait GrantBackend: Send + Sync {
	/// Run a statement, returning the number of affected rows
	async fn execute(&self, sql: &str) -> Result<u64, ServerError>;

	/// Run a query, returning the first column of every row as text
	async fn query_strings(&self, sql: &str) -> Result<Vec<String>, ServerError>;

	/// Server version text, as returned by `SELECT VERSION()`
	async fn server_version(&self) -> Result<String, ServerError> {
		self.query_strings("SELECT VERSION()")
			.await?
			.into_iter()
			.next()
			.ok_or_else(|| ServerError::other("SELECT VERSION() returned no rows"))
	}
}
