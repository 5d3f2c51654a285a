//! Scripted backend that records every statement it receives

use async_trait::async_trait;
use grantsync_core::{Principal, ShowGrantsStatement};
use grantsync_db::{GrantBackend, NO_SUCH_GRANT, ServerError};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-memory [`GrantBackend`] with scripted answers
///
/// - `SELECT VERSION()` answers with the configured version
/// - `SHOW GRANTS FOR <p>` answers with the lines registered through
///   [`with_grants`](Self::with_grants), or error 1141 when none were
/// - every other query fails
/// - `execute` succeeds unless a failure was registered for the exact SQL
///
/// # Example
///
/// ```rust
/// use grantsync_core::Principal;
/// use grantsync_db::GrantBackend;
/// use grantsync_test::RecordingBackend;
///
/// # #[tokio::main]
/// # async fn main() {
/// let backend = RecordingBackend::mysql8()
/// 	.with_grants(&Principal::user("app", "%"), &["GRANT USAGE ON *.* TO 'app'@'%'"]);
///
/// backend.execute("GRANT SELECT ON *.* TO 'app'@'%'").await.unwrap();
/// assert_eq!(backend.statements(), vec!["GRANT SELECT ON *.* TO 'app'@'%'"]);
/// # }
/// ```
#[derive(Debug)]
pub struct RecordingBackend {
	version: String,
	reports: Mutex<HashMap<String, Vec<String>>>,
	failures: Mutex<HashMap<String, ServerError>>,
	statements: Mutex<Vec<String>>,
	queries: Mutex<Vec<String>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl RecordingBackend {
	pub fn new(version: impl Into<String>) -> Self {
		Self {
			version: version.into(),
			reports: Mutex::new(HashMap::new()),
			failures: Mutex::new(HashMap::new()),
			statements: Mutex::new(Vec::new()),
			queries: Mutex::new(Vec::new()),
		}
	}

	/// Server without role support
	pub fn mysql57() -> Self {
		Self::new("5.7.44-log")
	}

	/// Server with role support
	pub fn mysql8() -> Self {
		Self::new("8.0.36")
	}

	/// Register the `SHOW GRANTS` report of `principal`
	pub fn with_grants(self, principal: &Principal, lines: &[&str]) -> Self {
		self.set_grants(principal, lines);
		self
	}

	/// Replace the `SHOW GRANTS` report of `principal`
	pub fn set_grants(&self, principal: &Principal, lines: &[&str]) {
		let sql = ShowGrantsStatement::new(principal.clone()).build();
		lock(&self.reports).insert(sql, lines.iter().map(|line| line.to_string()).collect());
	}

	/// Forget `principal`, so that `SHOW GRANTS` answers with error 1141
	pub fn drop_principal(&self, principal: &Principal) {
		let sql = ShowGrantsStatement::new(principal.clone()).build();
		lock(&self.reports).remove(&sql);
	}

	/// Make `execute(sql)` fail with `error`
	pub fn fail_on(self, sql: impl Into<String>, error: ServerError) -> Self {
		lock(&self.failures).insert(sql.into(), error);
		self
	}

	/// Make `execute(sql)` fail with error 1141
	pub fn no_such_grant_on(self, sql: impl Into<String>) -> Self {
		self.fail_on(
			sql,
			ServerError::new(NO_SUCH_GRANT, "There is no such grant defined for user"),
		)
	}

	/// Statements passed to `execute`, in order, including failed ones
	pub fn statements(&self) -> Vec<String> {
		lock(&self.statements).clone()
	}

	/// Queries passed to `query_strings`, in order
	pub fn queries(&self) -> Vec<String> {
		lock(&self.queries).clone()
	}
}

#[async_trait]
impl GrantBackend for RecordingBackend {
	async fn execute(&self, sql: &str) -> Result<u64, ServerError> {
		lock(&self.statements).push(sql.to_string());
		match lock(&self.failures).get(sql) {
			Some(error) => Err(error.clone()),
			None => Ok(0),
		}
	}

	async fn query_strings(&self, sql: &str) -> Result<Vec<String>, ServerError> {
		lock(&self.queries).push(sql.to_string());
		if sql == "SELECT VERSION()" {
			return Ok(vec![self.version.clone()]);
		}
		if let Some(lines) = lock(&self.reports).get(sql) {
			return Ok(lines.clone());
		}
		if sql.starts_with("SHOW GRANTS FOR ") {
			return Err(ServerError::new(
				NO_SUCH_GRANT,
				"There is no such grant defined for user",
			));
		}
		Err(ServerError::other(format!("unscripted query: {sql}")))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_version_and_reports() {
		let principal = Principal::user("u", "h");
		let backend =
			RecordingBackend::mysql57().with_grants(&principal, &["GRANT USAGE ON *.* TO 'u'@'h'"]);

		assert_eq!(backend.server_version().await.unwrap(), "5.7.44-log");
		assert_eq!(
			backend.query_strings("SHOW GRANTS FOR 'u'@'h'").await.unwrap(),
			vec!["GRANT USAGE ON *.* TO 'u'@'h'"]
		);

		backend.drop_principal(&principal);
		let err = backend
			.query_strings("SHOW GRANTS FOR 'u'@'h'")
			.await
			.unwrap_err();
		assert!(err.is_no_such_grant());
		assert_eq!(backend.queries().len(), 3);
	}

	#[tokio::test]
	async fn test_scripted_failures_are_recorded() {
		let backend =
			RecordingBackend::mysql8().no_such_grant_on("REVOKE GRANT OPTION ON *.* FROM 'u'@'h'");

		assert!(backend.execute("GRANT SELECT ON *.* TO 'u'@'h'").await.is_ok());
		let err = backend
			.execute("REVOKE GRANT OPTION ON *.* FROM 'u'@'h'")
			.await
			.unwrap_err();
		assert!(err.is_no_such_grant());
		assert_eq!(backend.statements().len(), 2);
	}

	#[tokio::test]
	async fn test_unscripted_query_fails() {
		let backend = RecordingBackend::mysql8();
		let err = backend.query_strings("SELECT 1").await.unwrap_err();
		assert_eq!(err.code, None);
	}
}
