use grantsync_db::{GrantBackend, GrantConnection, ServerError};
use mockall::mock;
use rstest::*;
use std::sync::Arc;

// ============================================================================
// mockall-based Grant Backend Mock
// ============================================================================

mock! {
	/// Mock implementation of [`GrantBackend`] using mockall
	///
	/// ```rust
	/// use grantsync_db::GrantBackend;
	/// use grantsync_test::fixtures::MockGrantBackend;
	///
	/// #[tokio::main]
	/// async fn main() {
	/// 	let mut mock = MockGrantBackend::new();
	/// 	mock.expect_execute()
	/// 		.withf(|sql| sql.starts_with("GRANT SELECT"))
	/// 		.times(1)
	/// 		.returning(|_| Ok(0));
	///
	/// 	assert!(mock.execute("GRANT SELECT ON *.* TO 'u'@'%'").await.is_ok());
	/// }
	/// ```
	pub GrantBackend {}

	#[async_trait::async_trait]
	impl GrantBackend for GrantBackend {
		async fn execute(&self, sql: &str) -> Result<u64, ServerError>;
		async fn query_strings(&self, sql: &str) -> Result<Vec<String>, ServerError>;
		async fn server_version(&self) -> Result<String, ServerError>;
	}
}

/// Mock backend reporting a MySQL 8 server
///
/// Only `server_version` has an expectation; set the others per test.
#[fixture]
pub fn mock_backend() -> MockGrantBackend {
	let mut mock = MockGrantBackend::new();
	mock.expect_server_version()
		.returning(|| Ok("8.0.36".to_string()));
	mock
}

/// Connection over a mock backend that accepts every statement and reports
/// no grants for any principal
#[fixture]
pub fn mock_connection(mut mock_backend: MockGrantBackend) -> GrantConnection {
	mock_backend.expect_execute().returning(|_| Ok(0));
	mock_backend
		.expect_query_strings()
		.returning(|_| Ok(Vec::new()));
	GrantConnection::new(Arc::new(mock_backend))
}
