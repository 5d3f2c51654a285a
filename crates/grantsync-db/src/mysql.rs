//! MySQL backend

use async_trait::async_trait;
use sqlx::{MySqlPool, Row};
use std::sync::Arc;

use crate::backend::GrantBackend;
use crate::error::{Result, ServerError};

/// MySQL / MariaDB backend over a sqlx pool
#[derive(Clone)]
pub struct MySqlGrantBackend {
	pool: Arc<MySqlPool>,
}

impl MySqlGrantBackend {
	pub fn new(pool: MySqlPool) -> Self {
		Self {
			pool: Arc::new(pool),
		}
	}

	pub async fn connect(url: &str) -> Result<Self> {
		let pool = MySqlPool::connect(url).await?;
		Ok(Self::new(pool))
	}
}

#[async_trait]
impl GrantBackend for MySqlGrantBackend {
	async fn execute(&self, sql: &str) -> std::result::Result<u64, ServerError> {
		let result = sqlx::query(sql).execute(self.pool.as_ref()).await?;
		Ok(result.rows_affected())
	}

	async fn query_strings(&self, sql: &str) -> std::result::Result<Vec<String>, ServerError> {
		let rows = sqlx::query(sql).fetch_all(self.pool.as_ref()).await?;
		rows.iter()
			.map(|row| row.try_get::<String, _>(0).map_err(ServerError::from))
			.collect()
	}
}
