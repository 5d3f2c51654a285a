//! # grantsync db
//!
//! Server access for grantsync.
//!
//! - [`GrantBackend`]: the statement surface a server must offer
//! - [`MySqlGrantBackend`]: sqlx implementation for MySQL and MariaDB
//! - [`GrantConnection`]: shared wrapper used by reconciliation passes
//! - [`probe_capabilities`]: version and role support detection
//! - [`fetch_snapshot`]: `SHOW GRANTS` read into a [`Snapshot`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use grantsync_core::{GrantGrammar, Principal};
//! use grantsync_db::GrantConnection;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let connection = GrantConnection::connect_mysql("mysql://root@localhost:3306").await?;
//! let capabilities = connection.capabilities().await?;
//! let snapshot = connection
//! 	.snapshot(&Principal::user("app", "%"), GrantGrammar::mysql())
//! 	.await?;
//! println!("{} {:?}", capabilities.version, snapshot);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod connection;
pub mod error;
pub mod mysql;
pub mod probe;
pub mod snapshot;

pub use backend::GrantBackend;
pub use connection::GrantConnection;
pub use error::{BackendError, NO_SUCH_GRANT, Result, ServerError, SnapshotError};
pub use mysql::MySqlGrantBackend;
pub use probe::probe_capabilities;
pub use snapshot::{Snapshot, fetch_snapshot};
