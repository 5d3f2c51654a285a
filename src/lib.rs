//! # grantsync
//!
//! Declarative reconciliation of MySQL / MariaDB privilege and role grants.
//!
//! A [`GrantsDeclaration`](core::GrantsDeclaration) describes the grants one
//! principal (a `user@host` account or, on MySQL 8+, a role) should hold.
//! [`GrantReconciler`](reconcile::GrantReconciler) turns it into the minimal
//! ordered list of `GRANT` / `REVOKE` statements and runs them one at a time.
//!
//! ## Crates
//!
//! - `grantsync-core` ([`core`]): grant model, statement builders, report grammar
//! - `grantsync-db` ([`db`]): backend trait, sqlx MySQL backend, snapshots
//! - `grantsync-reconcile` ([`reconcile`]): planning and lifecycle operations
//! - `grantsync-conf` ([`conf`], feature `conf`): settings and declaration files
//! - `grantsync-test` ([`test`], feature `test`): recording backend and fixtures
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use grantsync::prelude::*;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let connection = GrantConnection::connect_mysql("mysql://root@localhost:3306/").await?;
//! let reconciler = GrantReconciler::new(connection);
//!
//! let declaration = GrantsDeclaration::for_user("app", "%")
//! 	.grant(GrantSpecInput::privileges("app_db", ["SELECT", "INSERT"]));
//!
//! let id = reconciler.create(&declaration).await?;
//! println!("created {id}");
//!
//! // Later: bring the live grants back in line with the declaration
//! let executed = reconciler.converge(&declaration).await?;
//! println!("{} statements executed", executed.len());
//! # Ok(())
//! # }
//! ```

pub mod conf;
pub mod core;
pub mod db;
pub mod reconcile;

/// Common imports
pub mod prelude {
	pub use grantsync_core::{
		GrantError, GrantId, GrantRecord, GrantSpecInput, GrantsDeclaration, Principal, Scope,
		ServerCapabilities, Statement,
	};
	pub use grantsync_db::{GrantBackend, GrantConnection, ServerError};
	pub use grantsync_reconcile::{
		DeleteOutcome, GrantReconciler, ReadOutcome, ReconcileError, ScopeState,
	};

	#[cfg(feature = "conf")]
	pub use grantsync_conf::{ConnectionSettings, load_declaration};
}
