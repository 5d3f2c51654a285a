//! # grantsync reconcile
//!
//! Computes and applies the statements that converge declared grants with
//! the grants a MySQL-family server actually reports.
//!
//! - [`engine`]: pure planning (single-scope, multi-scope, snapshot, create,
//!   delete)
//! - [`GrantReconciler`]: create / read / update / delete / import passes over
//!   a [`GrantConnection`](grantsync_db::GrantConnection)
//!
//! ## Example
//!
//! ```rust,no_run
//! use grantsync_core::{GrantSpecInput, GrantsDeclaration};
//! use grantsync_db::GrantConnection;
//! use grantsync_reconcile::GrantReconciler;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let connection = GrantConnection::connect_mysql("mysql://root@localhost:3306").await?;
//! let reconciler = GrantReconciler::new(connection);
//!
//! let declaration = GrantsDeclaration::for_user("app", "%")
//! 	.grant(GrantSpecInput::privileges("app_db", ["SELECT", "INSERT"]));
//! let id = reconciler.create(&declaration).await?;
//! println!("created {id}");
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod reconciler;

pub use engine::{
	ReconcileContext, diff_roles, diff_scope, plan_converge, plan_create, plan_delete, plan_update,
};
pub use error::{ReconcileError, Result};
pub use reconciler::{DeleteOutcome, GrantReconciler, ReadOutcome, ScopeState};
