//! Reconciliation planning and the grant lifecycle.

pub use grantsync_reconcile::*;
