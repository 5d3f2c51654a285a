//! Server access: the backend trait, the MySQL backend and grant snapshots.

pub use grantsync_db::*;
