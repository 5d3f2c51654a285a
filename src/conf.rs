//! Connection settings and declaration files.

#[cfg(feature = "conf")]
pub use grantsync_conf::*;
