//! Grant model: principals, scopes, privileges, statements and the report grammar.
//!
//! # Examples
//!
//! ```rust
//! use grantsync::core::{Principal, Scope};
//!
//! let principal = Principal::user("app", "%");
//! assert_eq!(principal.to_string(), "'app'@'%'");
//! assert_eq!(Scope::all_tables("app_db").to_string(), "`app_db`.*");
//! ```

pub use grantsync_core::*;
