//! # grantsync core
//!
//! Grant model shared by the grantsync crates:
//!
//! - **Identifiers**: quoting of `<database>.<table>` scope tokens
//! - **Privileges**: parsing and normalizing privilege clauses
//! - **Grammar**: parsing `SHOW GRANTS` report lines into [`GrantRecord`]s
//! - **Principals**: `'user'@'host'` accounts and roles
//! - **Desired state**: [`GrantsDeclaration`] validated into [`DesiredGrantSpec`]s
//! - **Statements**: GRANT / REVOKE builders
//!
//! Nothing in this crate talks to a server.
//!
//! ## Quick Start
//!
//! ```rust
//! use grantsync_core::{GrantGrammar, GrantsDeclaration, GrantSpecInput, ServerCapabilities};
//!
//! let caps = ServerCapabilities::parse("5.7.44").unwrap();
//! let decl = GrantsDeclaration::for_user("app", "%")
//! 	.grant(GrantSpecInput::privileges("app_db", ["SELECT", "INSERT"]));
//! let validated = decl.validate(&caps).unwrap();
//! assert_eq!(validated.principal.to_string(), "'app'@'%'");
//!
//! let record = GrantGrammar::mysql()
//! 	.parse_line("GRANT SELECT ON `app_db`.* TO 'app'@'%'")
//! 	.unwrap();
//! assert_eq!(record.scope, validated.specs[0].scope);
//! ```

pub mod capability;
pub mod declaration;
pub mod error;
pub mod grammar;
pub mod identifier;
pub mod principal;
pub mod privilege;
pub mod scope;
pub mod statement;

pub use capability::{ROLE_SUPPORT_VERSION, ServerCapabilities};
pub use declaration::{
	DesiredGrantSpec, GrantId, GrantSpecInput, Grantables, GrantsDeclaration, ValidatedGrants,
};
pub use error::{GrantError, Result};
pub use grammar::{GrantGrammar, GrantRecord};
pub use identifier::{format_database, format_table};
pub use principal::Principal;
pub use privilege::{ALL_PRIVILEGES, PrivilegeSet, normalize_privileges, parse_privileges};
pub use scope::Scope;
pub use statement::{
	GrantStatement, RevokeGrantOptionStatement, RevokeStatement, ShowGrantsStatement, Statement,
};
