//! Grant principals
//!
//! A principal is the subject of a grant: either a `'user'@'host'` account or
//! a `'role'` on servers with role support.
//!
//! ```
//! use grantsync_core::Principal;
//!
//! let user = Principal::resolve("app", "localhost", "", false).unwrap();
//! assert_eq!(user.to_string(), "'app'@'localhost'");
//!
//! let role = Principal::resolve("", "", "reader", true).unwrap();
//! assert_eq!(role.to_string(), "'reader'");
//! ```

use crate::error::{GrantError, Result};
use std::fmt::{self, Display, Formatter};

/// Subject of a grant
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Principal {
	/// `'user'@'host'` account
	User { user: String, host: String },
	/// Named role (MySQL 8 and above)
	Role { name: String },
}

impl Principal {
	/// Account principal
	pub fn user(user: impl Into<String>, host: impl Into<String>) -> Self {
		Self::User {
			user: user.into(),
			host: host.into(),
		}
	}

	/// Decide the principal from the declared fields
	///
	/// A complete `user` + `host` pair wins over `role`. A role is only
	/// accepted when the server supports roles.
	pub fn resolve(user: &str, host: &str, role: &str, supports_roles: bool) -> Result<Self> {
		if !user.is_empty() && !host.is_empty() {
			return Ok(Self::user(user, host));
		}
		if !role.is_empty() {
			if !supports_roles {
				return Err(GrantError::RolesUnsupported);
			}
			return Ok(Self::Role {
				name: role.to_string(),
			});
		}
		Err(GrantError::MissingPrincipal)
	}

	/// Whether this principal is a role
	pub fn is_role(&self) -> bool {
		matches!(self, Self::Role { .. })
	}

	/// Unquoted identifier used in resource ids (`user@host` or `role`)
	pub fn id(&self) -> String {
		match self {
			Self::User { user, host } => format!("{user}@{host}"),
			Self::Role { name } => name.clone(),
		}
	}
}

impl Display for Principal {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::User { user, host } => write!(f, "'{user}'@'{host}'"),
			Self::Role { name } => write!(f, "'{name}'"),
		}
	}
}

/// Render a role list as `'r1', 'r2'`
pub fn render_roles<'a>(roles: impl IntoIterator<Item = &'a String>) -> String {
	roles
		.into_iter()
		.map(|role| format!("'{role}'"))
		.collect::<Vec<_>>()
		.join(", ")
}
