//! GRANT / REVOKE statement builders
//!
//! ```
//! use grantsync_core::statement::{GrantStatement, RevokeStatement};
//! use grantsync_core::{Grantables, Principal, Scope};
//!
//! let principal = Principal::user("app", "localhost");
//! let grant = GrantStatement::new(principal.clone(), Grantables::privileges(["SELECT", "UPDATE"]))
//! 	.on(Scope::all_tables("app_db"))
//! 	.require("SSL")
//! 	.with_grant_option();
//! assert_eq!(
//! 	grant.build(),
//! 	"GRANT SELECT, UPDATE ON `app_db`.* TO 'app'@'localhost' REQUIRE SSL WITH GRANT OPTION"
//! );
//!
//! let revoke = RevokeStatement::all(principal).on(Scope::all_tables("app_db"));
//! assert_eq!(revoke.build(), "REVOKE ALL ON `app_db`.* FROM 'app'@'localhost'");
//! ```

use crate::declaration::Grantables;
use crate::principal::Principal;
use crate::scope::Scope;
use std::fmt::{self, Display, Formatter};

/// GRANT statement builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantStatement {
	principal: Principal,
	grantables: Grantables,
	scope: Option<Scope>,
	require: Option<String>,
	grant_option: bool,
}

impl GrantStatement {
	pub fn new(principal: Principal, grantables: Grantables) -> Self {
		Self {
			principal,
			grantables,
			scope: None,
			require: None,
			grant_option: false,
		}
	}

	/// Add the `ON <scope>` clause
	pub fn on(mut self, scope: Scope) -> Self {
		self.scope = Some(scope);
		self
	}

	/// Add the `REQUIRE <tls>` clause
	pub fn require(mut self, tls_option: impl Into<String>) -> Self {
		self.require = Some(tls_option.into());
		self
	}

	/// Add `WITH GRANT OPTION`
	pub fn with_grant_option(mut self) -> Self {
		self.grant_option = true;
		self
	}

	/// Build the SQL statement
	pub fn build(&self) -> String {
		let mut sql = format!("GRANT {}", self.grantables.render());
		if let Some(scope) = &self.scope {
			sql.push_str(" ON ");
			sql.push_str(&scope.to_string());
		}
		sql.push_str(" TO ");
		sql.push_str(&self.principal.to_string());
		if let Some(tls_option) = &self.require {
			sql.push_str(" REQUIRE ");
			sql.push_str(tls_option);
		}
		if self.grant_option {
			sql.push_str(" WITH GRANT OPTION");
		}
		sql
	}
}

/// What a REVOKE statement takes away
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revocable {
	Grantables(Grantables),
	/// `ALL` on the scope
	All,
}

/// REVOKE statement builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevokeStatement {
	principal: Principal,
	what: Revocable,
	scope: Option<Scope>,
}

impl RevokeStatement {
	pub fn new(principal: Principal, grantables: Grantables) -> Self {
		Self {
			principal,
			what: Revocable::Grantables(grantables),
			scope: None,
		}
	}

	/// `REVOKE ALL`
	pub fn all(principal: Principal) -> Self {
		Self {
			principal,
			what: Revocable::All,
			scope: None,
		}
	}

	/// Add the `ON <scope>` clause
	pub fn on(mut self, scope: Scope) -> Self {
		self.scope = Some(scope);
		self
	}

	/// Build the SQL statement
	pub fn build(&self) -> String {
		let what = match &self.what {
			Revocable::Grantables(grantables) => grantables.render(),
			Revocable::All => "ALL".to_string(),
		};
		let mut sql = format!("REVOKE {what}");
		if let Some(scope) = &self.scope {
			sql.push_str(" ON ");
			sql.push_str(&scope.to_string());
		}
		sql.push_str(" FROM ");
		sql.push_str(&self.principal.to_string());
		sql
	}
}

/// REVOKE GRANT OPTION statement builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevokeGrantOptionStatement {
	principal: Principal,
	scope: Scope,
}

impl RevokeGrantOptionStatement {
	pub fn new(principal: Principal, scope: Scope) -> Self {
		Self { principal, scope }
	}

	/// Build the SQL statement
	pub fn build(&self) -> String {
		format!(
			"REVOKE GRANT OPTION ON {} FROM {}",
			self.scope, self.principal
		)
	}
}

/// SHOW GRANTS statement builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowGrantsStatement {
	principal: Principal,
}

impl ShowGrantsStatement {
	pub fn new(principal: Principal) -> Self {
		Self { principal }
	}

	/// Build the SQL statement
	pub fn build(&self) -> String {
		format!("SHOW GRANTS FOR {}", self.principal)
	}
}

/// A privilege-mutating statement emitted by the planner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
	Grant(GrantStatement),
	Revoke(RevokeStatement),
	RevokeGrantOption(RevokeGrantOptionStatement),
}

impl Statement {
	/// Render the statement as SQL
	pub fn to_sql(&self) -> String {
		match self {
			Self::Grant(stmt) => stmt.build(),
			Self::Revoke(stmt) => stmt.build(),
			Self::RevokeGrantOption(stmt) => stmt.build(),
		}
	}

	pub fn is_revoke_grant_option(&self) -> bool {
		matches!(self, Self::RevokeGrantOption(_))
	}
}

impl Display for Statement {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_sql())
	}
}

impl From<GrantStatement> for Statement {
	fn from(stmt: GrantStatement) -> Self {
		Self::Grant(stmt)
	}
}

impl From<RevokeStatement> for Statement {
	fn from(stmt: RevokeStatement) -> Self {
		Self::Revoke(stmt)
	}
}

impl From<RevokeGrantOptionStatement> for Statement {
	fn from(stmt: RevokeGrantOptionStatement) -> Self {
		Self::RevokeGrantOption(stmt)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn user() -> Principal {
		Principal::user("jdoe", "example.com")
	}

	#[fixture]
	fn role() -> Principal {
		Principal::Role {
			name: "reader".to_string(),
		}
	}

	#[rstest]
	fn test_grant_privileges(user: Principal) {
		let stmt = GrantStatement::new(user, Grantables::privileges(["UPDATE", "SELECT"]))
			.on(Scope::new("db1", "t1"));
		assert_eq!(
			stmt.build(),
			"GRANT SELECT, UPDATE ON `db1`.`t1` TO 'jdoe'@'example.com'"
		);
	}

	#[rstest]
	fn test_grant_roles_has_no_scope(user: Principal) {
		let stmt = GrantStatement::new(user, Grantables::roles(["r2", "r1"]));
		assert_eq!(stmt.build(), "GRANT 'r1', 'r2' TO 'jdoe'@'example.com'");
	}

	#[rstest]
	fn test_grant_to_role(role: Principal) {
		let stmt =
			GrantStatement::new(role, Grantables::privileges(["SELECT"])).on(Scope::global());
		assert_eq!(stmt.build(), "GRANT SELECT ON *.* TO 'reader'");
	}

	#[rstest]
	fn test_revoke_privileges(user: Principal) {
		let stmt = RevokeStatement::new(user, Grantables::privileges(["DELETE", "ALTER"]))
			.on(Scope::all_tables("db1"));
		assert_eq!(
			stmt.build(),
			"REVOKE ALTER, DELETE ON `db1`.* FROM 'jdoe'@'example.com'"
		);
	}

	#[rstest]
	fn test_revoke_roles(role: Principal) {
		let stmt = RevokeStatement::new(role, Grantables::roles(["admin"]));
		assert_eq!(stmt.build(), "REVOKE 'admin' FROM 'reader'");
	}

	#[rstest]
	fn test_revoke_grant_option(user: Principal) {
		let stmt = RevokeGrantOptionStatement::new(user, Scope::new("PROCEDURE db1", "p1"));
		assert_eq!(
			stmt.build(),
			"REVOKE GRANT OPTION ON PROCEDURE `db1`.`p1` FROM 'jdoe'@'example.com'"
		);
	}

	#[rstest]
	fn test_show_grants(user: Principal, role: Principal) {
		assert_eq!(
			ShowGrantsStatement::new(user).build(),
			"SHOW GRANTS FOR 'jdoe'@'example.com'"
		);
		assert_eq!(
			ShowGrantsStatement::new(role).build(),
			"SHOW GRANTS FOR 'reader'"
		);
	}

	#[rstest]
	fn test_statement_display_matches_builder(user: Principal) {
		let stmt: Statement = RevokeStatement::all(user.clone())
			.on(Scope::global())
			.into();
		assert_eq!(stmt.to_string(), "REVOKE ALL ON *.* FROM 'jdoe'@'example.com'");
		assert!(!stmt.is_revoke_grant_option());

		let stmt: Statement = RevokeGrantOptionStatement::new(user, Scope::global()).into();
		assert!(stmt.is_revoke_grant_option());
	}
}
