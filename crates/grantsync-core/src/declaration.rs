//! Desired grant state
//!
//! [`GrantsDeclaration`] is the raw, deserializable form supplied by the
//! caller. It is validated once into a [`Principal`] and a list of
//! [`DesiredGrantSpec`] values; nothing downstream inspects the raw form.

use crate::capability::ServerCapabilities;
use crate::error::{GrantError, Result};
use crate::grammar::GrantRecord;
use crate::identifier::{QUOTE, WILDCARD, format_database};
use crate::principal::{Principal, render_roles};
use crate::privilege::{PrivilegeSet, normalize_privileges, render_privileges};
use crate::scope::Scope;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Default host of a declared user
pub const DEFAULT_HOST: &str = "localhost";

/// Default `REQUIRE` option
pub const DEFAULT_TLS_OPTION: &str = "NONE";

/// What a grant hands out: privileges on a scope, or roles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grantables {
	Privileges(PrivilegeSet),
	Roles(BTreeSet<String>),
}

impl Grantables {
	/// Normalized privilege set
	pub fn privileges<I, S>(tokens: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Self::Privileges(normalize_privileges(tokens))
	}

	/// Role set, blank names dropped
	pub fn roles<I, S>(names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Self::Roles(
			names
				.into_iter()
				.map(|name| name.as_ref().trim().to_string())
				.filter(|name| !name.is_empty())
				.collect(),
		)
	}

	pub fn is_roles(&self) -> bool {
		matches!(self, Self::Roles(_))
	}

	pub fn is_empty(&self) -> bool {
		match self {
			Self::Privileges(set) | Self::Roles(set) => set.is_empty(),
		}
	}

	/// Comma joined list as it appears in a statement
	pub fn render(&self) -> String {
		match self {
			Self::Privileges(set) => render_privileges(set),
			Self::Roles(set) => render_roles(set),
		}
	}
}

/// One validated grant of the desired state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredGrantSpec {
	pub scope: Scope,
	pub grantables: Grantables,
	pub grant_option: bool,
	pub tls_option: String,
}

impl DesiredGrantSpec {
	/// Validate one raw grant
	///
	/// Exactly one of `privileges` and `roles` must be non-empty.
	pub fn from_input(input: &GrantSpecInput, tls_option: &str) -> Result<Self> {
		let has_privileges = input.privileges.iter().any(|p| !p.trim().is_empty());
		let has_roles = input.roles.iter().any(|r| !r.trim().is_empty());

		let grantables = match (has_privileges, has_roles) {
			(true, false) => Grantables::privileges(&input.privileges),
			(false, true) => Grantables::roles(&input.roles),
			(true, true) => {
				return Err(GrantError::ConflictingGrantables {
					database: input.database.clone(),
				});
			}
			(false, false) => return Err(GrantError::MissingGrantables),
		};

		Ok(Self {
			scope: Scope::new(input.database.clone(), input.table.clone()),
			grantables,
			grant_option: input.grant,
			tls_option: tls_option.to_string(),
		})
	}

	pub fn is_role_based(&self) -> bool {
		self.grantables.is_roles()
	}

	/// Declared privileges, empty for a role-based spec
	pub fn privileges(&self) -> PrivilegeSet {
		match &self.grantables {
			Grantables::Privileges(set) => set.clone(),
			Grantables::Roles(_) => PrivilegeSet::new(),
		}
	}

	/// Declared roles, empty for a privilege-based spec
	pub fn roles(&self) -> BTreeSet<String> {
		match &self.grantables {
			Grantables::Roles(set) => set.clone(),
			Grantables::Privileges(_) => BTreeSet::new(),
		}
	}
}

fn default_table() -> String {
	WILDCARD.to_string()
}

fn default_host() -> String {
	DEFAULT_HOST.to_string()
}

fn default_tls_option() -> String {
	DEFAULT_TLS_OPTION.to_string()
}

/// Raw grant as declared by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantSpecInput {
	pub database: String,
	#[serde(default = "default_table")]
	pub table: String,
	#[serde(default)]
	pub privileges: Vec<String>,
	#[serde(default)]
	pub roles: Vec<String>,
	#[serde(default)]
	pub grant: bool,
}

impl GrantSpecInput {
	/// Privilege grant on `<database>.*`
	pub fn privileges<I, S>(database: impl Into<String>, privileges: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			database: database.into(),
			table: default_table(),
			privileges: privileges.into_iter().map(Into::into).collect(),
			roles: Vec::new(),
			grant: false,
		}
	}

	/// Role grant
	pub fn roles<I, S>(roles: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			database: WILDCARD.to_string(),
			table: default_table(),
			privileges: Vec::new(),
			roles: roles.into_iter().map(Into::into).collect(),
			grant: false,
		}
	}

	/// Raw grant reconstructed from a reported record
	///
	/// The database is stored formatted. The table stays bare since validation
	/// quotes it again.
	pub fn from_record(record: &GrantRecord) -> Self {
		Self {
			database: format_database(record.scope.database()),
			table: record.scope.table().to_string(),
			privileges: record.privileges.iter().cloned().collect(),
			roles: Vec::new(),
			grant: record.grant_option,
		}
	}

	pub fn table(mut self, table: impl Into<String>) -> Self {
		self.table = table.into();
		self
	}

	pub fn with_grant_option(mut self) -> Self {
		self.grant = true;
		self
	}
}

/// Desired grant state of one principal
///
/// ```
/// use grantsync_core::GrantsDeclaration;
///
/// let decl: GrantsDeclaration = toml::from_str(r#"
/// user = "app"
///
/// [[grants]]
/// database = "app_db"
/// privileges = ["SELECT", "UPDATE"]
/// "#).unwrap();
/// assert_eq!(decl.host, "localhost");
/// assert_eq!(decl.tls_option, "NONE");
/// assert_eq!(decl.grants[0].table, "*");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantsDeclaration {
	#[serde(default)]
	pub user: String,
	#[serde(default = "default_host")]
	pub host: String,
	#[serde(default)]
	pub role: String,
	#[serde(default = "default_tls_option")]
	pub tls_option: String,
	#[serde(default)]
	pub grants: Vec<GrantSpecInput>,
}

impl GrantsDeclaration {
	/// Declaration for a `user@host` account with no grants yet
	pub fn for_user(user: impl Into<String>, host: impl Into<String>) -> Self {
		Self {
			user: user.into(),
			host: host.into(),
			role: String::new(),
			tls_option: default_tls_option(),
			grants: Vec::new(),
		}
	}

	/// Declaration for a role with no grants yet
	pub fn for_role(role: impl Into<String>) -> Self {
		Self {
			user: String::new(),
			host: String::new(),
			role: role.into(),
			tls_option: default_tls_option(),
			grants: Vec::new(),
		}
	}

	pub fn grant(mut self, grant: GrantSpecInput) -> Self {
		self.grants.push(grant);
		self
	}

	pub fn tls_option(mut self, tls_option: impl Into<String>) -> Self {
		self.tls_option = tls_option.into();
		self
	}

	/// Resolve the declared principal
	pub fn principal(&self, capabilities: &ServerCapabilities) -> Result<Principal> {
		Principal::resolve(
			&self.user,
			&self.host,
			&self.role,
			capabilities.supports_roles,
		)
	}

	/// Validate every grant, in declared order
	pub fn specs(&self) -> Result<Vec<DesiredGrantSpec>> {
		self.grants
			.iter()
			.map(|grant| DesiredGrantSpec::from_input(grant, &self.tls_option))
			.collect()
	}

	/// Resolve the principal and validate every grant against the server
	///
	/// Fails before anything reaches the server when a role-based grant is
	/// declared on a server without role support.
	pub fn validate(&self, capabilities: &ServerCapabilities) -> Result<ValidatedGrants> {
		let principal = self.principal(capabilities)?;
		let specs = self.specs()?;
		if !capabilities.supports_roles && specs.iter().any(DesiredGrantSpec::is_role_based) {
			return Err(GrantError::RolesUnsupported);
		}
		Ok(ValidatedGrants { principal, specs })
	}
}

/// A declaration after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedGrants {
	pub principal: Principal,
	pub specs: Vec<DesiredGrantSpec>,
}

/// Resource identifier of a grant block or a single scoped grant
///
/// ```
/// use grantsync_core::GrantId;
///
/// let id: GrantId = "app@localhost:`app_db`".parse().unwrap();
/// assert_eq!(id.to_string(), "app@localhost:`app_db`");
/// assert_eq!(id.principal().to_string(), "'app'@'localhost'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GrantId {
	/// `user@host`
	User { user: String, host: String },
	/// `user@host:<database>`
	UserScope {
		user: String,
		host: String,
		database: String,
	},
	/// `role:<database>`
	RoleScope { role: String, database: String },
}

impl GrantId {
	/// Id of a grant block
	pub fn for_principal(principal: &Principal) -> Self {
		match principal {
			Principal::User { user, host } => Self::User {
				user: user.clone(),
				host: host.clone(),
			},
			Principal::Role { name } => Self::RoleScope {
				role: name.clone(),
				database: WILDCARD.to_string(),
			},
		}
	}

	/// Id of a single scoped grant; the database is stored formatted
	pub fn for_scope(principal: &Principal, scope: &Scope) -> Self {
		let database = scope.formatted_database();
		match principal {
			Principal::User { user, host } => Self::UserScope {
				user: user.clone(),
				host: host.clone(),
				database,
			},
			Principal::Role { name } => Self::RoleScope {
				role: name.clone(),
				database,
			},
		}
	}

	/// Principal named by the id
	pub fn principal(&self) -> Principal {
		match self {
			Self::User { user, host } | Self::UserScope { user, host, .. } => {
				Principal::user(user.clone(), host.clone())
			}
			Self::RoleScope { role, .. } => Principal::Role { name: role.clone() },
		}
	}

	/// Database token of a scoped id
	pub fn database(&self) -> Option<&str> {
		match self {
			Self::User { .. } => None,
			Self::UserScope { database, .. } | Self::RoleScope { database, .. } => Some(database),
		}
	}
}

impl Display for GrantId {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::User { user, host } => write!(f, "{user}@{host}"),
			Self::UserScope {
				user,
				host,
				database,
			} => write!(f, "{user}@{host}:{database}"),
			Self::RoleScope { role, database } => write!(f, "{role}:{database}"),
		}
	}
}

impl FromStr for GrantId {
	type Err = GrantError;

	fn from_str(id: &str) -> Result<Self> {
		let invalid = || GrantError::InvalidGrantId(id.to_string());
		let Some(at) = id.rfind('@') else {
			let (role, database) = id.split_once(':').ok_or_else(invalid)?;
			if role.is_empty() || database.is_empty() {
				return Err(invalid());
			}
			return Ok(Self::RoleScope {
				role: role.to_string(),
				database: format_database(database),
			});
		};

		let (user, rest) = (&id[..at], &id[at + 1..]);
		if user.is_empty() {
			return Err(invalid());
		}
		let user = user.to_string();
		match split_host_database(rest) {
			None => Ok(Self::User {
				user,
				host: rest.to_string(),
			}),
			Some((_, "")) => Err(invalid()),
			Some((host, database)) => Ok(Self::UserScope {
				user,
				host: host.to_string(),
				database: format_database(database),
			}),
		}
	}
}

/// Split `<host>:<database>` where the host may itself hold colons (IPv6)
///
/// A quoted or wildcard database is always recognized. An unquoted one only
/// when the remainder has a single colon.
fn split_host_database(rest: &str) -> Option<(&str, &str)> {
	if rest.ends_with(QUOTE) {
		let open = rest.find(QUOTE)?;
		let colon = rest[..open].rfind(':')?;
		return Some((&rest[..colon], &rest[colon + 1..]));
	}
	if let Some(host) = rest.strip_suffix(":*") {
		return Some((host, WILDCARD));
	}
	match rest.matches(':').count() {
		1 => rest.split_once(':'),
		_ => None,
	}
}

/// Split a `USER@HOST` import id at its last `@`
///
/// The user part must be non-empty.
///
/// ```
/// use grantsync_core::declaration::split_user_host;
///
/// assert_eq!(
/// 	split_user_host("svc@corp@10.0.0.%").unwrap(),
/// 	("svc@corp".to_string(), "10.0.0.%".to_string())
/// );
/// assert!(split_user_host("@localhost").is_err());
/// ```
pub fn split_user_host(id: &str) -> Result<(String, String)> {
	match id.rfind('@') {
		Some(index) if index > 0 => Ok((id[..index].to_string(), id[index + 1..].to_string())),
		_ => Err(GrantError::InvalidImportId(id.to_string())),
	}
}
