//! Grant scopes (`<database>.<table>`)

use crate::identifier::{WILDCARD, format_database, format_table};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};

/// The object a set of privileges applies to
///
/// Names are kept as supplied. Identity is defined on the formatted
/// (quoted) pair, so `mydb` and `` `mydb` `` denote the same scope.
///
/// ```
/// use grantsync_core::Scope;
///
/// let scope = Scope::new("mydb", "");
/// assert_eq!(scope.to_string(), "`mydb`.*");
/// assert_eq!(scope, Scope::new("`mydb`", "*"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scope {
	database: String,
	table: String,
}

impl Scope {
	/// Create a scope from a database and table name
	///
	/// An empty table name means every table of the database.
	pub fn new(database: impl Into<String>, table: impl Into<String>) -> Self {
		Self {
			database: database.into(),
			table: table.into(),
		}
	}

	/// `*.*`
	pub fn global() -> Self {
		Self::new(WILDCARD, WILDCARD)
	}

	/// `<database>.*`
	pub fn all_tables(database: impl Into<String>) -> Self {
		Self::new(database, WILDCARD)
	}

	/// Database name as supplied
	pub fn database(&self) -> &str {
		&self.database
	}

	/// Table name as supplied
	pub fn table(&self) -> &str {
		&self.table
	}

	/// Quoted database token
	pub fn formatted_database(&self) -> String {
		format_database(&self.database)
	}

	/// Quoted table token
	pub fn formatted_table(&self) -> String {
		format_table(&self.table)
	}

	/// Identity key of the scope
	pub fn key(&self) -> (String, String) {
		(self.formatted_database(), self.formatted_table())
	}
}

impl Display for Scope {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}", self.formatted_database(), self.formatted_table())
	}
}

impl PartialEq for Scope {
	fn eq(&self, other: &Self) -> bool {
		self.key() == other.key()
	}
}

impl Eq for Scope {}

impl Hash for Scope {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.key().hash(state);
	}
}

impl PartialOrd for Scope {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Scope {
	fn cmp(&self, other: &Self) -> Ordering {
		self.key().cmp(&other.key())
	}
}
