//! `SHOW GRANTS` report grammar
//!
//! Each line of the report looks like one of:
//!
//! ```text
//! GRANT USAGE ON *.* TO `u1`@`localhost`
//! GRANT SELECT, INSERT, UPDATE ON `db1`.* TO `u1`@`localhost`
//! GRANT SELECT (id, user) ON `db1`.`table1` TO 'u1'@'%' WITH GRANT OPTION
//! ```
//!
//! The grammar is an explicit value so that a dialect with a different report
//! format can be plugged in without touching the reconciliation logic.

use crate::error::{GrantError, Result};
use crate::identifier::{strip_database, strip_table};
use crate::privilege::{PrivilegeSet, parse_privileges};
use crate::scope::Scope;
use regex::Regex;
use std::sync::LazyLock;

/// One parsed line of the privilege report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantRecord {
	/// Scope with quote characters removed
	pub scope: Scope,
	/// Privileges granted on the scope
	pub privileges: PrivilegeSet,
	/// Whether the grant carries `WITH GRANT OPTION`
	pub grant_option: bool,
}

/// Report grammar with named capture groups
///
/// `line` must capture `privileges`, `database` and `table`. `grant_option`
/// is matched against the whole line.
#[derive(Debug, Clone)]
pub struct GrantGrammar {
	line: Regex,
	grant_option: Regex,
}

static MYSQL_GRAMMAR: LazyLock<GrantGrammar> = LazyLock::new(|| {
	GrantGrammar::new(
		r"^GRANT (?P<privileges>.+) ON (?P<database>.+?)\.(?P<table>.+?) TO",
		r"\bGRANT OPTION\b",
	)
	.expect("MySQL report grammar is valid")
});

impl GrantGrammar {
	/// Build a grammar from its two patterns
	pub fn new(line: &str, grant_option: &str) -> std::result::Result<Self, regex::Error> {
		Ok(Self {
			line: Regex::new(line)?,
			grant_option: Regex::new(grant_option)?,
		})
	}

	/// The MySQL / MariaDB report grammar
	pub fn mysql() -> &'static GrantGrammar {
		&MYSQL_GRAMMAR
	}

	/// Parse one report line
	///
	/// # Examples
	///
	/// ```
	/// use grantsync_core::grammar::GrantGrammar;
	///
	/// let record = GrantGrammar::mysql()
	/// 	.parse_line("GRANT SELECT, UPDATE ON `db1`.* TO `u1`@`localhost`")
	/// 	.unwrap();
	/// assert_eq!(record.scope.database(), "db1");
	/// assert_eq!(record.scope.table(), "*");
	/// assert!(record.privileges.contains("UPDATE"));
	/// assert!(!record.grant_option);
	/// ```
	pub fn parse_line(&self, line: &str) -> Result<GrantRecord> {
		let captures = self
			.line
			.captures(line)
			.ok_or_else(|| GrantError::Parse(line.to_string()))?;
		let group = |name: &str| {
			captures
				.name(name)
				.map(|m| m.as_str())
				.ok_or_else(|| GrantError::Parse(line.to_string()))
		};

		let privileges = parse_privileges(group("privileges")?);
		let scope = Scope::new(
			strip_database(group("database")?),
			strip_table(group("table")?),
		);

		Ok(GrantRecord {
			scope,
			privileges: privileges.into_iter().collect(),
			grant_option: self.grant_option.is_match(line),
		})
	}

	/// Parse every line of a report, failing on the first malformed line
	pub fn parse_report<I, S>(&self, lines: I) -> Result<Vec<GrantRecord>>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		lines
			.into_iter()
			.map(|line| self.parse_line(line.as_ref()))
			.collect()
	}
}

impl Default for GrantGrammar {
	fn default() -> Self {
		Self::mysql().clone()
	}
}
