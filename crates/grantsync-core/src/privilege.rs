//! Privilege clause parsing and normalization
//!
//! MySQL reports privileges as a comma separated clause such as
//! `SELECT, INSERT, CREATE TEMPORARY TABLES` or `SELECT (id, user), UPDATE`.
//! Column-qualified privileges are normalized so that their column list is
//! sorted; the order of the privileges themselves is preserved.
//!
//! ```
//! use grantsync_core::privilege::parse_privileges;
//!
//! assert_eq!(
//! 	parse_privileges("SELECT (user, id),UPDATE, DELETE"),
//! 	vec!["SELECT (id, user)", "UPDATE", "DELETE"]
//! );
//! ```

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Normalized set of privilege tokens, ordered for deterministic output
pub type PrivilegeSet = BTreeSet<String>;

/// Server spelling of the "every privilege" shorthand
pub const ALL_PRIVILEGES: &str = "ALL PRIVILEGES";

/// Token grammar for one privilege
///
/// `columns` matches a privilege followed by a parenthesized column list,
/// `name` matches a privilege name of one to three uppercase words.
static PRIVILEGE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?P<columns>[A-Z]+ ?\([a-zA-Z0-9_, `]+\))|(?P<name>[A-Z]+(?: [A-Z]+){0,2})")
		.expect("privilege token grammar is valid")
});

/// Split a privilege clause into normalized privilege tokens
///
/// Anything the grammar does not recognize (separators, lowercase text) is
/// skipped. Parsing the `, `-joined output again yields the same list.
pub fn parse_privileges(clause: &str) -> Vec<String> {
	PRIVILEGE_TOKEN
		.captures_iter(clause)
		.filter_map(|captures| {
			if let Some(columns) = captures.name("columns") {
				Some(sort_columns(columns.as_str()))
			} else {
				captures
					.name("name")
					.map(|name| name.as_str().trim().to_string())
			}
		})
		.collect()
}

/// Render a column-qualified privilege with its columns sorted
fn sort_columns(token: &str) -> String {
	let Some((action, columns)) = token.split_once('(') else {
		return token.trim().to_string();
	};
	let columns = columns.replacen(')', "", 1);
	let mut columns: Vec<&str> = columns.split(", ").collect();
	columns.sort_unstable();
	format!("{} ({})", action.trim(), columns.join(", "))
}

/// Join privilege tokens the way the server reports them
pub fn render_privileges<'a>(privileges: impl IntoIterator<Item = &'a String>) -> String {
	privileges
		.into_iter()
		.map(String::as_str)
		.collect::<Vec<_>>()
		.join(", ")
}

/// Normalize caller-declared privilege tokens into a comparable set
///
/// Each token goes through [`parse_privileges`]; a token the grammar cannot
/// read is kept as written (trimmed) so that it still reaches the server.
/// `ALL` is spelled `ALL PRIVILEGES`, matching the server report.
pub fn normalize_privileges<I, S>(tokens: I) -> PrivilegeSet
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut set = PrivilegeSet::new();
	for token in tokens {
		let token = token.as_ref().trim();
		if token.is_empty() {
			continue;
		}
		let parsed = parse_privileges(token);
		if parsed.is_empty() {
			set.insert(token.to_string());
		} else {
			set.extend(parsed.into_iter().map(|privilege| {
				if privilege == "ALL" {
					ALL_PRIVILEGES.to_string()
				} else {
					privilege
				}
			}));
		}
	}
	set
}
