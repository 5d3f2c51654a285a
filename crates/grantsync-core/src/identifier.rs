//! MySQL identifier formatting for grant scopes
//!
//! Grant scopes are written as `<database>.<table>`. The wildcard `*` is never
//! quoted, every other name is wrapped in backticks.
//!
//! Routine grants keep the `PROCEDURE` keyword outside the quoted name, so a
//! database token of `PROCEDURE mydb` is rendered as ``PROCEDURE `mydb` ``.
//!
//! ```
//! use grantsync_core::identifier::{format_database, format_table};
//!
//! assert_eq!(format_database("*"), "*");
//! assert_eq!(format_database("mydb"), "`mydb`");
//! assert_eq!(format_database("PROCEDURE mydb"), "PROCEDURE `mydb`");
//! assert_eq!(format_table(""), "*");
//! assert_eq!(format_table("t1"), "`t1`");
//! ```

/// The "all databases" / "all tables" wildcard
pub const WILDCARD: &str = "*";

/// Server identifier quote character
pub const QUOTE: char = '`';

const PROCEDURE_PREFIX: &str = "`PROCEDURE ";

/// Quote a database token for use in a grant scope
///
/// Names that already end with a backtick are taken as quoted by the caller
/// and returned unchanged.
pub fn format_database(name: &str) -> String {
	if name == WILDCARD || name.ends_with(QUOTE) {
		return name.to_string();
	}

	let quoted = format!("{QUOTE}{name}{QUOTE}");
	match quoted.strip_prefix(PROCEDURE_PREFIX) {
		Some(routine) => format!("PROCEDURE {QUOTE}{routine}"),
		None => quoted,
	}
}

/// Quote a table token for use in a grant scope
///
/// An empty name means "all tables".
pub fn format_table(name: &str) -> String {
	if name.is_empty() || name == WILDCARD {
		return WILDCARD.to_string();
	}
	format!("{QUOTE}{name}{QUOTE}")
}

/// Remove every quote character from a database token reported by the server
pub fn strip_database(raw: &str) -> String {
	raw.replace(QUOTE, "")
}

/// Remove the surrounding quote characters from a reported table token
pub fn strip_table(raw: &str) -> String {
	raw.trim_matches(QUOTE).to_string()
}
