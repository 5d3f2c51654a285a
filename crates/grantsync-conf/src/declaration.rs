//! Grant declarations stored as TOML

use grantsync_core::GrantsDeclaration;
use std::path::Path;

use crate::error::{ConfigError, Result};

/// Parse a declaration from TOML text
///
/// ```
/// use grantsync_conf::parse_declaration;
///
/// let decl = parse_declaration(r#"
/// user = "app"
/// host = "%"
///
/// [[grants]]
/// database = "app_db"
/// privileges = ["SELECT", "INSERT"]
///
/// [[grants]]
/// database = "*"
/// roles = ["reporting"]
/// "#).unwrap();
///
/// assert_eq!(decl.grants.len(), 2);
/// assert_eq!(decl.grants[1].roles, vec!["reporting"]);
/// ```
pub fn parse_declaration(text: &str) -> Result<GrantsDeclaration> {
	Ok(toml::from_str(text)?)
}

/// Read a declaration from a TOML file
pub fn load_declaration(path: impl AsRef<Path>) -> Result<GrantsDeclaration> {
	let path = path.as_ref();
	let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
		path: path.to_path_buf(),
		source,
	})?;
	let declaration = parse_declaration(&text)?;
	tracing::debug!(
		path = %path.display(),
		grants = declaration.grants.len(),
		"Loaded grant declaration"
	);
	Ok(declaration)
}
