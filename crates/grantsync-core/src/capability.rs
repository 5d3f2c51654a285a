//! Server capabilities that change which statements are legal

pub use semver::Version;

/// First server version with role support
pub const ROLE_SUPPORT_VERSION: Version = Version::new(8, 0, 0);

/// Capabilities of the connected server, probed once per pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerCapabilities {
	pub version: Version,
	pub supports_roles: bool,
}

impl ServerCapabilities {
	/// Derive capabilities from a server version
	pub fn from_version(version: Version) -> Self {
		let supports_roles = version >= ROLE_SUPPORT_VERSION;
		Self {
			version,
			supports_roles,
		}
	}

	/// Parse the text returned by `SELECT VERSION()`
	///
	/// Only the leading `major[.minor[.patch]]` numbers are read, so vendor
	/// suffixes such as `-MariaDB` or `-log` are ignored. Returns `None` when
	/// the text does not start with a number.
	///
	/// ```
	/// use grantsync_core::ServerCapabilities;
	///
	/// let caps = ServerCapabilities::parse("8.0.36-0ubuntu0.22.04.1").unwrap();
	/// assert!(caps.supports_roles);
	/// let caps = ServerCapabilities::parse("5.7.44-log").unwrap();
	/// assert!(!caps.supports_roles);
	/// ```
	pub fn parse(text: &str) -> Option<Self> {
		parse_version(text).map(Self::from_version)
	}

	/// `REQUIRE <tls>` may be appended to a GRANT
	pub fn allows_require_clause(&self) -> bool {
		!self.supports_roles
	}

	/// `WITH GRANT OPTION` may be appended to a GRANT
	pub fn allows_grant_option_clause(&self) -> bool {
		!self.supports_roles
	}
}

fn parse_version(text: &str) -> Option<Version> {
	let numeric: String = text
		.trim()
		.chars()
		.take_while(|c| c.is_ascii_digit() || *c == '.')
		.collect();
	let mut parts = numeric
		.split('.')
		.filter(|part| !part.is_empty())
		.map(str::parse::<u64>);

	let major = parts.next()?.ok()?;
	let minor = parts.next().and_then(|p| p.ok()).unwrap_or(0);
	let patch = parts.next().and_then(|p| p.ok()).unwrap_or(0);
	Some(Version::new(major, minor, patch))
}
