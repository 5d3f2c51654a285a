//! # grantsync-conf
//!
//! Connection settings and grant declaration loading.
//!
//! ```no_run
//! use grantsync_conf::{ConnectionSettings, load_declaration};
//!
//! let settings = ConnectionSettings::from_toml_file("grantsync.toml")?
//! 	.with_env_overrides()?;
//! let declaration = load_declaration("grants/app.toml")?;
//! println!("{} -> {} grants", settings.masked_url(), declaration.grants.len());
//! # Ok::<(), grantsync_conf::ConfigError>(())
//! ```

pub mod declaration;
pub mod error;
pub mod settings;

pub use declaration::{load_declaration, parse_declaration};
pub use error::{ConfigError, Result};
pub use settings::{ConnectionSettings, ENV_PREFIX, TLS_MODES};
