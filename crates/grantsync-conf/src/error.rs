//! Configuration errors

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("Failed to read {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Invalid TOML: {0}")]
	Toml(#[from] toml::de::Error),

	/// A setting holds a value that cannot be used
	#[error("Invalid value for {key}: {value}")]
	InvalidValue { key: String, value: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
