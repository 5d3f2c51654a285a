//! Server capability probe

use grantsync_core::ServerCapabilities;

use crate::backend::GrantBackend;
use crate::error::{BackendError, Result};

/// Read the server version and derive its capabilities
pub async fn probe_capabilities(backend: &dyn GrantBackend) -> Result<ServerCapabilities> {
	let version = backend.server_version().await?;
	let capabilities =
		ServerCapabilities::parse(&version).ok_or_else(|| BackendError::Version(version.clone()))?;

	tracing::info!(
		version = %capabilities.version,
		supports_roles = capabilities.supports_roles,
		"Probed server capabilities"
	);
	Ok(capabilities)
}
