use grantsync_core::capability::Version;
use grantsync_core::{Principal, ServerCapabilities};
use rstest::*;
use std::sync::Arc;

use crate::recording::RecordingBackend;

/// Recording backend for a server without role support
#[fixture]
pub fn legacy_server() -> Arc<RecordingBackend> {
	Arc::new(RecordingBackend::mysql57())
}

/// Recording backend for a server with role support
#[fixture]
pub fn modern_server() -> Arc<RecordingBackend> {
	Arc::new(RecordingBackend::mysql8())
}

#[fixture]
pub fn legacy_capabilities() -> ServerCapabilities {
	ServerCapabilities::from_version(Version::new(5, 7, 44))
}

#[fixture]
pub fn modern_capabilities() -> ServerCapabilities {
	ServerCapabilities::from_version(Version::new(8, 0, 36))
}

/// `'jdoe'@'%'`
#[fixture]
pub fn test_user() -> Principal {
	Principal::user("jdoe", "%")
}
