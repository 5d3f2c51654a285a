//! # grantsync test
//!
//! Testing utilities for grantsync.
//!
//! - **[`RecordingBackend`]**: scripted in-memory backend that records the
//!   statements it receives, for ordered statement assertions
//! - **[`fixtures::MockGrantBackend`]**: mockall mock of the backend trait
//! - **rstest fixtures**: servers with and without role support, mock
//!   connections, a default test principal
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use grantsync_db::GrantConnection;
//! use grantsync_test::fixtures::legacy_server;
//! use grantsync_test::RecordingBackend;
//! use rstest::rstest;
//! use std::sync::Arc;
//!
//! #[rstest]
//! #[tokio::test]
//! async fn test_create(legacy_server: Arc<RecordingBackend>) {
//! 	let connection = GrantConnection::new(legacy_server.clone());
//! 	// ... run a reconciliation pass ...
//! 	assert_eq!(legacy_server.statements().len(), 1);
//! }
//! ```

pub mod fixtures;
pub mod recording;

pub use recording::RecordingBackend;
