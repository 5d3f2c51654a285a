//! rstest fixtures for grantsync tests

mod mock;
mod server;

pub use mock::*;
pub use server::*;
