//! Shared mocks and fixtures for integration tests

pub mod engines;
pub mod fixtures;
pub mod test_server;

#[allow(unused_imports)]
pub use engines::StubEngine;
#[allow(unused_imports)]
pub use fixtures::{engine_config, settings_with_engines};
#[allow(unused_imports)]
pub use test_server::TestServer;
