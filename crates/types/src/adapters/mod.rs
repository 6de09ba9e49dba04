//! Adapter seam between the engine client and engine protocols

use std::collections::HashMap;

use crate::engines::EngineDescriptor;
use crate::models::SecretString;

pub mod errors;
pub mod traits;

pub use errors::EngineError;
pub use traits::EngineAdapter;

/// Result type for adapter operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Minimal runtime configuration needed by adapters
///
/// Only the fields an adapter needs to place a call; registry concerns such
/// as `enabled` stay on the descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineRuntimeConfig {
	pub engine_name: String,
	pub endpoint: String,
	pub timeout_ms: u64,
	pub credential: Option<SecretString>,
	pub headers: Option<HashMap<String, String>>,
}

impl From<&EngineDescriptor> for EngineRuntimeConfig {
	fn from(descriptor: &EngineDescriptor) -> Self {
		Self {
			engine_name: descriptor.name.clone(),
			endpoint: descriptor.endpoint.clone(),
			timeout_ms: descriptor.timeout_ms(),
			credential: descriptor.credential.clone(),
			headers: descriptor.headers.clone(),
		}
	}
}

/// Adapter identity
#[derive(Debug, Clone, PartialEq)]
pub struct Adapter {
	/// Unique identifier engines use to select this adapter
	pub adapter_id: String,
	pub name: String,
	pub description: Option<String>,
	pub version: String,
}

impl Adapter {
	pub fn new(adapter_id: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			adapter_id: adapter_id.into(),
			name: name.into(),
			description: None,
			version: "1.0.0".to_string(),
		}
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}
}
