//! Engine listing model for the API layer

use serde::{Deserialize, Serialize};

use super::EngineDescriptor;

/// Public view of a configured engine; credentials are never included
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineResponse {
	pub name: String,
	#[serde(rename = "adapterId")]
	pub adapter_id: String,
	pub endpoint: String,
	#[serde(rename = "timeoutMs")]
	pub timeout_ms: u64,
	pub enabled: bool,
	#[serde(rename = "hasCredential")]
	pub has_credential: bool,
}

impl From<&EngineDescriptor> for EngineResponse {
	fn from(descriptor: &EngineDescriptor) -> Self {
		Self {
			name: descriptor.name.clone(),
			adapter_id: descriptor.adapter_id.clone(),
			endpoint: descriptor.endpoint.clone(),
			timeout_ms: descriptor.timeout_ms(),
			enabled: descriptor.enabled,
			has_credential: descriptor.credential.is_some(),
		}
	}
}
