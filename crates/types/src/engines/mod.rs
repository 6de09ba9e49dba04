//! Engine descriptor domain model

use std::collections::HashMap;
use std::time::Duration;

use url::Url;

use crate::constants::limits::{MAX_ENGINE_TIMEOUT_MS, MIN_ENGINE_TIMEOUT_MS};
use crate::models::SecretString;

pub mod errors;
pub mod response;

pub use errors::{ConfigError, EngineValidationError};
pub use response::EngineResponse;

pub type EngineValidationResult<T> = Result<T, EngineValidationError>;

/// Adapter used when a descriptor does not name one
pub const DEFAULT_ADAPTER_ID: &str = "http-json";

/// Static description of one backend engine
///
/// Descriptors are loaded once at startup into the engine registry and are
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineDescriptor {
	/// Unique engine name, used for attribution in outcomes
	pub name: String,

	/// ID of the adapter that speaks this engine's protocol
	pub adapter_id: String,

	/// Engine endpoint URI
	pub endpoint: String,

	/// Resolved credential sent with each call, if any
	pub credential: Option<SecretString>,

	/// Per-call timeout budget
	pub timeout_budget: Duration,

	/// Disabled engines are kept in the registry but never dispatched
	pub enabled: bool,

	/// Extra HTTP headers sent with each call
	pub headers: Option<HashMap<String, String>>,
}

impl EngineDescriptor {
	/// Create an enabled descriptor using the default adapter
	pub fn new(name: impl Into<String>, endpoint: impl Into<String>, timeout_ms: u64) -> Self {
		Self {
			name: name.into(),
			adapter_id: DEFAULT_ADAPTER_ID.to_string(),
			endpoint: endpoint.into(),
			credential: None,
			timeout_budget: Duration::from_millis(timeout_ms),
			enabled: true,
			headers: None,
		}
	}

	pub fn with_adapter(mut self, adapter_id: impl Into<String>) -> Self {
		self.adapter_id = adapter_id.into();
		self
	}

	pub fn with_credential(mut self, credential: SecretString) -> Self {
		self.credential = Some(credential);
		self
	}

	pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
		self.headers = Some(headers);
		self
	}

	pub fn disabled(mut self) -> Self {
		self.enabled = false;
		self
	}

	pub fn timeout_ms(&self) -> u64 {
		self.timeout_budget.as_millis() as u64
	}

	/// Validate the descriptor's fields
	pub fn validate(&self) -> EngineValidationResult<()> {
		if self.name.is_empty()
			|| !self
				.name
				.chars()
				.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
		{
			return Err(EngineValidationError::InvalidName {
				name: self.name.clone(),
			});
		}

		if self.adapter_id.trim().is_empty() {
			return Err(EngineValidationError::InvalidAdapterId {
				adapter_id: self.adapter_id.clone(),
			});
		}

		let url = Url::parse(&self.endpoint).map_err(|e| EngineValidationError::InvalidEndpoint {
			endpoint: self.endpoint.clone(),
			reason: e.to_string(),
		})?;
		if !matches!(url.scheme(), "http" | "https") {
			return Err(EngineValidationError::InvalidEndpoint {
				endpoint: self.endpoint.clone(),
				reason: format!("unsupported scheme '{}'", url.scheme()),
			});
		}

		let timeout_ms = self.timeout_ms();
		if !(MIN_ENGINE_TIMEOUT_MS..=MAX_ENGINE_TIMEOUT_MS).contains(&timeout_ms) {
			return Err(EngineValidationError::InvalidTimeout {
				timeout_ms,
				min: MIN_ENGINE_TIMEOUT_MS,
				max: MAX_ENGINE_TIMEOUT_MS,
			});
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_valid_descriptor() {
		let engine = EngineDescriptor::new("search-a", "https://a.example.com/query", 1500);
		assert!(engine.validate().is_ok());
		assert_eq!(engine.adapter_id, DEFAULT_ADAPTER_ID);
		assert!(engine.enabled);
		assert_eq!(engine.timeout_ms(), 1500);
	}

	#[test]
	fn test_invalid_names() {
		for name in ["", "has space", "slash/name"] {
			let engine = EngineDescriptor::new(name, "http://localhost:8080", 1000);
			assert!(matches!(
				engine.validate(),
				Err(EngineValidationError::InvalidName { .. })
			));
		}
	}

	#[test]
	fn test_invalid_endpoint() {
		let engine = EngineDescriptor::new("a", "not a url", 1000);
		assert!(matches!(
			engine.validate(),
			Err(EngineValidationError::InvalidEndpoint { .. })
		));

		let engine = EngineDescriptor::new("a", "ftp://files.example.com", 1000);
		assert!(matches!(
			engine.validate(),
			Err(EngineValidationError::InvalidEndpoint { .. })
		));
	}

	#[test]
	fn test_timeout_bounds() {
		let engine = EngineDescriptor::new("a", "http://localhost", MIN_ENGINE_TIMEOUT_MS - 1);
		assert!(matches!(
			engine.validate(),
			Err(EngineValidationError::InvalidTimeout { .. })
		));

		let engine = EngineDescriptor::new("a", "http://localhost", MAX_ENGINE_TIMEOUT_MS + 1);
		assert!(engine.validate().is_err());
	}

	#[test]
	fn test_response_hides_credential() {
		let engine = EngineDescriptor::new("a", "http://localhost", 1000)
			.with_credential(SecretString::from("token-123"));
		let response = EngineResponse::from(&engine);
		assert!(response.has_credential);

		let json = serde_json::to_string(&response).unwrap();
		assert!(!json.contains("token-123"));
		assert!(json.contains("\"adapterId\":\"http-json\""));
	}
}
