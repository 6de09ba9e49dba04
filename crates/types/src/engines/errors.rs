//! Error types for engine configuration

use thiserror::Error;

/// Validation errors for a single engine descriptor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineValidationError {
	#[error("Invalid engine name: '{name}'")]
	InvalidName { name: String },

	#[error("Invalid adapter ID: '{adapter_id}'")]
	InvalidAdapterId { adapter_id: String },

	#[error("Invalid endpoint URL: {endpoint} - {reason}")]
	InvalidEndpoint { endpoint: String, reason: String },

	#[error("Invalid timeout: {timeout_ms}ms (must be between {min}ms and {max}ms)")]
	InvalidTimeout { timeout_ms: u64, min: u64, max: u64 },
}

/// Registry-level configuration errors
///
/// These are fatal at startup. When one is observed while serving a request
/// it is surfaced as an internal error, never swallowed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
	#[error("Duplicate engine name: '{name}'")]
	DuplicateEngine { name: String },

	#[error("Engine '{name}' is invalid: {source}")]
	InvalidEngine {
		name: String,
		#[source]
		source: EngineValidationError,
	},

	#[error("No enabled engines configured")]
	NoEnabledEngines,

	#[error("Engine '{engine}' references unknown adapter '{adapter_id}'")]
	UnknownAdapter { engine: String, adapter_id: String },
}
