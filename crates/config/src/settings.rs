//! Configuration settings structures

use crate::configurable_value::{ConfigurableValue, ConfigurableValueError};
use fanout_types::constants::limits::{
	DEFAULT_CACHE_CLEANUP_INTERVAL_SECS, DEFAULT_CACHE_TTL_SECS, DEFAULT_ENGINE_TIMEOUT_MS,
	DEFAULT_GLOBAL_CEILING_MS, DEFAULT_MAX_QUERY_LENGTH, DEFAULT_RATE_LIMIT_REQUESTS_PER_MINUTE,
	MAX_CACHE_TTL_SECS,
};
use fanout_types::{EngineDescriptor, DEFAULT_ADAPTER_ID};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Main application settings
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
	pub server: ServerSettings,
	/// Engines in dispatch order
	pub engines: Vec<EngineConfig>,
	pub timeouts: TimeoutSettings,
	pub cache: CacheSettings,
	pub query: QuerySettings,
	pub circuit_breaker: CircuitBreakerSettings,
	pub environment: EnvironmentSettings,
	pub logging: LoggingSettings,
}

/// Server configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
	pub host: String,
	pub port: u16,
}

/// Individual engine configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineConfig {
	pub name: String,
	#[serde(default = "default_adapter_id")]
	pub adapter_id: String,
	pub endpoint: String,
	/// Where to read the engine credential from
	#[serde(default)]
	pub credential_ref: Option<ConfigurableValue>,
	#[serde(default = "default_engine_timeout_ms")]
	pub timeout_ms: u64,
	#[serde(default = "default_enabled")]
	pub enabled: bool,
	#[serde(default)]
	pub headers: Option<HashMap<String, String>>,
}

fn default_adapter_id() -> String {
	DEFAULT_ADAPTER_ID.to_string()
}

fn default_engine_timeout_ms() -> u64 {
	DEFAULT_ENGINE_TIMEOUT_MS
}

fn default_enabled() -> bool {
	true
}

impl EngineConfig {
	/// Build the domain descriptor, resolving the credential reference
	pub fn to_descriptor(&self) -> Result<EngineDescriptor, ConfigValidationError> {
		let credential = self
			.credential_ref
			.as_ref()
			.map(|reference| reference.resolve_secret())
			.transpose()
			.map_err(|source| ConfigValidationError::Credential {
				engine: self.name.clone(),
				source,
			})?;

		Ok(EngineDescriptor {
			name: self.name.clone(),
			adapter_id: self.adapter_id.clone(),
			endpoint: self.endpoint.clone(),
			credential,
			timeout_budget: Duration::from_millis(self.timeout_ms),
			enabled: self.enabled,
			headers: self.headers.clone(),
		})
	}
}

/// Timeout configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TimeoutSettings {
	/// Hard ceiling on total dispatch time in milliseconds
	///
	/// The effective ceiling is the smaller of this and the largest enabled
	/// engine budget.
	pub global_ceiling_ms: u64,
}

/// Response cache configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CacheSettings {
	pub enabled: bool,
	pub ttl_secs: u64,
	/// Maximum number of entries; unbounded when absent
	pub capacity: Option<usize>,
	pub cleanup_interval_secs: u64,
}

/// Inbound query limits
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct QuerySettings {
	/// Maximum query length in characters
	pub max_length: usize,
}

/// Circuit breaker configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CircuitBreakerSettings {
	pub enabled: bool,
	/// Consecutive non-success outcomes before the circuit opens
	pub failure_threshold: u32,
	/// How long an open circuit skips the engine
	pub cooldown_ms: u64,
}

/// Environment-specific settings
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct EnvironmentSettings {
	pub profile: EnvironmentProfile,
	pub rate_limiting: RateLimitSettings,
}

/// Environment profiles
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentProfile {
	Development,
	Staging,
	Production,
}

/// Rate limiting configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct RateLimitSettings {
	pub enabled: bool,
	pub requests_per_minute: u32,
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
	pub structured: bool,
}

/// Log format options
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

/// Settings that load but cannot be used
#[derive(Debug, Error)]
pub enum ConfigValidationError {
	#[error("timeouts.global_ceiling_ms must be greater than zero")]
	ZeroGlobalCeiling,

	#[error("query.max_length must be greater than zero")]
	ZeroMaxQueryLength,

	#[error("cache.ttl_secs must be greater than zero when the cache is enabled")]
	ZeroCacheTtl,

	#[error("cache.ttl_secs is {ttl_secs} (maximum is {max})")]
	CacheTtlTooLarge { ttl_secs: u64, max: u64 },

	#[error("cache.capacity must be greater than zero when set")]
	ZeroCacheCapacity,

	#[error("circuit_breaker.failure_threshold must be greater than zero")]
	ZeroFailureThreshold,

	#[error("Credential for engine '{engine}' could not be resolved: {source}")]
	Credential {
		engine: String,
		#[source]
		source: ConfigurableValueError,
	},
}

impl Default for ServerSettings {
	fn default() -> Self {
		Self {
			host: "0.0.0.0".to_string(),
			port: 3000,
		}
	}
}

impl Default for TimeoutSettings {
	fn default() -> Self {
		Self {
			global_ceiling_ms: DEFAULT_GLOBAL_CEILING_MS,
		}
	}
}

impl Default for CacheSettings {
	fn default() -> Self {
		Self {
			enabled: true,
			ttl_secs: DEFAULT_CACHE_TTL_SECS,
			capacity: Some(1024),
			cleanup_interval_secs: DEFAULT_CACHE_CLEANUP_INTERVAL_SECS,
		}
	}
}

impl Default for QuerySettings {
	fn default() -> Self {
		Self {
			max_length: DEFAULT_MAX_QUERY_LENGTH,
		}
	}
}

impl Default for CircuitBreakerSettings {
	fn default() -> Self {
		Self {
			enabled: false,
			failure_threshold: 5,
			cooldown_ms: 30_000,
		}
	}
}

impl Default for EnvironmentSettings {
	fn default() -> Self {
		Self {
			profile: EnvironmentProfile::Development,
			rate_limiting: RateLimitSettings::default(),
		}
	}
}

impl Default for RateLimitSettings {
	fn default() -> Self {
		Self {
			enabled: false,
			requests_per_minute: DEFAULT_RATE_LIMIT_REQUESTS_PER_MINUTE,
		}
	}
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Pretty,
			structured: false,
		}
	}
}

impl Settings {
	/// Get server bind address
	pub fn bind_address(&self) -> String {
		format!("{}:{}", self.server.host, self.server.port)
	}

	/// Get enabled engines only, in configured order
	pub fn enabled_engines(&self) -> Vec<&EngineConfig> {
		self.engines.iter().filter(|engine| engine.enabled).collect()
	}

	/// Check if running in production
	pub fn is_production(&self) -> bool {
		self.environment.profile == EnvironmentProfile::Production
	}

	pub fn global_ceiling(&self) -> Duration {
		Duration::from_millis(self.timeouts.global_ceiling_ms)
	}

	pub fn cache_ttl(&self) -> Duration {
		Duration::from_secs(self.cache.ttl_secs)
	}

	/// Check section-level constraints that serde cannot express
	pub fn validate(&self) -> Result<(), ConfigValidationError> {
		if self.timeouts.global_ceiling_ms == 0 {
			return Err(ConfigValidationError::ZeroGlobalCeiling);
		}
		if self.query.max_length == 0 {
			return Err(ConfigValidationError::ZeroMaxQueryLength);
		}
		if self.cache.enabled && self.cache.ttl_secs == 0 {
			return Err(ConfigValidationError::ZeroCacheTtl);
		}
		if self.cache.ttl_secs > MAX_CACHE_TTL_SECS {
			return Err(ConfigValidationError::CacheTtlTooLarge {
				ttl_secs: self.cache.ttl_secs,
				max: MAX_CACHE_TTL_SECS,
			});
		}
		if self.cache.capacity == Some(0) {
			return Err(ConfigValidationError::ZeroCacheCapacity);
		}
		if self.circuit_breaker.enabled && self.circuit_breaker.failure_threshold == 0 {
			return Err(ConfigValidationError::ZeroFailureThreshold);
		}
		Ok(())
	}

	/// Convert every configured engine (enabled or not) into a descriptor
	pub fn engine_descriptors(&self) -> Result<Vec<EngineDescriptor>, ConfigValidationError> {
		self.engines.iter().map(EngineConfig::to_descriptor).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_defaults_are_valid() {
		let settings = Settings::default();
		assert!(settings.validate().is_ok());
		assert_eq!(settings.bind_address(), "0.0.0.0:3000");
		assert!(settings.engines.is_empty());
		assert!(!settings.circuit_breaker.enabled);
	}

	#[test]
	fn test_partial_json_fills_defaults() {
		let settings: Settings = serde_json::from_value(json!({
			"engines": [
				{ "name": "alpha", "endpoint": "http://localhost:9001/query" },
				{ "name": "beta", "endpoint": "http://localhost:9002/query", "enabled": false, "timeout_ms": 750 }
			],
			"cache": { "ttl_secs": 5 }
		}))
		.unwrap();

		assert_eq!(settings.engines.len(), 2);
		assert_eq!(settings.engines[0].adapter_id, DEFAULT_ADAPTER_ID);
		assert_eq!(settings.engines[0].timeout_ms, DEFAULT_ENGINE_TIMEOUT_MS);
		assert!(settings.engines[0].enabled);
		assert_eq!(settings.cache.ttl_secs, 5);
		assert!(settings.cache.enabled);
		assert_eq!(settings.server.port, 3000);

		let enabled = settings.enabled_engines();
		assert_eq!(enabled.len(), 1);
		assert_eq!(enabled[0].name, "alpha");
	}

	#[test]
	fn test_engine_descriptors_keep_order_and_resolve_credentials() {
		std::env::set_var("FANOUT_SETTINGS_TEST_KEY", "key-123");
		let settings: Settings = serde_json::from_value(json!({
			"engines": [
				{ "name": "b", "endpoint": "http://b", "credential_ref": "env:FANOUT_SETTINGS_TEST_KEY" },
				{ "name": "a", "endpoint": "http://a", "timeout_ms": 300 }
			]
		}))
		.unwrap();

		let descriptors = settings.engine_descriptors().unwrap();
		assert_eq!(descriptors[0].name, "b");
		assert_eq!(descriptors[1].name, "a");
		assert_eq!(
			descriptors[0].credential.as_ref().unwrap().expose_secret(),
			"key-123"
		);
		assert_eq!(descriptors[1].timeout_budget, Duration::from_millis(300));
		std::env::remove_var("FANOUT_SETTINGS_TEST_KEY");
	}

	#[test]
	fn test_unresolvable_credential_is_reported() {
		let settings: Settings = serde_json::from_value(json!({
			"engines": [
				{ "name": "a", "endpoint": "http://a", "credential_ref": { "type": "env", "value": "FANOUT_MISSING_CREDENTIAL" } }
			]
		}))
		.unwrap();

		assert!(matches!(
			settings.engine_descriptors(),
			Err(ConfigValidationError::Credential { ref engine, .. }) if engine == "a"
		));
	}

	#[test]
	fn test_validate_rejects_zero_values() {
		let mut settings = Settings::default();
		settings.timeouts.global_ceiling_ms = 0;
		assert!(matches!(
			settings.validate(),
			Err(ConfigValidationError::ZeroGlobalCeiling)
		));

		let mut settings = Settings::default();
		settings.cache.capacity = Some(0);
		assert!(matches!(
			settings.validate(),
			Err(ConfigValidationError::ZeroCacheCapacity)
		));

		let mut settings = Settings::default();
		settings.cache.enabled = false;
		settings.cache.ttl_secs = 0;
		assert!(settings.validate().is_ok());
	}

	#[test]
	fn test_validate_bounds_cache_ttl() {
		let mut settings = Settings::default();
		settings.cache.ttl_secs = MAX_CACHE_TTL_SECS;
		assert!(settings.validate().is_ok());

		settings.cache.ttl_secs = u64::MAX;
		assert!(matches!(
			settings.validate(),
			Err(ConfigValidationError::CacheTtlTooLarge { max: MAX_CACHE_TTL_SECS, .. })
		));
	}
}
