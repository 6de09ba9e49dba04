//! Fanout Config
//!
//! Configuration management and startup utilities for the fanout aggregator.

pub mod configurable_value;
pub mod loader;
pub mod settings;
pub mod startup_logger;

pub use configurable_value::{ConfigurableValue, ConfigurableValueError, ValueType};
pub use loader::{load_config, load_config_from, ConfigLoadError};
pub use settings::{
	CacheSettings, CircuitBreakerSettings, ConfigValidationError, EngineConfig,
	EnvironmentProfile, EnvironmentSettings, LogFormat, LoggingSettings, QuerySettings,
	RateLimitSettings, ServerSettings, Settings, TimeoutSettings,
};
pub use startup_logger::{
	dispatch_profile, log_dispatch_profile, log_service_info, log_service_shutdown,
	log_startup_complete,
};
