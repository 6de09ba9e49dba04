//! Settings and request fixtures

use fanout_aggregator::config::{EngineConfig, Settings};
use serde_json::{json, Value};

pub fn engine_config(name: &str, endpoint: &str, timeout_ms: u64) -> EngineConfig {
	serde_json::from_value(json!({
		"name": name,
		"endpoint": endpoint,
		"timeout_ms": timeout_ms,
	}))
	.expect("valid engine config")
}

/// Default settings with the given engines and the cache switched off
pub fn settings_with_engines(engines: Vec<EngineConfig>) -> Settings {
	let mut settings = Settings::default();
	settings.engines = engines;
	settings.cache.enabled = false;
	settings
}

pub fn query_body(text: &str) -> Value {
	json!({ "query": text })
}
