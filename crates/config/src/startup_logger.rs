//! Service startup logging for the fanout aggregator

use std::env;
use tracing::info;

use crate::settings::Settings;

/// Logs service information at startup
pub fn log_service_info() {
	let service_name = "fanout-aggregator";
	let service_version = env!("CARGO_PKG_VERSION");

	info!("=== Fanout Aggregator Service Starting ===");
	info!("🚀 Service: {} v{}", service_name, service_version);
	info!("💻 Platform: {}", env::consts::OS);
	info!("🏗️ Architecture: {}", env::consts::ARCH);

	if let Ok(cwd) = env::current_dir() {
		info!("📁 Working Directory: {}", cwd.display());
	}

	if let Ok(rust_log) = env::var("RUST_LOG") {
		info!("🔧 Log Level: {}", rust_log);
	}

	if let Ok(config_path) = env::var("CONFIG_PATH") {
		info!("📋 Config Path: {}", config_path);
	}

	info!(
		"🕒 Started at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs service shutdown information
pub fn log_service_shutdown() {
	info!("🛑 Fanout Aggregator Service Shutting Down");
	info!(
		"🕒 Shutdown at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs startup completion
pub fn log_startup_complete(bind_address: &str) {
	info!("✅ Fanout Aggregator Service Started Successfully");
	info!("🌐 Server listening on: {}", bind_address);
	info!("📡 Ready to accept requests");
}

/// One-line summary of how queries will be fanned out
pub fn dispatch_profile(settings: &Settings) -> String {
	let enabled = settings.enabled_engines().len();
	let cache = if settings.cache.enabled {
		format!("{}s ttl", settings.cache.ttl_secs)
	} else {
		"off".to_string()
	};
	let breaker = if settings.circuit_breaker.enabled {
		format!(
			"{} failures / {}ms cooldown",
			settings.circuit_breaker.failure_threshold, settings.circuit_breaker.cooldown_ms
		)
	} else {
		"off".to_string()
	};

	format!(
		"{}/{} engines enabled, ceiling {}ms, max query {} chars, cache {}, circuit breaker {}",
		enabled,
		settings.engines.len(),
		settings.timeouts.global_ceiling_ms,
		settings.query.max_length,
		cache,
		breaker
	)
}

/// Logs the dispatch profile followed by one line per configured engine
pub fn log_dispatch_profile(settings: &Settings) {
	info!("📊 Dispatch: {}", dispatch_profile(settings));
	for engine in &settings.engines {
		info!(
			"  - {}: {} ({}ms budget{})",
			engine.name,
			engine.endpoint,
			engine.timeout_ms,
			if engine.enabled { "" } else { ", disabled" }
		);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_dispatch_profile_summarizes_settings() {
		let mut settings: Settings = serde_json::from_value(json!({
			"engines": [
				{ "name": "a", "endpoint": "http://a.example.com/q" },
				{ "name": "b", "endpoint": "http://b.example.com/q", "enabled": false }
			]
		}))
		.unwrap();
		settings.timeouts.global_ceiling_ms = 1500;
		settings.cache.enabled = false;

		let profile = dispatch_profile(&settings);
		assert!(profile.starts_with("1/2 engines enabled, ceiling 1500ms"));
		assert!(profile.contains("cache off"));
		assert!(profile.contains("circuit breaker off"));
	}
}
