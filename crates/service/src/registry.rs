//! Engine registry: the fixed, ordered set of configured engines

use std::collections::HashSet;
use std::sync::Arc;

use fanout_adapters::AdapterRegistry;
use fanout_types::{ConfigError, EngineDescriptor};
use tracing::{debug, info};

/// Configured engines in configuration order
///
/// Built once at startup and read-only afterwards, so it is shared behind an
/// `Arc` without locking. The default value is an empty registry; `load`
/// never produces one.
#[derive(Debug, Clone, Default)]
pub struct EngineRegistry {
	engines: Vec<Arc<EngineDescriptor>>,
	enabled: Vec<Arc<EngineDescriptor>>,
}

impl EngineRegistry {
	/// Validate and load descriptors
	///
	/// Fails on the first invalid descriptor, on a repeated name, or when no
	/// descriptor is enabled.
	pub fn load(descriptors: Vec<EngineDescriptor>) -> Result<Self, ConfigError> {
		let mut seen = HashSet::with_capacity(descriptors.len());
		let mut engines = Vec::with_capacity(descriptors.len());

		for descriptor in descriptors {
			descriptor
				.validate()
				.map_err(|source| ConfigError::InvalidEngine {
					name: descriptor.name.clone(),
					source,
				})?;

			if !seen.insert(descriptor.name.clone()) {
				return Err(ConfigError::DuplicateEngine {
					name: descriptor.name,
				});
			}

			debug!(
				"Registered engine '{}' (adapter: {}, timeout: {}ms, enabled: {})",
				descriptor.name,
				descriptor.adapter_id,
				descriptor.timeout_ms(),
				descriptor.enabled
			);
			engines.push(Arc::new(descriptor));
		}

		let enabled: Vec<_> = engines.iter().filter(|e| e.enabled).cloned().collect();
		if enabled.is_empty() {
			return Err(ConfigError::NoEnabledEngines);
		}

		info!(
			"Engine registry loaded: {} engines ({} enabled)",
			engines.len(),
			enabled.len()
		);

		Ok(Self { engines, enabled })
	}

	/// Check that every engine's adapter is available
	pub fn verify_adapters(&self, adapters: &AdapterRegistry) -> Result<(), ConfigError> {
		for engine in &self.engines {
			if !adapters.contains(&engine.adapter_id) {
				return Err(ConfigError::UnknownAdapter {
					engine: engine.name.clone(),
					adapter_id: engine.adapter_id.clone(),
				});
			}
		}
		Ok(())
	}

	/// Enabled engines, in configuration order
	pub fn list_enabled(&self) -> &[Arc<EngineDescriptor>] {
		&self.enabled
	}

	/// Every configured engine, enabled or not
	pub fn list_all(&self) -> &[Arc<EngineDescriptor>] {
		&self.engines
	}

	pub fn get(&self, name: &str) -> Option<&Arc<EngineDescriptor>> {
		self.engines.iter().find(|e| e.name == name)
	}

	pub fn enabled_count(&self) -> usize {
		self.enabled.len()
	}

	pub fn has_enabled(&self) -> bool {
		!self.enabled.is_empty()
	}

	pub fn len(&self) -> usize {
		self.engines.len()
	}

	pub fn is_empty(&self) -> bool {
		self.engines.is_empty()
	}
}
