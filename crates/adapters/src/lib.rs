//! Fanout Adapters
//!
//! Engine protocol adapters and the registry engines select them from.

pub mod client_cache;
pub mod http_json_adapter;

use std::collections::HashMap;
use std::sync::Arc;

pub use client_cache::{ClientCache, ClientConfig};
pub use fanout_types::{EngineAdapter, EngineError, EngineResult};
pub use http_json_adapter::HttpJsonAdapter;

/// Adapters available to engines, keyed by adapter ID
#[derive(Debug, Default, Clone)]
pub struct AdapterRegistry {
	adapters: HashMap<String, Arc<dyn EngineAdapter>>,
}

impl AdapterRegistry {
	/// Create an empty registry
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a registry holding the built-in adapters
	pub fn with_defaults() -> Self {
		let mut registry = Self::new();
		let http: Arc<dyn EngineAdapter> = Arc::new(HttpJsonAdapter::new());
		registry.adapters.insert(http.id().to_string(), http);
		registry
	}

	/// Register an adapter under its own ID
	///
	/// Re-registering a built-in ID replaces the built-in; any other
	/// duplicate is rejected.
	pub fn register(&mut self, adapter: Box<dyn EngineAdapter>) -> EngineResult<()> {
		let adapter_id = adapter.id().to_string();
		let is_builtin = adapter_id == fanout_types::DEFAULT_ADAPTER_ID;
		if self.adapters.contains_key(&adapter_id) && !is_builtin {
			return Err(EngineError::AlreadyRegistered { adapter_id });
		}
		self.adapters.insert(adapter_id, Arc::from(adapter));
		Ok(())
	}

	pub fn get(&self, adapter_id: &str) -> Option<Arc<dyn EngineAdapter>> {
		self.adapters.get(adapter_id).cloned()
	}

	pub fn contains(&self, adapter_id: &str) -> bool {
		self.adapters.contains_key(adapter_id)
	}

	pub fn ids(&self) -> Vec<&str> {
		self.adapters.keys().map(String::as_str).collect()
	}

	pub fn len(&self) -> usize {
		self.adapters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.adapters.is_empty()
	}
}
