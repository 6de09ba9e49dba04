//! Scripted adapters shared by the service unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fanout_adapters::AdapterRegistry;
use fanout_types::{
	Adapter, EngineAdapter, EngineDescriptor, EngineError, EngineResult, EngineRuntimeConfig,
	Query,
};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy)]
pub enum Script {
	Succeed(Duration),
	Fail(Duration),
	Hang,
	Panic,
}

/// Adapter whose behaviour and timing are fixed up front
#[derive(Debug, Clone)]
pub struct ScriptedAdapter {
	info: Adapter,
	script: Script,
	calls: Arc<AtomicUsize>,
}

impl ScriptedAdapter {
	pub fn new(id: &str, script: Script) -> Self {
		Self {
			info: Adapter::new(id, id),
			script,
			calls: Arc::new(AtomicUsize::new(0)),
		}
	}

	pub fn succeed(id: &str, delay: Duration) -> Self {
		Self::new(id, Script::Succeed(delay))
	}

	pub fn fail(id: &str, delay: Duration) -> Self {
		Self::new(id, Script::Fail(delay))
	}

	pub fn hang(id: &str) -> Self {
		Self::new(id, Script::Hang)
	}

	pub fn panic(id: &str) -> Self {
		Self::new(id, Script::Panic)
	}

	pub fn calls(&self) -> Arc<AtomicUsize> {
		Arc::clone(&self.calls)
	}
}

#[async_trait]
impl EngineAdapter for ScriptedAdapter {
	fn adapter_info(&self) -> &Adapter {
		&self.info
	}

	async fn query(&self, query: &Query, config: &EngineRuntimeConfig) -> EngineResult<Value> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		match self.script {
			Script::Succeed(delay) => {
				tokio::time::sleep(delay).await;
				Ok(json!({ "engine": config.engine_name, "query": query.text }))
			},
			Script::Fail(delay) => {
				tokio::time::sleep(delay).await;
				Err(EngineError::from_http_failure(500))
			},
			Script::Hang => std::future::pending().await,
			Script::Panic => panic!("scripted adapter panic"),
		}
	}
}

pub fn registry_with(adapters: Vec<ScriptedAdapter>) -> Arc<AdapterRegistry> {
	let mut registry = AdapterRegistry::new();
	for adapter in adapters {
		registry
			.register(Box::new(adapter))
			.expect("unique adapter ids");
	}
	Arc::new(registry)
}

/// Engine named after the adapter it uses
pub fn engine_for(adapter_id: &str, timeout_ms: u64) -> EngineDescriptor {
	EngineDescriptor::new(adapter_id, "http://engine.local/q", timeout_ms).with_adapter(adapter_id)
}
