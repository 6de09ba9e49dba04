//! Mock adapters for demos and testing
//!
//! These adapters never touch the network. Their latency and result are fixed
//! when they are created, which makes them useful for exercising timeouts and
//! partial failures deterministically.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fanout_types::serde_json::{json, Value};
use fanout_types::{
	Adapter, EngineAdapter, EngineDescriptor, EngineError, EngineResult, EngineRuntimeConfig,
	Query,
};

/// What a mock adapter does when queried
#[derive(Debug, Clone)]
pub enum MockBehavior {
	/// Wait, then echo the query back as the payload
	Echo { delay: Duration },
	/// Wait, then return a fixed payload
	Respond { delay: Duration, payload: Value },
	/// Wait, then fail with the given HTTP status
	Fail { delay: Duration, status: u16 },
	/// Never complete
	Hang,
}

/// Adapter with scripted latency and result
#[derive(Debug, Clone)]
pub struct MockEngineAdapter {
	adapter: Adapter,
	behavior: MockBehavior,
	calls: Arc<AtomicUsize>,
}

impl MockEngineAdapter {
	pub fn new(adapter_id: impl Into<String>, behavior: MockBehavior) -> Self {
		let adapter_id = adapter_id.into();
		Self {
			adapter: Adapter::new(adapter_id.clone(), format!("Mock adapter {}", adapter_id))
				.with_description("Scripted adapter for demos and tests"),
			behavior,
			calls: Arc::new(AtomicUsize::new(0)),
		}
	}

	pub fn echo(adapter_id: impl Into<String>, delay: Duration) -> Self {
		Self::new(adapter_id, MockBehavior::Echo { delay })
	}

	pub fn respond(adapter_id: impl Into<String>, delay: Duration, payload: Value) -> Self {
		Self::new(adapter_id, MockBehavior::Respond { delay, payload })
	}

	pub fn fail(adapter_id: impl Into<String>, delay: Duration, status: u16) -> Self {
		Self::new(adapter_id, MockBehavior::Fail { delay, status })
	}

	pub fn hang(adapter_id: impl Into<String>) -> Self {
		Self::new(adapter_id, MockBehavior::Hang)
	}

	/// Shared counter of how many times this adapter was queried
	pub fn call_counter(&self) -> Arc<AtomicUsize> {
		Arc::clone(&self.calls)
	}

	pub fn call_count(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	/// Descriptor for an engine served by this adapter, named after it
	pub fn engine(&self, timeout_ms: u64) -> EngineDescriptor {
		EngineDescriptor::new(
			self.adapter.adapter_id.clone(),
			format!("http://{}.mock.invalid/query", self.adapter.adapter_id),
			timeout_ms,
		)
		.with_adapter(self.adapter.adapter_id.clone())
	}
}

#[async_trait]
impl EngineAdapter for MockEngineAdapter {
	fn adapter_info(&self) -> &Adapter {
		&self.adapter
	}

	async fn query(&self, query: &Query, config: &EngineRuntimeConfig) -> EngineResult<Value> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		match &self.behavior {
			MockBehavior::Echo { delay } => {
				tokio::time::sleep(*delay).await;
				Ok(json!({
					"engine": config.engine_name,
					"query": query.text,
					"context": query.context,
				}))
			},
			MockBehavior::Respond { delay, payload } => {
				tokio::time::sleep(*delay).await;
				Ok(payload.clone())
			},
			MockBehavior::Fail { delay, status } => {
				tokio::time::sleep(*delay).await;
				Err(EngineError::from_http_failure(*status))
			},
			MockBehavior::Hang => std::future::pending().await,
		}
	}
}
