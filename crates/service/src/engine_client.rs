//! Single-engine calls bounded by a deadline

use std::sync::Arc;

use fanout_adapters::AdapterRegistry;
use fanout_types::{EngineDescriptor, EngineError, EngineOutcome, EngineRuntimeConfig, Query};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

/// Calls one engine through its adapter and turns whatever happens into an outcome
///
/// Never returns an error and never retries.
#[derive(Debug, Clone)]
pub struct EngineClient {
	adapters: Arc<AdapterRegistry>,
}

impl EngineClient {
	pub fn new(adapters: Arc<AdapterRegistry>) -> Self {
		Self { adapters }
	}

	pub fn adapters(&self) -> &AdapterRegistry {
		&self.adapters
	}

	/// Send `query` to `engine`, giving up at the earlier of the engine's own
	/// budget and `deadline`
	pub async fn call(
		&self,
		engine: &EngineDescriptor,
		query: &Query,
		deadline: Instant,
	) -> EngineOutcome {
		let started = Instant::now();
		let engine_deadline = deadline.min(started + engine.timeout_budget);

		let Some(adapter) = self.adapters.get(&engine.adapter_id) else {
			let err = EngineError::AdapterNotFound {
				adapter_id: engine.adapter_id.clone(),
			};
			warn!("Engine {} cannot be called: {}", engine.name, err);
			return EngineOutcome::failure(&engine.name, err.to_string(), started.elapsed());
		};

		let config = EngineRuntimeConfig::from(engine);
		let result = timeout_at(engine_deadline, adapter.query(query, &config)).await;
		let latency = started.elapsed();

		match result {
			Ok(Ok(payload)) => {
				debug!("Engine {} succeeded in {}ms", engine.name, latency.as_millis());
				EngineOutcome::success(&engine.name, payload, latency)
			},
			Ok(Err(e)) => {
				warn!(
					"Engine {} failed after {}ms: {}",
					engine.name,
					latency.as_millis(),
					e
				);
				EngineOutcome::failure(&engine.name, e.to_string(), latency)
			},
			Err(_) => {
				warn!(
					"Engine {} timed out after {}ms",
					engine.name,
					latency.as_millis()
				);
				EngineOutcome::timeout(&engine.name, latency)
			},
		}
	}
}
