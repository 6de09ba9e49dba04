//! Parallel fan-out of one query to every enabled engine

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fanout_types::{ConfigError, EngineDescriptor, EngineOutcome, Query};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::task::AbortHandle;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::circuit_breaker::{CircuitBreaker, CIRCUIT_OPEN_REASON};
use crate::engine_client::EngineClient;
use crate::registry::EngineRegistry;

/// Dispatch seam used by the query router
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DispatcherTrait: Send + Sync {
	/// Query every enabled engine concurrently
	///
	/// Returns exactly one outcome per enabled engine, in registry order.
	async fn dispatch(
		&self,
		query: &Query,
		registry: &EngineRegistry,
	) -> Result<Vec<EngineOutcome>, ConfigError>;
}

/// Aborts every task it tracks when dropped
///
/// Dropping a `JoinHandle` detaches its task, so in-flight engine calls are
/// tracked here to be cancelled when the dispatch ends or is dropped.
#[derive(Default)]
struct InFlight(Vec<AbortHandle>);

impl Drop for InFlight {
	fn drop(&mut self) {
		for handle in &self.0 {
			handle.abort();
		}
	}
}

/// Spawns one task per enabled engine and collects their outcomes
///
/// The whole dispatch is bounded by a ceiling: the largest enabled engine
/// budget, capped by the configured global ceiling. Engines still running at
/// the ceiling are aborted and recorded as timeouts.
pub struct ParallelDispatcher {
	client: Arc<EngineClient>,
	global_ceiling: Duration,
	circuit_breaker: Option<Arc<CircuitBreaker>>,
}

impl ParallelDispatcher {
	pub fn new(client: Arc<EngineClient>, global_ceiling: Duration) -> Self {
		Self {
			client,
			global_ceiling,
			circuit_breaker: None,
		}
	}

	pub fn with_circuit_breaker(mut self, circuit_breaker: Arc<CircuitBreaker>) -> Self {
		self.circuit_breaker = Some(circuit_breaker);
		self
	}

	/// Ceiling for one dispatch over `engines`
	pub fn ceiling_for(&self, engines: &[Arc<EngineDescriptor>]) -> Duration {
		engines
			.iter()
			.map(|e| e.timeout_budget)
			.max()
			.unwrap_or_default()
			.min(self.global_ceiling)
	}

	fn is_open(&self, engine: &EngineDescriptor) -> bool {
		self.circuit_breaker
			.as_ref()
			.is_some_and(|breaker| !breaker.should_allow(&engine.name))
	}
}

#[async_trait]
impl DispatcherTrait for ParallelDispatcher {
	async fn dispatch(
		&self,
		query: &Query,
		registry: &EngineRegistry,
	) -> Result<Vec<EngineOutcome>, ConfigError> {
		let engines = registry.list_enabled();
		if engines.is_empty() {
			return Err(ConfigError::NoEnabledEngines);
		}

		let started = Instant::now();
		let ceiling = self.ceiling_for(engines);
		let deadline = started + ceiling;
		info!(
			"Dispatching query to {} engines (ceiling: {}ms)",
			engines.len(),
			ceiling.as_millis()
		);

		let query = Arc::new(query.clone());
		let mut slots: Vec<Option<EngineOutcome>> = vec![None; engines.len()];
		let mut in_flight = InFlight::default();
		let mut pending = FuturesUnordered::new();

		for (index, engine) in engines.iter().enumerate() {
			if self.is_open(engine) {
				debug!("Skipping engine {}: circuit open", engine.name);
				slots[index] = Some(EngineOutcome::disabled(&engine.name, CIRCUIT_OPEN_REASON));
				continue;
			}

			let client = Arc::clone(&self.client);
			let engine = Arc::clone(engine);
			let query = Arc::clone(&query);
			let handle = tokio::spawn(async move { client.call(&engine, &query, deadline).await });

			in_flight.0.push(handle.abort_handle());
			pending.push(async move { (index, handle.await) });
		}

		loop {
			match timeout_at(deadline, pending.next()).await {
				Ok(Some((index, Ok(outcome)))) => slots[index] = Some(outcome),
				Ok(Some((index, Err(join_error)))) => {
					let name = &engines[index].name;
					warn!("Engine task for {} did not complete: {}", name, join_error);
					slots[index] = Some(EngineOutcome::failure(
						name,
						format!("engine task failed: {}", join_error),
						started.elapsed(),
					));
				},
				Ok(None) => break,
				Err(_) => {
					warn!(
						"Dispatch ceiling of {}ms reached with {} engines still pending",
						ceiling.as_millis(),
						pending.len()
					);
					break;
				},
			}
		}
		drop(in_flight);

		let outcomes: Vec<EngineOutcome> = slots
			.into_iter()
			.zip(engines)
			.map(|(slot, engine)| {
				slot.unwrap_or_else(|| EngineOutcome::timeout(&engine.name, started.elapsed()))
			})
			.collect();

		if let Some(breaker) = &self.circuit_breaker {
			for outcome in &outcomes {
				breaker.record(outcome);
			}
		}

		info!(
			"Dispatch completed in {}ms: {}/{} engines succeeded",
			started.elapsed().as_millis(),
			outcomes.iter().filter(|o| o.is_success()).count(),
			outcomes.len()
		);

		Ok(outcomes)
	}
}
