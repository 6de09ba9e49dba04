//! Circuit breaker for engines that keep failing
//!
//! Counts consecutive non-success outcomes per engine. Once the configured
//! threshold is reached the circuit opens and the engine is skipped until the
//! cooldown elapses; then a single probe call decides whether it closes again.

use dashmap::DashMap;
use fanout_config::CircuitBreakerSettings;
use fanout_types::{EngineOutcome, OutcomeStatus};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Reason recorded on outcomes for engines skipped by an open circuit
pub const CIRCUIT_OPEN_REASON: &str = "circuit open";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
	Closed,
	Open,
	HalfOpen,
}

#[derive(Debug, Default)]
struct EngineCircuit {
	consecutive_failures: u32,
	open_until: Option<Instant>,
	probe_started_at: Option<Instant>,
}

pub struct CircuitBreaker {
	config: CircuitBreakerSettings,
	circuits: DashMap<String, EngineCircuit>,
}

impl CircuitBreaker {
	pub fn new(config: CircuitBreakerSettings) -> Self {
		Self {
			config,
			circuits: DashMap::new(),
		}
	}

	pub fn is_enabled(&self) -> bool {
		self.config.enabled
	}

	fn cooldown(&self) -> Duration {
		Duration::from_millis(self.config.cooldown_ms)
	}

	/// Decide whether `engine` may be called now
	///
	/// After the cooldown exactly one caller gets through as the probe. A
	/// probe that never reports back (e.g. its dispatch was dropped) is
	/// replaced after another cooldown.
	pub fn should_allow(&self, engine: &str) -> bool {
		if !self.is_enabled() {
			return true;
		}

		let Some(mut circuit) = self.circuits.get_mut(engine) else {
			return true;
		};
		let Some(open_until) = circuit.open_until else {
			return true;
		};

		let now = Instant::now();
		if now < open_until {
			return false;
		}

		match circuit.probe_started_at {
			Some(started) if now.duration_since(started) < self.cooldown() => false,
			_ => {
				debug!("Circuit for engine {} half-open, letting probe through", engine);
				circuit.probe_started_at = Some(now);
				true
			},
		}
	}

	/// Feed one dispatch outcome back into the engine's circuit
	///
	/// Disabled outcomes are ignored.
	pub fn record(&self, outcome: &EngineOutcome) {
		if !self.is_enabled() {
			return;
		}

		match outcome.status() {
			OutcomeStatus::Disabled => {},
			OutcomeStatus::Success => self.record_success(&outcome.engine_name),
			OutcomeStatus::Failure | OutcomeStatus::Timeout => {
				self.record_failure(&outcome.engine_name)
			},
		}
	}

	fn record_success(&self, engine: &str) {
		if let Some(mut circuit) = self.circuits.get_mut(engine) {
			if circuit.open_until.is_some() {
				info!("Circuit for engine {} closed after successful probe", engine);
			}
			*circuit = EngineCircuit::default();
		}
	}

	fn record_failure(&self, engine: &str) {
		let mut circuit = self.circuits.entry(engine.to_string()).or_default();
		let now = Instant::now();

		if circuit.probe_started_at.is_some() {
			warn!("Probe for engine {} failed, circuit re-opened", engine);
			circuit.open_until = Some(now + self.cooldown());
			circuit.probe_started_at = None;
			return;
		}

		circuit.consecutive_failures += 1;
		if circuit.consecutive_failures >= self.config.failure_threshold
			&& circuit.open_until.is_none()
		{
			warn!(
				"Circuit for engine {} opened after {} consecutive failures (cooldown: {}ms)",
				engine, circuit.consecutive_failures, self.config.cooldown_ms
			);
			circuit.open_until = Some(now + self.cooldown());
		}
	}

	pub fn state(&self, engine: &str) -> CircuitState {
		let Some(circuit) = self.circuits.get(engine) else {
			return CircuitState::Closed;
		};
		match circuit.open_until {
			None => CircuitState::Closed,
			Some(until) if Instant::now() < until => CircuitState::Open,
			Some(_) => CircuitState::HalfOpen,
		}
	}
}
