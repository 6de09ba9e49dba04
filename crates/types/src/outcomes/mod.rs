//! Per-engine outcomes and the aggregated result

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::queries::Query;

pub mod response;

pub use response::{AggregatedResponse, EngineOutcomeResponse};

/// Error detail recorded for calls cut off by a deadline
pub const DEADLINE_EXCEEDED: &str = "deadline exceeded";

/// Status of a single engine call
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OutcomeStatus {
	Success,
	Failure,
	Timeout,
	Disabled,
}

/// What one engine produced for one dispatch
///
/// The payload only exists on success and the error detail only on
/// failure or timeout, so the variants carry them directly.
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeResult {
	Success { payload: Value },
	Failure { error_detail: String },
	Timeout { error_detail: String },
	/// Engine was skipped for this dispatch (e.g. its circuit is open)
	Disabled { reason: String },
}

/// Attributed outcome of one engine call; created once per engine per dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutcome {
	pub engine_name: String,
	pub result: OutcomeResult,
	pub latency: Duration,
}

impl EngineOutcome {
	pub fn success(engine_name: impl Into<String>, payload: Value, latency: Duration) -> Self {
		Self {
			engine_name: engine_name.into(),
			result: OutcomeResult::Success { payload },
			latency,
		}
	}

	pub fn failure(
		engine_name: impl Into<String>,
		error_detail: impl Into<String>,
		latency: Duration,
	) -> Self {
		Self {
			engine_name: engine_name.into(),
			result: OutcomeResult::Failure {
				error_detail: error_detail.into(),
			},
			latency,
		}
	}

	pub fn timeout(engine_name: impl Into<String>, latency: Duration) -> Self {
		Self {
			engine_name: engine_name.into(),
			result: OutcomeResult::Timeout {
				error_detail: DEADLINE_EXCEEDED.to_string(),
			},
			latency,
		}
	}

	pub fn disabled(engine_name: impl Into<String>, reason: impl Into<String>) -> Self {
		Self {
			engine_name: engine_name.into(),
			result: OutcomeResult::Disabled {
				reason: reason.into(),
			},
			latency: Duration::ZERO,
		}
	}

	pub fn status(&self) -> OutcomeStatus {
		match self.result {
			OutcomeResult::Success { .. } => OutcomeStatus::Success,
			OutcomeResult::Failure { .. } => OutcomeStatus::Failure,
			OutcomeResult::Timeout { .. } => OutcomeStatus::Timeout,
			OutcomeResult::Disabled { .. } => OutcomeStatus::Disabled,
		}
	}

	pub fn is_success(&self) -> bool {
		self.status() == OutcomeStatus::Success
	}

	pub fn payload(&self) -> Option<&Value> {
		match &self.result {
			OutcomeResult::Success { payload } => Some(payload),
			_ => None,
		}
	}

	pub fn error_detail(&self) -> Option<&str> {
		match &self.result {
			OutcomeResult::Failure { error_detail } | OutcomeResult::Timeout { error_detail } => {
				Some(error_detail)
			},
			_ => None,
		}
	}
}

/// Summary status over all outcomes of a dispatch
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OverallStatus {
	AllSucceeded,
	PartialSuccess,
	AllFailed,
}

impl OverallStatus {
	/// Pure function of the status multiset
	///
	/// `AllSucceeded` iff every status is Success, `AllFailed` iff none is,
	/// otherwise `PartialSuccess`. An empty set has no success and is
	/// `AllFailed`.
	pub fn from_statuses<I>(statuses: I) -> Self
	where
		I: IntoIterator<Item = OutcomeStatus>,
	{
		let (mut succeeded, mut total) = (0usize, 0usize);
		for status in statuses {
			total += 1;
			if status == OutcomeStatus::Success {
				succeeded += 1;
			}
		}

		match succeeded {
			0 => OverallStatus::AllFailed,
			n if n == total => OverallStatus::AllSucceeded,
			_ => OverallStatus::PartialSuccess,
		}
	}

	pub fn from_outcomes(outcomes: &[EngineOutcome]) -> Self {
		Self::from_statuses(outcomes.iter().map(EngineOutcome::status))
	}
}

/// One ordered, attributed response to a query
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedResult {
	pub query: Query,
	/// Ordered as the registry's enabled engines
	pub outcomes: Vec<EngineOutcome>,
	pub overall_status: OverallStatus,
	pub generated_at: DateTime<Utc>,
}

impl AggregatedResult {
	pub fn outcome(&self, engine_name: &str) -> Option<&EngineOutcome> {
		self.outcomes.iter().find(|o| o.engine_name == engine_name)
	}

	pub fn count_with_status(&self, status: OutcomeStatus) -> usize {
		self.outcomes.iter().filter(|o| o.status() == status).count()
	}
}
