//! Aggregated result response model for the API layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AggregatedResult, EngineOutcome, OutcomeStatus, OverallStatus};

/// Wire format of one engine outcome
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineOutcomeResponse {
	pub engine: String,
	pub status: OutcomeStatus,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub payload: Option<Value>,
	#[serde(
		rename = "errorDetail",
		default,
		skip_serializing_if = "Option::is_none"
	)]
	pub error_detail: Option<String>,
	#[serde(rename = "latencyMs")]
	pub latency_ms: u64,
}

/// Wire format of an aggregated result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregatedResponse {
	pub query: String,
	pub outcomes: Vec<EngineOutcomeResponse>,
	#[serde(rename = "overallStatus")]
	pub overall_status: OverallStatus,
	#[serde(rename = "generatedAt")]
	pub generated_at: DateTime<Utc>,
}

impl From<&EngineOutcome> for EngineOutcomeResponse {
	fn from(outcome: &EngineOutcome) -> Self {
		Self {
			engine: outcome.engine_name.clone(),
			status: outcome.status(),
			payload: outcome.payload().cloned(),
			error_detail: outcome.error_detail().map(str::to_string),
			latency_ms: outcome.latency.as_millis() as u64,
		}
	}
}

impl From<&AggregatedResult> for AggregatedResponse {
	fn from(result: &AggregatedResult) -> Self {
		Self {
			query: result.query.text.clone(),
			outcomes: result
				.outcomes
				.iter()
				.map(EngineOutcomeResponse::from)
				.collect(),
			overall_status: result.overall_status,
			generated_at: result.generated_at,
		}
	}
}
