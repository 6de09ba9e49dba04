//! Assembly of engine outcomes into one aggregated result

use std::collections::HashMap;

use chrono::Utc;
use fanout_types::{AggregatedResult, EngineOutcome, OverallStatus, Query};
use tracing::{debug, error};

use crate::registry::EngineRegistry;

/// Orders outcomes, derives the overall status and stamps the result
///
/// Pure apart from reading the clock for `generated_at`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultAggregator;

impl ResultAggregator {
	pub fn new() -> Self {
		Self
	}

	pub fn aggregate(
		&self,
		query: &Query,
		outcomes: Vec<EngineOutcome>,
		registry: &EngineRegistry,
	) -> AggregatedResult {
		let enabled = registry.list_enabled();
		let consistent = outcomes.len() == enabled.len()
			&& enabled
				.iter()
				.all(|engine| outcomes.iter().any(|o| o.engine_name == engine.name));
		if !consistent {
			error!(
				"Outcome set does not match enabled engines ({} outcomes for {} engines)",
				outcomes.len(),
				enabled.len()
			);
		}
		debug_assert!(consistent, "one outcome per enabled engine");

		let mut by_name: HashMap<String, EngineOutcome> = outcomes
			.into_iter()
			.map(|o| (o.engine_name.clone(), o))
			.collect();
		let mut ordered: Vec<EngineOutcome> = enabled
			.iter()
			.filter_map(|engine| by_name.remove(&engine.name))
			.collect();
		// Anything not attributable to an enabled engine goes last, by name
		let mut strays: Vec<EngineOutcome> = by_name.into_values().collect();
		strays.sort_by(|a, b| a.engine_name.cmp(&b.engine_name));
		ordered.extend(strays);

		let overall_status = OverallStatus::from_outcomes(&ordered);
		debug!(
			"Aggregated {} outcomes with overall status {:?}",
			ordered.len(),
			overall_status
		);

		AggregatedResult {
			query: query.clone(),
			outcomes: ordered,
			overall_status,
			generated_at: Utc::now(),
		}
	}
}
