//! Query router: the single entry point for query handling
//!
//! Validates the query, consults the response cache and, on a miss, runs the
//! dispatcher and aggregator and stores the result.

use std::sync::Arc;
use std::time::Duration;

use fanout_storage::ResponseCache;
use fanout_types::{
	AggregatedResult, ConfigError, Query, QueryValidationError, DEFAULT_CACHE_TTL_SECS,
	DEFAULT_MAX_QUERY_LENGTH,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::aggregator::ResultAggregator;
use crate::dispatcher::DispatcherTrait;
use crate::registry::EngineRegistry;

/// Errors returned by the query router
///
/// Engine failures never show up here; they are outcomes inside the result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
	#[error("Invalid query: {0}")]
	Validation(#[from] QueryValidationError),

	#[error("Configuration error: {0}")]
	Config(#[from] ConfigError),
}

pub struct QueryRouter {
	registry: Arc<EngineRegistry>,
	dispatcher: Arc<dyn DispatcherTrait>,
	aggregator: ResultAggregator,
	cache: Option<Arc<dyn ResponseCache>>,
	cache_ttl: Duration,
	max_query_length: usize,
}

impl QueryRouter {
	/// Create a router without a cache
	pub fn new(registry: Arc<EngineRegistry>, dispatcher: Arc<dyn DispatcherTrait>) -> Self {
		Self {
			registry,
			dispatcher,
			aggregator: ResultAggregator::new(),
			cache: None,
			cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
			max_query_length: DEFAULT_MAX_QUERY_LENGTH,
		}
	}

	pub fn with_cache(mut self, cache: Arc<dyn ResponseCache>, ttl: Duration) -> Self {
		self.cache = Some(cache);
		self.cache_ttl = ttl;
		self
	}

	pub fn with_max_query_length(mut self, max_query_length: usize) -> Self {
		self.max_query_length = max_query_length;
		self
	}

	pub fn registry(&self) -> &Arc<EngineRegistry> {
		&self.registry
	}

	pub fn max_query_length(&self) -> usize {
		self.max_query_length
	}

	/// Handle a bare query string
	pub async fn handle(&self, raw_query: &str) -> Result<Arc<AggregatedResult>, RouterError> {
		self.handle_query(Query::new(raw_query)).await
	}

	/// Handle a query that may carry a context
	pub async fn handle_query(&self, query: Query) -> Result<Arc<AggregatedResult>, RouterError> {
		query.validate(self.max_query_length)?;
		let query = query.trimmed();

		if !self.registry.has_enabled() {
			return Err(ConfigError::NoEnabledEngines.into());
		}

		let key = query.cache_key();
		if let Some(cache) = &self.cache {
			if let Some(entry) = cache.get(&key).await {
				debug!("Cache hit for query '{}'", key);
				return Ok(entry.result);
			}
			debug!("Cache miss for query '{}'", key);
		}

		let outcomes = self.dispatcher.dispatch(&query, &self.registry).await?;
		let result = Arc::new(self.aggregator.aggregate(&query, outcomes, &self.registry));

		if let Some(cache) = &self.cache {
			cache
				.put(key, Arc::clone(&result), self.cache_ttl)
				.await;
		}

		info!(
			"Query handled with overall status {:?} across {} engines",
			result.overall_status,
			result.outcomes.len()
		);
		Ok(result)
	}
}
