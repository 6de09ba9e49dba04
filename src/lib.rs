//! Fanout Aggregator Library
//!
//! Sends one query to many backend engines concurrently and returns a single
//! ordered result with an outcome for every engine, whether it succeeded,
//! failed, or ran out of time.

// Core domain types
pub use fanout_types::{
	chrono,
	serde_json,
	Adapter,
	AggregatedResponse,
	AggregatedResult,
	ConfigError,
	EngineAdapter,
	EngineDescriptor,
	EngineError,
	EngineOutcome,
	EngineResult,
	EngineRuntimeConfig,
	OutcomeResult,
	OutcomeStatus,
	OverallStatus,
	Query,
	QueryValidationError,
	SecretString,
};

// Service layer
pub use fanout_service::{
	CircuitBreaker, DispatcherTrait, EngineClient, EngineRegistry, ParallelDispatcher,
	QueryRouter, ResultAggregator, RouterError,
};

// Storage layer
pub use fanout_storage::{CacheEntry, MemoryCache, ResponseCache};

// API layer
pub use fanout_api::{create_router, AppState};

// Adapters
pub use fanout_adapters::{AdapterRegistry, HttpJsonAdapter};

// Config
pub use fanout_config::{load_config, log_service_info, log_startup_complete, Settings};

pub mod config {
	pub use fanout_config::*;
}

pub mod mocks;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use fanout_config::{log_dispatch_profile, log_service_shutdown, LogFormat};
use tracing::{info, warn};

// Re-export external dependencies for custom adapters
pub use async_trait;
pub use reqwest;

/// Builder for a fully wired aggregator
///
/// Engines come from the settings' `engines` list followed by any added with
/// `with_engine`. Custom adapters are registered next to the built-in
/// `http-json` adapter.
#[derive(Default)]
pub struct AggregatorBuilder {
	settings: Option<Settings>,
	adapters: Vec<Box<dyn EngineAdapter>>,
	engines: Vec<EngineDescriptor>,
}

impl AggregatorBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a builder from already loaded settings
	pub fn from_config(settings: Settings) -> Self {
		Self::new().with_settings(settings)
	}

	/// Set custom settings
	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	/// Get the current settings
	pub fn settings(&self) -> Option<&Settings> {
		self.settings.as_ref()
	}

	/// Register a custom adapter (uses the adapter's own ID)
	///
	/// Duplicate IDs are reported by `start`.
	pub fn with_adapter(mut self, adapter: Box<dyn EngineAdapter>) -> Self {
		self.adapters.push(adapter);
		self
	}

	/// Add an engine on top of those in the settings
	pub fn with_engine(mut self, engine: EngineDescriptor) -> Self {
		self.engines.push(engine);
		self
	}

	/// Initialize tracing with configuration-based settings
	fn init_tracing_from_settings(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
		let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.logging.level));
		let structured = settings.logging.structured;

		match settings.logging.format {
			LogFormat::Json => tracing_subscriber::fmt()
				.json()
				.with_env_filter(env_filter)
				.with_target(structured)
				.with_thread_ids(structured)
				.try_init()
				.map_err(|e| e as Box<dyn std::error::Error>)?,
			LogFormat::Pretty => tracing_subscriber::fmt()
				.pretty()
				.with_env_filter(env_filter)
				.with_target(structured)
				.with_thread_ids(structured)
				.try_init()
				.map_err(|e| e as Box<dyn std::error::Error>)?,
			LogFormat::Compact => tracing_subscriber::fmt()
				.compact()
				.with_env_filter(env_filter)
				.with_target(structured)
				.with_thread_ids(structured)
				.try_init()
				.map_err(|e| e as Box<dyn std::error::Error>)?,
		}

		info!(
			"Logging configuration applied: level={}, format={:?}, structured={}",
			settings.logging.level, settings.logging.format, settings.logging.structured
		);
		Ok(())
	}

	fn build_adapter_registry(
		adapters: Vec<Box<dyn EngineAdapter>>,
	) -> Result<AdapterRegistry, EngineError> {
		let mut registry = AdapterRegistry::with_defaults();
		for adapter in adapters {
			info!("Registering custom adapter '{}'", adapter.id());
			registry.register(adapter)?;
		}
		Ok(registry)
	}

	/// Wire every component and return the router with its state
	///
	/// Fails on invalid settings, invalid or duplicate engines, no enabled
	/// engine, or an engine whose adapter is not registered.
	pub async fn start(self) -> Result<(axum::Router, AppState), Box<dyn std::error::Error>> {
		let settings = self.settings.unwrap_or_default();
		settings.validate()?;

		let mut descriptors = settings.engine_descriptors()?;
		descriptors.extend(self.engines);
		let registry = Arc::new(EngineRegistry::load(descriptors)?);

		let adapters = Self::build_adapter_registry(self.adapters)?;
		registry.verify_adapters(&adapters)?;

		let client = Arc::new(EngineClient::new(Arc::new(adapters)));
		let mut dispatcher = ParallelDispatcher::new(client, settings.global_ceiling());
		if settings.circuit_breaker.enabled {
			info!(
				"Circuit breaker enabled (threshold: {}, cooldown: {}ms)",
				settings.circuit_breaker.failure_threshold, settings.circuit_breaker.cooldown_ms
			);
			dispatcher = dispatcher.with_circuit_breaker(Arc::new(CircuitBreaker::new(
				settings.circuit_breaker.clone(),
			)));
		}

		let mut query_router = QueryRouter::new(Arc::clone(&registry), Arc::new(dispatcher))
			.with_max_query_length(settings.query.max_length);

		if settings.cache.enabled {
			let cache = match settings.cache.capacity {
				Some(capacity) => MemoryCache::with_capacity(capacity),
				None => MemoryCache::new(),
			};
			if settings.cache.cleanup_interval_secs > 0 {
				cache.start_ttl_cleanup(Duration::from_secs(settings.cache.cleanup_interval_secs));
			}
			info!(
				"Response cache enabled (ttl: {}s, capacity: {:?})",
				settings.cache.ttl_secs, settings.cache.capacity
			);
			query_router = query_router.with_cache(Arc::new(cache), settings.cache_ttl());
		} else {
			warn!("Response cache disabled; every query is dispatched");
		}

		info!(
			"Successfully initialized with {} engine(s), {} enabled",
			registry.len(),
			registry.enabled_count()
		);

		let app_state = AppState {
			query_router: Arc::new(query_router),
			registry,
		};
		let router = create_router().with_state(app_state.clone());

		Ok((router, app_state))
	}

	/// Start the complete server with all defaults and setup
	///
	/// Loads `.env` and the configuration file (unless settings were
	/// provided), initializes tracing, builds the app and serves it until
	/// Ctrl-C.
	pub async fn start_server(mut self) -> Result<(), Box<dyn std::error::Error>> {
		dotenvy::dotenv().ok();

		let using_provided_settings = self.settings.is_some();
		let settings = match self.settings.take() {
			Some(settings) => settings,
			None => load_config()?,
		};

		Self::init_tracing_from_settings(&settings)?;
		log_service_info();
		info!(
			"Using configuration: loaded from {}",
			if using_provided_settings {
				"provided settings"
			} else {
				"config file or defaults"
			}
		);

		log_dispatch_profile(&settings);

		let bind_addr = settings.bind_address();
		let addr: SocketAddr = bind_addr
			.parse()
			.map_err(|e| format!("Invalid bind address '{}': {}", bind_addr, e))?;

		let rate_cfg = settings.environment.rate_limiting.clone();
		if settings.is_production() && !rate_cfg.enabled {
			warn!("Running in production without rate limiting");
		}
		self.settings = Some(settings);
		let (app, _) = self.start().await?;

		let listener = tokio::net::TcpListener::bind(addr).await?;

		log_startup_complete(&bind_addr);
		info!("API endpoints available:");
		info!("  GET  /health");
		info!("  POST /api/query");
		info!("  GET  /api/engines");

		if rate_cfg.enabled {
			use tower::limit::RateLimitLayer;
			use tower::ServiceBuilder;
			let make_svc = ServiceBuilder::new()
				.layer(RateLimitLayer::new(
					rate_cfg.requests_per_minute as u64,
					Duration::from_secs(fanout_types::RATE_LIMIT_WINDOW_SECONDS),
				))
				.service(app.into_make_service());
			axum::serve(listener, make_svc)
				.with_graceful_shutdown(shutdown_signal())
				.await?;
		} else {
			axum::serve(listener, app)
				.with_graceful_shutdown(shutdown_signal())
				.await?;
		}

		log_service_shutdown();
		Ok(())
	}
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		warn!("Failed to listen for shutdown signal: {}", e);
		std::future::pending::<()>().await;
	}
}
