//! HTTP client cache for engine calls
//!
//! Provides per-engine client instances with connection pooling and keep-alive.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use fanout_types::{EngineError, EngineResult, EngineRuntimeConfig};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Everything that distinguishes one pooled client from another
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ClientConfig {
	pub base_url: String,
	pub engine_name: String,
	pub max_idle_per_host: usize,
	pub keep_alive_timeout_ms: u64,
	/// Default headers, including authorization when the engine has a credential
	pub headers: Vec<(String, String)>,
}

impl From<&EngineRuntimeConfig> for ClientConfig {
	fn from(engine_config: &EngineRuntimeConfig) -> Self {
		let mut headers = vec![
			(
				"User-Agent".to_string(),
				format!("Fanout-Aggregator/{}", env!("CARGO_PKG_VERSION")),
			),
			("Content-Type".to_string(), "application/json".to_string()),
		];

		if let Some(credential) = &engine_config.credential {
			headers.push((
				"Authorization".to_string(),
				format!("Bearer {}", credential.expose_secret()),
			));
		}

		if let Some(extra) = &engine_config.headers {
			let mut extra: Vec<_> = extra
				.iter()
				.map(|(k, v)| (k.clone(), v.clone()))
				.collect();
			// HashMap order is random; keep the cache key stable
			extra.sort();
			headers.extend(extra);
		}

		Self {
			base_url: engine_config.endpoint.clone(),
			engine_name: engine_config.engine_name.clone(),
			max_idle_per_host: 10,
			keep_alive_timeout_ms: 90_000,
			headers,
		}
	}
}

// Header values may carry credentials; only names are printed
impl fmt::Debug for ClientConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let header_names: Vec<&str> = self.headers.iter().map(|(name, _)| name.as_str()).collect();
		f.debug_struct("ClientConfig")
			.field("base_url", &self.base_url)
			.field("engine_name", &self.engine_name)
			.field("max_idle_per_host", &self.max_idle_per_host)
			.field("keep_alive_timeout_ms", &self.keep_alive_timeout_ms)
			.field("headers", &header_names)
			.finish()
	}
}

#[derive(Debug, Clone)]
struct CachedClient {
	client: Arc<Client>,
	created_at: Instant,
}

impl CachedClient {
	fn new(client: Client) -> Self {
		Self {
			client: Arc::new(client),
			created_at: Instant::now(),
		}
	}

	fn is_expired(&self, ttl: Duration) -> bool {
		self.created_at.elapsed() > ttl
	}
}

/// Thread-safe cache of HTTP clients keyed by engine configuration, with TTL
#[derive(Clone, Debug)]
pub struct ClientCache {
	clients: Arc<DashMap<ClientConfig, CachedClient>>,
	ttl: Duration,
}

impl ClientCache {
	/// Create a new client cache with default 30-minute TTL
	pub fn new() -> Self {
		Self::with_ttl(Duration::from_secs(30 * 60))
	}

	pub fn with_ttl(ttl: Duration) -> Self {
		Self {
			clients: Arc::new(DashMap::new()),
			ttl,
		}
	}

	/// Get or create a client for the given configuration
	pub fn get_client(&self, config: &ClientConfig) -> EngineResult<Arc<Client>> {
		self.clients.remove_if(config, |_, cached| {
			let expired = cached.is_expired(self.ttl);
			if expired {
				warn!(
					"Client cache expired for engine {} (age: {:?}), will create new client",
					config.engine_name,
					cached.created_at.elapsed()
				);
			}
			expired
		});

		if let Some(cached) = self.clients.get(config) {
			debug!("Reusing cached client for engine {}", config.engine_name);
			return Ok(cached.client.clone());
		}

		debug!("Creating new client for engine {}", config.engine_name);
		let cached = CachedClient::new(Self::build_client(config)?);

		match self.clients.entry(config.clone()) {
			// Another caller raced us here; keep theirs
			Entry::Occupied(entry) => Ok(entry.get().client.clone()),
			Entry::Vacant(entry) => {
				let client = cached.client.clone();
				entry.insert(cached);
				Ok(client)
			},
		}
	}

	/// Get or create the client for one engine's runtime configuration
	pub fn get_client_for(&self, engine_config: &EngineRuntimeConfig) -> EngineResult<Arc<Client>> {
		self.get_client(&ClientConfig::from(engine_config))
	}

	fn build_client(config: &ClientConfig) -> EngineResult<Client> {
		let mut header_map = HeaderMap::new();
		for (key, value) in &config.headers {
			let name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
				EngineError::InvalidConfiguration {
					reason: format!("invalid header name '{}'", key),
				}
			})?;
			let value =
				HeaderValue::from_str(value).map_err(|_| EngineError::InvalidConfiguration {
					reason: format!("invalid value for header '{}'", key),
				})?;
			header_map.insert(name, value);
		}

		ClientBuilder::new()
			.pool_max_idle_per_host(config.max_idle_per_host)
			.pool_idle_timeout(Duration::from_millis(config.keep_alive_timeout_ms))
			.tcp_keepalive(Duration::from_secs(60))
			.default_headers(header_map)
			.build()
			.map_err(EngineError::HttpError)
	}

	/// Remove all expired clients
	pub fn cleanup_expired(&self) -> usize {
		let before = self.clients.len();
		self.clients.retain(|_, cached| !cached.is_expired(self.ttl));
		let removed = before.saturating_sub(self.clients.len());
		if removed > 0 {
			debug!("Cleaned up {} expired clients from cache", removed);
		}
		removed
	}

	pub fn len(&self) -> usize {
		self.clients.len()
	}

	pub fn is_empty(&self) -> bool {
		self.clients.is_empty()
	}
}

impl Default for ClientCache {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use fanout_types::SecretString;
	use std::collections::HashMap;

	fn runtime_config() -> EngineRuntimeConfig {
		EngineRuntimeConfig {
			engine_name: "alpha".to_string(),
			endpoint: "https://alpha.example.com/query".to_string(),
			timeout_ms: 1000,
			credential: None,
			headers: None,
		}
	}

	#[test]
	fn test_client_config_adds_bearer_credential() {
		let mut engine_config = runtime_config();
		engine_config.credential = Some(SecretString::from("tok"));

		let config = ClientConfig::from(&engine_config);
		assert!(config
			.headers
			.contains(&("Authorization".to_string(), "Bearer tok".to_string())));
	}

	#[test]
	fn test_client_config_debug_hides_header_values() {
		let mut engine_config = runtime_config();
		engine_config.credential = Some(SecretString::from("super-secret-token"));
		engine_config.headers = Some(HashMap::from([(
			"X-Api-Key".to_string(),
			"key-123".to_string(),
		)]));

		let printed = format!("{:?}", ClientConfig::from(&engine_config));
		assert!(printed.contains("Authorization"));
		assert!(printed.contains("X-Api-Key"));
		assert!(!printed.contains("super-secret-token"));
		assert!(!printed.contains("key-123"));
	}

	#[test]
	fn test_client_config_header_order_is_stable() {
		let mut headers = HashMap::new();
		for i in 0..8 {
			headers.insert(format!("X-H{}", i), i.to_string());
		}
		let mut engine_config = runtime_config();
		engine_config.headers = Some(headers);

		assert_eq!(
			ClientConfig::from(&engine_config),
			ClientConfig::from(&engine_config.clone())
		);
	}

	#[tokio::test]
	async fn test_client_cache_reuse() {
		let cache = ClientCache::new();
		let config = ClientConfig::from(&runtime_config());

		let client1 = cache.get_client(&config).unwrap();
		let client2 = cache.get_client(&config).unwrap();

		assert!(Arc::ptr_eq(&client1, &client2));
		assert_eq!(cache.len(), 1);
	}

	#[tokio::test]
	async fn test_client_cache_ttl_expiration() {
		let cache = ClientCache::with_ttl(Duration::from_millis(20));
		let config = ClientConfig::from(&runtime_config());

		let client1 = cache.get_client(&config).unwrap();
		tokio::time::sleep(Duration::from_millis(50)).await;
		let client2 = cache.get_client(&config).unwrap();

		assert!(!Arc::ptr_eq(&client1, &client2));
	}

	#[tokio::test]
	async fn test_cleanup_expired() {
		let cache = ClientCache::with_ttl(Duration::from_millis(20));
		cache.get_client_for(&runtime_config()).unwrap();
		tokio::time::sleep(Duration::from_millis(50)).await;

		assert_eq!(cache.cleanup_expired(), 1);
		assert!(cache.is_empty());
	}

	#[test]
	fn test_invalid_header_is_rejected() {
		let mut headers = HashMap::new();
		headers.insert("bad header".to_string(), "x".to_string());
		let mut engine_config = runtime_config();
		engine_config.headers = Some(headers);

		let cache = ClientCache::new();
		assert!(matches!(
			cache.get_client_for(&engine_config),
			Err(EngineError::InvalidConfiguration { .. })
		));
	}
}
