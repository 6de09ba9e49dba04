//! Cache traits for pluggable cache implementations

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fanout_types::AggregatedResult;
use tokio::time::Instant;

/// A cached aggregated result and when it stops being served
#[derive(Debug, Clone)]
pub struct CacheEntry {
	pub key: String,
	pub result: Arc<AggregatedResult>,
	pub expires_at: Instant,
}

impl CacheEntry {
	pub fn is_expired_at(&self, now: Instant) -> bool {
		now >= self.expires_at
	}
}

/// Memoizes aggregated results by normalized query key
///
/// Implementations must be safe to share across concurrent requests. The
/// cache is purely an optimization: dropping it changes latency and dispatch
/// count, never the shape of results.
#[async_trait]
pub trait ResponseCache: Send + Sync {
	/// Return the live entry for `key`, if any; expired entries are never returned
	async fn get(&self, key: &str) -> Option<CacheEntry>;

	/// Store or overwrite the entry for `key`
	async fn put(&self, key: String, result: Arc<AggregatedResult>, ttl: Duration);

	/// Drop every expired entry, returning how many were removed
	async fn cleanup_expired(&self) -> usize;

	/// Number of stored entries (expired ones included until swept)
	async fn len(&self) -> usize;

	async fn is_empty(&self) -> bool {
		self.len().await == 0
	}
}
