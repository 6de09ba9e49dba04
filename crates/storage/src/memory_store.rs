//! In-memory response cache with lazy TTL expiry and FIFO capacity eviction

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use async_trait::async_trait;
use fanout_types::{AggregatedResult, MAX_CACHE_TTL_SECS};
use tokio::time::{interval, Instant};
use tracing::debug;

use crate::traits::{CacheEntry, ResponseCache};

#[derive(Debug)]
struct Slot {
	entry: CacheEntry,
	seq: u64,
}

/// Entries plus their insertion order
///
/// `order` may hold stale `(key, seq)` pairs for keys that were overwritten or
/// removed; a pair is live only while the stored slot carries the same seq.
#[derive(Debug, Default)]
struct CacheInner {
	slots: HashMap<String, Slot>,
	order: VecDeque<(String, u64)>,
	next_seq: u64,
}

impl CacheInner {
	fn evict_oldest(&mut self) -> bool {
		while let Some((key, seq)) = self.order.pop_front() {
			let live = self.slots.get(&key).is_some_and(|slot| slot.seq == seq);
			if live {
				self.slots.remove(&key);
				debug!("Evicted oldest cache entry '{}'", key);
				return true;
			}
		}
		false
	}

	fn compact_order(&mut self) {
		if self.order.len() > self.slots.len() * 2 + 16 {
			let slots = &self.slots;
			self.order
				.retain(|(key, seq)| slots.get(key).is_some_and(|slot| slot.seq == *seq));
		}
	}
}

/// Process-local response cache
///
/// A single mutex guards both the map and the insertion order; it is never
/// held across an await point.
#[derive(Debug, Clone)]
pub struct MemoryCache {
	inner: Arc<Mutex<CacheInner>>,
	capacity: Option<usize>,
}

impl MemoryCache {
	/// Create an unbounded cache
	pub fn new() -> Self {
		Self {
			inner: Arc::new(Mutex::new(CacheInner::default())),
			capacity: None,
		}
	}

	/// Create a cache holding at most `capacity` entries
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			capacity: Some(capacity.max(1)),
			..Self::new()
		}
	}

	pub fn capacity(&self) -> Option<usize> {
		self.capacity
	}

	fn lock(&self) -> MutexGuard<'_, CacheInner> {
		// Every critical section leaves the maps consistent, so a poisoned
		// lock still guards valid data
		self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}

	fn sweep(inner: &Mutex<CacheInner>) -> usize {
		let mut guard = inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
		let now = Instant::now();
		let before = guard.slots.len();
		guard.slots.retain(|_, slot| !slot.entry.is_expired_at(now));
		let removed = before - guard.slots.len();
		guard.compact_order();
		removed
	}

	/// Start the background sweep of expired entries
	///
	/// The task ends on its own once every handle to the cache is dropped.
	pub fn start_ttl_cleanup(&self, every: Duration) -> tokio::task::JoinHandle<()> {
		let inner: Weak<Mutex<CacheInner>> = Arc::downgrade(&self.inner);
		tokio::spawn(async move {
			let mut cleanup_interval = interval(every);
			// First tick completes immediately
			cleanup_interval.tick().await;

			loop {
				cleanup_interval.tick().await;
				let Some(inner) = inner.upgrade() else {
					break;
				};
				let removed = Self::sweep(&inner);
				if removed > 0 {
					debug!("Cleaned up {} expired cache entries", removed);
				}
			}
		})
	}
}

impl Default for MemoryCache {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl ResponseCache for MemoryCache {
	async fn get(&self, key: &str) -> Option<CacheEntry> {
		let mut inner = self.lock();
		let now = Instant::now();

		match inner.slots.get(key) {
			Some(slot) if slot.entry.is_expired_at(now) => {
				debug!("Cache entry '{}' expired", key);
				inner.slots.remove(key);
				None
			},
			Some(slot) => Some(slot.entry.clone()),
			None => None,
		}
	}

	async fn put(&self, key: String, result: Arc<AggregatedResult>, ttl: Duration) {
		let max_ttl = Duration::from_secs(MAX_CACHE_TTL_SECS);
		if ttl > max_ttl {
			debug!("Clamping cache TTL of {}s to {}s", ttl.as_secs(), MAX_CACHE_TTL_SECS);
		}
		let now = Instant::now();
		let expires_at = now.checked_add(ttl.min(max_ttl)).unwrap_or(now);

		let mut inner = self.lock();
		let seq = inner.next_seq;
		inner.next_seq += 1;

		let entry = CacheEntry {
			key: key.clone(),
			result,
			expires_at,
		};
		inner.slots.insert(key.clone(), Slot { entry, seq });
		inner.order.push_back((key, seq));

		if let Some(capacity) = self.capacity {
			while inner.slots.len() > capacity {
				if !inner.evict_oldest() {
					break;
				}
			}
		}
		inner.compact_order();
	}

	async fn cleanup_expired(&self) -> usize {
		Self::sweep(&self.inner)
	}

	async fn len(&self) -> usize {
		self.lock().slots.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use fanout_types::{AggregatedResult, OverallStatus, Query};

	fn result(text: &str) -> Arc<AggregatedResult> {
		Arc::new(AggregatedResult {
			query: Query::new(text),
			outcomes: vec![],
			overall_status: OverallStatus::AllFailed,
			generated_at: fanout_types::chrono::Utc::now(),
		})
	}

	#[tokio::test(start_paused = true)]
	async fn test_get_returns_stored_entry_until_expiry() {
		let cache = MemoryCache::new();
		let stored = result("ping");
		cache
			.put("ping".to_string(), stored.clone(), Duration::from_secs(10))
			.await;

		let entry = cache.get("ping").await.unwrap();
		assert!(Arc::ptr_eq(&entry.result, &stored));
		assert_eq!(entry.key, "ping");

		tokio::time::advance(Duration::from_secs(9)).await;
		assert!(cache.get("ping").await.is_some());

		tokio::time::advance(Duration::from_secs(1)).await;
		assert!(cache.get("ping").await.is_none());
		// Lazy expiry removed it
		assert_eq!(cache.len().await, 0);
	}

	#[tokio::test(start_paused = true)]
	async fn test_huge_ttl_is_clamped() {
		let cache = MemoryCache::new();
		cache
			.put("k".to_string(), result("k"), Duration::from_secs(u64::MAX))
			.await;

		let entry = cache.get("k").await.unwrap();
		assert_eq!(
			entry.expires_at - Instant::now(),
			Duration::from_secs(MAX_CACHE_TTL_SECS)
		);
	}

	#[tokio::test]
	async fn test_missing_key() {
		let cache = MemoryCache::new();
		assert!(cache.get("nope").await.is_none());
		assert!(cache.is_empty().await);
	}

	#[tokio::test(start_paused = true)]
	async fn test_put_overwrites() {
		let cache = MemoryCache::new();
		cache
			.put("k".to_string(), result("first"), Duration::from_secs(1))
			.await;
		cache
			.put("k".to_string(), result("second"), Duration::from_secs(10))
			.await;

		tokio::time::advance(Duration::from_secs(5)).await;
		let entry = cache.get("k").await.unwrap();
		assert_eq!(entry.result.query.text, "second");
		assert_eq!(cache.len().await, 1);
	}

	#[tokio::test]
	async fn test_capacity_evicts_oldest_first() {
		let cache = MemoryCache::with_capacity(2);
		let ttl = Duration::from_secs(60);

		cache.put("a".to_string(), result("a"), ttl).await;
		cache.put("b".to_string(), result("b"), ttl).await;
		cache.put("c".to_string(), result("c"), ttl).await;

		assert!(cache.get("a").await.is_none());
		assert!(cache.get("b").await.is_some());
		assert!(cache.get("c").await.is_some());
		assert_eq!(cache.len().await, 2);
	}

	#[tokio::test]
	async fn test_overwrite_moves_entry_to_back_of_fifo() {
		let cache = MemoryCache::with_capacity(2);
		let ttl = Duration::from_secs(60);

		cache.put("a".to_string(), result("a"), ttl).await;
		cache.put("b".to_string(), result("b"), ttl).await;
		cache.put("a".to_string(), result("a2"), ttl).await;
		cache.put("c".to_string(), result("c"), ttl).await;

		// "b" is now the oldest insertion
		assert!(cache.get("b").await.is_none());
		assert_eq!(cache.get("a").await.unwrap().result.query.text, "a2");
		assert!(cache.get("c").await.is_some());
	}

	#[tokio::test]
	async fn test_repeated_overwrites_keep_order_bounded() {
		let cache = MemoryCache::with_capacity(4);
		for i in 0..1000 {
			cache
				.put("hot".to_string(), result(&i.to_string()), Duration::from_secs(60))
				.await;
		}
		assert_eq!(cache.len().await, 1);
		assert!(cache.lock().order.len() <= 18);
	}

	#[tokio::test(start_paused = true)]
	async fn test_cleanup_expired() {
		let cache = MemoryCache::new();
		cache
			.put("short".to_string(), result("short"), Duration::from_secs(1))
			.await;
		cache
			.put("long".to_string(), result("long"), Duration::from_secs(100))
			.await;

		tokio::time::advance(Duration::from_secs(2)).await;
		assert_eq!(cache.cleanup_expired().await, 1);
		assert_eq!(cache.len().await, 1);
	}

	#[tokio::test(start_paused = true)]
	async fn test_background_sweep() {
		let cache = MemoryCache::new();
		let handle = cache.start_ttl_cleanup(Duration::from_secs(5));
		cache
			.put("k".to_string(), result("k"), Duration::from_secs(1))
			.await;

		tokio::time::sleep(Duration::from_secs(6)).await;
		assert_eq!(cache.len().await, 0);

		drop(cache);
		tokio::time::sleep(Duration::from_secs(6)).await;
		assert!(handle.is_finished());
	}
}
