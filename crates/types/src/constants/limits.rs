//! Global limits and defaults for configuration and runtime

/// Minimum allowed timeout budget for a single engine call in milliseconds
pub const MIN_ENGINE_TIMEOUT_MS: u64 = 10; // 10ms

/// Maximum allowed timeout budget for a single engine call in milliseconds
pub const MAX_ENGINE_TIMEOUT_MS: u64 = 60_000; // 60s

/// Default timeout budget for a single engine call in milliseconds
pub const DEFAULT_ENGINE_TIMEOUT_MS: u64 = 2_000; // 2s

/// Default hard ceiling on total dispatch wall-clock time in milliseconds
pub const DEFAULT_GLOBAL_CEILING_MS: u64 = 5_000; // 5s

/// Default maximum query length in characters
pub const DEFAULT_MAX_QUERY_LENGTH: usize = 2_048;

/// Default time-to-live for cached aggregated results in seconds
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;

/// Longest time-to-live a cached result may be given, in seconds
pub const MAX_CACHE_TTL_SECS: u64 = 7 * 24 * 60 * 60; // 7 days

/// Default interval between background sweeps of expired cache entries
pub const DEFAULT_CACHE_CLEANUP_INTERVAL_SECS: u64 = 60;

/// Default rate limit: requests per minute
pub const DEFAULT_RATE_LIMIT_REQUESTS_PER_MINUTE: u32 = 1000;

/// Rate limit window duration in seconds
pub const RATE_LIMIT_WINDOW_SECONDS: u64 = 60;
