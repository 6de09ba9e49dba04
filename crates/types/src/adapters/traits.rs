//! Core adapter trait for engine protocol implementations

use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use super::{Adapter, EngineResult, EngineRuntimeConfig};
use crate::queries::Query;

/// Protocol used to send one query to one engine
///
/// Implementations perform a single call and report what happened. They do
/// not enforce deadlines or retry; the engine client around them does the
/// former and nothing does the latter.
#[async_trait]
pub trait EngineAdapter: Send + Sync + Debug {
	/// Get adapter information
	fn adapter_info(&self) -> &Adapter;

	/// Get adapter ID (for registration and engine matching)
	fn id(&self) -> &str {
		&self.adapter_info().adapter_id
	}

	/// Send the query and return the engine's opaque payload
	async fn query(&self, query: &Query, config: &EngineRuntimeConfig) -> EngineResult<Value>;

	/// Get human-readable name for this adapter
	fn name(&self) -> &str {
		&self.adapter_info().name
	}
}
