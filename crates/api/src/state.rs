use std::sync::Arc;

use fanout_service::{EngineRegistry, QueryRouter};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
	pub query_router: Arc<QueryRouter>,
	pub registry: Arc<EngineRegistry>,
}
