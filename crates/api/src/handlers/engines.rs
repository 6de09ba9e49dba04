//! Engine listing handler

use axum::{extract::State, response::Json};
use tracing::debug;

use crate::state::AppState;
use fanout_types::EngineResponse;

/// GET /api/engines - List configured engines, enabled or not
pub async fn get_engines(State(state): State<AppState>) -> Json<Vec<EngineResponse>> {
	debug!("Listing configured engines");
	let engines = state
		.registry
		.list_all()
		.iter()
		.map(|engine| EngineResponse::from(engine.as_ref()))
		.collect();
	Json(engines)
}
