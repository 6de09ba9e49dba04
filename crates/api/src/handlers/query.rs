use axum::{
	extract::{rejection::JsonRejection, State},
	http::StatusCode,
	response::Json,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use crate::handlers::common::{error_response, ApiError};
use crate::state::AppState;
use fanout_service::RouterError;
use fanout_types::{AggregatedResponse, Query};

/// Body of POST /api/query
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
	/// Missing is treated like empty and rejected by validation
	#[serde(default)]
	pub query: Option<String>,
	#[serde(default)]
	pub context: Option<Map<String, Value>>,
}

impl From<QueryRequest> for Query {
	fn from(request: QueryRequest) -> Self {
		Query {
			text: request.query.unwrap_or_default(),
			context: request.context,
		}
	}
}

/// POST /api/query - Fan a query out to every enabled engine
///
/// Engine failures are part of a 200 response; only invalid input (400) and
/// configuration problems (500) are errors.
pub async fn post_query(
	State(state): State<AppState>,
	payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<AggregatedResponse>, ApiError> {
	let Json(request) = payload.map_err(|rejection| {
		warn!("Rejected query request body: {}", rejection.body_text());
		error_response(
			StatusCode::BAD_REQUEST,
			"INVALID_REQUEST",
			format!("Invalid request body: {}", rejection.body_text()),
		)
	})?;

	let query = Query::from(request);
	info!("Received query ({} chars)", query.text.chars().count());

	match state.query_router.handle_query(query).await {
		Ok(result) => Ok(Json(AggregatedResponse::from(result.as_ref()))),
		Err(RouterError::Validation(e)) => Err(error_response(
			StatusCode::BAD_REQUEST,
			"VALIDATION_ERROR",
			format!("Invalid query: {}", e),
		)),
		Err(RouterError::Config(e)) => {
			error!("Query could not be dispatched: {}", e);
			Err(error_response(
				StatusCode::INTERNAL_SERVER_ERROR,
				"CONFIGURATION_ERROR",
				e.to_string(),
			))
		},
	}
}
