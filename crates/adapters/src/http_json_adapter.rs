//! JSON-over-HTTP engine adapter
//!
//! Posts `{"query": ..., "context": ...}` to the engine endpoint and treats the
//! JSON response body as the engine's opaque payload.

use async_trait::async_trait;
use fanout_types::{
	Adapter, EngineAdapter, EngineError, EngineResult, EngineRuntimeConfig, Query,
	DEFAULT_ADAPTER_ID,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::client_cache::ClientCache;

/// Request body sent to engines
#[derive(Debug, Serialize)]
struct EngineRequest<'a> {
	query: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	context: Option<&'a Map<String, Value>>,
}

/// Adapter for engines speaking plain JSON over HTTP POST
#[derive(Debug, Clone)]
pub struct HttpJsonAdapter {
	info: Adapter,
	cache: ClientCache,
}

impl HttpJsonAdapter {
	pub fn new() -> Self {
		Self::with_client_cache(ClientCache::new())
	}

	pub fn with_client_cache(cache: ClientCache) -> Self {
		Self {
			info: Adapter::new(DEFAULT_ADAPTER_ID, "HTTP JSON Adapter")
				.with_description("POSTs the query as JSON and returns the JSON response body"),
			cache,
		}
	}
}

impl Default for HttpJsonAdapter {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl EngineAdapter for HttpJsonAdapter {
	fn adapter_info(&self) -> &Adapter {
		&self.info
	}

	async fn query(&self, query: &Query, config: &EngineRuntimeConfig) -> EngineResult<Value> {
		debug!(
			"Sending query to engine {} at {}",
			config.engine_name, config.endpoint
		);

		let client = self.cache.get_client_for(config)?;
		let body = EngineRequest {
			query: &query.text,
			context: query.context.as_ref(),
		};

		let response = client.post(&config.endpoint).json(&body).send().await?;

		let status = response.status();
		if !status.is_success() {
			return Err(EngineError::from_http_failure(status.as_u16()));
		}

		let bytes = response.bytes().await?;
		debug!(
			"Engine {} responded successfully with {} bytes",
			config.engine_name,
			bytes.len()
		);

		serde_json::from_slice(&bytes).map_err(|e| EngineError::InvalidResponse {
			reason: format!("engine response is not valid JSON: {}", e),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::{
		http::{HeaderMap, StatusCode},
		routing::post,
		Json, Router,
	};
	use fanout_types::SecretString;
	use serde_json::json;

	async fn spawn_engine(app: Router) -> String {
		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		tokio::spawn(async move {
			axum::serve(listener, app).await.unwrap();
		});
		format!("http://{}/query", addr)
	}

	fn runtime_config(endpoint: String) -> EngineRuntimeConfig {
		EngineRuntimeConfig {
			engine_name: "test-engine".to_string(),
			endpoint,
			timeout_ms: 1000,
			credential: None,
			headers: None,
		}
	}

	#[tokio::test]
	async fn test_success_returns_body_as_payload() {
		let app = Router::new().route(
			"/query",
			post(|Json(body): Json<Value>| async move {
				Json(json!({ "echo": body["query"], "context": body.get("context") }))
			}),
		);
		let endpoint = spawn_engine(app).await;

		let mut ctx = Map::new();
		ctx.insert("lang".to_string(), json!("en"));
		let query = Query::new("ping").with_context(ctx);

		let payload = HttpJsonAdapter::new()
			.query(&query, &runtime_config(endpoint))
			.await
			.unwrap();

		assert_eq!(payload["echo"], "ping");
		assert_eq!(payload["context"]["lang"], "en");
	}

	#[tokio::test]
	async fn test_credential_is_sent_as_bearer_token() {
		let app = Router::new().route(
			"/query",
			post(|headers: HeaderMap| async move {
				let auth = headers
					.get("authorization")
					.and_then(|v| v.to_str().ok())
					.unwrap_or("")
					.to_string();
				Json(json!({ "auth": auth }))
			}),
		);
		let endpoint = spawn_engine(app).await;

		let mut config = runtime_config(endpoint);
		config.credential = Some(SecretString::from("s3cret"));

		let payload = HttpJsonAdapter::new()
			.query(&Query::new("ping"), &config)
			.await
			.unwrap();
		assert_eq!(payload["auth"], "Bearer s3cret");
	}

	#[tokio::test]
	async fn test_non_success_status_is_an_error() {
		let app = Router::new().route(
			"/query",
			post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
		);
		let endpoint = spawn_engine(app).await;

		let err = HttpJsonAdapter::new()
			.query(&Query::new("ping"), &runtime_config(endpoint))
			.await
			.unwrap_err();

		assert_eq!(err.status_code(), Some(503));
		assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
	}

	#[tokio::test]
	async fn test_invalid_json_body_is_an_error() {
		let app = Router::new().route("/query", post(|| async { "definitely not json" }));
		let endpoint = spawn_engine(app).await;

		let err = HttpJsonAdapter::new()
			.query(&Query::new("ping"), &runtime_config(endpoint))
			.await
			.unwrap_err();

		assert!(matches!(err, EngineError::InvalidResponse { .. }));
	}

	#[tokio::test]
	async fn test_connection_refused_is_an_error() {
		// Bind then drop to get a port nothing listens on
		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		drop(listener);

		let err = HttpJsonAdapter::new()
			.query(
				&Query::new("ping"),
				&runtime_config(format!("http://{}/query", addr)),
			)
			.await
			.unwrap_err();

		assert!(matches!(err, EngineError::HttpError(_)));
	}
}
