//! Real HTTP engines served by axum on a local port
//!
//! Used to drive the built-in `http-json` adapter end to end.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde_json::{json, Value};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy)]
pub enum StubBehavior {
	/// Echo the request body after `delay`
	Echo(Duration),
	/// Respond with the given status after `delay`
	Status(Duration, u16),
	/// Respond 200 with a body that is not JSON
	Garbage,
}

#[derive(Clone)]
struct StubState {
	name: String,
	behavior: StubBehavior,
	hits: Arc<AtomicUsize>,
}

/// One stub engine listening on 127.0.0.1
pub struct StubEngine {
	pub endpoint: String,
	hits: Arc<AtomicUsize>,
	handle: JoinHandle<()>,
}

impl StubEngine {
	pub async fn spawn(name: &str, behavior: StubBehavior) -> Self {
		let hits = Arc::new(AtomicUsize::new(0));
		let state = StubState {
			name: name.to_string(),
			behavior,
			hits: Arc::clone(&hits),
		};
		let app = Router::new()
			.route("/query", post(handle_query))
			.with_state(state);

		let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
			.await
			.expect("bind stub engine");
		let addr = listener.local_addr().expect("stub engine address");
		let handle = tokio::spawn(async move {
			axum::serve(listener, app).await.expect("stub engine server");
		});

		Self {
			endpoint: format!("http://{}/query", addr),
			hits,
			handle,
		}
	}

	pub async fn echo(name: &str, delay: Duration) -> Self {
		Self::spawn(name, StubBehavior::Echo(delay)).await
	}

	pub fn hits(&self) -> usize {
		self.hits.load(Ordering::SeqCst)
	}
}

impl Drop for StubEngine {
	fn drop(&mut self) {
		self.handle.abort();
	}
}

async fn handle_query(State(state): State<StubState>, Json(body): Json<Value>) -> impl IntoResponse {
	state.hits.fetch_add(1, Ordering::SeqCst);
	match state.behavior {
		StubBehavior::Echo(delay) => {
			tokio::time::sleep(delay).await;
			(
				StatusCode::OK,
				Json(json!({ "engine": state.name, "echo": body })),
			)
				.into_response()
		},
		StubBehavior::Status(delay, status) => {
			tokio::time::sleep(delay).await;
			let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
			(status, "stub failure").into_response()
		},
		StubBehavior::Garbage => (StatusCode::OK, "<html>not json</html>").into_response(),
	}
}
