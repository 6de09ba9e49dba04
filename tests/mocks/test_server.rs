//! Aggregator server on a local port for end-to-end tests

use fanout_aggregator::AggregatorBuilder;
use tokio::task::JoinHandle;

pub struct TestServer {
	pub base_url: String,
	pub handle: JoinHandle<()>,
}

impl TestServer {
	/// Build the app from `builder` and serve it on an ephemeral port
	pub async fn spawn(builder: AggregatorBuilder) -> Result<Self, Box<dyn std::error::Error>> {
		let (app, _state) = builder.start().await?;

		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
		let addr = listener.local_addr()?;
		let handle = tokio::spawn(async move {
			axum::serve(listener, app).await.expect("test server");
		});

		Ok(Self {
			base_url: format!("http://{}", addr),
			handle,
		})
	}

	pub fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url, path)
	}

	pub fn abort(&self) {
		self.handle.abort();
	}
}

impl Drop for TestServer {
	fn drop(&mut self) {
		self.abort();
	}
}
