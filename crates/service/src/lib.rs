//! Fanout Service
//!
//! Core logic for fanning a query out to engines and assembling the result.

pub mod aggregator;
pub mod circuit_breaker;
pub mod dispatcher;
pub mod engine_client;
pub mod query_router;
pub mod registry;

#[cfg(test)]
mod test_support;

pub use aggregator::ResultAggregator;
pub use circuit_breaker::{CircuitBreaker, CircuitState, CIRCUIT_OPEN_REASON};
pub use dispatcher::{DispatcherTrait, ParallelDispatcher};
pub use engine_client::EngineClient;
pub use query_router::{QueryRouter, RouterError};
pub use registry::EngineRegistry;
