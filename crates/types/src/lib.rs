//! Fanout Types
//!
//! Shared models and traits for the fanout aggregator.
//! Domain models are organized by business entity: queries, engines,
//! outcomes and the adapter seam used to talk to engines.

pub mod adapters;
pub mod constants;
pub mod engines;
pub mod models;
pub mod outcomes;
pub mod queries;

// Re-export chrono and serde_json for convenience
pub use chrono;
pub use serde_json;

pub use constants::*;

pub use adapters::{
	Adapter, EngineAdapter, EngineError, EngineResult, EngineRuntimeConfig,
};

pub use engines::{
	ConfigError, EngineDescriptor, EngineResponse, EngineValidationError, DEFAULT_ADAPTER_ID,
};

pub use models::SecretString;

pub use outcomes::{
	AggregatedResponse, AggregatedResult, EngineOutcome, EngineOutcomeResponse, OutcomeResult,
	OutcomeStatus, OverallStatus, DEADLINE_EXCEEDED,
};

pub use queries::{Query, QueryValidationError};
