//! Error types for inbound queries

use thiserror::Error;

/// Validation errors for inbound query text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryValidationError {
	#[error("Query text must not be empty")]
	Empty,

	#[error("Query text is {length} characters long (maximum is {max})")]
	TooLong { length: usize, max: usize },
}
