//! Query domain model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod errors;

pub use errors::QueryValidationError;

pub type QueryValidationResult<T> = Result<T, QueryValidationError>;

/// One logical query fanned out to every enabled engine
///
/// A query is immutable once created. `context` is an opaque JSON object
/// forwarded verbatim to engines that understand it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
	pub text: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub context: Option<Map<String, Value>>,
}

impl Query {
	pub fn new(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			context: None,
		}
	}

	pub fn with_context(mut self, context: Map<String, Value>) -> Self {
		self.context = Some(context);
		self
	}

	/// Check the text against the emptiness and length rules
	///
	/// Both rules apply to the trimmed text. Length is counted in
	/// characters, not bytes.
	pub fn validate(&self, max_length: usize) -> QueryValidationResult<()> {
		let text = self.text.trim();
		if text.is_empty() {
			return Err(QueryValidationError::Empty);
		}

		let length = text.chars().count();
		if length > max_length {
			return Err(QueryValidationError::TooLong {
				length,
				max: max_length,
			});
		}

		Ok(())
	}

	/// The same query with surrounding whitespace removed from the text
	pub fn trimmed(mut self) -> Self {
		let trimmed = self.text.trim();
		if trimmed.len() != self.text.len() {
			self.text = trimmed.to_string();
		}
		self
	}

	/// Cache key: case-folded text with whitespace runs collapsed to one space
	pub fn normalized_key(&self) -> String {
		normalize_text(&self.text)
	}

	/// Key under which results for this query are cached
	///
	/// The normalized text, followed by the compact JSON of the context when
	/// one is present, so differing contexts never share an entry.
	pub fn cache_key(&self) -> String {
		match &self.context {
			Some(context) => format!("{}\n{}", self.normalized_key(), Value::Object(context.clone())),
			None => self.normalized_key(),
		}
	}
}

/// Case-fold and collapse whitespace so that semantically identical
/// repeats of a query share one key
pub fn normalize_text(text: &str) -> String {
	text.split_whitespace()
		.map(|word| word.to_lowercase())
		.collect::<Vec<_>>()
		.join(" ")
}
