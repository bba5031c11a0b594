//! Error types for table state handling
//!
//! None of these reach callers of [`TableStateStore`](crate::TableStateStore):
//! malformed persisted input is logged and replaced by defaults.

use thiserror::Error;

/// Result type for state operations
pub type Result<T> = std::result::Result<T, StateError>;

/// Errors raised while reading persisted table state
#[derive(Debug, Error)]
pub enum StateError {
	/// The current page URL could not be parsed
	#[error("Invalid page URL: {0}")]
	InvalidUrl(#[from] url::ParseError),

	/// A persisted slot held a value that does not parse as a positive integer
	#[error("Invalid value {value:?} for {key}: expected a positive integer")]
	InvalidNumber {
		/// Query-string key
		key: &'static str,
		/// Raw persisted value
		value: String,
	},
}
