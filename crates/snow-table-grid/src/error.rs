//! Error types for the grid layer

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Row-model and column-configuration misuse
#[derive(Debug, Error)]
pub enum GridError {
	/// No column with this id exists
	#[error("unknown column `{0}`")]
	UnknownColumn(String),

	/// The column exists but sorting is disabled on it
	#[error("column `{0}` is not sortable")]
	NotSortable(String),

	/// The column exists but has no filter configured
	#[error("column `{0}` is not filterable")]
	NotFilterable(String),

	/// Page size must be positive
	#[error("page size must be positive")]
	InvalidPageSize,

	/// A row could not be converted for field access
	#[error("row serialization failed: {0}")]
	Serialization(#[from] serde_json::Error),
}

/// Result alias for grid operations
pub type Result<T> = std::result::Result<T, GridError>;

/// Failure reported by a remote endpoint
///
/// Shared by row-action endpoints and server data fetches.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message} (status {status})")]
pub struct ErrorResponse {
	/// Human readable message
	pub message: String,
	/// HTTP-like status code
	pub status: u16,
}

impl ErrorResponse {
	/// Creates an error response
	pub fn new(message: impl Into<String>, status: u16) -> Self {
		Self {
			message: message.into(),
			status,
		}
	}
}
