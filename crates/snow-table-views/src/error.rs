//! Error types for table orchestrators

use snow_table_grid::{ErrorResponse, GridError};
use snow_table_query::QueryError;
use thiserror::Error;

/// Result type for orchestrator operations
pub type Result<T> = std::result::Result<T, ViewError>;

/// Errors raised while building a table view
#[derive(Debug, Error)]
pub enum ViewError {
	/// The row model rejected the rows or the state
	#[error(transparent)]
	Grid(#[from] GridError),

	/// Fetch parameters could not be encoded
	#[error("Failed to encode fetch parameters: {0}")]
	Encode(#[from] serde_urlencoded::ser::Error),
}

/// Maps an endpoint failure onto the query layer's error
pub(crate) fn query_error(err: ErrorResponse) -> QueryError {
	QueryError::failed(err.message, Some(err.status))
}
