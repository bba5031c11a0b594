//! Error types for remote queries

use thiserror::Error;

/// Result type for fetchers
pub type Result<T> = std::result::Result<T, QueryError>;

/// Failure reported by a fetcher
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
	/// The remote call failed
	#[error("{message}")]
	Failed {
		/// Human readable message
		message: String,
		/// HTTP status when the failure came from a response
		status: Option<u16>,
	},

	/// The response could not be decoded
	#[error("Failed to decode response: {0}")]
	Decode(String),
}

impl QueryError {
	/// A failed remote call
	pub fn failed(message: impl Into<String>, status: Option<u16>) -> Self {
		Self::Failed {
			message: message.into(),
			status,
		}
	}

	/// HTTP status, if known
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Failed { status, .. } => *status,
			Self::Decode(_) => None,
		}
	}
}
