//! Keyed remote-data cache for snow-table
//!
//! Server-mode tables fetch one page at a time. This crate keys each fetch
//! by the table state that produced it, caches results, and tracks loading
//! progress in a reactive [`QueryState`].
//!
//! # Architecture
//!
//! ```text
//! QueryKey ─▶ Query::fetch ─┬─ cache hit ─▶ QueryState::success
//!                           └─ fetcher().await ─▶ QueryClient cache
//!                                   │
//!                                   └─ stale generation? ─▶ dropped
//! ```
//!
//! While a new key loads, [`QueryOptions::keep_previous_data`] keeps the
//! previous result visible with `is_fetching` set and `is_loading` clear.

#![warn(missing_docs)]

pub mod error;
pub mod key;
pub mod query;

pub use error::{QueryError, Result};
pub use key::{KeyPart, QueryKey};
pub use query::{DEFAULT_CACHE_CAPACITY, Query, QueryClient, QueryOptions, QueryState};
