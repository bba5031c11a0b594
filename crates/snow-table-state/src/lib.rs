//! Table state reconciliation and persistence for snow-table
//!
//! This crate owns the five pieces of state every data table needs (prefilter,
//! free-text search, pagination, column filters and sorting) and optionally
//! mirrors them into the page's query string so they survive reloads and
//! back-navigation.
//!
//! # Architecture
//!
//! ```text
//! TableStateStore ──reads/writes──▶ StateStorage (trait)
//!       │                              ├── QueryStringStorage<H: History>
//!       │                              │       ├── BrowserHistory (window.history)
//!       │                              │       └── MemoryHistory (SSR, tests)
//!       │                              └── MemoryStorage
//!       └── filters::{encode_filters, decode_filters}  (dt_filters token)
//! ```
//!
//! # Query-string slots
//!
//! | Key | Value |
//! |-----|-------|
//! | `dt_prefilter` | active prefilter id |
//! | `dt_search` | search term |
//! | `dt_page` | 1-based page, omitted on page 1 |
//! | `dt_pageSize` | page size, omitted when equal to the default |
//! | `dt_filters` | `key:v1,v2\|key2:v3` |
//! | `dt_sortBy` / `dt_sortDesc` | sort column and `"true"`/`"false"` |
//!
//! # Example
//!
//! ```
//! use snow_table_state::{MemoryHistory, QueryStringStorage, TableStateConfig, TableStateStore};
//! use std::rc::Rc;
//!
//! let history = MemoryHistory::new("https://app.test/users?dt_page=3");
//! let storage = Rc::new(QueryStringStorage::new(history.clone()));
//! let store = TableStateStore::with_storage(TableStateConfig::default().enabled(true), storage);
//!
//! assert_eq!(store.pagination().page_index, 2);
//!
//! store.set_search("ada");
//! assert_eq!(history.query_value("dt_search").as_deref(), Some("ada"));
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod debounce;
pub mod error;
pub mod filters;
pub mod model;
pub mod storage;
pub mod store;

pub use config::{DEFAULT_PAGE_SIZE, SortOrder, TableStateConfig};
pub use debounce::{SEARCH_DEBOUNCE, SearchDebouncer};
pub use error::{Result, StateError};
pub use filters::{ColumnFilters, decode_filters, encode_filters};
pub use model::{ColumnSort, PaginationState, SortingState, StateUpdate, TableState};
pub use storage::{
	BrowserHistory, History, MemoryHistory, MemoryStorage, QueryStringStorage, STORAGE_KEY_FILTERS,
	STORAGE_KEY_PAGE, STORAGE_KEY_PAGE_SIZE, STORAGE_KEY_PREFILTER, STORAGE_KEY_SEARCH,
	STORAGE_KEY_SORT_BY, STORAGE_KEY_SORT_DESC, StateStorage,
};
pub use store::TableStateStore;
