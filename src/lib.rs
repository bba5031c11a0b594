//! # snow-table
//!
//! A reactive data-table engine: pagination, sorting, multi-value column
//! filters, free-text search, prefilters, row actions and column visibility,
//! with the table's state optionally mirrored into the page's query string.
//!
//! Tables come in two flavors. Client tables fetch every row once and do the
//! work in memory; server tables send the state to an endpoint and show one
//! page at a time.
//!
//! ## Feature Flags
//!
//! - `state` - state store, query-string persistence, filter codec
//! - `grid` - column/action projection and the client row model
//! - `query` - keyed remote-data cache
//! - `views` (default) - client and server orchestrators
//!
//! ## Architecture
//!
//! ```text
//! snow-table
//!  ├── reactive  Signal / Memo / Effect, flush_effects
//!  ├── state     TableStateStore ──▶ StateStorage ──▶ dt_* query parameters
//!  ├── grid      project_columns, RowModel, ActionHandler, ColumnVisibility
//!  ├── query     QueryKey ──▶ Query<T> ──▶ QueryState<T>
//!  └── views     ClientDataTable / ServerDataTable ──▶ TableView<T>
//! ```
//!
//! ## Quick Example
//!
//! ```
//! use snow_table::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq, serde::Serialize)]
//! struct Travel { name: &'static str, country: &'static str }
//!
//! # futures::executor::block_on(async {
//! let props = DataTableProps::<Travel>::new(QueryKey::new(["travels"]))
//! 	.column(ColumnConfig::new("name").label("Name"))
//! 	.column(ColumnConfig::new("country").label("Country"))
//! 	.filter(FilterConfig::new("country", "Country", vec![FilterOption::new("Portugal", "PT")]))
//! 	.default_page_size(10);
//!
//! let table = ClientDataTable::new(props, || {
//! 	futures::FutureExt::boxed_local(async {
//! 		Ok(vec![
//! 			Travel { name: "Lisbon", country: "PT" },
//! 			Travel { name: "Madrid", country: "ES" },
//! 		])
//! 	})
//! });
//!
//! table.refresh().await;
//! table.on_filter_change("country", vec!["PT".into()]);
//!
//! let view = table.view().unwrap();
//! assert_eq!(view.rows, [Travel { name: "Lisbon", country: "PT" }]);
//! assert!(view.has_active_filters);
//! # });
//! ```

#![warn(missing_docs)]

pub mod reactive;

#[cfg(feature = "grid")]
pub mod grid;
#[cfg(feature = "query")]
pub mod query;
#[cfg(feature = "state")]
pub mod state;
#[cfg(feature = "views")]
pub mod views;

/// Commonly used types
pub mod prelude {
	pub use crate::reactive::{Effect, Memo, Signal, flush_effects};

	#[cfg(feature = "state")]
	pub use crate::state::{
		ColumnFilters, ColumnSort, MemoryHistory, MemoryStorage, PaginationState,
		QueryStringStorage, SortOrder, SortingState, StateStorage, StateUpdate, TableState,
		TableStateConfig, TableStateStore,
	};

	#[cfg(feature = "grid")]
	pub use crate::grid::{
		ActionDescriptor, ActionHandler, ActionOutcome, ColumnConfig, ColumnDef, ColumnMeta,
		ConfirmOptions, EndpointAction, ErrorResponse, FilterConfig, FilterOption, Prefilter,
		RowModel, TableAction, TableContext, TableMode,
	};

	#[cfg(feature = "query")]
	pub use crate::query::{Query, QueryClient, QueryKey, QueryState};

	#[cfg(feature = "views")]
	pub use crate::views::{
		ClientDataTable, DataTable, DataTableOptions, DataTableProps, ServerDataTable,
		ServerFetchParams, ServerPage, TableView,
	};
}
