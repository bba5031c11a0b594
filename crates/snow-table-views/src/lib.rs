//! Client and server data-table orchestrators for snow-table
//!
//! A table is described once with [`DataTableProps`] and then driven by one
//! of two orchestrators:
//!
//! - [`ClientDataTable`] fetches every row once and searches, filters, sorts
//!   and pages in memory
//! - [`ServerDataTable`] turns each state into [`ServerFetchParams`] and
//!   fetches one [`ServerPage`] at a time, keeping the previous page visible
//!   while the next one loads
//!
//! Both implement [`DataTable`], which carries the change handlers, and
//! produce a [`TableView`] for rendering.
//!
//! # Architecture
//!
//! ```text
//! DataTableProps ─▶ TableCore ─┬─ TableStateStore (state + URL persistence)
//!                              ├─ project_columns ─▶ ColumnDef
//!                              ├─ ColumnVisibility (optional)
//!                              └─ ActionHandler
//!
//! ClientDataTable: Query<Vec<T>> ─▶ prefilter_fn ─▶ RowModel ─▶ TableView
//! ServerDataTable: TableState ─▶ ServerFetchParams ─▶ endpoint
//!                  Query<ServerPage<T>> (keyed by state) ─▶ TableView
//! ```
//!
//! Handlers update the store synchronously; [`DataTable::refresh`] and
//! [`DataTable::view`] first run pending effects, so a page-index reset
//! triggered by a filter change is applied before data is fetched or shown.

#![warn(missing_docs)]

pub mod client;
pub mod clock;
pub mod error;
pub mod options;
pub mod params;
pub mod props;
pub mod server;
pub mod table;
pub mod view;

pub use client::ClientDataTable;
pub use error::{Result, ViewError};
pub use options::{DEFAULT_PAGE_SIZES, DataTableOptions, DataTableTexts};
pub use params::{ServerFetchParams, ServerPage, ServerSortOrder};
pub use props::DataTableProps;
pub use server::ServerDataTable;
pub use table::{DataTable, TableCore};
pub use view::{MAX_SKELETON_ROWS, TableView};
