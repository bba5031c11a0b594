//! Column projection, row actions and the client row model for snow-table
//!
//! This crate turns a declarative column list into column definitions, runs
//! row actions through confirmation and mutation tracking, and computes the
//! in-memory row model used by client-mode tables.
//!
//! # Features
//!
//! - **Projection**: [`project_columns`] drops hidden columns, translates
//!   headers, marks filterable columns and appends the `actions` column
//! - **Row model**: [`RowModel`] applies fuzzy global search, multi-select
//!   column filters, single-column sort and pagination
//! - **Actions**: [`TableAction`], [`ActionCell`] and [`ActionHandler`]
//! - **Collaborators**: [`TableContext`] bundles translation, confirmation
//!   and link resolution
//! - **Column visibility**: [`ColumnVisibility`] persisted per table
//!
//! # Architecture
//!
//! ```text
//! ColumnConfig ─┐
//! FilterConfig ─┼─ project_columns ─▶ ColumnDef ─▶ RowModel ─▶ visible rows
//! TableAction ──┘                        │
//!                                        └─▶ ColumnVisibility
//! TableAction ─▶ ActionCell (layout)
//!             └▶ ActionHandler ─▶ TableContext::confirm ─▶ Mutation ─▶ on_success / on_error
//! ```

#![warn(missing_docs)]

pub mod action;
pub mod column;
pub mod context;
pub mod error;
pub mod filter;
pub mod fuzzy;
pub mod handler;
pub mod prefilter;
pub mod row_model;
pub mod value;
pub mod visibility;

pub use action::{
	ActionCell, ActionDescriptor, ActionDisplay, ActionKind, ActionVariant, CellAction,
	EndpointAction, LinkTarget, TableAction,
};
pub use column::{
	ACTIONS_COLUMN_ID, Accessor, ColumnConfig, ColumnDef, ColumnMeta, TableMode, project_columns,
};
pub use context::{
	AlwaysConfirm, BasePathLinks, Confirm, ConfirmOptions, EchoTranslator, LinkResolver,
	PlainLinks, TableContext, Translate, english_fallback,
};
pub use error::{ErrorResponse, GridError, Result};
pub use filter::{FilterConfig, FilterOption, apply_filter_change, multi_select_matches};
pub use fuzzy::fuzzy_matches;
pub use handler::{ActionHandler, ActionOutcome, Mutation, MutationStatus};
pub use prefilter::{MAX_PREFILTER_TABS, Prefilter, PrefilterPresentation, PrefilterTabs};
pub use row_model::RowModel;
pub use value::{compare_values, print_value};
pub use visibility::{COLUMN_CONFIG_PREFIX, ColumnVisibility, ConfigurableColumn, configurable_columns};
