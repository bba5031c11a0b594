//! Render-ready snapshot of a table

use snow_table_grid::TableContext;
use snow_table_query::QueryError;
use snow_table_state::{PaginationState, TableState};

/// Most placeholder rows shown while loading
pub const MAX_SKELETON_ROWS: usize = 10;

/// Everything a renderer needs for one frame of a table
#[derive(Debug, Clone, PartialEq)]
pub struct TableView<T> {
	/// Rows of the current page
	pub rows: Vec<T>,
	/// Rows matching search and filters across all pages
	pub total_count: usize,
	/// Number of pages
	pub page_count: usize,
	/// Current page position
	pub pagination: PaginationState,
	/// State the view was computed from
	pub state: TableState,
	/// Ids of the columns to draw, in order
	pub visible_columns: Vec<String>,
	/// No data has been loaded yet
	pub is_loading: bool,
	/// A fetch is in flight
	pub is_fetching: bool,
	/// Error of the last fetch
	pub error: Option<QueryError>,
	/// Any state differs from its default
	pub has_active_filters: bool,
	/// Offer the reset-filters button
	pub show_reset_button: bool,
	/// Offer pagination controls
	pub show_pagination: bool,
	/// Search input placeholder
	pub search_placeholder: String,
	/// Text shown when there are no rows
	pub empty_text: String,
}

impl<T> TableView<T> {
	/// Number of placeholder rows to draw; zero once loaded
	pub fn skeleton_rows(&self) -> usize {
		if self.is_loading {
			self.pagination.page_size.min(MAX_SKELETON_ROWS)
		} else {
			0
		}
	}

	/// Whether the empty-state text should replace the body
	pub fn is_empty(&self) -> bool {
		!self.is_loading && self.rows.is_empty()
	}

	/// Whether to dim existing rows while newer data loads
	pub fn is_refreshing(&self) -> bool {
		self.is_fetching && !self.is_loading
	}

	/// Item count label, e.g. `42 items`
	pub fn count_text(&self, ctx: &TableContext) -> String {
		format!("{} {}", self.total_count, ctx.t("dataTable.elements"))
	}
}
