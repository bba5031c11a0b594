//! In-memory row model for client-mode tables
//!
//! [`RowModel`] applies, in order, the global search, the column filters,
//! the sort and the page window to a set of rows.

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;
use snow_table_state::{ColumnFilters, ColumnSort, PaginationState, SortingState};

use crate::column::ColumnDef;
use crate::error::{GridError, Result};
use crate::filter::multi_select_matches;
use crate::fuzzy::fuzzy_matches;
use crate::value::{compare_values, row_value};

/// Rows plus the operations a client-mode table performs on them
///
/// # Example
///
/// ```
/// use serde::Serialize;
/// use snow_table_grid::{ColumnConfig, RowModel, TableContext, TableMode, project_columns};
/// use snow_table_state::{ColumnSort, PaginationState};
///
/// #[derive(Serialize)]
/// struct User { name: &'static str }
///
/// let columns = project_columns(&[ColumnConfig::new("name")], &[], false, TableMode::Client, &TableContext::new());
/// let mut model = RowModel::new(vec![User { name: "Bob" }, User { name: "Alice" }, User { name: "Carol" }], columns)?;
///
/// model.sort_by(&vec![ColumnSort::asc("name")])?;
/// model.paginate(PaginationState { page_index: 0, page_size: 2 })?;
///
/// let names: Vec<&str> = model.visible_rows().iter().map(|u| u.name).collect();
/// assert_eq!(names, ["Alice", "Bob"]);
/// assert_eq!(model.total_pages(), 2);
/// # Ok::<(), snow_table_grid::GridError>(())
/// ```
pub struct RowModel<T> {
	rows: Vec<T>,
	serialized: Vec<Value>,
	columns: Vec<ColumnDef<T>>,
	global_filter: String,
	filters: ColumnFilters,
	sort: Option<ColumnSort>,
	pagination: Option<PaginationState>,
}

impl<T: Serialize> RowModel<T> {
	/// Creates a model over `rows`
	pub fn new(rows: Vec<T>, columns: Vec<ColumnDef<T>>) -> Result<Self> {
		let serialized = rows.iter().map(row_value).collect::<Result<Vec<_>>>()?;
		Ok(Self {
			rows,
			serialized,
			columns,
			global_filter: String::new(),
			filters: ColumnFilters::new(),
			sort: None,
			pagination: None,
		})
	}
}

impl<T> RowModel<T> {
	/// Column definitions
	pub fn columns(&self) -> &[ColumnDef<T>] {
		&self.columns
	}

	/// Number of rows before any filtering
	pub fn total_rows(&self) -> usize {
		self.rows.len()
	}

	fn column(&self, id: &str) -> Result<&ColumnDef<T>> {
		self.columns
			.iter()
			.find(|column| column.id == id)
			.ok_or_else(|| GridError::UnknownColumn(id.to_string()))
	}

	/// Whether a column filter on `id` would be accepted
	pub fn can_filter(&self, id: &str) -> bool {
		self.column(id).is_ok_and(|column| column.enable_column_filter)
	}

	/// Sets the global search query; empty disables it
	pub fn global_filter(&mut self, query: impl Into<String>) {
		self.global_filter = query.into();
	}

	/// Sets the column filters
	///
	/// Fails without changing anything when a key names an unknown or
	/// unfilterable column.
	pub fn filter(&mut self, filters: &ColumnFilters) -> Result<()> {
		for key in filters.keys() {
			if !self.column(key)?.enable_column_filter {
				return Err(GridError::NotFilterable(key.clone()));
			}
		}
		self.filters = filters.clone();
		Ok(())
	}

	/// Active column filters
	pub fn filters(&self) -> &ColumnFilters {
		&self.filters
	}

	/// Sorts by the first entry of `sorting`; an empty sort restores row order
	pub fn sort_by(&mut self, sorting: &SortingState) -> Result<()> {
		let Some(sort) = sorting.first() else {
			self.sort = None;
			return Ok(());
		};
		if !self.column(&sort.id)?.enable_sorting {
			return Err(GridError::NotSortable(sort.id.clone()));
		}
		self.sort = Some(sort.clone());
		Ok(())
	}

	/// Active sort
	pub fn sort_config(&self) -> Option<&ColumnSort> {
		self.sort.as_ref()
	}

	/// Restricts visible rows to one page
	pub fn paginate(&mut self, pagination: PaginationState) -> Result<()> {
		if pagination.page_size == 0 {
			return Err(GridError::InvalidPageSize);
		}
		self.pagination = Some(pagination);
		Ok(())
	}

	/// Active page window
	pub fn pagination_config(&self) -> Option<PaginationState> {
		self.pagination
	}

	fn passes_global_filter(&self, index: usize) -> bool {
		if self.global_filter.trim().is_empty() {
			return true;
		}
		let mut searchable = self
			.columns
			.iter()
			.filter(|column| column.enable_global_filter)
			.peekable();
		if searchable.peek().is_none() {
			return true;
		}
		let (row, serialized) = (&self.rows[index], &self.serialized[index]);
		searchable.any(|column| {
			fuzzy_matches(&column.value_text(row, serialized), &self.global_filter)
		})
	}

	fn passes_column_filters(&self, index: usize) -> bool {
		let (row, serialized) = (&self.rows[index], &self.serialized[index]);
		self.filters.iter().all(|(key, selected)| {
			self.column(key).is_ok_and(|column| {
				multi_select_matches(&column.value_text(row, serialized), selected)
			})
		})
	}

	fn filtered_indices(&self) -> Vec<usize> {
		let mut indices: Vec<usize> = (0..self.rows.len())
			.filter(|&index| self.passes_global_filter(index) && self.passes_column_filters(index))
			.collect();

		if let Some(sort) = &self.sort
			&& let Ok(column) = self.column(&sort.id)
		{
			let values: Vec<Option<Value>> = (0..self.rows.len())
				.map(|index| {
					column
						.value(&self.rows[index], &self.serialized[index])
						.filter(|value| !value.is_null())
				})
				.collect();
			indices.sort_by(|&a, &b| match (&values[a], &values[b]) {
				(Some(a), Some(b)) => {
					let ordering = compare_values(a, b);
					if sort.desc { ordering.reverse() } else { ordering }
				}
				(Some(_), None) => Ordering::Less,
				(None, Some(_)) => Ordering::Greater,
				(None, None) => Ordering::Equal,
			});
		}

		indices
	}

	/// Rows passing search and filters, sorted, across all pages
	pub fn filtered_rows(&self) -> Vec<&T> {
		self.filtered_indices()
			.into_iter()
			.map(|index| &self.rows[index])
			.collect()
	}

	/// Number of rows passing search and filters
	pub fn filtered_rows_count(&self) -> usize {
		self.filtered_indices().len()
	}

	/// Rows on the current page
	pub fn visible_rows(&self) -> Vec<&T> {
		let rows = self.filtered_rows();
		match self.pagination {
			Some(pagination) => rows
				.into_iter()
				.skip(pagination.offset())
				.take(pagination.page_size)
				.collect(),
			None => rows,
		}
	}

	/// Number of pages for the filtered rows; 1 when not paginated
	pub fn total_pages(&self) -> usize {
		match self.pagination {
			Some(pagination) => self.filtered_rows_count().div_ceil(pagination.page_size),
			None => 1,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::column::{ColumnConfig, TableMode, project_columns};
	use crate::context::TableContext;
	use crate::filter::{FilterConfig, FilterOption};
	use rstest::*;

	#[derive(Debug, Clone, Serialize)]
	struct TestUser {
		id: u32,
		name: String,
		active: bool,
		score: Option<u32>,
	}

	#[fixture]
	fn sample_users() -> Vec<TestUser> {
		vec![
			TestUser {
				id: 1,
				name: "Alice".to_string(),
				active: true,
				score: Some(30),
			},
			TestUser {
				id: 2,
				name: "Bob".to_string(),
				active: false,
				score: None,
			},
			TestUser {
				id: 3,
				name: "Charlie".to_string(),
				active: true,
				score: Some(5),
			},
		]
	}

	#[fixture]
	fn model(sample_users: Vec<TestUser>) -> RowModel<TestUser> {
		let configs = vec![
			ColumnConfig::new("id"),
			ColumnConfig::new("name"),
			ColumnConfig::new("active").sortable(false),
			ColumnConfig::new("score"),
		];
		let filters = [FilterConfig::new(
			"active",
			"Active",
			vec![FilterOption::new("Yes", "true"), FilterOption::new("No", "false")],
		)];
		let columns = project_columns(&configs, &filters, true, TableMode::Client, &TableContext::new());
		RowModel::new(sample_users, columns).unwrap()
	}

	fn names(rows: Vec<&TestUser>) -> Vec<&str> {
		rows.into_iter().map(|u| u.name.as_str()).collect()
	}

	#[rstest]
	fn test_unfiltered(model: RowModel<TestUser>) {
		assert_eq!(names(model.visible_rows()), ["Alice", "Bob", "Charlie"]);
		assert_eq!(model.total_rows(), 3);
		assert_eq!(model.total_pages(), 1);
	}

	#[rstest]
	#[case("li", &["Alice", "Charlie"])]
	#[case("BOB", &["Bob"])]
	#[case("chr", &["Charlie"])]
	#[case("zzz", &[])]
	#[case("", &["Alice", "Bob", "Charlie"])]
	fn test_global_filter(mut model: RowModel<TestUser>, #[case] query: &str, #[case] expected: &[&str]) {
		model.global_filter(query);
		assert_eq!(names(model.visible_rows()), expected);
	}

	#[rstest]
	fn test_column_filter_multi_select(mut model: RowModel<TestUser>) {
		let mut filters = ColumnFilters::new();
		filters.insert("active".into(), vec!["true".into()]);

		model.filter(&filters).unwrap();

		assert_eq!(names(model.visible_rows()), ["Alice", "Charlie"]);
		assert_eq!(model.filtered_rows_count(), 2);
	}

	#[rstest]
	#[case("name")]
	#[case("missing")]
	fn test_filter_rejects_unfilterable(mut model: RowModel<TestUser>, #[case] key: &str) {
		let mut filters = ColumnFilters::new();
		filters.insert(key.into(), vec!["x".into()]);

		assert!(model.filter(&filters).is_err());
		assert!(model.filters().is_empty());
	}

	#[rstest]
	fn test_sort_descending(mut model: RowModel<TestUser>) {
		model.sort_by(&vec![ColumnSort::desc("name")]).unwrap();
		assert_eq!(names(model.visible_rows()), ["Charlie", "Bob", "Alice"]);
	}

	#[rstest]
	#[case(false, &["Charlie", "Alice", "Bob"])]
	#[case(true, &["Alice", "Charlie", "Bob"])]
	fn test_sort_missing_values_last(
		mut model: RowModel<TestUser>,
		#[case] desc: bool,
		#[case] expected: &[&str],
	) {
		model
			.sort_by(&vec![ColumnSort {
				id: "score".into(),
				desc,
			}])
			.unwrap();
		assert_eq!(names(model.visible_rows()), expected);
	}

	#[rstest]
	#[case("active")]
	#[case("actions")]
	fn test_sort_non_sortable_column(mut model: RowModel<TestUser>, #[case] id: &str) {
		let result = model.sort_by(&vec![ColumnSort::asc(id)]);
		assert!(matches!(result, Err(GridError::NotSortable(_))));
	}

	#[rstest]
	fn test_sort_nonexistent_column(mut model: RowModel<TestUser>) {
		let result = model.sort_by(&vec![ColumnSort::asc("nonexistent")]);
		assert!(matches!(result, Err(GridError::UnknownColumn(_))));
	}

	#[rstest]
	fn test_sort_filter_paginate(mut model: RowModel<TestUser>) {
		let mut filters = ColumnFilters::new();
		filters.insert("active".into(), vec!["true".into()]);
		model.filter(&filters).unwrap();
		model.sort_by(&vec![ColumnSort::desc("name")]).unwrap();
		model.paginate(PaginationState {
			page_index: 0,
			page_size: 1,
		})
		.unwrap();

		assert_eq!(names(model.visible_rows()), ["Charlie"]);
		assert_eq!(model.total_pages(), 2);

		model.paginate(PaginationState {
			page_index: 1,
			page_size: 1,
		})
		.unwrap();
		assert_eq!(names(model.visible_rows()), ["Alice"]);
	}

	#[rstest]
	fn test_page_past_end_is_empty(mut model: RowModel<TestUser>) {
		model.paginate(PaginationState {
			page_index: 5,
			page_size: 2,
		})
		.unwrap();
		assert!(model.visible_rows().is_empty());
	}

	#[rstest]
	fn test_paginate_zero_size(mut model: RowModel<TestUser>) {
		assert!(matches!(
			model.paginate(PaginationState::first(0)),
			Err(GridError::InvalidPageSize)
		));
	}
}
