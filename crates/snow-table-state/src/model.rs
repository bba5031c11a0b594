//! Value types making up a table's state

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::filters::ColumnFilters;

/// Current page position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaginationState {
	/// Zero-based page index
	pub page_index: usize,
	/// Rows per page; always positive
	pub page_size: usize,
}

impl PaginationState {
	/// First page with the given size
	pub fn first(page_size: usize) -> Self {
		Self {
			page_index: 0,
			page_size,
		}
	}

	/// Offset of the first row on this page, saturating at `usize::MAX`
	pub fn offset(&self) -> usize {
		self.page_index.saturating_mul(self.page_size)
	}
}

/// One sorted column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnSort {
	/// Column id
	pub id: String,
	/// Descending when true
	pub desc: bool,
}

impl ColumnSort {
	/// Ascending sort on `id`
	pub fn asc(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			desc: false,
		}
	}

	/// Descending sort on `id`
	pub fn desc(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			desc: true,
		}
	}
}

/// Active sort; holds zero or one entry
pub type SortingState = Vec<ColumnSort>;

/// Snapshot of every field of a table's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableState {
	/// Active prefilter id
	pub prefilter: Option<String>,
	/// Free-text search, empty when inactive
	pub search: String,
	/// Page position
	pub pagination: PaginationState,
	/// Selected values per column
	pub column_filters: ColumnFilters,
	/// Active sort
	pub sorting: SortingState,
}

type Updater<T> = Box<dyn FnOnce(&T) -> T>;

/// Either a literal value or a function of the previous value
///
/// Setters that accept `impl Into<StateUpdate<T>>` take both forms:
///
/// ```
/// use snow_table_state::{PaginationState, StateUpdate};
///
/// let literal: StateUpdate<PaginationState> = PaginationState::first(50).into();
/// let functional = StateUpdate::with(|prev: &PaginationState| PaginationState {
/// 	page_index: prev.page_index + 1,
/// 	..*prev
/// });
///
/// let prev = PaginationState::first(10);
/// assert_eq!(literal.apply(&prev).page_size, 50);
/// assert_eq!(functional.apply(&prev).page_index, 1);
/// ```
pub enum StateUpdate<T> {
	/// Replace with this value
	Set(T),
	/// Compute the next value from the previous one
	Update(Updater<T>),
}

impl<T> StateUpdate<T> {
	/// Functional update
	pub fn with<F>(f: F) -> Self
	where
		F: FnOnce(&T) -> T + 'static,
	{
		Self::Update(Box::new(f))
	}

	/// Resolves the next value
	pub fn apply(self, prev: &T) -> T {
		match self {
			Self::Set(value) => value,
			Self::Update(f) => f(prev),
		}
	}
}

impl<T> From<T> for StateUpdate<T> {
	fn from(value: T) -> Self {
		Self::Set(value)
	}
}

impl<T: fmt::Debug> fmt::Debug for StateUpdate<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Set(value) => f.debug_tuple("Set").field(value).finish(),
			Self::Update(_) => f.write_str("Update(..)"),
		}
	}
}
