//! The table state store
//!
//! [`TableStateStore`] owns a table's prefilter, search term, pagination,
//! column filters and sort. Every field lives in a [`Signal`] so views and
//! effects react to changes. When persistence is enabled each setter also
//! mirrors the new value into a [`StateStorage`] slot before returning, and
//! the store seeds itself from those slots on construction.
//!
//! Changing the prefilter, the search term or the column filters sends the
//! table back to its first page. That reset runs as a passive effect, so it
//! becomes visible on the next render pass ([`flush_effects`]).
//!
//! [`flush_effects`]: snow_table_reactive::flush_effects

use std::fmt;
use std::rc::Rc;

use snow_table_reactive::{Effect, Memo, Signal};

use crate::config::TableStateConfig;
use crate::error::{Result, StateError};
use crate::filters::{ColumnFilters, decode_filters, encode_filters};
use crate::model::{ColumnSort, PaginationState, SortingState, StateUpdate, TableState};
use crate::storage::{
	QueryStringStorage, STORAGE_KEY_FILTERS, STORAGE_KEY_PAGE, STORAGE_KEY_PAGE_SIZE,
	STORAGE_KEY_PREFILTER, STORAGE_KEY_SEARCH, STORAGE_KEY_SORT_BY, STORAGE_KEY_SORT_DESC,
	StateStorage,
};

/// Writes state into storage when persistence is enabled
#[derive(Clone)]
struct Persistence {
	storage: Option<Rc<dyn StateStorage>>,
	default_page_size: usize,
}

impl Persistence {
	fn write(&self, key: &str, value: Option<&str>) {
		if let Some(storage) = &self.storage {
			storage.write(key, value);
		}
	}

	fn read(&self, key: &str) -> Option<String> {
		self.storage.as_ref().and_then(|storage| storage.read(key))
	}

	fn write_pagination(&self, pagination: &PaginationState) {
		let page = (pagination.page_index > 0)
			.then(|| pagination.page_index.saturating_add(1).to_string());
		self.write(STORAGE_KEY_PAGE, page.as_deref());

		let page_size = (pagination.page_size != self.default_page_size)
			.then(|| pagination.page_size.to_string());
		self.write(STORAGE_KEY_PAGE_SIZE, page_size.as_deref());
	}

	fn write_sorting(&self, sorting: &SortingState) {
		match sorting.first() {
			Some(sort) => {
				self.write(STORAGE_KEY_SORT_BY, Some(&sort.id));
				self.write(STORAGE_KEY_SORT_DESC, Some(if sort.desc { "true" } else { "false" }));
			}
			None => {
				self.write(STORAGE_KEY_SORT_BY, None);
				self.write(STORAGE_KEY_SORT_DESC, None);
			}
		}
	}
}

/// Applies a pagination update, persisting it when either field changed
fn commit_pagination(
	signal: &Signal<PaginationState>,
	persistence: &Persistence,
	update: StateUpdate<PaginationState>,
) {
	let prev = signal.get_untracked();
	let mut next = update.apply(&prev);
	if next.page_size == 0 {
		tracing::warn!("ignoring zero page size; keeping {}", prev.page_size);
		next.page_size = prev.page_size;
	}
	if next == prev {
		return;
	}

	signal.set(next);
	persistence.write_pagination(&next);
}

fn parse_positive(key: &'static str, raw: &str) -> Result<usize> {
	match raw.trim().parse::<usize>() {
		Ok(value) if value > 0 => Ok(value),
		_ => Err(StateError::InvalidNumber {
			key,
			value: raw.to_owned(),
		}),
	}
}

fn read_positive(persistence: &Persistence, key: &'static str) -> Option<usize> {
	let raw = persistence.read(key)?;
	match parse_positive(key, &raw) {
		Ok(value) => Some(value),
		Err(err) => {
			tracing::warn!(%err, "falling back to default");
			None
		}
	}
}

/// Zero-based page index from the persisted one-based page
///
/// Pages whose first row offset does not fit in `usize` fall back to the
/// first page.
fn read_page_index(persistence: &Persistence, page_size: usize) -> usize {
	let Some(page) = read_positive(persistence, STORAGE_KEY_PAGE) else {
		return 0;
	};
	let page_index = page - 1;
	if page_index.checked_mul(page_size).is_none() {
		tracing::warn!(page, page_size, "persisted page out of range; falling back to the first page");
		return 0;
	}
	page_index
}

fn default_sorting(config: &TableStateConfig) -> SortingState {
	config
		.default_sort_by
		.as_ref()
		.map(|id| ColumnSort {
			id: id.clone(),
			desc: config.default_sort_order.is_desc(),
		})
		.into_iter()
		.collect()
}

struct Inner {
	config: TableStateConfig,
	persistence: Persistence,
	prefilter: Signal<Option<String>>,
	search: Signal<String>,
	pagination: Signal<PaginationState>,
	column_filters: Signal<ColumnFilters>,
	sorting: Signal<SortingState>,
	has_active_filters: Memo<bool>,
	_page_reset: Effect,
}

/// Reactive, optionally persisted table state
///
/// Cloning yields another handle to the same state.
#[derive(Clone)]
pub struct TableStateStore {
	inner: Rc<Inner>,
}

impl TableStateStore {
	/// Creates a store persisting into the browser's query string when
	/// `config.enabled` is set
	///
	/// # Panics
	///
	/// Panics if `config.default_page_size` is zero.
	pub fn new(config: TableStateConfig) -> Self {
		Self::with_storage(config, Rc::new(QueryStringStorage::browser()))
	}

	/// Creates a store over an explicit storage backend
	///
	/// `storage` is ignored unless `config.enabled` is set.
	///
	/// # Panics
	///
	/// Panics if `config.default_page_size` is zero.
	pub fn with_storage(config: TableStateConfig, storage: Rc<dyn StateStorage>) -> Self {
		assert!(
			config.default_page_size > 0,
			"default_page_size must be positive"
		);

		let persistence = Persistence {
			storage: config.enabled.then_some(storage),
			default_page_size: config.default_page_size,
		};

		let prefilter = Signal::new(
			persistence
				.read(STORAGE_KEY_PREFILTER)
				.or_else(|| config.default_prefilter.clone()),
		);
		let search = Signal::new(persistence.read(STORAGE_KEY_SEARCH).unwrap_or_default());
		let page_size =
			read_positive(&persistence, STORAGE_KEY_PAGE_SIZE).unwrap_or(config.default_page_size);
		let pagination = Signal::new(PaginationState {
			page_index: read_page_index(&persistence, page_size),
			page_size,
		});
		let column_filters = Signal::new(decode_filters(
			persistence.read(STORAGE_KEY_FILTERS).as_deref(),
		));
		let sorting = Signal::new(match persistence.read(STORAGE_KEY_SORT_BY) {
			Some(id) => vec![ColumnSort {
				id,
				desc: persistence.read(STORAGE_KEY_SORT_DESC).as_deref() == Some("true"),
			}],
			None => default_sorting(&config),
		});

		let has_active_filters = Memo::new({
			let prefilter = prefilter.clone();
			let search = search.clone();
			let column_filters = column_filters.clone();
			let sorting = sorting.clone();
			let default_prefilter = config.default_prefilter.clone();
			let default_sorting = default_sorting(&config);
			move || {
				search.with(|search| !search.is_empty())
					|| prefilter.with(|prefilter| *prefilter != default_prefilter)
					|| column_filters.with(|filters| !filters.is_empty())
					|| sorting.with(|sorting| *sorting != default_sorting)
			}
		});

		let page_reset = Effect::new({
			let prefilter = prefilter.clone();
			let search = search.clone();
			let column_filters = column_filters.clone();
			let pagination = pagination.clone();
			let persistence = persistence.clone();
			let mut previous: Option<(Option<String>, String, ColumnFilters)> = None;
			move || {
				let current = (prefilter.get(), search.get(), column_filters.get());
				let changed = previous.as_ref().is_some_and(|previous| *previous != current);
				previous = Some(current);

				if changed && pagination.with_untracked(|p| p.page_index > 0) {
					tracing::debug!("filters changed; returning to the first page");
					commit_pagination(
						&pagination,
						&persistence,
						StateUpdate::with(|prev: &PaginationState| PaginationState {
							page_index: 0,
							..*prev
						}),
					);
				}
			}
		});

		tracing::debug!(
			persisted = config.enabled,
			prefilter = ?prefilter.get_untracked(),
			pagination = ?pagination.get_untracked(),
			sorting = ?sorting.get_untracked(),
			"table state store created"
		);

		Self {
			inner: Rc::new(Inner {
				config,
				persistence,
				prefilter,
				search,
				pagination,
				column_filters,
				sorting,
				has_active_filters,
				_page_reset: page_reset,
			}),
		}
	}

	/// Configuration the store was built with
	pub fn config(&self) -> &TableStateConfig {
		&self.inner.config
	}

	/// Whether state is mirrored into storage
	pub fn is_persistent(&self) -> bool {
		self.inner.persistence.storage.is_some()
	}

	/// Active prefilter id
	pub fn prefilter(&self) -> Option<String> {
		self.inner.prefilter.get()
	}

	/// Selects a prefilter; `None` clears it
	pub fn set_prefilter(&self, prefilter: Option<String>) {
		self.inner
			.persistence
			.write(STORAGE_KEY_PREFILTER, prefilter.as_deref());
		self.inner.prefilter.set_if_changed(prefilter);
	}

	/// Current search term
	pub fn search(&self) -> String {
		self.inner.search.get()
	}

	/// Sets the search term; an empty term deletes the persisted slot
	pub fn set_search(&self, search: impl Into<String>) {
		let search = search.into();
		self.inner.persistence.write(
			STORAGE_KEY_SEARCH,
			Some(search.as_str()).filter(|s| !s.is_empty()),
		);
		self.inner.search.set_if_changed(search);
	}

	/// Current page position
	pub fn pagination(&self) -> PaginationState {
		self.inner.pagination.get()
	}

	/// Updates pagination with a literal value or a function of the previous one
	///
	/// Nothing is written when neither the page index nor the page size changed.
	pub fn set_pagination(&self, update: impl Into<StateUpdate<PaginationState>>) {
		commit_pagination(
			&self.inner.pagination,
			&self.inner.persistence,
			update.into(),
		);
	}

	/// Moves to `page_index`, keeping the page size
	pub fn set_page_index(&self, page_index: usize) {
		self.set_pagination(StateUpdate::with(move |prev: &PaginationState| {
			PaginationState {
				page_index,
				..*prev
			}
		}));
	}

	/// Changes the page size and returns to the first page
	pub fn set_page_size(&self, page_size: usize) {
		self.set_pagination(PaginationState::first(page_size));
	}

	/// Current column filters
	pub fn column_filters(&self) -> ColumnFilters {
		self.inner.column_filters.get()
	}

	/// Replaces the column filters
	///
	/// Empty values are dropped, then keys left with an empty list. An empty
	/// map deletes the persisted slot.
	pub fn set_column_filters(&self, mut filters: ColumnFilters) {
		for values in filters.values_mut() {
			values.retain(|value| !value.is_empty());
		}
		filters.retain(|key, values| !key.is_empty() && !values.is_empty());

		let encoded = (!filters.is_empty()).then(|| encode_filters(&filters));
		self.inner
			.persistence
			.write(STORAGE_KEY_FILTERS, encoded.as_deref());
		self.inner.column_filters.set_if_changed(filters);
	}

	/// Current sort
	pub fn sorting(&self) -> SortingState {
		self.inner.sorting.get()
	}

	/// Updates the sort with a literal value or a function of the previous one
	///
	/// Only the first entry is kept.
	pub fn set_sorting(&self, update: impl Into<StateUpdate<SortingState>>) {
		let prev = self.inner.sorting.get_untracked();
		let mut next = update.into().apply(&prev);
		next.truncate(1);

		self.inner.persistence.write_sorting(&next);
		self.inner.sorting.set_if_changed(next);
	}

	/// Whether any field differs from its configured default
	///
	/// Page position is not considered.
	pub fn has_active_filters(&self) -> bool {
		self.inner.has_active_filters.get()
	}

	/// Every field at once
	pub fn state(&self) -> TableState {
		TableState {
			prefilter: self.prefilter(),
			search: self.search(),
			pagination: self.pagination(),
			column_filters: self.column_filters(),
			sorting: self.sorting(),
		}
	}

	/// Restores every field to its default, keeping the current page size
	///
	/// When persisting, every slot except `dt_pageSize` is deleted.
	pub fn reset_to_defaults(&self) {
		let inner = &self.inner;
		for key in [
			STORAGE_KEY_PREFILTER,
			STORAGE_KEY_SEARCH,
			STORAGE_KEY_PAGE,
			STORAGE_KEY_FILTERS,
			STORAGE_KEY_SORT_BY,
			STORAGE_KEY_SORT_DESC,
		] {
			inner.persistence.write(key, None);
		}

		inner
			.prefilter
			.set_if_changed(inner.config.default_prefilter.clone());
		inner.search.set_if_changed(String::new());
		let page_size = inner.pagination.with_untracked(|p| p.page_size);
		inner
			.pagination
			.set_if_changed(PaginationState::first(page_size));
		inner.column_filters.set_if_changed(ColumnFilters::new());
		inner
			.sorting
			.set_if_changed(default_sorting(&inner.config));

		tracing::debug!(page_size, "table state reset to defaults");
	}
}

impl fmt::Debug for TableStateStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TableStateStore")
			.field("config", &self.inner.config)
			.field("prefilter", &self.inner.prefilter)
			.field("search", &self.inner.search)
			.field("pagination", &self.inner.pagination)
			.field("column_filters", &self.inner.column_filters)
			.field("sorting", &self.inner.sorting)
			.finish_non_exhaustive()
	}
}
