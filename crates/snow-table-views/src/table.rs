//! Pieces shared by the client and server tables
//!
//! [`TableCore`] holds the state store, projected columns, actions and
//! collaborators. [`DataTable`] layers the change handlers on top so both
//! flavors react to user input the same way; each flavor only decides how
//! rows are fetched and turned into a [`TableView`].

use std::cell::{Ref, RefCell};
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use snow_table_grid::{
	ActionCell, ActionHandler, ActionOutcome, ColumnDef, ColumnVisibility, ConfigurableColumn,
	FilterConfig, Prefilter, PrefilterPresentation, PrefilterTabs, TableAction, TableContext,
	TableMode, apply_filter_change, project_columns,
};
use snow_table_query::{QueryClient, QueryKey};
use snow_table_state::{
	PaginationState, SearchDebouncer, SortingState, StateUpdate, TableStateStore,
};

use crate::clock;
use crate::error::Result;
use crate::options::DataTableOptions;
use crate::props::DataTableProps;
use crate::view::TableView;

/// State, columns and collaborators of one table
pub struct TableCore<T: 'static, K: 'static> {
	store: TableStateStore,
	query_key: QueryKey,
	client: QueryClient,
	columns: Vec<ColumnDef<T>>,
	actions: Vec<TableAction<T, K>>,
	filters: Vec<FilterConfig>,
	prefilters: Vec<Prefilter>,
	options: DataTableOptions,
	context: TableContext,
	handler: ActionHandler,
	visibility: Option<RefCell<ColumnVisibility>>,
	debouncer: RefCell<SearchDebouncer>,
}

impl<T: 'static, K: 'static> TableCore<T, K> {
	/// Builds the store and projects the columns described by `props`
	///
	/// # Panics
	///
	/// Panics if `props.default_page_size` is zero.
	pub fn new(props: DataTableProps<T, K>, mode: TableMode) -> Self {
		let config = props.state_config();
		let store = match props.storage {
			Some(storage) => TableStateStore::with_storage(config, storage),
			None => TableStateStore::new(config),
		};

		let columns = project_columns(
			&props.columns,
			&props.filters,
			!props.actions.is_empty(),
			mode,
			&props.context,
		);

		let visibility = match props.column_config {
			Some((config_id, storage)) if props.options.enable_column_configuration => {
				Some(RefCell::new(ColumnVisibility::load(config_id, &columns, storage)))
			}
			_ => None,
		};

		let debouncer = RefCell::new(SearchDebouncer::new(store.search()));
		tracing::debug!(key = %props.query_key, ?mode, columns = columns.len(), "created data table");

		Self {
			store,
			query_key: props.query_key,
			client: props.client,
			columns,
			actions: props.actions,
			filters: props.filters,
			prefilters: props.prefilters,
			options: props.options,
			handler: ActionHandler::new(props.context.clone()),
			context: props.context,
			visibility,
			debouncer,
		}
	}

	/// The state store
	pub fn store(&self) -> &TableStateStore {
		&self.store
	}

	/// Base cache key
	pub fn query_key(&self) -> &QueryKey {
		&self.query_key
	}

	/// Cache holding fetched data
	pub fn client(&self) -> &QueryClient {
		&self.client
	}

	/// Projected columns, including the trailing actions column
	pub fn columns(&self) -> &[ColumnDef<T>] {
		&self.columns
	}

	/// Row actions
	pub fn actions(&self) -> &[TableAction<T, K>] {
		&self.actions
	}

	/// Filter dropdowns
	pub fn filters(&self) -> &[FilterConfig] {
		&self.filters
	}

	/// Prefilters
	pub fn prefilters(&self) -> &[Prefilter] {
		&self.prefilters
	}

	/// Feature switches
	pub fn options(&self) -> &DataTableOptions {
		&self.options
	}

	/// Collaborators
	pub fn context(&self) -> &TableContext {
		&self.context
	}

	/// Runs row actions
	pub fn action_handler(&self) -> &ActionHandler {
		&self.handler
	}

	/// Saved column visibility, when column configuration is enabled
	pub fn column_visibility(&self) -> Option<Ref<'_, ColumnVisibility>> {
		self.visibility.as_ref().map(RefCell::borrow)
	}

	/// Ids of the columns to draw
	pub fn visible_columns(&self) -> Vec<String> {
		let visibility = self.column_visibility();
		self.columns
			.iter()
			.filter(|column| visibility.as_ref().is_none_or(|v| v.is_visible(&column.id)))
			.map(|column| column.id.clone())
			.collect()
	}

	pub(crate) fn debouncer(&self) -> &RefCell<SearchDebouncer> {
		&self.debouncer
	}

	/// Whether the reset-filters button is offered
	pub fn show_reset_button(&self) -> bool {
		self.options.enable_global_search || !self.prefilters.is_empty() || !self.filters.is_empty()
	}

	/// Search input placeholder
	pub fn search_placeholder(&self) -> String {
		self.options
			.texts
			.search_placeholder
			.clone()
			.unwrap_or_else(|| self.context.t("dataTable.search"))
	}

	/// Empty-state text
	pub fn empty_text(&self) -> String {
		self.options
			.texts
			.empty_title
			.clone()
			.unwrap_or_else(|| self.context.t("dataTable.searchEmpty"))
	}

	/// Assembles a view from rows and counts computed by a table flavor
	pub(crate) fn view<R>(&self, page: ViewPage<R>) -> TableView<R> {
		let state = self.store.state();
		TableView {
			rows: page.rows,
			total_count: page.total_count,
			page_count: page.page_count,
			pagination: state.pagination,
			visible_columns: self.visible_columns(),
			has_active_filters: self.store.has_active_filters(),
			show_reset_button: self.show_reset_button(),
			show_pagination: self.options.enable_pagination,
			search_placeholder: self.search_placeholder(),
			empty_text: self.empty_text(),
			is_loading: page.is_loading,
			is_fetching: page.is_fetching,
			error: page.error,
			state,
		}
	}
}

/// Rows and counts a table flavor hands to [`TableCore`]
pub(crate) struct ViewPage<R> {
	pub rows: Vec<R>,
	pub total_count: usize,
	pub page_count: usize,
	pub is_loading: bool,
	pub is_fetching: bool,
	pub error: Option<snow_table_query::QueryError>,
}

impl<T: 'static, K: 'static> fmt::Debug for TableCore<T, K> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TableCore")
			.field("query_key", &self.query_key)
			.field("store", &self.store)
			.field("columns", &self.columns)
			.field("filters", &self.filters)
			.field("prefilters", &self.prefilters)
			.finish_non_exhaustive()
	}
}

/// Behavior common to client and server tables
///
/// Handlers write straight into the state store. Dependent state, such as
/// the page index reset after a search or filter change, settles on the
/// next [`refresh`](DataTable::refresh) or [`view`](DataTable::view).
#[async_trait(?Send)]
pub trait DataTable {
	/// Row type
	type Row: 'static;
	/// Data returned by endpoint actions
	type ActionData: 'static;

	/// Shared state and collaborators
	fn core(&self) -> &TableCore<Self::Row, Self::ActionData>;

	/// Fetches the data the current state needs, if not cached
	async fn refresh(&self);

	/// Computes the rows and flags to render
	fn view(&self) -> Result<TableView<Self::Row>>;

	/// The state store
	fn store(&self) -> &TableStateStore {
		self.core().store()
	}

	/// Commits a search term and returns to the first page
	fn on_search_change(&self, value: &str) {
		self.core().debouncer().borrow_mut().sync(value);
		self.store().set_search(value);
		self.store().set_pagination(StateUpdate::with(|prev: &PaginationState| {
			PaginationState {
				page_index: 0,
				..*prev
			}
		}));
	}

	/// Records a keystroke in the search box at the current time
	fn on_search_input(&self, value: &str) {
		self.on_search_input_at(value, clock::now());
	}

	/// Records a keystroke in the search box at `now`
	fn on_search_input_at(&self, value: &str, now: Duration) {
		self.core().debouncer().borrow_mut().input(value, now);
	}

	/// Commits buffered search input once typing has paused
	///
	/// Returns whether a new term was committed.
	fn poll_search(&self, now: Duration) -> bool {
		let settled = self.core().debouncer().borrow_mut().poll(now);
		match settled {
			Some(term) => {
				self.on_search_change(&term);
				true
			}
			None => false,
		}
	}

	/// Text the search box shows, including uncommitted input
	fn search_input(&self) -> String {
		self.core().debouncer().borrow().value().to_string()
	}

	/// Replaces the selection of one filter; an empty selection removes it
	fn on_filter_change(&self, key: &str, values: Vec<String>) {
		let filters = apply_filter_change(&self.store().column_filters(), key, values);
		self.store().set_column_filters(filters);
	}

	/// Toggles `value` in filter `key` the way its dropdown does
	fn on_filter_toggle(&self, key: &str, value: &str) {
		let Some(filter) = self.core().filters().iter().find(|f| f.key == key) else {
			tracing::debug!(key, "toggle on unknown filter ignored");
			return;
		};
		let selected = self.store().column_filters().get(key).cloned().unwrap_or_default();
		self.on_filter_change(key, filter.toggle(&selected, value));
	}

	/// Selects a prefilter
	fn on_prefilter_change(&self, id: &str) {
		self.store().set_prefilter(Some(id.to_string()));
	}

	/// Changes the sort; ignored when sorting is disabled
	fn on_sorting_change(&self, update: StateUpdate<SortingState>) {
		if !self.core().options().enable_sorting {
			tracing::debug!("sorting disabled; change ignored");
			return;
		}
		self.store().set_sorting(update);
	}

	/// Moves to another page or page size
	fn on_pagination_change(&self, update: StateUpdate<PaginationState>) {
		self.store().set_pagination(update);
	}

	/// Changes the page size and returns to the first page
	fn on_page_size_change(&self, page_size: usize) {
		self.store().set_page_size(page_size);
	}

	/// Restores every default except the page size
	fn reset_filters(&self) {
		self.store().reset_to_defaults();
		self.core().debouncer().borrow_mut().sync(self.store().search());
	}

	/// How the prefilter selector is drawn
	fn prefilter_presentation(&self) -> PrefilterPresentation {
		PrefilterTabs::presentation_for(self.core().prefilters().len())
	}

	/// Label of the active prefilter
	fn active_prefilter_label(&self) -> String {
		let active = self.store().prefilter();
		PrefilterTabs::new(self.core().prefilters(), active.as_deref()).active_label(self.core().context())
	}

	/// Columns listed in the column configuration menu
	fn configurable_columns(&self) -> Vec<ConfigurableColumn> {
		self.core()
			.column_visibility()
			.map(|v| v.columns().to_vec())
			.unwrap_or_default()
	}

	/// Shows or hides a column; ignored when column configuration is off
	fn set_column_visible(&self, id: &str, visible: bool) -> Result<()> {
		if let Some(visibility) = &self.core().visibility {
			visibility.borrow_mut().set_visible(id, visible)?;
		}
		Ok(())
	}

	/// Restores the default column visibility
	fn reset_columns(&self) {
		if let Some(visibility) = &self.core().visibility {
			visibility.borrow_mut().reset();
		}
	}

	/// Inline buttons and dropdown entries for `item`
	fn action_cell(&self, item: &Self::Row) -> ActionCell<Self::Row, Self::ActionData> {
		ActionCell::build(item, self.core().actions(), self.core().context())
	}

	/// Runs `action` for `item`
	async fn handle_action(
		&self,
		action: &TableAction<Self::Row, Self::ActionData>,
		item: &Self::Row,
	) -> ActionOutcome {
		self.core().action_handler().handle(action, item).await
	}
}
