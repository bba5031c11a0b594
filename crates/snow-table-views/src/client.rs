//! Client-mode table: fetch every row once, search, filter, sort and page in
//! memory

use std::fmt;
use std::rc::Rc;

use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use serde::Serialize;
use snow_table_grid::{ErrorResponse, RowModel, TableMode};
use snow_table_query::{Query, QueryOptions, QueryState};
use snow_table_reactive::flush_effects;
use snow_table_state::ColumnFilters;

use crate::error::{Result, query_error};
use crate::props::DataTableProps;
use crate::table::{DataTable, TableCore, ViewPage};
use crate::view::TableView;

type FetchAll<T> = Rc<dyn Fn() -> LocalBoxFuture<'static, std::result::Result<Vec<T>, ErrorResponse>>>;
type PrefilterFn<T> = Rc<dyn Fn(&T, &str) -> bool>;

/// A table whose rows are all loaded up front
///
/// # Example
///
/// ```
/// use futures::FutureExt;
/// use serde::Serialize;
/// use snow_table_grid::ColumnConfig;
/// use snow_table_query::QueryKey;
/// use snow_table_views::{ClientDataTable, DataTable, DataTableOptions, DataTableProps};
///
/// #[derive(Debug, Clone, PartialEq, Serialize)]
/// struct User { name: &'static str }
///
/// # futures::executor::block_on(async {
/// let props = DataTableProps::<User>::new(QueryKey::new(["users"]))
/// 	.column(ColumnConfig::new("name"))
/// 	.options(DataTableOptions::default().enable_global_search(true));
/// let table = ClientDataTable::new(props, || {
/// 	async { Ok(vec![User { name: "John Doe" }, User { name: "Jane Roe" }]) }.boxed_local()
/// });
///
/// table.refresh().await;
/// table.on_search_change("john");
///
/// let view = table.view().unwrap();
/// assert_eq!(view.rows, [User { name: "John Doe" }]);
/// # });
/// ```
pub struct ClientDataTable<T: 'static, K: 'static = serde_json::Value> {
	core: TableCore<T, K>,
	query: Query<Vec<T>>,
	fetch_all: FetchAll<T>,
	prefilter_fn: Option<PrefilterFn<T>>,
}

impl<T, K> ClientDataTable<T, K>
where
	T: Clone + Serialize + 'static,
	K: 'static,
{
	/// Creates a table loading its rows from `fetch_all`
	///
	/// # Panics
	///
	/// Panics if `props.default_page_size` is zero.
	pub fn new<F>(props: DataTableProps<T, K>, fetch_all: F) -> Self
	where
		F: Fn() -> LocalBoxFuture<'static, std::result::Result<Vec<T>, ErrorResponse>> + 'static,
	{
		let query = Query::new(props.client.clone(), QueryOptions::default());
		Self {
			core: TableCore::new(props, TableMode::Client),
			query,
			fetch_all: Rc::new(fetch_all),
			prefilter_fn: None,
		}
	}

	/// Keeps only rows for which `f(row, active_prefilter)` holds
	pub fn prefilter_fn(mut self, f: impl Fn(&T, &str) -> bool + 'static) -> Self {
		self.prefilter_fn = Some(Rc::new(f));
		self
	}

	/// Query state of the row fetch
	pub fn query_state(&self) -> QueryState<Vec<T>> {
		self.query.state_untracked()
	}

	/// Fetches every row again, bypassing the cache
	pub async fn reload(&self) {
		let fetch_all = self.fetch_all.clone();
		self.query
			.refetch(self.core.query_key().clone(), move || async move {
				fetch_all().await.map_err(query_error)
			})
			.await;
	}

	fn prefiltered(&self, items: Vec<T>) -> Vec<T> {
		match (&self.prefilter_fn, self.store().prefilter()) {
			(Some(matches), Some(active)) => {
				items.into_iter().filter(|item| matches(item, &active)).collect()
			}
			_ => items,
		}
	}

	fn row_model(&self, items: Vec<T>) -> Result<RowModel<T>> {
		let options = self.core.options();
		let state = self.store().state();
		let mut model = RowModel::new(self.prefiltered(items), self.core.columns().to_vec())?;

		if options.enable_global_search {
			model.global_filter(state.search);
		}

		if !self.core.filters().is_empty() {
			let filters: ColumnFilters = state
				.column_filters
				.into_iter()
				.filter(|(key, _)| {
					let known = model.can_filter(key);
					if !known {
						tracing::debug!(%key, "skipping filter on a column without a filter dropdown");
					}
					known
				})
				.collect();
			model.filter(&filters)?;
		}

		if options.enable_sorting
			&& let Err(err) = model.sort_by(&state.sorting)
		{
			tracing::warn!(%err, "ignoring sort");
		}

		if options.enable_pagination {
			model.paginate(state.pagination)?;
		}

		Ok(model)
	}
}

#[async_trait(?Send)]
impl<T, K> DataTable for ClientDataTable<T, K>
where
	T: Clone + Serialize + 'static,
	K: 'static,
{
	type Row = T;
	type ActionData = K;

	fn core(&self) -> &TableCore<T, K> {
		&self.core
	}

	async fn refresh(&self) {
		flush_effects();
		let fetch_all = self.fetch_all.clone();
		self.query
			.fetch(self.core.query_key().clone(), move || async move {
				fetch_all().await.map_err(query_error)
			})
			.await;
	}

	fn view(&self) -> Result<TableView<T>> {
		flush_effects();
		let query = self.query.state_untracked();
		let model = self.row_model(query.data.unwrap_or_default())?;

		Ok(self.core.view(ViewPage {
			rows: model.visible_rows().into_iter().cloned().collect(),
			total_count: model.filtered_rows_count(),
			page_count: model.total_pages(),
			is_loading: query.is_loading,
			is_fetching: query.is_fetching,
			error: query.error,
		}))
	}
}

impl<T: 'static, K: 'static> fmt::Debug for ClientDataTable<T, K> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ClientDataTable")
			.field("core", &self.core)
			.field("prefilter_fn", &self.prefilter_fn.is_some())
			.finish_non_exhaustive()
	}
}
