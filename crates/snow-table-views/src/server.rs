//! Server-mode table: every state change becomes a request for one page

use std::fmt;
use std::rc::Rc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use snow_table_grid::{ErrorResponse, TableMode};
use snow_table_query::{Query, QueryKey, QueryOptions, QueryState};
use snow_table_reactive::flush_effects;
use snow_table_state::{TableState, encode_filters};

use crate::error::{Result, query_error};
use crate::params::{ServerFetchParams, ServerPage};
use crate::props::DataTableProps;
use crate::table::{DataTable, TableCore, ViewPage};
use crate::view::TableView;

type Endpoint<T> =
	Rc<dyn Fn(ServerFetchParams) -> LocalBoxFuture<'static, std::result::Result<ServerPage<T>, ErrorResponse>>>;

/// A table whose search, filtering, sorting and paging run on the server
///
/// Each distinct state is cached under its own key. While a new page loads
/// the previous one stays visible with [`TableView::is_fetching`] set.
pub struct ServerDataTable<T: 'static, K: 'static = serde_json::Value> {
	core: TableCore<T, K>,
	query: Query<ServerPage<T>>,
	endpoint: Endpoint<T>,
}

impl<T, K> ServerDataTable<T, K>
where
	T: Clone + 'static,
	K: 'static,
{
	/// Creates a table requesting pages from `endpoint`
	///
	/// # Panics
	///
	/// Panics if `props.default_page_size` is zero.
	pub fn new<F>(props: DataTableProps<T, K>, endpoint: F) -> Self
	where
		F: Fn(ServerFetchParams) -> LocalBoxFuture<'static, std::result::Result<ServerPage<T>, ErrorResponse>>
			+ 'static,
	{
		let query = Query::new(
			props.client.clone(),
			QueryOptions::default().keep_previous_data(true),
		);
		Self {
			core: TableCore::new(props, TableMode::Server),
			query,
			endpoint: Rc::new(endpoint),
		}
	}

	/// Cache key for `state`: the base key, `"server"`, then every state field
	pub fn server_key(&self, state: &TableState) -> QueryKey {
		let sort = state.sorting.first();
		self.core
			.query_key()
			.clone()
			.with("server")
			.with(state.pagination.page_index)
			.with(state.pagination.page_size)
			.with(&state.search)
			.with(state.prefilter.clone())
			.with(encode_filters(&state.column_filters))
			.with(sort.map(|sort| sort.id.clone()))
			.with(sort.map(|sort| sort.desc))
	}

	/// Parameters of the request for the current state
	pub fn fetch_params(&self) -> ServerFetchParams {
		ServerFetchParams::from_state(&self.store().state())
	}

	/// Query state of the current page
	pub fn query_state(&self) -> QueryState<ServerPage<T>> {
		self.query.state_untracked()
	}

	/// Requests the current page again, bypassing the cache
	pub async fn reload(&self) {
		flush_effects();
		let state = self.store().state();
		let fetch = page_fetcher(self.endpoint.clone(), ServerFetchParams::from_state(&state));
		self.query.refetch(self.server_key(&state), fetch).await;
	}
}

fn page_fetcher<T: 'static>(
	endpoint: Endpoint<T>,
	params: ServerFetchParams,
) -> impl FnOnce() -> LocalBoxFuture<'static, snow_table_query::Result<ServerPage<T>>> {
	move || {
		async move {
			tracing::debug!(?params, "requesting server page");
			endpoint(params).await.map_err(query_error)
		}
		.boxed_local()
	}
}

#[async_trait(?Send)]
impl<T, K> DataTable for ServerDataTable<T, K>
where
	T: Clone + 'static,
	K: 'static,
{
	type Row = T;
	type ActionData = K;

	fn core(&self) -> &TableCore<T, K> {
		&self.core
	}

	async fn refresh(&self) {
		flush_effects();
		let state = self.store().state();
		let fetch = page_fetcher(self.endpoint.clone(), ServerFetchParams::from_state(&state));
		self.query.fetch(self.server_key(&state), fetch).await;
	}

	fn view(&self) -> Result<TableView<T>> {
		flush_effects();
		let query = self.query.state_untracked();
		let page_size = self.store().pagination().page_size;
		let (rows, total_count) = match query.data {
			Some(page) => (page.items, page.total_item_count),
			None => (Vec::new(), 0),
		};

		Ok(self.core.view(ViewPage {
			rows,
			total_count,
			page_count: total_count.div_ceil(page_size),
			is_loading: query.is_loading,
			is_fetching: query.is_fetching,
			error: query.error,
		}))
	}
}

impl<T: Clone + 'static, K: 'static> fmt::Debug for ServerDataTable<T, K> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ServerDataTable")
			.field("core", &self.core)
			.field("key", &self.query.key())
			.finish_non_exhaustive()
	}
}
