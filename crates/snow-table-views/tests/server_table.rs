//! End-to-end behavior of `ServerDataTable`

use std::cell::RefCell;
use std::rc::Rc;

use futures::FutureExt;
use futures::channel::oneshot;
use rstest::*;
use serial_test::serial;
use snow_table_grid::{ColumnConfig, ErrorResponse, Prefilter};
use snow_table_query::{DEFAULT_CACHE_CAPACITY, QueryClient, QueryKey};
use snow_table_state::{ColumnSort, MemoryHistory, PaginationState, QueryStringStorage, SortOrder};
use snow_table_views::{
	DataTable, DataTableProps, ServerDataTable, ServerFetchParams, ServerPage, ServerSortOrder,
};

type Requests = Rc<RefCell<Vec<ServerFetchParams>>>;

fn props() -> DataTableProps<String> {
	DataTableProps::new(QueryKey::new(["travels"]))
		.column(ColumnConfig::new("name"))
		.prefilter(Prefilter::new("all", "All"))
		.prefilter(Prefilter::new("active", "Active"))
}

/// Table whose endpoint records every request and answers with
/// `total` rows in pages of the requested size
fn table(props: DataTableProps<String>, total: usize) -> (ServerDataTable<String>, Requests) {
	let requests = Requests::default();
	let log = requests.clone();
	let table = ServerDataTable::new(props, move |params: ServerFetchParams| {
		log.borrow_mut().push(params.clone());
		let end = (params.offset + params.limit).min(total);
		let items = (params.offset..end).map(|i| format!("row {i}")).collect();
		async move { Ok(ServerPage::new(items, total)) }.boxed_local()
	});
	(table, requests)
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_prefilter_change_refetches_and_persists() {
	let history = MemoryHistory::new("https://app.test/travels");
	let props = props()
		.persist_state(true)
		.storage(Rc::new(QueryStringStorage::new(history.clone())));
	let (table, requests) = table(props, 3);

	table.refresh().await;
	assert_eq!(requests.borrow()[0].prefilter.as_deref(), Some("all"));
	assert_eq!(history.query_value("dt_prefilter"), None);

	table.on_prefilter_change("active");
	table.refresh().await;

	assert_eq!(requests.borrow().len(), 2);
	assert_eq!(requests.borrow()[1].prefilter.as_deref(), Some("active"));
	assert_eq!(history.query_value("dt_prefilter").as_deref(), Some("active"));
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_params_follow_state() {
	let (table, requests) = table(props().default_sort("createdAt", SortOrder::Desc), 100);

	table.refresh().await;
	let first = requests.borrow()[0].clone();
	assert_eq!((first.limit, first.offset), (25, 0));
	assert_eq!(first.search, None);
	assert_eq!(first.filters, None);
	assert_eq!(first.sort_by.as_deref(), Some("createdAt"));
	assert_eq!(first.sort_order, ServerSortOrder::Desc);

	table.on_search_change("porto");
	table.on_filter_change("country", vec!["PT".into()]);
	table.on_sorting_change(vec![ColumnSort::asc("name")].into());
	table.refresh().await;

	let last = requests.borrow().last().cloned().unwrap();
	assert_eq!(last.search.as_deref(), Some("porto"));
	assert_eq!(last.filters.unwrap()["country"], ["PT"]);
	assert_eq!(last.sort_order, ServerSortOrder::Asc);
	assert_eq!(
		table.fetch_params().to_query_string().unwrap(),
		"limit=25&offset=0&search=porto&prefilter=all&filters=country%3APT&sortBy=name&sortOrder=ASC"
	);
}

#[rstest]
#[case(0, 0)]
#[case(25, 1)]
#[case(51, 3)]
#[serial]
#[tokio::test]
async fn test_page_count_from_total(#[case] total: usize, #[case] pages: usize) {
	let (table, _) = table(props(), total);

	table.refresh().await;
	let view = table.view().unwrap();

	assert_eq!(view.page_count, pages);
	assert_eq!(view.total_count, total);
	assert_eq!(view.rows.len(), total.min(25));
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_filter_change_requests_first_page() {
	let (table, requests) = table(props(), 200);
	table.on_pagination_change(PaginationState { page_index: 3, page_size: 25 }.into());
	table.refresh().await;
	assert_eq!(requests.borrow()[0].offset, 75);

	table.on_filter_change("country", vec!["ES".into()]);
	table.refresh().await;

	assert_eq!(requests.borrow()[1].offset, 0);
	assert_eq!(table.view().unwrap().pagination.page_index, 0);
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_same_state_served_from_cache() {
	let (table, requests) = table(props(), 10);

	table.refresh().await;
	table.refresh().await;
	assert_eq!(requests.borrow().len(), 1);

	table.reload().await;
	assert_eq!(requests.borrow().len(), 2);
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_cache_shared_between_tables() {
	let client = QueryClient::new();
	let (first, first_requests) = table(props().query_client(client.clone()), 10);
	let (second, second_requests) = table(props().query_client(client), 10);

	first.refresh().await;
	second.refresh().await;

	assert_eq!(first_requests.borrow().len(), 1);
	assert!(second_requests.borrow().is_empty());
	assert_eq!(second.view().unwrap().rows.len(), 10);
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_previous_page_stays_visible_while_next_loads() {
	let pending = Rc::new(RefCell::new(None::<oneshot::Receiver<ServerPage<String>>>));
	let next = pending.clone();
	let table = ServerDataTable::new(props(), move |params: ServerFetchParams| {
		match next.borrow_mut().take() {
			Some(rx) => async move {
				rx.await.map_err(|_| ErrorResponse::new("cancelled", 499))
			}
			.boxed_local(),
			None => {
				let items = vec![format!("page {}", params.offset / params.limit)];
				async move { Ok(ServerPage::new(items, 100)) }.boxed_local()
			}
		}
	});
	table.refresh().await;

	let (tx, rx) = oneshot::channel();
	*pending.borrow_mut() = Some(rx);
	table.on_pagination_change(PaginationState { page_index: 1, page_size: 25 }.into());

	let observe = async {
		let view = table.view().unwrap();
		assert_eq!(view.rows, ["page 0"]);
		assert!(view.is_fetching && !view.is_loading);
		assert!(view.is_refreshing());
		tx.send(ServerPage::new(vec!["page 1".to_string()], 100)).unwrap();
	};
	futures::join!(table.refresh(), observe);

	let view = table.view().unwrap();
	assert_eq!(view.rows, ["page 1"]);
	assert!(!view.is_fetching);
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_endpoint_error_keeps_last_page() {
	let fail = Rc::new(RefCell::new(false));
	let failing = fail.clone();
	let table = ServerDataTable::new(props(), move |_: ServerFetchParams| {
		let fail = *failing.borrow();
		async move {
			if fail {
				Err(ErrorResponse::new("Internal error", 500))
			} else {
				Ok(ServerPage::new(vec!["kept".to_string()], 1))
			}
		}
		.boxed_local()
	});
	table.refresh().await;

	*fail.borrow_mut() = true;
	table.on_search_change("x");
	table.refresh().await;
	let view = table.view().unwrap();

	assert_eq!(view.rows, ["kept"]);
	assert_eq!(view.error.map(|err| err.to_string()).as_deref(), Some("Internal error"));
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_out_of_range_page_in_url_requests_first_page() {
	let history = MemoryHistory::new("https://app.test/travels?dt_page=18446744073709551615");
	let props = props()
		.persist_state(true)
		.storage(Rc::new(QueryStringStorage::new(history)));
	let (table, requests) = table(props, 40);

	table.refresh().await;

	assert_eq!(requests.borrow()[0].offset, 0);
	assert_eq!(table.view().unwrap().pagination.page_index, 0);
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_typing_many_searches_keeps_cache_bounded() {
	let client = QueryClient::new();
	let (table, requests) = table(props().query_client(client.clone()), 10);

	for i in 0..500 {
		table.on_search_change(&format!("q{i}"));
		table.refresh().await;
	}

	assert_eq!(requests.borrow().len(), 500);
	assert_eq!(client.len(), DEFAULT_CACHE_CAPACITY);
	assert_eq!(requests.borrow().last().and_then(|p| p.search.clone()).as_deref(), Some("q499"));
}
