//! A table rebuilt on the same URL picks up where the last one left off

use std::cell::RefCell;
use std::rc::Rc;

use futures::FutureExt;
use rstest::*;
use serial_test::serial;
use snow_table::prelude::*;

type Requests = Rc<RefCell<Vec<ServerFetchParams>>>;

fn server_table(history: &MemoryHistory, requests: &Requests) -> ServerDataTable<u32> {
	let props = DataTableProps::new(QueryKey::new(["orders"]))
		.column(ColumnConfig::new("id"))
		.prefilter(Prefilter::new("open", "Open"))
		.prefilter(Prefilter::new("closed", "Closed"))
		.default_page_size(20)
		.persist_state(true)
		.storage(Rc::new(QueryStringStorage::new(history.clone())));
	let log = requests.clone();
	ServerDataTable::new(props, move |params: ServerFetchParams| {
		log.borrow_mut().push(params.clone());
		let items = (params.offset..params.offset + params.limit).map(|i| i as u32).collect();
		async move { Ok(ServerPage::new(items, 500)) }.boxed_local()
	})
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_rebuilt_table_requests_same_page() {
	let history = MemoryHistory::new("https://shop.test/orders");
	let requests = Requests::default();

	let first = server_table(&history, &requests);
	first.on_prefilter_change("closed");
	first.on_filter_change("region", vec!["north".into(), "south".into()]);
	first.on_sorting_change(vec![ColumnSort::desc("total")].into());
	first.refresh().await;
	first.on_pagination_change(PaginationState { page_index: 4, page_size: 20 }.into());
	first.refresh().await;

	assert_eq!(history.query_value("dt_page").as_deref(), Some("5"));
	assert_eq!(history.query_value("dt_filters").as_deref(), Some("region:north,south"));
	assert_eq!(history.query_value("dt_prefilter").as_deref(), Some("closed"));

	let second = server_table(&history, &requests);
	second.refresh().await;

	let last = requests.borrow().last().cloned().unwrap();
	assert_eq!((last.offset, last.limit), (80, 20));
	assert_eq!(last.prefilter.as_deref(), Some("closed"));
	let view = second.view().unwrap();
	assert_eq!(view.pagination, PaginationState { page_index: 4, page_size: 20 });
	assert_eq!(view.state.sorting, [ColumnSort::desc("total")]);
	assert_eq!(view.rows.first(), Some(&80));
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_reset_clears_url_but_keeps_page_size() {
	let history = MemoryHistory::new("https://shop.test/orders?dt_search=lamp&dt_page=3&dt_pageSize=50");
	let requests = Requests::default();
	let table = server_table(&history, &requests);
	table.refresh().await;
	assert_eq!(requests.borrow()[0].offset, 100);
	assert_eq!(requests.borrow()[0].search.as_deref(), Some("lamp"));

	table.reset_filters();
	table.refresh().await;

	assert_eq!(history.query_value("dt_search"), None);
	assert_eq!(history.query_value("dt_page"), None);
	assert_eq!(history.query_value("dt_pageSize").as_deref(), Some("50"));
	assert_eq!(requests.borrow().last().map(|p| (p.offset, p.limit)), Some((0, 50)));
}
