//! End-to-end behavior of `ClientDataTable`

use std::rc::Rc;

use futures::FutureExt;
use rstest::*;
use serde::Serialize;
use serial_test::serial;
use snow_table_grid::{
	ActionDescriptor, ActionOutcome, ColumnConfig, ErrorResponse, FilterConfig, FilterOption,
	Prefilter,
};
use snow_table_query::QueryKey;
use snow_table_state::{
	ColumnSort, MemoryHistory, MemoryStorage, PaginationState, QueryStringStorage, StateStorage,
};
use snow_table_views::{ClientDataTable, DataTable, DataTableOptions, DataTableProps};

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Person {
	id: u32,
	name: String,
	status: &'static str,
	age: Option<u32>,
}

fn person(id: u32, name: &str, status: &'static str, age: Option<u32>) -> Person {
	Person {
		id,
		name: name.to_string(),
		status,
		age,
	}
}

#[fixture]
fn people() -> Vec<Person> {
	vec![
		person(1, "John Doe", "active", Some(42)),
		person(2, "Jane Smith", "inactive", Some(35)),
		person(3, "Bob Johnson", "active", None),
		person(4, "Alice Brown", "pending", Some(28)),
	]
}

fn props() -> DataTableProps<Person> {
	DataTableProps::new(QueryKey::new(["people"]))
		.column(ColumnConfig::new("name").label("Name"))
		.column(ColumnConfig::new("status").label("Status"))
		.column(ColumnConfig::new("age").label("Age"))
		.filter(FilterConfig::new(
			"status",
			"Status",
			vec![
				FilterOption::new("Active", "active"),
				FilterOption::new("Inactive", "inactive"),
			],
		)
		.multiple_selection(true))
		.options(DataTableOptions::default().enable_global_search(true))
}

fn table(props: DataTableProps<Person>, rows: Vec<Person>) -> ClientDataTable<Person> {
	ClientDataTable::new(props, move || {
		let rows = rows.clone();
		async move { Ok(rows) }.boxed_local()
	})
}

fn names(rows: &[Person]) -> Vec<&str> {
	rows.iter().map(|p| p.name.as_str()).collect()
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_search_narrows_rows_and_returns_to_first_page(people: Vec<Person>) {
	let table = table(props().default_page_size(2), people);
	table.refresh().await;
	table.on_pagination_change(PaginationState { page_index: 1, page_size: 2 }.into());

	table.on_search_change("jhn");
	let view = table.view().unwrap();

	assert_eq!(names(&view.rows), ["John Doe", "Bob Johnson"]);
	assert_eq!(view.pagination.page_index, 0);
	assert!(view.has_active_filters);

	table.on_search_change("John");
	let view = table.view().unwrap();
	assert_eq!(names(&view.rows), ["John Doe", "Bob Johnson"]);
	assert_eq!(view.total_count, 2);
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_debounced_search_for_john_shows_only_john_doe() {
	use std::time::Duration;

	let rows = vec![
		person(1, "John Doe", "active", None),
		person(2, "Jane Smith", "active", None),
		person(3, "Bob Wilson", "active", None),
	];
	let table = table(props(), rows);
	table.refresh().await;

	table.on_search_input_at("John", Duration::ZERO);
	assert!(table.poll_search(Duration::from_millis(500)));
	let view = table.view().unwrap();

	assert_eq!(view.rows, [person(1, "John Doe", "active", None)]);
	assert_eq!(view.count_text(table.core().context()), "1 items");
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_search_ignored_when_disabled(people: Vec<Person>) {
	let table = table(props().options(DataTableOptions::default()), people);
	table.refresh().await;

	table.on_search_change("John");

	let view = table.view().unwrap();
	assert_eq!(view.rows.len(), 4);
	assert!(view.show_reset_button);
	assert_eq!(view.search_placeholder, "Search");
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_loading_view_before_first_fetch(people: Vec<Person>) {
	let table = table(props(), people);

	let view = table.view().unwrap();

	assert!(view.is_loading);
	assert_eq!(view.skeleton_rows(), 10);
	assert!(!view.is_empty());
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_restored_state_applies_filters_and_sort(people: Vec<Person>) {
	let history = MemoryHistory::new(
		"https://app.test/people?dt_filters=status:active|nickname:bob&dt_sortBy=name&dt_sortDesc=true",
	);
	let props = props()
		.persist_state(true)
		.storage(Rc::new(QueryStringStorage::new(history)));
	let table = table(props, people);
	table.refresh().await;

	let view = table.view().unwrap();

	assert_eq!(names(&view.rows), ["John Doe", "Bob Johnson"]);
	assert_eq!(view.state.sorting, [ColumnSort::desc("name")]);
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_filter_toggle_and_clear(people: Vec<Person>) {
	let table = table(props(), people);
	table.refresh().await;

	table.on_filter_toggle("status", "inactive");
	assert_eq!(names(&table.view().unwrap().rows), ["Jane Smith"]);

	table.on_filter_toggle("status", "active");
	assert_eq!(table.view().unwrap().rows.len(), 3);

	table.on_filter_change("status", Vec::new());
	let view = table.view().unwrap();
	assert_eq!(view.rows.len(), 4);
	assert!(view.state.column_filters.is_empty());
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_missing_values_sort_last(people: Vec<Person>) {
	let table = table(props(), people);
	table.refresh().await;

	table.on_sorting_change(vec![ColumnSort::asc("age")].into());
	assert_eq!(
		names(&table.view().unwrap().rows),
		["Alice Brown", "Jane Smith", "John Doe", "Bob Johnson"]
	);

	table.on_sorting_change(vec![ColumnSort::desc("age")].into());
	assert_eq!(
		names(&table.view().unwrap().rows),
		["John Doe", "Jane Smith", "Alice Brown", "Bob Johnson"]
	);
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_sorting_disabled_ignores_changes(people: Vec<Person>) {
	let table = table(
		props().options(DataTableOptions::default().enable_sorting(false)),
		people,
	);
	table.refresh().await;

	table.on_sorting_change(vec![ColumnSort::asc("name")].into());

	assert!(table.store().sorting().is_empty());
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_pagination_windows_rows() {
	let rows = (1..=23)
		.map(|id| person(id, &format!("Person {id:02}"), "active", None))
		.collect();
	let table = table(props().default_page_size(10), rows);
	table.refresh().await;

	table.on_pagination_change(PaginationState { page_index: 2, page_size: 10 }.into());
	let view = table.view().unwrap();

	assert_eq!(view.page_count, 3);
	assert_eq!(view.total_count, 23);
	assert_eq!(names(&view.rows), ["Person 21", "Person 22", "Person 23"]);

	table.on_page_size_change(25);
	let view = table.view().unwrap();
	assert_eq!((view.page_count, view.rows.len()), (1, 23));
	assert_eq!(view.pagination.page_index, 0);
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_prefilter_fn_uses_first_prefilter_by_default(people: Vec<Person>) {
	let props = props()
		.prefilter(Prefilter::new("all", "All"))
		.prefilter(Prefilter::new("active", "Active"));
	let table = table(props, people)
		.prefilter_fn(|person: &Person, prefilter: &str| prefilter == "all" || person.status == prefilter);
	table.refresh().await;

	let view = table.view().unwrap();
	assert_eq!(view.rows.len(), 4);
	assert!(!view.has_active_filters);
	assert_eq!(table.active_prefilter_label(), "All");

	table.on_prefilter_change("active");
	let view = table.view().unwrap();
	assert_eq!(names(&view.rows), ["John Doe", "Bob Johnson"]);
	assert!(view.has_active_filters);
	assert!(view.show_reset_button);
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_reset_filters_keeps_page_size(people: Vec<Person>) {
	let table = table(props(), people);
	table.refresh().await;
	table.on_page_size_change(50);
	table.on_search_change("jane");
	table.on_filter_change("status", vec!["inactive".into()]);

	table.reset_filters();
	let view = table.view().unwrap();

	assert_eq!(view.rows.len(), 4);
	assert_eq!(view.pagination.page_size, 50);
	assert!(!view.has_active_filters);
	assert_eq!(table.search_input(), "");
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_debounced_search_commits_after_pause(people: Vec<Person>) {
	use std::time::Duration;

	let table = table(props(), people);
	table.refresh().await;

	table.on_search_input_at("ja", Duration::from_millis(0));
	table.on_search_input_at("jane", Duration::from_millis(200));
	assert!(!table.poll_search(Duration::from_millis(600)));
	assert_eq!(table.search_input(), "jane");
	assert_eq!(table.store().search(), "");

	assert!(table.poll_search(Duration::from_millis(700)));
	assert_eq!(names(&table.view().unwrap().rows), ["Jane Smith"]);
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_fetch_failure_is_reported() {
	let table: ClientDataTable<Person> = ClientDataTable::new(props(), || {
		async { Err(ErrorResponse::new("Service unavailable", 503)) }.boxed_local()
	});

	table.refresh().await;
	let view = table.view().unwrap();

	assert!(view.rows.is_empty());
	assert!(view.is_empty());
	assert_eq!(view.error.and_then(|err| err.status()), Some(503));
	assert_eq!(view.empty_text, "No results found");
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_column_visibility_is_saved(people: Vec<Person>) {
	let storage = Rc::new(MemoryStorage::new());
	let props = props()
		.options(DataTableOptions::default().enable_column_configuration(true))
		.column_config("people", storage.clone());
	let table = table(props, people);

	table.set_column_visible("age", false).unwrap();

	assert_eq!(table.view().unwrap().visible_columns, ["name", "status"]);
	assert_eq!(
		storage.read("datatable-config-people").as_deref(),
		Some(r#"{"name":true,"status":true,"age":false}"#)
	);

	table.reset_columns();
	assert_eq!(table.view().unwrap().visible_columns, ["name", "status", "age"]);
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_row_actions_through_table(people: Vec<Person>) {
	let props = props()
		.action(ActionDescriptor::link("Open", |p: &Person| format!("/people/{}", p.id)))
		.action(ActionDescriptor::click("Archive", |_: &Person| {}).hidden(true));
	let table = table(props, people.clone());

	let cell = table.action_cell(&people[0]);
	assert_eq!(cell.buttons.len() + cell.dropdown.len(), 1);
	assert_eq!(table.view().unwrap().visible_columns.last().map(String::as_str), Some("actions"));

	let outcome = table.handle_action(&table.core().actions()[0], &people[0]).await;
	assert_eq!(
		outcome,
		ActionOutcome::Navigated {
			href: "/people/1".into(),
			external: false,
		}
	);
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_out_of_range_page_in_url_shows_first_page(people: Vec<Person>) {
	let history = MemoryHistory::new("https://app.test/people?dt_page=1000000000000000000");
	let props = props()
		.persist_state(true)
		.storage(Rc::new(QueryStringStorage::new(history)));
	let table = table(props, people);
	table.refresh().await;

	let view = table.view().unwrap();

	assert_eq!(view.pagination.page_index, 0);
	assert_eq!(view.rows.len(), 4);
}
