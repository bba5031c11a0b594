//! Request and response shapes of the server endpoint

use serde::{Deserialize, Serialize};
use snow_table_state::{ColumnFilters, TableState, encode_filters};

use crate::error::Result;

/// Sort direction sent to the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServerSortOrder {
	/// Ascending
	#[default]
	Asc,
	/// Descending
	Desc,
}

/// Parameters passed to the server endpoint for one page
///
/// ```
/// use snow_table_state::{ColumnSort, PaginationState, TableState};
/// use snow_table_views::ServerFetchParams;
///
/// let state = TableState {
/// 	prefilter: Some("active".into()),
/// 	search: String::new(),
/// 	pagination: PaginationState { page_index: 2, page_size: 25 },
/// 	column_filters: Default::default(),
/// 	sorting: vec![ColumnSort::desc("createdAt")],
/// };
/// let params = ServerFetchParams::from_state(&state);
///
/// assert_eq!(params.offset, 50);
/// assert_eq!(
/// 	serde_json::to_string(&params).unwrap(),
/// 	r#"{"limit":25,"offset":50,"prefilter":"active","sortBy":"createdAt","sortOrder":"DESC"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerFetchParams {
	/// Page size
	pub limit: usize,
	/// Index of the first row
	pub offset: usize,
	/// Search term; absent when empty
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub search: Option<String>,
	/// Active prefilter id
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub prefilter: Option<String>,
	/// Selected column filter values; absent when none are selected
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub filters: Option<ColumnFilters>,
	/// Sorted column
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sort_by: Option<String>,
	/// Sort direction; ascending when nothing is sorted
	#[serde(default)]
	pub sort_order: ServerSortOrder,
}

/// Flat form of [`ServerFetchParams`] for query strings
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FlatParams<'a> {
	limit: usize,
	offset: usize,
	#[serde(skip_serializing_if = "Option::is_none")]
	search: Option<&'a str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	prefilter: Option<&'a str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	filters: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	sort_by: Option<&'a str>,
	sort_order: ServerSortOrder,
}

impl ServerFetchParams {
	/// Parameters for the page described by `state`
	pub fn from_state(state: &TableState) -> Self {
		let sort = state.sorting.first();
		Self {
			limit: state.pagination.page_size,
			offset: state.pagination.offset(),
			search: Some(state.search.clone()).filter(|search| !search.is_empty()),
			prefilter: state.prefilter.clone(),
			filters: Some(state.column_filters.clone()).filter(|filters| !filters.is_empty()),
			sort_by: sort.map(|sort| sort.id.clone()),
			sort_order: match sort {
				Some(sort) if sort.desc => ServerSortOrder::Desc,
				_ => ServerSortOrder::Asc,
			},
		}
	}

	/// URL-encoded form, with filters in the `key:v1,v2|key2:v3` token format
	///
	/// ```
	/// use snow_table_views::{ServerFetchParams, ServerSortOrder};
	///
	/// let params = ServerFetchParams {
	/// 	limit: 25,
	/// 	offset: 0,
	/// 	search: Some("ada lovelace".into()),
	/// 	prefilter: None,
	/// 	filters: Some([("status".to_string(), vec!["open".to_string()])].into_iter().collect()),
	/// 	sort_by: None,
	/// 	sort_order: ServerSortOrder::Asc,
	/// };
	///
	/// assert_eq!(
	/// 	params.to_query_string().unwrap(),
	/// 	"limit=25&offset=0&search=ada+lovelace&filters=status%3Aopen&sortOrder=ASC"
	/// );
	/// ```
	pub fn to_query_string(&self) -> Result<String> {
		let flat = FlatParams {
			limit: self.limit,
			offset: self.offset,
			search: self.search.as_deref(),
			prefilter: self.prefilter.as_deref(),
			filters: self.filters.as_ref().map(encode_filters),
			sort_by: self.sort_by.as_deref(),
			sort_order: self.sort_order,
		};
		Ok(serde_urlencoded::to_string(flat)?)
	}
}

/// One page returned by the server endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerPage<T> {
	/// Rows of the requested page
	pub items: Vec<T>,
	/// Rows matching the request across all pages
	pub total_item_count: usize,
}

impl<T> ServerPage<T> {
	/// Creates a page
	pub fn new(items: Vec<T>, total_item_count: usize) -> Self {
		Self {
			items,
			total_item_count,
		}
	}
}
