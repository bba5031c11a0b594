//! Declarative description of a data table

use std::fmt;
use std::rc::Rc;

use snow_table_grid::{ColumnConfig, FilterConfig, Prefilter, TableAction, TableContext};
use snow_table_query::{QueryClient, QueryKey};
use snow_table_state::{SortOrder, StateStorage, TableStateConfig};

use crate::options::{DEFAULT_PAGE_SIZES, DataTableOptions};

/// Columns, filters, actions and defaults of one table
///
/// ```
/// use snow_table_grid::{ColumnConfig, Prefilter};
/// use snow_table_query::QueryKey;
/// use snow_table_state::SortOrder;
/// use snow_table_views::DataTableProps;
///
/// # struct Travel;
/// let props = DataTableProps::<Travel>::new(QueryKey::new(["travels"]))
/// 	.column(ColumnConfig::new("name").label("Name"))
/// 	.prefilter(Prefilter::new("all", "All"))
/// 	.prefilter(Prefilter::new("active", "Active"))
/// 	.default_sort("name", SortOrder::Asc)
/// 	.persist_state(true);
///
/// let config = props.state_config();
/// assert_eq!(config.default_prefilter.as_deref(), Some("all"));
/// assert_eq!(config.default_page_size, 25);
/// ```
pub struct DataTableProps<T, K = serde_json::Value> {
	/// Cache key of the table's data
	pub query_key: QueryKey,
	/// Column declarations
	pub columns: Vec<ColumnConfig<T>>,
	/// Row actions
	pub actions: Vec<TableAction<T, K>>,
	/// Column filter dropdowns
	pub filters: Vec<FilterConfig>,
	/// Quick segments; the first one is the default
	pub prefilters: Vec<Prefilter>,
	/// Column sorted by default
	pub default_sort_by: Option<String>,
	/// Direction of the default sort
	pub default_sort_order: SortOrder,
	/// Rows per page when nothing is persisted
	pub default_page_size: usize,
	/// Mirror state into the page URL
	pub persist_state: bool,
	/// Feature switches
	pub options: DataTableOptions,
	/// Translation, confirmation and link collaborators
	pub context: TableContext,
	/// Cache shared with other tables
	pub client: QueryClient,
	/// Storage for table state; the page URL when absent
	pub storage: Option<Rc<dyn StateStorage>>,
	/// Id and storage of the saved column configuration
	pub column_config: Option<(String, Rc<dyn StateStorage>)>,
}

impl<T, K> DataTableProps<T, K> {
	/// A table without columns keyed by `query_key`
	pub fn new(query_key: QueryKey) -> Self {
		Self {
			query_key,
			columns: Vec::new(),
			actions: Vec::new(),
			filters: Vec::new(),
			prefilters: Vec::new(),
			default_sort_by: None,
			default_sort_order: SortOrder::Asc,
			default_page_size: DEFAULT_PAGE_SIZES[0],
			persist_state: false,
			options: DataTableOptions::default(),
			context: TableContext::new(),
			client: QueryClient::new(),
			storage: None,
			column_config: None,
		}
	}

	/// Adds a column
	pub fn column(mut self, column: ColumnConfig<T>) -> Self {
		self.columns.push(column);
		self
	}

	/// Adds a row action
	pub fn action(mut self, action: impl Into<TableAction<T, K>>) -> Self {
		self.actions.push(action.into());
		self
	}

	/// Adds a filter dropdown
	pub fn filter(mut self, filter: FilterConfig) -> Self {
		self.filters.push(filter);
		self
	}

	/// Adds a prefilter
	pub fn prefilter(mut self, prefilter: Prefilter) -> Self {
		self.prefilters.push(prefilter);
		self
	}

	/// Sets the default sort
	pub fn default_sort(mut self, column: impl Into<String>, order: SortOrder) -> Self {
		self.default_sort_by = Some(column.into());
		self.default_sort_order = order;
		self
	}

	/// Sets the default page size
	pub fn default_page_size(mut self, page_size: usize) -> Self {
		self.default_page_size = page_size;
		self
	}

	/// Sets whether state is mirrored into the URL
	pub fn persist_state(mut self, persist: bool) -> Self {
		self.persist_state = persist;
		self
	}

	/// Sets the feature switches
	pub fn options(mut self, options: DataTableOptions) -> Self {
		self.options = options;
		self
	}

	/// Sets the collaborators
	pub fn context(mut self, context: TableContext) -> Self {
		self.context = context;
		self
	}

	/// Shares `client`'s cache
	pub fn query_client(mut self, client: QueryClient) -> Self {
		self.client = client;
		self
	}

	/// Persists state into `storage` instead of the page URL
	pub fn storage(mut self, storage: Rc<dyn StateStorage>) -> Self {
		self.storage = Some(storage);
		self
	}

	/// Saves column visibility under `config_id` in `storage`
	pub fn column_config(mut self, config_id: impl Into<String>, storage: Rc<dyn StateStorage>) -> Self {
		self.column_config = Some((config_id.into(), storage));
		self
	}

	/// State store configuration derived from these props
	pub fn state_config(&self) -> TableStateConfig {
		TableStateConfig {
			enabled: self.persist_state,
			default_prefilter: self.prefilters.first().map(|p| p.id.clone()),
			default_page_size: self.default_page_size,
			default_sort_by: self.default_sort_by.clone(),
			default_sort_order: self.default_sort_order,
		}
	}
}

impl<T, K> fmt::Debug for DataTableProps<T, K> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DataTableProps")
			.field("query_key", &self.query_key)
			.field("columns", &self.columns.len())
			.field("actions", &self.actions.len())
			.field("filters", &self.filters)
			.field("prefilters", &self.prefilters)
			.field("persist_state", &self.persist_state)
			.field("options", &self.options)
			.finish_non_exhaustive()
	}
}
