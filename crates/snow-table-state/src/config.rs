//! Construction-time configuration for [`TableStateStore`](crate::TableStateStore)

use serde::{Deserialize, Serialize};

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Direction of the configured default sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
	/// Ascending
	#[default]
	Asc,
	/// Descending
	Desc,
}

impl SortOrder {
	/// Whether this is [`SortOrder::Desc`]
	pub fn is_desc(self) -> bool {
		matches!(self, Self::Desc)
	}
}

/// Defaults and persistence switch for a table's state
///
/// Deserializable so hosts can keep table defaults in their settings files.
///
/// ```
/// use snow_table_state::{SortOrder, TableStateConfig};
///
/// let config: TableStateConfig = serde_json::from_str(
/// 	r#"{"enabled": true, "default_page_size": 50, "default_sort_by": "updatedAt", "default_sort_order": "desc"}"#,
/// )
/// .unwrap();
///
/// assert!(config.enabled);
/// assert_eq!(config.default_page_size, 50);
/// assert_eq!(config.default_sort_order, SortOrder::Desc);
/// assert_eq!(config.default_prefilter, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableStateConfig {
	/// Mirror state into the persisted storage (query string)
	pub enabled: bool,
	/// Prefilter selected when nothing is persisted
	pub default_prefilter: Option<String>,
	/// Page size used when nothing is persisted; must be positive
	pub default_page_size: usize,
	/// Column sorted by default
	pub default_sort_by: Option<String>,
	/// Direction of the default sort
	pub default_sort_order: SortOrder,
}

impl Default for TableStateConfig {
	fn default() -> Self {
		Self {
			enabled: false,
			default_prefilter: None,
			default_page_size: DEFAULT_PAGE_SIZE,
			default_sort_by: None,
			default_sort_order: SortOrder::Asc,
		}
	}
}

impl TableStateConfig {
	/// Creates a configuration with in-memory state only
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets whether state is persisted
	pub fn enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;
		self
	}

	/// Sets the default prefilter
	pub fn default_prefilter(mut self, prefilter: impl Into<String>) -> Self {
		self.default_prefilter = Some(prefilter.into());
		self
	}

	/// Sets the default page size
	pub fn default_page_size(mut self, page_size: usize) -> Self {
		self.default_page_size = page_size;
		self
	}

	/// Sets the default sort column and direction
	pub fn default_sort(mut self, column: impl Into<String>, order: SortOrder) -> Self {
		self.default_sort_by = Some(column.into());
		self.default_sort_order = order;
		self
	}
}
