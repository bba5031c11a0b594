//! Presentation switches shared by both table flavors

use serde::{Deserialize, Serialize};

/// Page sizes offered when none are configured
pub const DEFAULT_PAGE_SIZES: [usize; 3] = [25, 50, 100];

/// Caller-provided texts overriding the translated defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataTableTexts {
	/// Search input placeholder
	pub search_placeholder: Option<String>,
	/// Text shown when there are no rows
	pub empty_title: Option<String>,
}

/// Which table features are switched on
///
/// Deserializes from camelCase settings with every field optional:
///
/// ```
/// use snow_table_views::DataTableOptions;
///
/// let options: DataTableOptions =
/// 	serde_json::from_str(r#"{ "enableGlobalSearch": true, "paginationSizes": [10, 20] }"#).unwrap();
///
/// assert!(options.enable_global_search);
/// assert!(options.enable_sorting);
/// assert_eq!(options.pagination_sizes, [10, 20]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataTableOptions {
	/// Show the search input and apply the global search
	pub enable_global_search: bool,
	/// Allow sorting by clicking headers
	pub enable_sorting: bool,
	/// Split rows into pages
	pub enable_pagination: bool,
	/// Offer the column visibility menu
	pub enable_column_configuration: bool,
	/// Show the total item count
	pub display_total_number: bool,
	/// Choices of the page size selector
	pub pagination_sizes: Vec<usize>,
	/// Text overrides
	pub texts: DataTableTexts,
}

impl Default for DataTableOptions {
	fn default() -> Self {
		Self {
			enable_global_search: false,
			enable_sorting: true,
			enable_pagination: true,
			enable_column_configuration: false,
			display_total_number: true,
			pagination_sizes: DEFAULT_PAGE_SIZES.to_vec(),
			texts: DataTableTexts::default(),
		}
	}
}

impl DataTableOptions {
	/// Sets `enable_global_search`
	pub fn enable_global_search(mut self, enable: bool) -> Self {
		self.enable_global_search = enable;
		self
	}

	/// Sets `enable_sorting`
	pub fn enable_sorting(mut self, enable: bool) -> Self {
		self.enable_sorting = enable;
		self
	}

	/// Sets `enable_pagination`
	pub fn enable_pagination(mut self, enable: bool) -> Self {
		self.enable_pagination = enable;
		self
	}

	/// Sets `enable_column_configuration`
	pub fn enable_column_configuration(mut self, enable: bool) -> Self {
		self.enable_column_configuration = enable;
		self
	}

	/// Sets `display_total_number`
	pub fn display_total_number(mut self, display: bool) -> Self {
		self.display_total_number = display;
		self
	}

	/// Sets the page size choices
	pub fn pagination_sizes(mut self, sizes: impl Into<Vec<usize>>) -> Self {
		self.pagination_sizes = sizes.into();
		self
	}

	/// Sets the search placeholder
	pub fn search_placeholder(mut self, text: impl Into<String>) -> Self {
		self.texts.search_placeholder = Some(text.into());
		self
	}

	/// Sets the empty-state text
	pub fn empty_title(mut self, text: impl Into<String>) -> Self {
		self.texts.empty_title = Some(text.into());
		self
	}
}
