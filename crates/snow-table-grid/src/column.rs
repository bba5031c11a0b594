//! Column configuration and projection
//!
//! Applications describe columns with [`ColumnConfig`]. [`project_columns`]
//! turns that list into [`ColumnDef`]s: hidden columns are dropped, headers
//! are translated, filterability follows the configured filters and a
//! trailing `actions` column is appended when the table has row actions.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::TableContext;
use crate::filter::FilterConfig;
use crate::value::{field, print_value};

/// Id of the synthetic row-actions column
pub const ACTIONS_COLUMN_ID: &str = "actions";

/// Layout hints attached to a column
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnMeta {
	/// CSS width (`"200px"`, `"20%"`, `"auto"`)
	pub width: Option<String>,
	/// CSS minimum width
	pub min_width: Option<String>,
	/// CSS maximum width
	pub max_width: Option<String>,
	/// Hidden until the user enables it in the column configuration
	pub default_hidden: bool,
	/// Clicking this column's cells does not trigger the row click
	pub disable_column_click: bool,
	/// Center the cell content
	pub center: bool,
}

impl ColumnMeta {
	/// Sets the width
	pub fn width(mut self, width: impl Into<String>) -> Self {
		self.width = Some(width.into());
		self
	}

	/// Sets whether the column starts hidden
	pub fn default_hidden(mut self, hidden: bool) -> Self {
		self.default_hidden = hidden;
		self
	}

	/// Sets whether content is centered
	pub fn center(mut self, center: bool) -> Self {
		self.center = center;
		self
	}
}

type RowText<T> = Rc<dyn Fn(&T) -> String>;

/// Which engine computes search, filtering, sorting and pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableMode {
	/// All rows are in memory
	Client,
	/// A remote endpoint computes everything
	Server,
}

/// Declarative description of one column
pub struct ColumnConfig<T> {
	key: String,
	label: Option<String>,
	hidden: bool,
	sortable: Option<bool>,
	render: Option<RowText<T>>,
	searchable_value: Option<RowText<T>>,
	meta: ColumnMeta,
}

impl<T> ColumnConfig<T> {
	/// Column reading field `key` of the serialized row
	pub fn new(key: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			label: None,
			hidden: false,
			sortable: None,
			render: None,
			searchable_value: None,
			meta: ColumnMeta::default(),
		}
	}

	/// Sets the header text; without it the header is `t("data.<key>")`
	pub fn label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Drops the column entirely
	pub fn hidden(mut self, hidden: bool) -> Self {
		self.hidden = hidden;
		self
	}

	/// Sets whether the column is sortable (default: true)
	pub fn sortable(mut self, sortable: bool) -> Self {
		self.sortable = Some(sortable);
		self
	}

	/// Custom cell text
	pub fn render(mut self, render: impl Fn(&T) -> String + 'static) -> Self {
		self.render = Some(Rc::new(render));
		self
	}

	/// Value used for search, filtering and sorting instead of the raw field
	pub fn searchable_value(mut self, value: impl Fn(&T) -> String + 'static) -> Self {
		self.searchable_value = Some(Rc::new(value));
		self
	}

	/// Sets layout hints
	pub fn meta(mut self, meta: ColumnMeta) -> Self {
		self.meta = meta;
		self
	}

	/// Column key
	pub fn key(&self) -> &str {
		&self.key
	}
}

impl<T> Clone for ColumnConfig<T> {
	fn clone(&self) -> Self {
		Self {
			key: self.key.clone(),
			label: self.label.clone(),
			hidden: self.hidden,
			sortable: self.sortable,
			render: self.render.clone(),
			searchable_value: self.searchable_value.clone(),
			meta: self.meta.clone(),
		}
	}
}

impl<T> fmt::Debug for ColumnConfig<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ColumnConfig")
			.field("key", &self.key)
			.field("label", &self.label)
			.field("hidden", &self.hidden)
			.field("sortable", &self.sortable)
			.field("meta", &self.meta)
			.finish_non_exhaustive()
	}
}

/// How a column reads its value from a row
pub enum Accessor<T> {
	/// Field of the serialized row
	Field(String),
	/// Computed text
	Computed(RowText<T>),
	/// The synthetic actions column has no value
	None,
}

impl<T> Clone for Accessor<T> {
	fn clone(&self) -> Self {
		match self {
			Self::Field(key) => Self::Field(key.clone()),
			Self::Computed(f) => Self::Computed(f.clone()),
			Self::None => Self::None,
		}
	}
}

/// Column definition consumed by the row model and the views
pub struct ColumnDef<T> {
	/// Column id (the configured key, or `actions`)
	pub id: String,
	/// Header text, empty for the actions column
	pub header: String,
	/// Value accessor
	pub accessor: Accessor<T>,
	/// Custom cell text
	pub render: Option<RowText<T>>,
	/// Sortable by the user
	pub enable_sorting: bool,
	/// Can be hidden from the column configuration
	pub enable_hiding: bool,
	/// A filter dropdown targets this column
	pub enable_column_filter: bool,
	/// Included in the global search
	pub enable_global_filter: bool,
	/// Layout hints
	pub meta: ColumnMeta,
}

impl<T> ColumnDef<T> {
	/// Whether this is the synthetic actions column
	pub fn is_actions(&self) -> bool {
		matches!(self.accessor, Accessor::None) && self.id == ACTIONS_COLUMN_ID
	}

	/// Value used for search, filtering and sorting
	///
	/// `serialized` is the row as produced by [`crate::value::row_value`].
	pub fn value(&self, row: &T, serialized: &Value) -> Option<Value> {
		match &self.accessor {
			Accessor::Field(key) => field(serialized, key).cloned(),
			Accessor::Computed(f) => Some(Value::String(f(row))),
			Accessor::None => None,
		}
	}

	/// Text of [`ColumnDef::value`]
	pub fn value_text(&self, row: &T, serialized: &Value) -> String {
		print_value(self.value(row, serialized).as_ref())
	}

	/// Text shown in the cell
	///
	/// Uses the custom renderer when set, otherwise prints the raw field.
	pub fn cell_text(&self, row: &T, serialized: &Value) -> String {
		if let Some(render) = &self.render {
			return render(row);
		}
		if self.is_actions() {
			return String::new();
		}
		print_value(field(serialized, &self.id))
	}
}

impl<T> Clone for ColumnDef<T> {
	fn clone(&self) -> Self {
		Self {
			id: self.id.clone(),
			header: self.header.clone(),
			accessor: self.accessor.clone(),
			render: self.render.clone(),
			enable_sorting: self.enable_sorting,
			enable_hiding: self.enable_hiding,
			enable_column_filter: self.enable_column_filter,
			enable_global_filter: self.enable_global_filter,
			meta: self.meta.clone(),
		}
	}
}

impl<T> fmt::Debug for ColumnDef<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ColumnDef")
			.field("id", &self.id)
			.field("header", &self.header)
			.field("enable_sorting", &self.enable_sorting)
			.field("enable_hiding", &self.enable_hiding)
			.field("enable_column_filter", &self.enable_column_filter)
			.field("enable_global_filter", &self.enable_global_filter)
			.field("meta", &self.meta)
			.finish_non_exhaustive()
	}
}

/// Builds column definitions from the declarative configuration
///
/// `has_actions` appends the trailing actions column: empty header, not
/// sortable, not hideable, width `auto`.
///
/// ```
/// use snow_table_grid::{ColumnConfig, TableContext, TableMode, project_columns};
///
/// # struct Travel;
/// let columns = project_columns::<Travel>(
/// 	&[ColumnConfig::new("name"), ColumnConfig::new("secret").hidden(true)],
/// 	&[],
/// 	true,
/// 	TableMode::Client,
/// 	&TableContext::new(),
/// );
///
/// let ids: Vec<&str> = columns.iter().map(|c| c.id.as_str()).collect();
/// assert_eq!(ids, ["name", "actions"]);
/// assert_eq!(columns[0].header, "data.name");
/// ```
pub fn project_columns<T>(
	configs: &[ColumnConfig<T>],
	filters: &[FilterConfig],
	has_actions: bool,
	mode: TableMode,
	ctx: &TableContext,
) -> Vec<ColumnDef<T>> {
	let mut columns: Vec<ColumnDef<T>> = configs
		.iter()
		.filter(|config| !config.hidden)
		.map(|config| ColumnDef {
			id: config.key.clone(),
			header: config
				.label
				.clone()
				.unwrap_or_else(|| ctx.t(&format!("data.{}", config.key))),
			accessor: match &config.searchable_value {
				Some(f) => Accessor::Computed(f.clone()),
				None => Accessor::Field(config.key.clone()),
			},
			render: config.render.clone(),
			enable_sorting: config.sortable.unwrap_or(true),
			enable_hiding: true,
			enable_column_filter: filters.iter().any(|filter| filter.key == config.key),
			enable_global_filter: mode == TableMode::Client,
			meta: config.meta.clone(),
		})
		.collect();

	if has_actions {
		columns.push(ColumnDef {
			id: ACTIONS_COLUMN_ID.to_string(),
			header: String::new(),
			accessor: Accessor::None,
			render: None,
			enable_sorting: false,
			enable_hiding: false,
			enable_column_filter: false,
			enable_global_filter: false,
			meta: ColumnMeta::default().width("auto"),
		});
	}

	columns
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::filter::FilterOption;
	use crate::value::row_value;
	use rstest::*;
	use serde::Serialize;

	#[derive(Serialize)]
	struct Travel {
		id: u32,
		name: String,
		status: String,
	}

	#[fixture]
	fn travel() -> Travel {
		Travel {
			id: 1,
			name: "Lisbon".into(),
			status: "OPEN".into(),
		}
	}

	#[fixture]
	fn configs() -> Vec<ColumnConfig<Travel>> {
		vec![
			ColumnConfig::new("id").label("#").sortable(false),
			ColumnConfig::new("name").searchable_value(|t: &Travel| t.name.to_uppercase()),
			ColumnConfig::new("status").render(|t: &Travel| format!("[{}]", t.status)),
			ColumnConfig::new("internal").hidden(true),
		]
	}

	#[rstest]
	fn test_hidden_columns_are_dropped(configs: Vec<ColumnConfig<Travel>>) {
		let columns = project_columns(&configs, &[], false, TableMode::Client, &TableContext::new());

		let ids: Vec<&str> = columns.iter().map(|c| c.id.as_str()).collect();
		assert_eq!(ids, ["id", "name", "status"]);
	}

	#[rstest]
	fn test_headers_and_sorting(configs: Vec<ColumnConfig<Travel>>) {
		let ctx = TableContext::new().with_translator(|key: &str| match key {
			"data.name" => "Name".to_string(),
			other => other.to_string(),
		});
		let columns = project_columns(&configs, &[], false, TableMode::Client, &ctx);

		assert_eq!(columns[0].header, "#");
		assert!(!columns[0].enable_sorting);
		assert_eq!(columns[1].header, "Name");
		assert!(columns[1].enable_sorting);
		assert_eq!(columns[2].header, "data.status");
	}

	#[rstest]
	#[case(TableMode::Client, true)]
	#[case(TableMode::Server, false)]
	fn test_global_filter_follows_mode(
		configs: Vec<ColumnConfig<Travel>>,
		#[case] mode: TableMode,
		#[case] expected: bool,
	) {
		let columns = project_columns(&configs, &[], false, mode, &TableContext::new());
		assert!(columns.iter().all(|c| c.enable_global_filter == expected));
	}

	#[rstest]
	fn test_filterable_iff_filter_shares_key(configs: Vec<ColumnConfig<Travel>>) {
		let filters = [FilterConfig::new(
			"status",
			"Status",
			vec![FilterOption::new("Open", "OPEN")],
		)];
		let columns = project_columns(&configs, &filters, false, TableMode::Server, &TableContext::new());

		let filterable: Vec<&str> = columns
			.iter()
			.filter(|c| c.enable_column_filter)
			.map(|c| c.id.as_str())
			.collect();
		assert_eq!(filterable, ["status"]);
	}

	#[rstest]
	fn test_actions_column(configs: Vec<ColumnConfig<Travel>>, travel: Travel) {
		let columns = project_columns(&configs, &[], true, TableMode::Client, &TableContext::new());
		let actions = columns.last().unwrap();

		assert!(actions.is_actions());
		assert_eq!(actions.header, "");
		assert!(!actions.enable_sorting);
		assert!(!actions.enable_hiding);
		assert_eq!(actions.meta.width.as_deref(), Some("auto"));
		assert_eq!(actions.cell_text(&travel, &row_value(&travel).unwrap()), "");
	}

	#[rstest]
	fn test_accessor_and_cell_text(configs: Vec<ColumnConfig<Travel>>, travel: Travel) {
		let columns = project_columns(&configs, &[], false, TableMode::Client, &TableContext::new());
		let serialized = row_value(&travel).unwrap();

		assert_eq!(columns[0].value_text(&travel, &serialized), "1");
		assert_eq!(columns[1].value_text(&travel, &serialized), "LISBON");
		assert_eq!(columns[1].cell_text(&travel, &serialized), "Lisbon");
		assert_eq!(columns[2].value_text(&travel, &serialized), "OPEN");
		assert_eq!(columns[2].cell_text(&travel, &serialized), "[OPEN]");
	}

	#[rstest]
	fn test_meta_deserializes_camel_case() {
		let meta: ColumnMeta =
			serde_json::from_str(r#"{"width": "120px", "defaultHidden": true}"#).unwrap();

		assert_eq!(meta.width.as_deref(), Some("120px"));
		assert!(meta.default_hidden);
		assert!(!meta.center);
	}
}
