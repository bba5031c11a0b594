//! Declarative column filters and their dropdown behaviour

use serde::{Deserialize, Serialize};
use snow_table_state::ColumnFilters;

/// One selectable value in a column filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
	/// Text shown in the dropdown
	pub label: String,
	/// Value stored in the filter state
	pub value: String,
}

impl FilterOption {
	/// Creates an option
	pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			value: value.into(),
		}
	}
}

/// Filter dropdown attached to the column with the same key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
	/// Column key
	pub key: String,
	/// Dropdown label
	pub label: String,
	/// Selectable values
	pub options: Vec<FilterOption>,
	/// Allow selecting several values at once
	#[serde(default)]
	pub multiple_selection: bool,
}

impl FilterConfig {
	/// Single-selection filter for column `key`
	pub fn new(key: impl Into<String>, label: impl Into<String>, options: Vec<FilterOption>) -> Self {
		Self {
			key: key.into(),
			label: label.into(),
			options,
			multiple_selection: false,
		}
	}

	/// Sets whether several values can be selected
	pub fn multiple_selection(mut self, multiple: bool) -> Self {
		self.multiple_selection = multiple;
		self
	}

	/// Selection after the user clicks `value`
	///
	/// Multi-select filters add or remove the value. Single-select filters
	/// replace the selection, or clear it when the value was already selected.
	///
	/// ```
	/// use snow_table_grid::{FilterConfig, FilterOption};
	///
	/// let status = FilterConfig::new("status", "Status", vec![
	/// 	FilterOption::new("Open", "OPEN"),
	/// 	FilterOption::new("Closed", "CLOSED"),
	/// ]);
	///
	/// assert_eq!(status.toggle(&["OPEN".to_string()], "CLOSED"), vec!["CLOSED"]);
	/// assert!(status.toggle(&["OPEN".to_string()], "OPEN").is_empty());
	/// ```
	pub fn toggle(&self, selected: &[String], value: &str) -> Vec<String> {
		let is_selected = selected.iter().any(|v| v == value);
		match (self.multiple_selection, is_selected) {
			(true, true) => selected.iter().filter(|v| *v != value).cloned().collect(),
			(true, false) => {
				let mut next = selected.to_vec();
				next.push(value.to_string());
				next
			}
			(false, true) => Vec::new(),
			(false, false) => vec![value.to_string()],
		}
	}

	/// Options whose label or value contains `term`, ignoring case
	pub fn search_options(&self, term: &str) -> Vec<&FilterOption> {
		let term = term.to_lowercase();
		self.options
			.iter()
			.filter(|option| {
				term.is_empty()
					|| option.label.to_lowercase().contains(&term)
					|| option.value.to_lowercase().contains(&term)
			})
			.collect()
	}

	/// Labels of the selected values, skipping values with no option
	pub fn selected_labels(&self, selected: &[String]) -> Vec<&str> {
		selected
			.iter()
			.filter_map(|value| {
				self.options
					.iter()
					.find(|option| option.value == *value)
					.map(|option| option.label.as_str())
			})
			.collect()
	}
}

/// Column filters after the dropdown for `key` reported `values`
///
/// An empty selection removes the key.
pub fn apply_filter_change(filters: &ColumnFilters, key: &str, values: Vec<String>) -> ColumnFilters {
	let mut next = filters.clone();
	if values.is_empty() {
		next.shift_remove(key);
	} else {
		next.insert(key.to_string(), values);
	}
	next
}

/// Multi-select predicate: the cell's text is one of the selected values
pub fn multi_select_matches(cell_text: &str, selected: &[String]) -> bool {
	selected.is_empty() || selected.iter().any(|value| value == cell_text)
}
