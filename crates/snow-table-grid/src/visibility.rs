//! User-controlled column visibility
//!
//! The visibility map is saved as JSON in a [`StateStorage`] under
//! `datatable-config-<id>`, so each table remembers which optional columns
//! the user turned on or off.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use snow_table_state::StateStorage;

use crate::column::ColumnDef;
use crate::error::{GridError, Result};

/// Storage key prefix for saved visibility maps
pub const COLUMN_CONFIG_PREFIX: &str = "datatable-config-";

/// A column the user may show or hide
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurableColumn {
	/// Column id
	pub id: String,
	/// Header shown in the configuration menu
	pub header: String,
	/// Hidden when no configuration is saved
	pub default_hidden: bool,
}

/// Columns listed in the configuration menu: a non-blank header and hiding
/// enabled
pub fn configurable_columns<T>(columns: &[ColumnDef<T>]) -> Vec<ConfigurableColumn> {
	columns
		.iter()
		.filter(|column| column.enable_hiding && !column.header.trim().is_empty())
		.map(|column| ConfigurableColumn {
			id: column.id.clone(),
			header: column.header.clone(),
			default_hidden: column.meta.default_hidden,
		})
		.collect()
}

/// Saved per-table column visibility
pub struct ColumnVisibility {
	config_id: String,
	storage: Rc<dyn StateStorage>,
	columns: Vec<ConfigurableColumn>,
	visibility: IndexMap<String, bool>,
}

impl ColumnVisibility {
	/// Loads the saved map for `config_id`
	///
	/// A map that fails to parse or names an unknown column is deleted and
	/// the defaults apply.
	pub fn load<T>(
		config_id: impl Into<String>,
		columns: &[ColumnDef<T>],
		storage: Rc<dyn StateStorage>,
	) -> Self {
		let mut this = Self {
			config_id: config_id.into(),
			storage,
			columns: configurable_columns(columns),
			visibility: IndexMap::new(),
		};
		this.visibility = this.defaults();

		let key = this.storage_key();
		let Some(raw) = this.storage.read(&key) else {
			return this;
		};

		match serde_json::from_str::<IndexMap<String, bool>>(&raw) {
			Ok(saved) if saved.keys().all(|id| this.column(id).is_some()) => {
				this.visibility.extend(saved);
			}
			Ok(_) => {
				tracing::warn!(%key, "saved column configuration names unknown columns; discarding");
				this.storage.write(&key, None);
			}
			Err(err) => {
				tracing::warn!(%key, %err, "unreadable column configuration; discarding");
				this.storage.write(&key, None);
			}
		}

		this
	}

	fn column(&self, id: &str) -> Option<&ConfigurableColumn> {
		self.columns.iter().find(|column| column.id == id)
	}

	fn defaults(&self) -> IndexMap<String, bool> {
		self.columns
			.iter()
			.map(|column| (column.id.clone(), !column.default_hidden))
			.collect()
	}

	fn save(&self) {
		let key = self.storage_key();
		match serde_json::to_string(&self.visibility) {
			Ok(json) => self.storage.write(&key, Some(&json)),
			Err(err) => tracing::warn!(%key, %err, "failed to save column configuration"),
		}
	}

	/// Storage key of this table's configuration
	pub fn storage_key(&self) -> String {
		format!("{COLUMN_CONFIG_PREFIX}{}", self.config_id)
	}

	/// Columns listed in the configuration menu
	pub fn columns(&self) -> &[ConfigurableColumn] {
		&self.columns
	}

	/// Whether column `id` is shown; columns outside the menu always are
	pub fn is_visible(&self, id: &str) -> bool {
		self.visibility.get(id).copied().unwrap_or(true)
	}

	/// Visibility of every configurable column
	pub fn visibility(&self) -> &IndexMap<String, bool> {
		&self.visibility
	}

	/// Shows or hides a column and saves the full map
	pub fn set_visible(&mut self, id: &str, visible: bool) -> Result<()> {
		if self.column(id).is_none() {
			return Err(GridError::UnknownColumn(id.to_string()));
		}
		self.visibility.insert(id.to_string(), visible);
		self.save();
		Ok(())
	}

	/// Restores and saves the defaults
	pub fn reset(&mut self) {
		self.visibility = self.defaults();
		self.save();
	}
}

impl fmt::Debug for ColumnVisibility {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ColumnVisibility")
			.field("config_id", &self.config_id)
			.field("visibility", &self.visibility)
			.finish_non_exhaustive()
	}
}
