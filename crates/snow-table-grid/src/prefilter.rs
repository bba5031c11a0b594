//! Prefilters: mutually exclusive quick segments shown above the table

use serde::{Deserialize, Serialize};

use crate::context::TableContext;

/// Largest prefilter count still rendered as tabs
pub const MAX_PREFILTER_TABS: usize = 4;

/// One quick segment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Prefilter {
	/// Id stored in the table state
	pub id: String,
	/// Tab text
	pub label: String,
}

impl Prefilter {
	/// Creates a prefilter
	pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
		}
	}
}

/// Widget used to pick a prefilter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefilterPresentation {
	/// A row of tabs
	Tabs,
	/// A select box
	Select,
}

/// Presentation state of the prefilter selector
#[derive(Debug, Clone, Copy)]
pub struct PrefilterTabs<'a> {
	prefilters: &'a [Prefilter],
	active: Option<&'a str>,
}

impl<'a> PrefilterTabs<'a> {
	/// Selector over `prefilters` with `active` selected
	pub fn new(prefilters: &'a [Prefilter], active: Option<&'a str>) -> Self {
		Self { prefilters, active }
	}

	/// Tabs up to [`MAX_PREFILTER_TABS`] prefilters, a select box beyond
	pub fn presentation_for(count: usize) -> PrefilterPresentation {
		if count > MAX_PREFILTER_TABS {
			PrefilterPresentation::Select
		} else {
			PrefilterPresentation::Tabs
		}
	}

	/// Presentation for this selector
	pub fn presentation(&self) -> PrefilterPresentation {
		Self::presentation_for(self.prefilters.len())
	}

	/// Id of the first prefilter, the implicit default
	pub fn default_id(&self) -> Option<&'a str> {
		self.prefilters.first().map(|p| p.id.as_str())
	}

	/// Whether a prefilter other than the first one is selected
	pub fn is_non_default(&self) -> bool {
		self.default_id().is_some() && self.active != self.default_id()
	}

	/// The selected prefilter
	pub fn active(&self) -> Option<&'a Prefilter> {
		let active = self.active?;
		self.prefilters.iter().find(|p| p.id == active)
	}

	/// Text of the select box trigger
	pub fn active_label(&self, ctx: &TableContext) -> String {
		self.active()
			.map(|p| p.label.clone())
			.unwrap_or_else(|| ctx.t("dataTable.selectFilter"))
	}
}
