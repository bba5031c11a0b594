//! Collaborators shared by every table in an application
//!
//! A [`TableContext`] bundles translation, confirmation and link resolution.
//! Build it once at the application root and clone it into each table.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Translates UI keys such as `dataTable.search` or `data.<column>`
pub trait Translate: Send + Sync {
	/// Returns the translation, or `key` itself when unknown
	fn translate(&self, key: &str) -> String;
}

impl<F> Translate for F
where
	F: Fn(&str) -> String + Send + Sync,
{
	fn translate(&self, key: &str) -> String {
		self(key)
	}
}

/// Translator that echoes every key
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoTranslator;

impl Translate for EchoTranslator {
	fn translate(&self, key: &str) -> String {
		key.to_string()
	}
}

/// Built-in English text for the table's own UI strings
pub fn english_fallback(key: &str) -> Option<&'static str> {
	Some(match key {
		"dataTable.search" => "Search",
		"dataTable.searchEmpty" => "No results found",
		"dataTable.elements" => "items",
		"dataTable.resetFilters" => "Reset filters",
		"dataTable.selectFilter" => "Select a filter",
		"dataTable.searchFilters" => "Search...",
		"dataTable.columnsConfiguration" => "Columns",
		"dataTable.resetColumns" => "Reset columns",
		"dataTable.paginationSize" => "per page",
		_ => return None,
	})
}

/// Dialog shown before a guarded action runs
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfirmOptions {
	/// Dialog title
	pub title: String,
	/// Secondary line under the title
	pub subtitle: Option<String>,
	/// Body text
	pub content: String,
	/// Confirm button text
	pub confirm_text: Option<String>,
	/// Cancel button text
	pub cancel_text: Option<String>,
	/// Hide the default buttons
	pub hide_buttons: bool,
}

impl ConfirmOptions {
	/// Dialog with a title only
	pub fn new(title: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			..Self::default()
		}
	}

	/// Sets the subtitle
	pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
		self.subtitle = Some(subtitle.into());
		self
	}

	/// Sets the body text
	pub fn content(mut self, content: impl Into<String>) -> Self {
		self.content = content.into();
		self
	}

	/// Sets the confirm button text
	pub fn confirm_text(mut self, text: impl Into<String>) -> Self {
		self.confirm_text = Some(text.into());
		self
	}

	/// Sets the cancel button text
	pub fn cancel_text(mut self, text: impl Into<String>) -> Self {
		self.cancel_text = Some(text.into());
		self
	}

	/// Hides the default buttons
	pub fn hide_buttons(mut self, hide: bool) -> Self {
		self.hide_buttons = hide;
		self
	}
}

/// Asks the user to confirm an action
///
/// Dismissing the dialog must resolve to `false`.
#[async_trait(?Send)]
pub trait Confirm {
	/// Resolves to `true` when the user confirmed
	async fn confirm(&self, options: ConfirmOptions) -> bool;
}

/// Confirmation that always accepts
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

#[async_trait(?Send)]
impl Confirm for AlwaysConfirm {
	async fn confirm(&self, _options: ConfirmOptions) -> bool {
		true
	}
}

/// Maps an action's href to the URL actually navigated to
pub trait LinkResolver: Send + Sync {
	/// Resolves `href`
	fn resolve(&self, href: &str) -> String;
}

/// Link resolver returning hrefs unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainLinks;

impl LinkResolver for PlainLinks {
	fn resolve(&self, href: &str) -> String {
		href.to_string()
	}
}

/// Link resolver prefixing relative hrefs with a base path
#[derive(Debug, Clone)]
pub struct BasePathLinks {
	base: String,
}

impl BasePathLinks {
	/// Creates a resolver for `base` (e.g. `/admin`)
	pub fn new(base: impl Into<String>) -> Self {
		Self {
			base: base.into().trim_end_matches('/').to_string(),
		}
	}
}

impl LinkResolver for BasePathLinks {
	fn resolve(&self, href: &str) -> String {
		if href.starts_with('/') {
			format!("{}{href}", self.base)
		} else {
			href.to_string()
		}
	}
}

/// Collaborators handed to every table
#[derive(Clone)]
pub struct TableContext {
	translator: Arc<dyn Translate>,
	confirm: Rc<dyn Confirm>,
	links: Arc<dyn LinkResolver>,
}

impl Default for TableContext {
	fn default() -> Self {
		Self {
			translator: Arc::new(EchoTranslator),
			confirm: Rc::new(AlwaysConfirm),
			links: Arc::new(PlainLinks),
		}
	}
}

impl TableContext {
	/// Context with echoing translation, auto-accepted confirmation and
	/// unchanged links
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the translator
	pub fn with_translator(mut self, translator: impl Translate + 'static) -> Self {
		self.translator = Arc::new(translator);
		self
	}

	/// Sets the confirmation dialog
	pub fn with_confirm(mut self, confirm: impl Confirm + 'static) -> Self {
		self.confirm = Rc::new(confirm);
		self
	}

	/// Sets the link resolver
	pub fn with_links(mut self, links: impl LinkResolver + 'static) -> Self {
		self.links = Arc::new(links);
		self
	}

	/// Translates `key`, using the built-in English text when the translator
	/// echoes a known key
	pub fn t(&self, key: &str) -> String {
		let translated = self.translator.translate(key);
		if translated == key {
			if let Some(fallback) = english_fallback(key) {
				return fallback.to_string();
			}
		}
		translated
	}

	/// Shows the confirmation dialog
	pub async fn confirm(&self, options: ConfirmOptions) -> bool {
		self.confirm.confirm(options).await
	}

	/// Resolves a link href
	pub fn resolve_link(&self, href: &str) -> String {
		self.links.resolve(href)
	}
}

impl fmt::Debug for TableContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TableContext").finish_non_exhaustive()
	}
}
