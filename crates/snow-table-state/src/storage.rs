//! Persisted-field storage
//!
//! [`StateStorage`] is a string key/value store with read, write and delete.
//! The table state store only talks to this trait, so the query string can be
//! swapped for any other backend.
//!
//! [`QueryStringStorage`] is the default backend: it keeps each value in a
//! query parameter of the current page URL and updates the URL with a
//! history-replace call (no navigation, no new history entry). Writes that
//! would not change the URL are skipped.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use url::Url;

/// Query key holding the active prefilter
pub const STORAGE_KEY_PREFILTER: &str = "dt_prefilter";
/// Query key holding the search term
pub const STORAGE_KEY_SEARCH: &str = "dt_search";
/// Query key holding the 1-based page number
pub const STORAGE_KEY_PAGE: &str = "dt_page";
/// Query key holding the page size
pub const STORAGE_KEY_PAGE_SIZE: &str = "dt_pageSize";
/// Query key holding the encoded column filters
pub const STORAGE_KEY_FILTERS: &str = "dt_filters";
/// Query key holding the sorted column
pub const STORAGE_KEY_SORT_BY: &str = "dt_sortBy";
/// Query key holding the sort direction
pub const STORAGE_KEY_SORT_DESC: &str = "dt_sortDesc";

/// External string key/value store
///
/// Implementations never fail: anything that goes wrong reads as "no value"
/// and writes are silently skipped.
pub trait StateStorage {
	/// Returns the stored value for `key`
	fn read(&self, key: &str) -> Option<String>;

	/// Stores `value` under `key`; `None` deletes the key
	fn write(&self, key: &str, value: Option<&str>);

	/// Deletes `key`
	fn delete(&self, key: &str) {
		self.write(key, None);
	}
}

impl<S: StateStorage + ?Sized> StateStorage for Rc<S> {
	fn read(&self, key: &str) -> Option<String> {
		(**self).read(key)
	}

	fn write(&self, key: &str, value: Option<&str>) {
		(**self).write(key, value);
	}
}

/// Access to the current page location and history
pub trait History {
	/// Full URL of the current page, `None` outside a page context
	fn href(&self) -> Option<String>;

	/// Replaces the current history entry's URL without navigating
	///
	/// Any state object attached to the entry must be kept.
	fn replace_url(&self, url: &str);
}

/// The browser's `window.location` and `window.history`
///
/// Outside WASM there is no page context: reads return `None` and writes
/// are no-ops.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserHistory;

#[cfg(target_arch = "wasm32")]
impl History for BrowserHistory {
	fn href(&self) -> Option<String> {
		web_sys::window()?.location().href().ok()
	}

	fn replace_url(&self, url: &str) {
		let Some(window) = web_sys::window() else {
			return;
		};
		let history = match window.history() {
			Ok(history) => history,
			Err(err) => {
				tracing::warn!(?err, "history API unavailable; skipping URL update");
				return;
			}
		};
		let state = history.state().unwrap_or(wasm_bindgen::JsValue::NULL);
		if let Err(err) = history.replace_state_with_url(&state, "", Some(url)) {
			tracing::warn!(?err, url, "history.replaceState failed");
		}
	}
}

#[cfg(not(target_arch = "wasm32"))]
impl History for BrowserHistory {
	fn href(&self) -> Option<String> {
		None
	}

	fn replace_url(&self, _url: &str) {}
}

/// In-process history for server-side rendering and tests
///
/// Clones share the same location, so a test can keep one handle while the
/// store owns another.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
	href: Rc<RefCell<String>>,
	replace_count: Rc<Cell<usize>>,
}

impl MemoryHistory {
	/// Starts at `href`
	pub fn new(href: impl Into<String>) -> Self {
		Self {
			href: Rc::new(RefCell::new(href.into())),
			replace_count: Rc::new(Cell::new(0)),
		}
	}

	/// Current URL
	pub fn current_url(&self) -> String {
		self.href.borrow().clone()
	}

	/// Number of history-replace calls made so far
	pub fn replace_count(&self) -> usize {
		self.replace_count.get()
	}

	/// First value of query parameter `key` in the current URL
	pub fn query_value(&self, key: &str) -> Option<String> {
		let url = Url::parse(&self.href.borrow()).ok()?;
		first_value(&url, key)
	}
}

impl History for MemoryHistory {
	fn href(&self) -> Option<String> {
		Some(self.current_url())
	}

	fn replace_url(&self, url: &str) {
		*self.href.borrow_mut() = url.to_owned();
		self.replace_count.set(self.replace_count.get() + 1);
	}
}

fn first_value(url: &Url, key: &str) -> Option<String> {
	url.query_pairs()
		.find(|(name, _)| name == key)
		.map(|(_, value)| value.into_owned())
}

/// [`StateStorage`] backed by the query string of the current page
#[derive(Debug, Clone, Default)]
pub struct QueryStringStorage<H = BrowserHistory> {
	history: H,
}

impl QueryStringStorage<BrowserHistory> {
	/// Storage over the browser's location
	pub fn browser() -> Self {
		Self::new(BrowserHistory)
	}
}

impl<H: History> QueryStringStorage<H> {
	/// Storage over `history`
	pub fn new(history: H) -> Self {
		Self { history }
	}

	/// The underlying history
	pub fn history(&self) -> &H {
		&self.history
	}

	fn current_url(&self) -> Option<Url> {
		let href = self.history.href()?;
		match Url::parse(&href) {
			Ok(url) => Some(url),
			Err(err) => {
				tracing::debug!(%err, href = %href, "current location is not a valid URL");
				None
			}
		}
	}
}

impl<H: History> StateStorage for QueryStringStorage<H> {
	/// Empty parameters read as absent.
	fn read(&self, key: &str) -> Option<String> {
		let url = self.current_url()?;
		first_value(&url, key).filter(|value| !value.is_empty())
	}

	fn write(&self, key: &str, value: Option<&str>) {
		let Some(mut url) = self.current_url() else {
			return;
		};
		let value = value.filter(|value| !value.is_empty());

		if first_value(&url, key).as_deref() == value {
			tracing::trace!(key, "persisted value unchanged; skipping write");
			return;
		}

		let mut pairs: Vec<(String, String)> = url
			.query_pairs()
			.map(|(name, value)| (name.into_owned(), value.into_owned()))
			.collect();

		match value {
			Some(value) => {
				let mut replaced = false;
				pairs.retain_mut(|(name, existing)| {
					if name != key {
						return true;
					}
					if replaced {
						return false;
					}
					*existing = value.to_owned();
					replaced = true;
					true
				});
				if !replaced {
					pairs.push((key.to_owned(), value.to_owned()));
				}
			}
			None => pairs.retain(|(name, _)| name != key),
		}

		if pairs.is_empty() {
			url.set_query(None);
		} else {
			url.query_pairs_mut().clear().extend_pairs(&pairs);
		}

		tracing::debug!(key, value, "persisting table state");
		self.history.replace_url(url.as_str());
	}
}

/// [`StateStorage`] held in memory
///
/// Used for column-visibility configuration and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
	entries: Rc<RefCell<HashMap<String, String>>>,
	writes: Rc<Cell<usize>>,
}

impl MemoryStorage {
	/// Empty storage
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of entries currently stored
	pub fn len(&self) -> usize {
		self.entries.borrow().len()
	}

	/// Whether nothing is stored
	pub fn is_empty(&self) -> bool {
		self.entries.borrow().is_empty()
	}

	/// Number of writes that changed the stored data
	pub fn write_count(&self) -> usize {
		self.writes.get()
	}
}

impl StateStorage for MemoryStorage {
	fn read(&self, key: &str) -> Option<String> {
		self.entries.borrow().get(key).cloned()
	}

	fn write(&self, key: &str, value: Option<&str>) {
		let mut entries = self.entries.borrow_mut();
		if entries.get(key).map(String::as_str) == value {
			return;
		}
		match value {
			Some(value) => {
				entries.insert(key.to_owned(), value.to_owned());
			}
			None => {
				entries.remove(key);
			}
		}
		self.writes.set(self.writes.get() + 1);
	}
}
