//! Keyed queries over a shared cache
//!
//! A [`Query`] fetches data for a [`QueryKey`], stores the result in its
//! [`QueryClient`] and exposes progress as a reactive [`QueryState`]. Only the
//! most recently started fetch may update the state; earlier ones finishing
//! late are dropped.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use indexmap::IndexMap;
use snow_table_reactive::Signal;

use crate::error::QueryError;
use crate::key::QueryKey;

/// Progress and result of a query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
	/// Last successful result, possibly for an earlier key
	pub data: Option<T>,
	/// Fetching with no data to show yet
	pub is_loading: bool,
	/// A fetch is in flight
	pub is_fetching: bool,
	/// Error of the last finished fetch
	pub error: Option<QueryError>,
}

impl<T> QueryState<T> {
	/// Nothing loaded yet
	pub fn pending() -> Self {
		Self {
			data: None,
			is_loading: true,
			is_fetching: false,
			error: None,
		}
	}

	/// Settled with `data`
	pub fn success(data: T) -> Self {
		Self {
			data: Some(data),
			is_loading: false,
			is_fetching: false,
			error: None,
		}
	}
}

impl<T> Default for QueryState<T> {
	fn default() -> Self {
		Self::pending()
	}
}

/// Query behavior switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
	/// Keep showing the previous key's data while a new key loads
	pub keep_previous_data: bool,
}

impl QueryOptions {
	/// Sets `keep_previous_data`
	pub fn keep_previous_data(mut self, keep: bool) -> Self {
		self.keep_previous_data = keep;
		self
	}
}

/// Entries a [`QueryClient`] keeps by default
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Shared cache of query results
///
/// Clones share the same cache. Once more than `capacity` keys are cached
/// the least recently used entries are dropped.
#[derive(Clone)]
pub struct QueryClient {
	cache: Rc<RefCell<IndexMap<QueryKey, Rc<dyn Any>>>>,
	capacity: usize,
}

impl Default for QueryClient {
	fn default() -> Self {
		Self::with_capacity(DEFAULT_CACHE_CAPACITY)
	}
}

impl QueryClient {
	/// Empty cache holding up to [`DEFAULT_CACHE_CAPACITY`] entries
	pub fn new() -> Self {
		Self::default()
	}

	/// Empty cache holding up to `capacity` entries, at least one
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			cache: Rc::default(),
			capacity: capacity.max(1),
		}
	}

	/// Maximum number of cached entries
	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// Cached value for `key`, if present and of type `T`
	///
	/// A hit marks the entry as most recently used.
	pub fn get<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
		let mut cache = self.cache.borrow_mut();
		let index = cache.get_index_of(key)?;
		let last = cache.len() - 1;
		cache.move_index(index, last);
		cache
			.get_index(last)
			.and_then(|(_, value)| value.downcast_ref::<T>())
			.cloned()
	}

	/// Stores `value` for `key`, evicting the least recently used entries
	/// beyond capacity
	pub fn set<T: 'static>(&self, key: QueryKey, value: T) {
		let mut cache = self.cache.borrow_mut();
		cache.shift_remove(&key);
		cache.insert(key, Rc::new(value));
		while cache.len() > self.capacity {
			if let Some((evicted, _)) = cache.shift_remove_index(0) {
				tracing::debug!(key = %evicted, "evicted cached query");
			}
		}
	}

	/// Whether anything is cached for `key`
	pub fn contains(&self, key: &QueryKey) -> bool {
		self.cache.borrow().contains_key(key)
	}

	/// Drops every entry whose key starts with `prefix`
	///
	/// Returns the number of entries removed.
	pub fn invalidate(&self, prefix: &QueryKey) -> usize {
		let mut cache = self.cache.borrow_mut();
		let before = cache.len();
		cache.retain(|key, _| !key.starts_with(prefix));
		let removed = before - cache.len();
		tracing::debug!(%prefix, removed, "invalidated queries");
		removed
	}

	/// Number of cached entries
	pub fn len(&self) -> usize {
		self.cache.borrow().len()
	}

	/// Whether the cache is empty
	pub fn is_empty(&self) -> bool {
		self.cache.borrow().is_empty()
	}
}

impl fmt::Debug for QueryClient {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("QueryClient")
			.field("entries", &self.len())
			.field("capacity", &self.capacity)
			.finish_non_exhaustive()
	}
}

/// A reactive query bound to one consumer
///
/// ```
/// use snow_table_query::{Query, QueryClient, QueryKey, QueryOptions};
///
/// # futures::executor::block_on(async {
/// let query = Query::new(QueryClient::new(), QueryOptions::default());
/// let state = query
/// 	.fetch(QueryKey::new(["numbers"]), || async { Ok(vec![1, 2, 3]) })
/// 	.await;
///
/// assert_eq!(state.data, Some(vec![1, 2, 3]));
/// assert!(!state.is_loading);
/// # });
/// ```
#[derive(Clone)]
pub struct Query<T: 'static> {
	client: QueryClient,
	options: QueryOptions,
	key: Rc<RefCell<Option<QueryKey>>>,
	state: Signal<QueryState<T>>,
	generation: Rc<Cell<u64>>,
}

impl<T: Clone + 'static> Query<T> {
	/// Creates a query that has not fetched yet
	pub fn new(client: QueryClient, options: QueryOptions) -> Self {
		Self {
			client,
			options,
			key: Rc::new(RefCell::new(None)),
			state: Signal::new(QueryState::pending()),
			generation: Rc::new(Cell::new(0)),
		}
	}

	/// The cache this query reads and fills
	pub fn client(&self) -> &QueryClient {
		&self.client
	}

	/// Key of the most recent fetch
	pub fn key(&self) -> Option<QueryKey> {
		self.key.borrow().clone()
	}

	/// Current state, tracked
	pub fn state(&self) -> QueryState<T> {
		self.state.get()
	}

	/// Current state without tracking
	pub fn state_untracked(&self) -> QueryState<T> {
		self.state.get_untracked()
	}

	/// Serves `key` from the cache, or runs `fetcher` and caches its result
	pub async fn fetch<F, Fut>(&self, key: QueryKey, fetcher: F) -> QueryState<T>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<T, QueryError>>,
	{
		if let Some(data) = self.client.get::<T>(&key) {
			tracing::debug!(%key, "query served from cache");
			self.generation.set(self.generation.get() + 1);
			*self.key.borrow_mut() = Some(key);
			self.state.set(QueryState::success(data));
			return self.state.get_untracked();
		}
		self.run(key, fetcher).await
	}

	/// Runs `fetcher` for `key` even when a cached value exists
	pub async fn refetch<F, Fut>(&self, key: QueryKey, fetcher: F) -> QueryState<T>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<T, QueryError>>,
	{
		self.run(key, fetcher).await
	}

	async fn run<F, Fut>(&self, key: QueryKey, fetcher: F) -> QueryState<T>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<T, QueryError>>,
	{
		let generation = self.generation.get() + 1;
		self.generation.set(generation);

		let key_changed = self.key.borrow().as_ref() != Some(&key);
		*self.key.borrow_mut() = Some(key.clone());
		let keep_previous_data = self.options.keep_previous_data;
		self.state.update(|state| {
			if key_changed && !keep_previous_data {
				state.data = None;
			}
			state.is_loading = state.data.is_none();
			state.is_fetching = true;
			state.error = None;
		});

		tracing::debug!(%key, generation, "fetching query");
		let result = fetcher().await;

		if self.generation.get() != generation {
			tracing::debug!(%key, generation, "discarding stale query result");
			return self.state.get_untracked();
		}

		match result {
			Ok(data) => {
				self.client.set(key, data.clone());
				self.state.set(QueryState::success(data));
			}
			Err(err) => {
				tracing::warn!(%key, %err, "query failed");
				self.state.update(|state| {
					state.is_loading = false;
					state.is_fetching = false;
					state.error = Some(err);
				});
			}
		}
		self.state.get_untracked()
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for Query<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Query")
			.field("key", &self.key.borrow())
			.field("state", &self.state)
			.finish_non_exhaustive()
	}
}
