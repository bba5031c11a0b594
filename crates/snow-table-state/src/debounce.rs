//! Search-input debouncing
//!
//! The search box shows every keystroke immediately but only commits the
//! term to the store once typing pauses for [`SEARCH_DEBOUNCE`]. The
//! debouncer is clock-agnostic: callers pass the current instant so tests
//! and single-threaded wasm hosts can drive it without timers.

use std::time::Duration;

/// Quiet period before a typed search term is committed
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Debounces free-text search input
///
/// ```
/// use snow_table_state::{SEARCH_DEBOUNCE, SearchDebouncer};
/// use std::time::Duration;
///
/// let mut debouncer = SearchDebouncer::new("");
/// debouncer.input("jo", Duration::ZERO);
/// debouncer.input("john", Duration::from_millis(200));
///
/// assert_eq!(debouncer.poll(Duration::from_millis(600)), None);
/// assert_eq!(
/// 	debouncer.poll(Duration::from_millis(200) + SEARCH_DEBOUNCE).as_deref(),
/// 	Some("john")
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
	committed: String,
	pending: Option<(String, Duration)>,
	window: Duration,
}

impl SearchDebouncer {
	/// Creates a debouncer showing `initial`, using [`SEARCH_DEBOUNCE`]
	pub fn new(initial: impl Into<String>) -> Self {
		Self::with_window(initial, SEARCH_DEBOUNCE)
	}

	/// Creates a debouncer with a custom quiet period
	pub fn with_window(initial: impl Into<String>, window: Duration) -> Self {
		Self {
			committed: initial.into(),
			pending: None,
			window,
		}
	}

	/// Records a keystroke at `now`, restarting the quiet period
	pub fn input(&mut self, value: impl Into<String>, now: Duration) {
		self.pending = Some((value.into(), now + self.window));
	}

	/// Returns the term to commit once the quiet period has elapsed
	///
	/// Yields `None` while typing continues, when nothing is pending, or when
	/// the settled text equals the last committed term.
	pub fn poll(&mut self, now: Duration) -> Option<String> {
		let (_, deadline) = self.pending.as_ref()?;
		if now < *deadline {
			return None;
		}
		self.flush()
	}

	/// Commits any pending text immediately
	pub fn flush(&mut self) -> Option<String> {
		let (value, _) = self.pending.take()?;
		if value == self.committed {
			return None;
		}
		self.committed.clone_from(&value);
		Some(value)
	}

	/// Text the search box should display
	pub fn value(&self) -> &str {
		self.pending
			.as_ref()
			.map_or(self.committed.as_str(), |(value, _)| value.as_str())
	}

	/// Last committed term
	pub fn committed(&self) -> &str {
		&self.committed
	}

	/// Whether a keystroke is waiting for the quiet period
	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}

	/// Adopts a term set elsewhere (e.g. by a reset), dropping pending input
	pub fn sync(&mut self, external: impl Into<String>) {
		self.committed = external.into();
		self.pending = None;
	}
}
