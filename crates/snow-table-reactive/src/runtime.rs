//! Reactive runtime
//!
//! The runtime owns the dependency graph between signals and their observers
//! (memos and effects), the observer stack used for automatic dependency
//! tracking, and the queue of passive effects waiting for the next render pass.
//!
//! There is one runtime per thread. In WASM there is only one thread, so this
//! is effectively a global runtime; tests get an isolated runtime per thread.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::effect::{Effect, effect_timing};
use crate::memo::mark_memo_dirty;

/// Upper bound on consecutive flush rounds before the queue is abandoned.
///
/// A passive effect that keeps re-triggering itself would otherwise spin forever.
const MAX_FLUSH_ROUNDS: usize = 64;

/// Unique identifier for a reactive node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
	/// Allocates a fresh identifier
	pub fn new() -> Self {
		static COUNTER: AtomicUsize = AtomicUsize::new(0);
		Self(COUNTER.fetch_add(1, Ordering::Relaxed))
	}
}

impl Default for NodeId {
	fn default() -> Self {
		Self::new()
	}
}

/// Kind of reactive node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
	/// Source of truth
	Signal,
	/// Side effect re-run on change
	Effect,
	/// Cached derived value
	Memo,
}

/// When an effect runs relative to the write that invalidated it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EffectTiming {
	/// Runs synchronously inside the signal write
	Layout,
	/// Queued until the next [`flush_effects`] call
	#[default]
	Passive,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Observer {
	pub(crate) id: NodeId,
	pub(crate) node_type: NodeType,
}

#[derive(Debug, Default)]
struct DependencyNode {
	subscribers: Vec<NodeId>,
	dependencies: Vec<NodeId>,
}

/// Per-thread reactive runtime
#[derive(Debug, Default)]
pub struct Runtime {
	observer_stack: RefCell<Vec<Observer>>,
	dependency_graph: RefCell<BTreeMap<NodeId, DependencyNode>>,
	pending_updates: RefCell<Vec<NodeId>>,
}

impl Runtime {
	/// Creates an empty runtime
	pub fn new() -> Self {
		Self::default()
	}

	pub(crate) fn current_observer(&self) -> Option<Observer> {
		self.observer_stack.borrow().last().copied()
	}

	pub(crate) fn push_observer(&self, observer: Observer) {
		self.observer_stack.borrow_mut().push(observer);
	}

	pub(crate) fn pop_observer(&self) -> Option<Observer> {
		self.observer_stack.borrow_mut().pop()
	}

	/// Records that the current observer (if any) depends on `source_id`
	pub fn track_dependency(&self, source_id: NodeId) {
		let Some(observer) = self.current_observer() else {
			return;
		};
		if observer.id == source_id {
			return;
		}

		let mut graph = self.dependency_graph.borrow_mut();

		let source = graph.entry(source_id).or_default();
		if !source.subscribers.contains(&observer.id) {
			source.subscribers.push(observer.id);
		}

		let observer_node = graph.entry(observer.id).or_default();
		if !observer_node.dependencies.contains(&source_id) {
			observer_node.dependencies.push(source_id);
			tracing::trace!(
				source = ?source_id,
				observer = ?observer.id,
				kind = ?observer.node_type,
				"tracked dependency"
			);
		}
	}

	/// Propagates a change of `source_id` to its subscribers
	///
	/// Memos are marked dirty and propagate further, layout effects run
	/// immediately and passive effects are queued.
	pub fn notify_signal_change(&self, source_id: NodeId) {
		let subscribers = match self.dependency_graph.borrow().get(&source_id) {
			Some(node) => node.subscribers.clone(),
			None => return,
		};

		let mut layout_effects = Vec::new();
		for subscriber_id in subscribers {
			if let Some(was_dirty) = mark_memo_dirty(subscriber_id) {
				if !was_dirty {
					self.notify_signal_change(subscriber_id);
				}
				continue;
			}
			match effect_timing(subscriber_id) {
				Some(EffectTiming::Layout) => layout_effects.push(subscriber_id),
				Some(EffectTiming::Passive) => self.schedule_update(subscriber_id),
				None => {}
			}
		}

		for effect_id in layout_effects {
			Effect::execute_effect(effect_id);
		}
	}

	pub(crate) fn schedule_update(&self, node_id: NodeId) {
		let mut pending = self.pending_updates.borrow_mut();
		if !pending.contains(&node_id) {
			pending.push(node_id);
		}
	}

	fn take_pending(&self) -> Vec<NodeId> {
		std::mem::take(&mut *self.pending_updates.borrow_mut())
	}

	/// Removes every edge pointing at or from `node_id`
	///
	/// Called before re-running an observer so stale dependencies are dropped.
	pub fn clear_dependencies(&self, node_id: NodeId) {
		let mut graph = self.dependency_graph.borrow_mut();

		let dependencies = match graph.get_mut(&node_id) {
			Some(node) => std::mem::take(&mut node.dependencies),
			None => return,
		};

		for dep_id in dependencies {
			if let Some(dep_node) = graph.get_mut(&dep_id) {
				dep_node.subscribers.retain(|&id| id != node_id);
			}
		}
	}

	/// Removes a node from the graph entirely
	pub fn remove_node(&self, node_id: NodeId) {
		self.clear_dependencies(node_id);
		self.dependency_graph.borrow_mut().remove(&node_id);
		self.pending_updates.borrow_mut().retain(|&id| id != node_id);
	}

	/// Whether `node_id` currently has an entry in the graph
	pub fn has_node(&self, node_id: NodeId) -> bool {
		self.dependency_graph.borrow().contains_key(&node_id)
	}

	/// Number of observers subscribed to `node_id`
	pub fn subscriber_count(&self, node_id: NodeId) -> usize {
		self.dependency_graph
			.borrow()
			.get(&node_id)
			.map(|node| node.subscribers.len())
			.unwrap_or(0)
	}
}

thread_local! {
	static RUNTIME: Runtime = Runtime::new();
}

/// Runs `f` against the current thread's runtime
pub fn with_runtime<F, R>(f: F) -> R
where
	F: FnOnce(&Runtime) -> R,
{
	RUNTIME.with(f)
}

pub(crate) fn try_with_runtime<F, R>(f: F) -> Option<R>
where
	F: FnOnce(&Runtime) -> R,
{
	RUNTIME.try_with(f).ok()
}

/// Runs every queued passive effect (one render pass)
///
/// Effects queued while flushing run in the same call, so after this returns
/// the graph is settled.
pub fn flush_effects() {
	for _ in 0..MAX_FLUSH_ROUNDS {
		let pending = with_runtime(|rt| rt.take_pending());
		if pending.is_empty() {
			return;
		}
		for effect_id in pending {
			Effect::execute_effect(effect_id);
		}
	}
	let dropped = with_runtime(|rt| rt.take_pending());
	tracing::warn!(
		dropped = dropped.len(),
		"passive effects kept re-triggering; abandoning flush"
	);
}

/// Whether a render pass has queued work
pub fn has_pending_effects() -> bool {
	with_runtime(|rt| !rt.pending_updates.borrow().is_empty())
}

#[cfg(test)]
mod tests {
	use super::*;
	use serial_test::serial;

	fn effect_observer(id: NodeId) -> Observer {
		Observer {
			id,
			node_type: NodeType::Effect,
		}
	}

	#[test]
	#[serial]
	fn test_node_id_uniqueness() {
		let id1 = NodeId::new();
		let id2 = NodeId::new();
		let id3 = NodeId::new();

		assert_ne!(id1, id2);
		assert_ne!(id2, id3);
		assert_ne!(id1, id3);
	}

	#[test]
	#[serial]
	fn test_runtime_observer_stack() {
		let runtime = Runtime::new();
		assert!(runtime.current_observer().is_none());

		let id1 = NodeId::new();
		let id2 = NodeId::new();

		runtime.push_observer(effect_observer(id1));
		assert_eq!(runtime.current_observer().map(|o| o.id), Some(id1));

		runtime.push_observer(effect_observer(id2));
		assert_eq!(runtime.current_observer().map(|o| o.id), Some(id2));

		runtime.pop_observer();
		assert_eq!(runtime.current_observer().map(|o| o.id), Some(id1));

		runtime.pop_observer();
		assert!(runtime.current_observer().is_none());
	}

	#[test]
	#[serial]
	fn test_dependency_tracking() {
		let runtime = Runtime::new();
		let signal_id = NodeId::new();
		let effect_id = NodeId::new();

		runtime.push_observer(effect_observer(effect_id));
		runtime.track_dependency(signal_id);
		runtime.track_dependency(signal_id);

		assert_eq!(runtime.subscriber_count(signal_id), 1);
		assert!(runtime.has_node(effect_id));
	}

	#[test]
	#[serial]
	fn test_tracking_without_observer_is_noop() {
		let runtime = Runtime::new();
		let signal_id = NodeId::new();

		runtime.track_dependency(signal_id);

		assert!(!runtime.has_node(signal_id));
	}

	#[test]
	#[serial]
	fn test_clear_dependencies() {
		let runtime = Runtime::new();
		let signal_id = NodeId::new();
		let effect_id = NodeId::new();

		runtime.push_observer(effect_observer(effect_id));
		runtime.track_dependency(signal_id);
		runtime.pop_observer();
		assert_eq!(runtime.subscriber_count(signal_id), 1);

		runtime.clear_dependencies(effect_id);
		assert_eq!(runtime.subscriber_count(signal_id), 0);
	}

	#[test]
	#[serial]
	fn test_remove_node_drops_pending_update() {
		let runtime = Runtime::new();
		let effect_id = NodeId::new();

		runtime.schedule_update(effect_id);
		runtime.schedule_update(effect_id);
		assert_eq!(runtime.pending_updates.borrow().len(), 1);

		runtime.remove_node(effect_id);
		assert!(runtime.pending_updates.borrow().is_empty());
	}
}
