//! Memo - cached derived values
//!
//! A `Memo<T>` wraps a computation over other reactive values. The result is
//! cached and only recomputed on the first read after one of its dependencies
//! changed. Reads of a memo are themselves tracked, so effects can depend on
//! memos the same way they depend on signals.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::runtime::{NodeId, NodeType, Observer, try_with_runtime, with_runtime};

thread_local! {
	static MEMO_DIRTY: RefCell<BTreeMap<NodeId, Rc<Cell<bool>>>> = const { RefCell::new(BTreeMap::new()) };
}

/// Marks the memo `id` dirty.
///
/// Returns `None` when `id` is not a memo, otherwise whether it was already dirty.
pub(crate) fn mark_memo_dirty(id: NodeId) -> Option<bool> {
	MEMO_DIRTY
		.try_with(|flags| flags.borrow().get(&id).map(|flag| flag.replace(true)))
		.ok()
		.flatten()
}

type ComputeFn<T> = Box<dyn FnMut() -> T>;

/// A lazily recomputed derived value
pub struct Memo<T: 'static> {
	id: NodeId,
	value: Rc<RefCell<Option<T>>>,
	dirty: Rc<Cell<bool>>,
	compute: Rc<RefCell<ComputeFn<T>>>,
}

impl<T: Clone + 'static> Memo<T> {
	/// Creates a memo over `f`
	///
	/// The computation runs on first read, not at construction.
	pub fn new<F>(f: F) -> Self
	where
		F: FnMut() -> T + 'static,
	{
		let id = NodeId::new();
		let dirty = Rc::new(Cell::new(true));
		MEMO_DIRTY.with(|flags| {
			flags.borrow_mut().insert(id, dirty.clone());
		});

		Self {
			id,
			value: Rc::new(RefCell::new(None)),
			dirty,
			compute: Rc::new(RefCell::new(Box::new(f))),
		}
	}

	/// Returns the current value, recomputing it if a dependency changed
	pub fn get(&self) -> T {
		with_runtime(|rt| rt.track_dependency(self.id));
		self.get_untracked()
	}

	/// Returns the current value without tracking the read
	pub fn get_untracked(&self) -> T {
		if !self.dirty.get() {
			if let Some(value) = self.value.borrow().as_ref() {
				return value.clone();
			}
		}
		self.recompute()
	}

	fn recompute(&self) -> T {
		with_runtime(|rt| {
			rt.clear_dependencies(self.id);
			rt.push_observer(Observer {
				id: self.id,
				node_type: NodeType::Memo,
			});
		});

		let next = (self.compute.borrow_mut())();

		with_runtime(|rt| {
			rt.pop_observer();
		});

		*self.value.borrow_mut() = Some(next.clone());
		self.dirty.set(false);
		next
	}

	/// Identifier of this memo in the runtime graph
	pub fn id(&self) -> NodeId {
		self.id
	}
}

impl<T: 'static> Clone for Memo<T> {
	fn clone(&self) -> Self {
		Self {
			id: self.id,
			value: self.value.clone(),
			dirty: self.dirty.clone(),
			compute: self.compute.clone(),
		}
	}
}

impl<T: 'static> Drop for Memo<T> {
	fn drop(&mut self) {
		if Rc::strong_count(&self.value) == 1 {
			let _ = try_with_runtime(|rt| rt.remove_node(self.id));
			let _ = MEMO_DIRTY.try_with(|flags| {
				flags.borrow_mut().remove(&self.id);
			});
		}
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for Memo<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Memo")
			.field("id", &self.id)
			.field("dirty", &self.dirty.get())
			.field("value", &*self.value.borrow())
			.finish_non_exhaustive()
	}
}
