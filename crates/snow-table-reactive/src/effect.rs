//! Effect - reactive side effects
//!
//! An `Effect` runs its closure once on creation and again whenever a signal
//! or memo it read during the previous run changes. Passive effects (the
//! default) are deferred to the next [`flush_effects`](crate::flush_effects)
//! call; layout effects run synchronously inside the triggering write.
//!
//! Dropping the `Effect` handle disposes it.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::runtime::{EffectTiming, NodeId, NodeType, Observer, try_with_runtime, with_runtime};

type EffectFn = Box<dyn FnMut() + 'static>;

thread_local! {
	static EFFECT_FUNCTIONS: RefCell<BTreeMap<NodeId, EffectFn>> = RefCell::new(BTreeMap::new());
	static EFFECT_TIMING: RefCell<BTreeMap<NodeId, EffectTiming>> = const { RefCell::new(BTreeMap::new()) };
}

pub(crate) fn effect_timing(effect_id: NodeId) -> Option<EffectTiming> {
	EFFECT_TIMING
		.try_with(|storage| storage.borrow().get(&effect_id).copied())
		.ok()
		.flatten()
}

/// A side effect that re-runs when its dependencies change
pub struct Effect {
	id: NodeId,
	disposed: Rc<Cell<bool>>,
}

impl Effect {
	/// Creates a passive effect and runs it once
	pub fn new<F>(f: F) -> Self
	where
		F: FnMut() + 'static,
	{
		Self::new_with_timing(f, EffectTiming::Passive)
	}

	/// Creates an effect with explicit timing and runs it once
	pub fn new_with_timing<F>(mut f: F, timing: EffectTiming) -> Self
	where
		F: FnMut() + 'static,
	{
		let id = NodeId::new();
		let disposed = Rc::new(Cell::new(false));

		let guard = disposed.clone();
		EFFECT_FUNCTIONS.with(|storage| {
			storage.borrow_mut().insert(
				id,
				Box::new(move || {
					if !guard.get() {
						f();
					}
				}),
			);
		});
		EFFECT_TIMING.with(|storage| {
			storage.borrow_mut().insert(id, timing);
		});

		Self::execute_effect(id);

		Self { id, disposed }
	}

	pub(crate) fn execute_effect(effect_id: NodeId) {
		// Taken out of storage while running so the closure may create or
		// trigger other effects without re-entering the map borrow.
		let Some(mut effect_fn) = EFFECT_FUNCTIONS.with(|storage| storage.borrow_mut().remove(&effect_id)) else {
			return;
		};

		with_runtime(|rt| {
			rt.clear_dependencies(effect_id);
			rt.push_observer(Observer {
				id: effect_id,
				node_type: NodeType::Effect,
			});
		});

		effect_fn();

		with_runtime(|rt| {
			rt.pop_observer();
		});

		// Disposed while running: dispose() already cleared the timing entry.
		if effect_timing(effect_id).is_some() {
			EFFECT_FUNCTIONS.with(|storage| {
				storage.borrow_mut().insert(effect_id, effect_fn);
			});
		}
	}

	/// Identifier of this effect in the runtime graph
	pub fn id(&self) -> NodeId {
		self.id
	}

	/// Stops the effect; it will not run again
	pub fn dispose(&self) {
		self.disposed.set(true);

		let _ = try_with_runtime(|rt| rt.remove_node(self.id));
		let _ = EFFECT_FUNCTIONS.try_with(|storage| {
			storage.borrow_mut().remove(&self.id);
		});
		let _ = EFFECT_TIMING.try_with(|storage| {
			storage.borrow_mut().remove(&self.id);
		});
	}
}

impl Drop for Effect {
	fn drop(&mut self) {
		self.dispose();
	}
}

impl std::fmt::Debug for Effect {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Effect")
			.field("id", &self.id)
			.field("disposed", &self.disposed.get())
			.finish()
	}
}
