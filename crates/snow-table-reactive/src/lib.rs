//! Fine-grained reactive primitives for snow-table
//!
//! Table state is held in [`Signal`]s. Derived values such as the
//! "has active filters" flag are [`Memo`]s, and trailing reactions such as the
//! page-index reset are passive [`Effect`]s that run on the next render pass.
//!
//! ## Render passes
//!
//! Passive effects are queued when one of their dependencies changes. They run
//! when the host calls [`flush_effects`], which the table orchestrators do at
//! the start of every render. Layout effects run synchronously inside the
//! signal write that triggered them.
//!
//! ## Example
//!
//! ```
//! use snow_table_reactive::{Effect, Signal, flush_effects};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let count = Signal::new(0);
//! let seen = Rc::new(Cell::new(0));
//!
//! let _effect = Effect::new({
//! 	let count = count.clone();
//! 	let seen = seen.clone();
//! 	move || seen.set(count.get())
//! });
//!
//! count.set(7);
//! assert_eq!(seen.get(), 0);
//!
//! flush_effects();
//! assert_eq!(seen.get(), 7);
//! ```

#![warn(missing_docs)]

pub mod effect;
pub mod memo;
pub mod runtime;
pub mod signal;

pub use effect::Effect;
pub use memo::Memo;
pub use runtime::{EffectTiming, NodeId, NodeType, flush_effects, has_pending_effects};
pub use signal::Signal;
