//! Fine-grained reactive primitives
//!
//! Signals hold table state, memos derive flags from it and passive effects
//! run on the next [`flush_effects`] call.

pub use snow_table_reactive::*;
