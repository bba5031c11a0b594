//! Table state, its persistence and the filter token codec
//!
//! ## Example
//!
//! ```
//! use snow_table::state::{decode_filters, encode_filters};
//!
//! let filters = decode_filters(Some("status:open,closed|owner:ada"));
//! assert_eq!(filters["status"], ["open", "closed"]);
//! assert_eq!(encode_filters(&filters), "status:open,closed|owner:ada");
//! ```

pub use snow_table_state::*;
