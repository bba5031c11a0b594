//! Keyed remote-data cache

pub use snow_table_query::*;
