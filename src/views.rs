//! Client and server table orchestrators

pub use snow_table_views::*;
