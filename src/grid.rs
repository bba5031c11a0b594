//! Column projection, row actions and the client row model

pub use snow_table_grid::*;
