//! In-memory table model

mod cell;
mod cord;
mod data_type;
mod header_column;
mod row;
mod selection;

pub use cell::*;
pub use cord::*;
pub use data_type::*;
pub use header_column::*;
pub use row::*;
pub use selection::*;
