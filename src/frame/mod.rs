//! The frame core: a row index, a column index, and the column store,
//! with each operation family in its own module.

mod column_ops;
mod convert;
mod core;
mod data_ops;
mod group;
mod join;
mod pivot;
mod row_ops;
mod sort;

pub use core::Frame;
pub use group::{Aggregate, GroupBy, GroupKey};
pub use join::JoinType;
pub use pivot::{MELT_VALUE_COLUMN, MELT_VARIABLE_COLUMN};
