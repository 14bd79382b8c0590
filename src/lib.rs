//! tabrs: an in-memory, labeled, two-dimensional data engine.
//!
//! A [`Frame`] pairs a row index and a column index with a columnar
//! store whose columns start heterogeneous and can be converted to
//! packed typed storage. On top of that sit selection masks
//! ([`SparseBitSet`]), four join semantics, grouped aggregation,
//! pivot/melt reshaping, and stable sorting.

pub mod bitset;
pub mod column;
pub mod error;
pub mod frame;
pub mod index;
pub mod script;
pub mod stats;
pub mod value;

// Re-export commonly used types
pub use bitset::SparseBitSet;
pub use column::Column;
pub use error::{Error, Result};
pub use frame::{
    Aggregate, Frame, GroupBy, GroupKey, JoinType, MELT_VALUE_COLUMN, MELT_VARIABLE_COLUMN,
};
pub use index::Index;
pub use script::{dispatch, Op};
pub use stats::Moments;
pub use value::{ColumnType, Value};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
