//! Frame structure, constructors, and shape accessors.

use std::fmt::{self, Debug, Display};

use log::debug;

use crate::column::Column;
use crate::error::{Error, Result};
use crate::index::Index;
use crate::value::Value;

/// Labeled two-dimensional table.
///
/// Owns a row [`Index`], a column [`Index`], and one [`Column`] per
/// column label. Invariants held after every operation: the number of
/// columns equals the column index size, and every column's length
/// equals the row index size.
///
/// Structural operators (`add_column`, `drop_column`, `append`, `set`)
/// mutate in place; transformational operators (`join`, `group_by`,
/// `sort_by`, `pivot`, `slice`, selection) return a new frame sharing
/// no mutable state with their inputs.
#[derive(Clone, Default)]
pub struct Frame {
    pub(crate) rows: Index,
    pub(crate) cols: Index,
    pub(crate) columns: Vec<Column>,
}

impl Frame {
    /// Empty frame: no rows, no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty frame with the given column labels.
    pub fn with_columns<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cols = Index::from_labels(labels)?;
        let columns = (0..cols.len()).map(|_| Column::new()).collect();
        Ok(Self {
            rows: Index::new(),
            cols,
            columns,
        })
    }

    /// Empty frame with `size` synthesized column labels.
    pub fn with_size(size: usize) -> Self {
        let mut cols = Index::new();
        for _ in 0..size {
            cols.add_synthesized();
        }
        let columns = (0..size).map(|_| Column::new()).collect();
        Self {
            rows: Index::new(),
            cols,
            columns,
        }
    }

    /// Frame from explicit row labels, column labels, and column-major
    /// data (one cell vector per column). Every column vector must
    /// match the row label count.
    pub fn from_parts<R, C>(
        row_labels: Vec<R>,
        col_labels: Vec<C>,
        data: Vec<Vec<Value>>,
    ) -> Result<Self>
    where
        R: Into<String>,
        C: Into<String>,
    {
        if data.len() != col_labels.len() {
            return Err(Error::InvalidInput(format!(
                "column count mismatch: {} labels, {} data columns",
                col_labels.len(),
                data.len()
            )));
        }
        let rows = Index::from_labels(row_labels)?;
        let cols = Index::from_labels(col_labels)?;
        let mut columns = Vec::with_capacity(data.len());
        for cells in data {
            if cells.len() != rows.len() {
                return Err(Error::InconsistentRowCount {
                    expected: rows.len(),
                    found: cells.len(),
                });
            }
            columns.push(Column::from_values(cells));
        }
        debug!(
            "constructed frame: {} rows x {} columns",
            rows.len(),
            cols.len()
        );
        Ok(Self { rows, cols, columns })
    }

    /// Number of rows.
    pub fn length(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn size(&self) -> usize {
        self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row axis index.
    pub fn row_index(&self) -> &Index {
        &self.rows
    }

    /// Column axis index.
    pub fn col_index(&self) -> &Index {
        &self.cols
    }

    /// Row labels in position order.
    pub fn row_labels(&self) -> &[String] {
        self.rows.labels()
    }

    /// Column labels in position order.
    pub fn column_labels(&self) -> &[String] {
        self.cols.labels()
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MAX_ROWS: usize = 10;

        if self.cols.is_empty() {
            return write!(f, "Frame (0 rows x 0 columns)");
        }
        writeln!(
            f,
            "Frame ({} rows x {} columns):",
            self.length(),
            self.size()
        )?;
        write!(f, "{:<8} |", "")?;
        for name in self.cols.labels() {
            write!(f, " {:<12} |", name)?;
        }
        writeln!(f)?;
        write!(f, "{:-<8}-+", "")?;
        for _ in self.cols.labels() {
            write!(f, "-{:-<12}-+", "")?;
        }
        writeln!(f)?;

        let shown = self.length().min(MAX_ROWS);
        for r in 0..shown {
            let label = self.rows.label(r).unwrap_or("?");
            write!(f, "{:<8} |", label)?;
            for column in &self.columns {
                let cell = column.get(r).unwrap_or(Value::Null);
                write!(f, " {:<12} |", cell.to_string())?;
            }
            writeln!(f)?;
        }
        if self.length() > MAX_ROWS {
            writeln!(f, "... ({} more rows)", self.length() - MAX_ROWS)?;
        }
        Ok(())
    }
}

impl Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f)
    }
}

impl Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f)
    }
}
