//! Whole-frame transformations: slice, transpose, positional
//! concatenation, cell-wise map, row expansion, overlay and fill.

use log::debug;

use super::core::Frame;
use crate::column::Column;
use crate::error::{Error, Result};
use crate::index::Index;
use crate::value::Value;

impl Frame {
    /// New frame over the half-open sub-range `[row_start, row_end) x
    /// [col_start, col_end)`, original labels preserved.
    pub fn slice(
        &self,
        row_start: usize,
        row_end: usize,
        col_start: usize,
        col_end: usize,
    ) -> Result<Frame> {
        if row_start > row_end || row_end > self.length() {
            return Err(Error::IndexOutOfBounds {
                index: row_end,
                size: self.length(),
            });
        }
        if col_start > col_end || col_end > self.size() {
            return Err(Error::IndexOutOfBounds {
                index: col_end,
                size: self.size(),
            });
        }
        let rows = Index::from_labels(self.rows.labels()[row_start..row_end].to_vec())?;
        let cols = Index::from_labels(self.cols.labels()[col_start..col_end].to_vec())?;
        let columns = self.columns[col_start..col_end]
            .iter()
            .map(|c| c.slice(row_start, row_end))
            .collect::<Result<Vec<_>>>()?;
        Ok(Frame { rows, cols, columns })
    }

    /// Exchange the row and column axes: former column labels become
    /// row labels and vice versa. The result is heterogeneous, since a
    /// transposed row mixes the source columns' types.
    pub fn transpose(&self) -> Result<Frame> {
        let rows = Index::from_labels(self.cols.labels().to_vec())?;
        let cols = Index::from_labels(self.rows.labels().to_vec())?;
        let mut columns = Vec::with_capacity(self.length());
        for r in 0..self.length() {
            columns.push(Column::from_values(self.row(r)?));
        }
        Ok(Frame { rows, cols, columns })
    }

    /// Combine two frames positionally. Axis 0 stacks `other`'s rows
    /// below the receiver's, aligning columns by position and bounding
    /// the width by the narrower operand; axis 1 places `other`'s
    /// columns to the right, truncating to the shorter row count.
    /// Labels from both operands are carried over; a colliding label
    /// from `other` is replaced by a synthesized one.
    pub fn concatenate(&self, other: &Frame, axis: usize) -> Result<Frame> {
        match axis {
            0 => self.concat_rows(other),
            1 => self.concat_cols(other),
            _ => Err(Error::InvalidInput(format!("invalid axis: {}", axis))),
        }
    }

    fn concat_rows(&self, other: &Frame) -> Result<Frame> {
        let width = self.size().min(other.size());
        let cols = Index::from_labels(self.cols.labels()[..width].to_vec())?;
        let mut rows = Index::from_labels(self.rows.labels().to_vec())?;
        let mut columns: Vec<Column> = self.columns[..width].to_vec();
        for r in 0..other.length() {
            let label = other.rows.label(r)?;
            if rows.contains(label) {
                rows.add_synthesized();
            } else {
                rows.add(label.to_string())?;
            }
            for (c, column) in columns.iter_mut().enumerate() {
                column.push(other.columns[c].get(r)?);
            }
        }
        debug!(
            "concatenated along rows: {} x {}",
            rows.len(),
            cols.len()
        );
        Ok(Frame { rows, cols, columns })
    }

    fn concat_cols(&self, other: &Frame) -> Result<Frame> {
        let height = self.length().min(other.length());
        let rows = Index::from_labels(self.rows.labels()[..height].to_vec())?;
        let mut cols = Index::from_labels(self.cols.labels().to_vec())?;
        let mut columns = self
            .columns
            .iter()
            .map(|c| c.slice(0, height))
            .collect::<Result<Vec<_>>>()?;
        for c in 0..other.size() {
            let label = other.cols.label(c)?;
            if cols.contains(label) {
                cols.add_synthesized();
            } else {
                cols.add(label.to_string())?;
            }
            columns.push(other.columns[c].slice(0, height)?);
        }
        debug!(
            "concatenated along columns: {} x {}",
            rows.len(),
            cols.len()
        );
        Ok(Frame { rows, cols, columns })
    }

    /// Map a unary function over every cell, producing a frame of
    /// identical shape and labels.
    pub fn apply<F>(&self, f: F) -> Result<Frame>
    where
        F: Fn(&Value) -> Value,
    {
        let columns = self
            .columns
            .iter()
            .map(|c| Column::from_values(c.iter().map(|v| f(&v)).collect()))
            .collect();
        Ok(Frame {
            rows: self.rows.clone(),
            cols: self.cols.clone(),
            columns,
        })
    }

    /// Map each row to zero, one, or many output rows. Old row
    /// identities have no 1:1 correspondence afterwards, so the result
    /// carries freshly synthesized row labels. Every produced row must
    /// match the column count.
    pub fn transform<F>(&self, f: F) -> Result<Frame>
    where
        F: Fn(&[Value]) -> Vec<Vec<Value>>,
    {
        let width = self.size();
        let mut out = Frame::with_columns(self.cols.labels().to_vec())?;
        for r in 0..self.length() {
            let produced = f(&self.row(r)?);
            for row in produced {
                if row.len() != width {
                    return Err(Error::InconsistentRowCount {
                        expected: width,
                        found: row.len(),
                    });
                }
                out.append(None, row)?;
            }
        }
        Ok(out)
    }

    /// Overlay later frames' non-null cells onto the receiver
    /// positionally, in argument order. A null overlay cell leaves the
    /// receiver's value unchanged.
    pub fn update(&mut self, others: &[&Frame]) -> Result<()> {
        for other in others {
            let height = self.length().min(other.length());
            let width = self.size().min(other.size());
            for c in 0..width {
                for r in 0..height {
                    let value = other.columns[c].get(r)?;
                    if !value.is_null() {
                        self.columns[c].set(r, value)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Fill the receiver's null cells from the first non-null value at
    /// the same position across `others`, in argument order. Non-null
    /// receiver cells are untouched.
    pub fn coalesce(&mut self, others: &[&Frame]) -> Result<()> {
        for c in 0..self.size() {
            for r in 0..self.length() {
                if !self.columns[c].get(r)?.is_null() {
                    continue;
                }
                for other in others {
                    if r >= other.length() || c >= other.size() {
                        continue;
                    }
                    let value = other.columns[c].get(r)?;
                    if !value.is_null() {
                        self.columns[c].set(r, value)?;
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}
