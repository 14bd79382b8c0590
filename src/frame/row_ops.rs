//! Row operations: append, cell access, selection, iteration.

use std::collections::HashSet;

use log::debug;

use super::core::Frame;
use crate::bitset::SparseBitSet;
use crate::error::{Error, Result};
use crate::index::Index;
use crate::value::Value;

impl Frame {
    /// Append one row. A missing label is synthesized (smallest unused
    /// non-negative integer); a duplicate label or a width mismatch
    /// fails without mutating the frame.
    pub fn append(&mut self, label: Option<String>, values: Vec<Value>) -> Result<String> {
        let mut appended = self.append_rows(vec![(label, values)])?;
        // append_rows returns exactly one label for a one-row batch.
        Ok(appended.pop().unwrap_or_default())
    }

    /// Append several rows with all-or-nothing semantics: every label
    /// and row width is validated before the first cell is written, so
    /// a failing batch leaves the receiver untouched. Returns the
    /// labels of the appended rows, synthesized ones included.
    pub fn append_rows(
        &mut self,
        rows: Vec<(Option<String>, Vec<Value>)>,
    ) -> Result<Vec<String>> {
        let width = self.size();
        let mut labels = Vec::with_capacity(rows.len());
        let mut pending: HashSet<String> = HashSet::new();
        let mut next_ordinal = 0usize;
        for (label, values) in &rows {
            if values.len() != width {
                return Err(Error::InconsistentRowCount {
                    expected: width,
                    found: values.len(),
                });
            }
            let label = match label {
                Some(l) => {
                    if self.rows.contains(l) || !pending.insert(l.clone()) {
                        return Err(Error::DuplicateLabel(l.clone()));
                    }
                    l.clone()
                }
                None => loop {
                    let candidate = next_ordinal.to_string();
                    next_ordinal += 1;
                    if !self.rows.contains(&candidate) && pending.insert(candidate.clone()) {
                        break candidate;
                    }
                },
            };
            labels.push(label);
        }
        for (label, (_, values)) in labels.iter().zip(rows) {
            self.rows.add(label.clone())?;
            for (column, value) in self.columns.iter_mut().zip(values) {
                column.push(value);
            }
        }
        debug!("appended {} rows, length now {}", labels.len(), self.length());
        Ok(labels)
    }

    /// Cell at `(row, col)` positions.
    pub fn get(&self, row: usize, col: usize) -> Result<Value> {
        self.rows.label(row)?;
        self.cols.label(col)?;
        self.columns[col].get(row)
    }

    /// Cell under `(row_label, col_label)`.
    pub fn get_loc(&self, row_label: &str, col_label: &str) -> Result<Value> {
        let row = self.rows.position(row_label)?;
        let col = self.cols.position(col_label)?;
        self.columns[col].get(row)
    }

    /// Replace the cell at `(row, col)` positions.
    pub fn set(&mut self, row: usize, col: usize, value: Value) -> Result<()> {
        self.rows.label(row)?;
        self.cols.label(col)?;
        self.columns[col].set(row, value)
    }

    /// Replace the cell under `(row_label, col_label)`.
    pub fn set_loc(&mut self, row_label: &str, col_label: &str, value: Value) -> Result<()> {
        let row = self.rows.position(row_label)?;
        let col = self.cols.position(col_label)?;
        self.columns[col].set(row, value)
    }

    /// Cells of the row at `pos`, in column order.
    pub fn row(&self, pos: usize) -> Result<Vec<Value>> {
        self.rows.label(pos)?;
        self.columns.iter().map(|c| c.get(pos)).collect()
    }

    /// Iterate over rows as cell vectors, in position order.
    pub fn iter_rows(&self) -> impl Iterator<Item = Vec<Value>> + '_ {
        (0..self.length()).map(move |r| match self.row(r) {
            Ok(row) => row,
            Err(_) => Vec::new(),
        })
    }

    /// Selection mask of the rows matching `predicate`.
    pub fn matches<F>(&self, predicate: F) -> SparseBitSet
    where
        F: Fn(&[Value]) -> bool,
    {
        let mut mask = SparseBitSet::new();
        for r in 0..self.length() {
            if let Ok(row) = self.row(r) {
                if predicate(&row) {
                    mask.insert(r as u64);
                }
            }
        }
        mask
    }

    /// New frame over the rows named by the mask, original labels
    /// preserved. Mask bits at or past the row count are ignored.
    pub fn select_rows(&self, mask: &SparseBitSet) -> Result<Frame> {
        let picks: Vec<usize> = mask
            .iter()
            .take_while(|&b| (b as usize) < self.length())
            .map(|b| b as usize)
            .collect();
        self.select_positions(&picks)
    }

    /// New frame over `predicate`-matching rows.
    pub fn filter<F>(&self, predicate: F) -> Result<Frame>
    where
        F: Fn(&[Value]) -> bool,
    {
        self.select_rows(&self.matches(predicate))
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> Result<Frame> {
        let n = n.min(self.length());
        let picks: Vec<usize> = (0..n).collect();
        self.select_positions(&picks)
    }

    /// Last `n` rows.
    pub fn tail(&self, n: usize) -> Result<Frame> {
        let n = n.min(self.length());
        let picks: Vec<usize> = (self.length() - n..self.length()).collect();
        self.select_positions(&picks)
    }

    /// Selection mask of the null cells in one column.
    pub fn null_mask(&self, label: &str) -> Result<SparseBitSet> {
        Ok(self.column(label)?.null_mask())
    }

    /// New frame without the rows holding any null cell.
    pub fn drop_nulls(&self) -> Result<Frame> {
        let mut nulls = SparseBitSet::new();
        for column in &self.columns {
            let mask = column.null_mask();
            let mut cursor = mask.next_set_bit(0);
            while let Some(bit) = cursor {
                nulls.set(bit)?;
                cursor = mask.next_set_bit(bit + 1);
            }
        }
        let picks: Vec<usize> = (0..self.length())
            .filter(|&r| !nulls.contains(r as u64))
            .collect();
        self.select_positions(&picks)
    }

    /// New frame over the given row positions (assumed distinct),
    /// preserving labels. Shared by selection, head/tail, and sorting.
    pub(crate) fn select_positions(&self, picks: &[usize]) -> Result<Frame> {
        let mut rows = Index::new();
        for &r in picks {
            rows.add(self.rows.label(r)?.to_string())?;
        }
        let columns = self
            .columns
            .iter()
            .map(|c| c.take(picks))
            .collect::<Result<Vec<_>>>()?;
        Ok(Frame {
            rows,
            cols: self.cols.clone(),
            columns,
        })
    }
}
