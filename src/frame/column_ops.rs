//! Column management: add, drop, retain, rename, access.

use log::debug;

use super::core::Frame;
use crate::column::Column;
use crate::error::{Error, Result};
use crate::value::{ColumnType, Value};

impl Frame {
    /// Add a column under `label`. Fails on a duplicate label or when
    /// the column's length disagrees with the frame's row count.
    pub fn add_column(&mut self, label: impl Into<String>, column: Column) -> Result<()> {
        let label = label.into();
        if self.cols.contains(&label) {
            return Err(Error::DuplicateLabel(label));
        }
        if column.len() != self.length() {
            return Err(Error::InconsistentRowCount {
                expected: self.length(),
                found: column.len(),
            });
        }
        self.cols.add(label)?;
        self.columns.push(column);
        Ok(())
    }

    /// Add an untyped column from cells.
    pub fn add_values(&mut self, label: impl Into<String>, values: Vec<Value>) -> Result<()> {
        self.add_column(label, Column::from_values(values))
    }

    /// Add an all-null column under a synthesized label, sized to the
    /// current row count.
    pub fn add_synthesized_column(&mut self) -> Result<String> {
        let label = self.cols.synthesize();
        self.add_column(label.clone(), Column::nulls(self.length()))?;
        Ok(label)
    }

    /// Remove and return the column under `label`.
    pub fn drop_column(&mut self, label: &str) -> Result<Column> {
        let pos = self.cols.remove(label)?;
        debug!("dropped column {:?} at position {}", label, pos);
        Ok(self.columns.remove(pos))
    }

    /// Remove and return the column at `pos`.
    pub fn drop_column_at(&mut self, pos: usize) -> Result<Column> {
        let label = self.cols.label(pos)?.to_string();
        self.drop_column(&label)
    }

    /// Keep only the named columns, in their current order. Fails on
    /// an unknown label before anything is dropped.
    pub fn retain_columns(&mut self, labels: &[&str]) -> Result<()> {
        for label in labels {
            self.cols.position(label)?;
        }
        let doomed: Vec<String> = self
            .cols
            .labels()
            .iter()
            .filter(|l| !labels.contains(&l.as_str()))
            .cloned()
            .collect();
        for label in doomed {
            self.drop_column(&label)?;
        }
        Ok(())
    }

    /// Rename a column, keeping its position.
    pub fn rename_column(&mut self, old: &str, new: impl Into<String>) -> Result<()> {
        self.cols.rename(old, new)
    }

    /// Column under `label`.
    pub fn column(&self, label: &str) -> Result<&Column> {
        let pos = self.cols.position(label)?;
        Ok(&self.columns[pos])
    }

    /// Column at `pos`.
    pub fn column_at(&self, pos: usize) -> Result<&Column> {
        self.cols.label(pos)?;
        Ok(&self.columns[pos])
    }

    /// Representation of the column under `label`.
    pub fn column_type(&self, label: &str) -> Result<ColumnType> {
        Ok(self.column(label)?.column_type())
    }

    /// Whether the column under `label` can feed numeric aggregation.
    pub fn is_numeric(&self, label: &str) -> Result<bool> {
        Ok(self.column(label)?.is_numeric())
    }

    pub(crate) fn column_mut(&mut self, label: &str) -> Result<&mut Column> {
        let pos = self.cols.position(label)?;
        Ok(&mut self.columns[pos])
    }
}
