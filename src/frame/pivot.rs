//! Pivot, melt, and reshape between long and wide layouts.

use log::debug;

use super::core::Frame;
use crate::column::Column;
use crate::error::{Error, Result};
use crate::index::Index;
use crate::value::Value;

/// Column label holding the source column names in melted output.
pub const MELT_VARIABLE_COLUMN: &str = "variable";
/// Column label holding the source cells in melted output.
pub const MELT_VALUE_COLUMN: &str = "value";

impl Frame {
    /// Long-to-wide: one output row per distinct `row_key` value and
    /// one output column per distinct `col_key` value, both in first
    /// appearance order. With a single value column the output columns
    /// carry the bare `col_key` values; with several they carry
    /// compound `(value_col, col_key)` labels. When two source rows
    /// map to the same cell the later row wins.
    pub fn pivot(&self, row_key: &str, col_key: &str, value_cols: &[&str]) -> Result<Frame> {
        if value_cols.is_empty() {
            return Err(Error::InvalidInput("no value columns given".to_string()));
        }
        let rk = self.cols.position(row_key)?;
        let ck = self.cols.position(col_key)?;
        let vs = value_cols
            .iter()
            .map(|c| self.cols.position(c))
            .collect::<Result<Vec<_>>>()?;

        let mut rows = Index::new();
        let mut cols = Index::new();
        let mut cells: Vec<Vec<Value>> = Vec::new();
        for r in 0..self.length() {
            let row_label = self.columns[rk].get(r)?.to_string();
            let ri = match self.pivot_slot(&mut rows, &row_label)? {
                Some(new) => {
                    for column in &mut cells {
                        column.push(Value::Null);
                    }
                    new
                }
                None => rows.position(&row_label)?,
            };
            let col_value = self.columns[ck].get(r)?.to_string();
            for (&v, &name) in vs.iter().zip(value_cols) {
                let col_label = if vs.len() == 1 {
                    col_value.clone()
                } else {
                    format!("({}, {})", name, col_value)
                };
                let ci = match self.pivot_slot(&mut cols, &col_label)? {
                    Some(new) => {
                        cells.push(vec![Value::Null; rows.len()]);
                        new
                    }
                    None => cols.position(&col_label)?,
                };
                cells[ci][ri] = self.columns[v].get(r)?;
            }
        }
        debug!(
            "pivoted {} rows into {}x{}",
            self.length(),
            rows.len(),
            cols.len()
        );
        let columns = cells.into_iter().map(Column::from_values).collect();
        Ok(Frame {
            rows,
            cols,
            columns,
        })
    }

    fn pivot_slot(&self, index: &mut Index, label: &str) -> Result<Option<usize>> {
        if index.contains(label) {
            return Ok(None);
        }
        Ok(Some(index.add(label.to_string())?))
    }

    /// Wide-to-long: keep `id_cols` as-is and unpivot every other
    /// column into `variable`/`value` pairs, one output row per
    /// (source row, unpivoted column). Row labels are synthesized.
    pub fn melt(&self, id_cols: &[&str]) -> Result<Frame> {
        let ids = id_cols
            .iter()
            .map(|c| self.cols.position(c))
            .collect::<Result<Vec<_>>>()?;
        let unpivoted: Vec<usize> = (0..self.size()).filter(|c| !ids.contains(c)).collect();

        let mut out = Frame::new();
        let total = self.length() * unpivoted.len();
        let mut id_cells: Vec<Vec<Value>> = vec![Vec::with_capacity(total); ids.len()];
        let mut variables = Vec::with_capacity(total);
        let mut values = Vec::with_capacity(total);
        for r in 0..self.length() {
            for &c in &unpivoted {
                for (slot, &id) in ids.iter().enumerate() {
                    id_cells[slot].push(self.columns[id].get(r)?);
                }
                variables.push(Value::Str(self.cols.label(c)?.to_string()));
                values.push(self.columns[c].get(r)?);
            }
        }
        for _ in 0..total {
            out.rows.add_synthesized();
        }
        for (slot, &id) in ids.iter().enumerate() {
            out.add_values(
                self.cols.label(id)?.to_string(),
                std::mem::take(&mut id_cells[slot]),
            )?;
        }
        out.add_values(MELT_VARIABLE_COLUMN, variables)?;
        out.add_values(MELT_VALUE_COLUMN, values)?;
        Ok(out)
    }

    /// Resize to `rows` x `cols`, keeping the top-left overlap and
    /// padding growth with nulls. New labels are synthesized ordinals.
    pub fn reshape(&self, rows: usize, cols: usize) -> Result<Frame> {
        let mut out = Frame::new();
        for r in 0..rows {
            match self.rows.labels().get(r) {
                Some(label) => {
                    out.rows.add(label.clone())?;
                }
                None => {
                    out.rows.add_synthesized();
                }
            }
        }
        for c in 0..cols {
            let mut cells = Vec::with_capacity(rows);
            for r in 0..rows {
                cells.push(if c < self.size() && r < self.length() {
                    self.columns[c].get(r)?
                } else {
                    Value::Null
                });
            }
            match self.cols.labels().get(c) {
                Some(label) => out.add_values(label.clone(), cells)?,
                None => {
                    let label = out.cols.synthesize();
                    out.add_values(label, cells)?;
                }
            }
        }
        Ok(out)
    }

    /// Reindex to the given label lists. Labels present in this frame
    /// keep their cells; labels absent from it come up all-null.
    pub fn reshape_by(&self, row_labels: &[&str], col_labels: &[&str]) -> Result<Frame> {
        let mut out = Frame::new();
        for &label in row_labels {
            out.rows.add(label.to_string())?;
        }
        for &label in col_labels {
            let mut cells = Vec::with_capacity(row_labels.len());
            match self.cols.position(label) {
                Ok(c) => {
                    for &row in row_labels {
                        cells.push(match self.rows.position(row) {
                            Ok(r) => self.columns[c].get(r)?,
                            Err(_) => Value::Null,
                        });
                    }
                }
                Err(_) => cells.resize(row_labels.len(), Value::Null),
            }
            out.add_values(label.to_string(), cells)?;
        }
        Ok(out)
    }
}
