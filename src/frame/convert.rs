//! Explicit casts and best-effort column type inference.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use super::core::Frame;
use crate::column::Column;
use crate::error::Result;
use crate::value::{parse_bool, parse_date, ColumnType, Value};

lazy_static! {
    static ref INT_RE: Regex = Regex::new(r"^[+-]?[0-9]+$").unwrap();
    static ref FLOAT_RE: Regex =
        Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$").unwrap();
}

impl Frame {
    /// Reinterpret every cell of every column as `target`, failing
    /// with a cast error on the first non-representable cell. The
    /// frame is untouched on failure: all columns convert before any
    /// is committed.
    pub fn cast(&mut self, target: ColumnType) -> Result<()> {
        let converted = self
            .columns
            .iter()
            .map(|c| c.cast(target))
            .collect::<Result<Vec<_>>>()?;
        self.columns = converted;
        Ok(())
    }

    /// Reinterpret one column as `target`.
    pub fn cast_column(&mut self, label: &str, target: ColumnType) -> Result<()> {
        let converted = self.column(label)?.cast(target)?;
        *self.column_mut(label)? = converted;
        Ok(())
    }

    /// Best-effort column-wise type inference. Numeric-looking strings
    /// become numbers, temporal-looking strings become dates, and
    /// boolean tokens become booleans; a column whose non-null cells
    /// do not uniformly match a narrower type keeps its current
    /// representation. Never fails on data: a cell that looks like a
    /// narrower type but cannot be represented in it (an integer
    /// string past the i64 range, say) leaves its column as it was.
    pub fn convert(&mut self) -> Result<()> {
        for c in 0..self.columns.len() {
            if let Some(target) = infer(&self.columns[c]) {
                if let Ok(converted) = self.columns[c].cast(target) {
                    debug!(
                        "converting column {:?} to {:?}",
                        self.cols.label(c)?,
                        target
                    );
                    self.columns[c] = converted;
                }
            }
        }
        Ok(())
    }

    /// Column-wise conversion to explicit targets, best-effort: the
    /// i-th column is cast to `types[i]` when every cell fits, and
    /// left unchanged otherwise. Extra columns beyond the list keep
    /// their representation.
    pub fn convert_with(&mut self, types: &[ColumnType]) -> Result<()> {
        for (c, &target) in types.iter().enumerate().take(self.columns.len()) {
            if let Ok(converted) = self.columns[c].cast(target) {
                self.columns[c] = converted;
            }
        }
        Ok(())
    }
}

/// Narrowest uniform type for a heterogeneous or string column, or
/// `None` when the column should keep its representation. Packed
/// non-string columns are already as narrow as they get.
fn infer(column: &Column) -> Option<ColumnType> {
    match column.column_type() {
        ColumnType::Untyped | ColumnType::Str => {}
        _ => return None,
    }
    let mut any = false;
    let (mut can_int, mut can_float, mut can_bool, mut can_date) = (true, true, true, true);
    for value in column.iter() {
        let (i, f, b, d) = match &value {
            Value::Null => continue,
            Value::Int64(_) => (true, true, false, false),
            Value::Float64(_) => (false, true, false, false),
            Value::Bool(_) => (false, false, true, false),
            Value::Date(_) => (false, false, false, true),
            Value::Str(s) => {
                let t = s.trim();
                (
                    INT_RE.is_match(t),
                    FLOAT_RE.is_match(t),
                    parse_bool(t).is_some(),
                    parse_date(t).is_some(),
                )
            }
        };
        any = true;
        can_int &= i;
        can_float &= f;
        can_bool &= b;
        can_date &= d;
        if !(can_int || can_float || can_bool || can_date) {
            return None;
        }
    }
    if !any {
        return None;
    }
    if can_int {
        Some(ColumnType::Int64)
    } else if can_float {
        Some(ColumnType::Float64)
    } else if can_bool {
        Some(ColumnType::Bool)
    } else if can_date {
        Some(ColumnType::Date)
    } else {
        None
    }
}
