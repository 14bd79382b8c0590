//! Ordered, nullable per-column storage.
//!
//! A column starts in the heterogeneous `Untyped` representation and
//! moves to a packed typed representation only through an explicit
//! `cast` (or the frame-level `convert` inference). Typed variants
//! track missing values in a [`SparseBitSet`] null mask instead of a
//! sentinel, so storage stays proportional to the non-null payload.

use chrono::NaiveDate;

use crate::bitset::SparseBitSet;
use crate::error::{Error, Result};
use crate::value::{ColumnType, Value};

/// Placeholder slot written under a null bit in a packed date column.
const DATE_NULL_SLOT: NaiveDate = NaiveDate::MIN;

#[derive(Debug, Clone)]
pub enum Column {
    Untyped(Vec<Value>),
    Int64 { values: Vec<i64>, nulls: SparseBitSet },
    Float64 { values: Vec<f64>, nulls: SparseBitSet },
    Bool { values: Vec<bool>, nulls: SparseBitSet },
    Str { values: Vec<String>, nulls: SparseBitSet },
    Date { values: Vec<NaiveDate>, nulls: SparseBitSet },
}

impl Default for Column {
    fn default() -> Self {
        Column::Untyped(Vec::new())
    }
}

impl Column {
    /// Empty untyped column.
    pub fn new() -> Self {
        Self::default()
    }

    /// Untyped column of `len` nulls.
    pub fn nulls(len: usize) -> Self {
        Column::Untyped(vec![Value::Null; len])
    }

    /// Untyped column over the given cells.
    pub fn from_values(values: Vec<Value>) -> Self {
        Column::Untyped(values)
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Untyped(v) => v.len(),
            Column::Int64 { values, .. } => values.len(),
            Column::Float64 { values, .. } => values.len(),
            Column::Bool { values, .. } => values.len(),
            Column::Str { values, .. } => values.len(),
            Column::Date { values, .. } => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Untyped(_) => ColumnType::Untyped,
            Column::Int64 { .. } => ColumnType::Int64,
            Column::Float64 { .. } => ColumnType::Float64,
            Column::Bool { .. } => ColumnType::Bool,
            Column::Str { .. } => ColumnType::Str,
            Column::Date { .. } => ColumnType::Date,
        }
    }

    /// Whether the column is usable by numeric aggregation: a packed
    /// numeric representation, or an untyped column whose non-null
    /// cells are all numeric (and at least one exists).
    pub fn is_numeric(&self) -> bool {
        match self {
            Column::Int64 { .. } | Column::Float64 { .. } => true,
            Column::Untyped(values) => {
                let mut seen = false;
                for v in values {
                    match v {
                        Value::Null => {}
                        v if v.is_numeric() => seen = true,
                        _ => return false,
                    }
                }
                seen
            }
            _ => false,
        }
    }

    /// Cell at `index`, failing when out of range. A null cell comes
    /// back as `Value::Null`.
    pub fn get(&self, index: usize) -> Result<Value> {
        let size = self.len();
        if index >= size {
            return Err(Error::IndexOutOfBounds { index, size });
        }
        Ok(match self {
            Column::Untyped(v) => v[index].clone(),
            Column::Int64 { values, nulls } => packed(nulls, index, || Value::Int64(values[index])),
            Column::Float64 { values, nulls } => {
                packed(nulls, index, || Value::Float64(values[index]))
            }
            Column::Bool { values, nulls } => packed(nulls, index, || Value::Bool(values[index])),
            Column::Str { values, nulls } => {
                packed(nulls, index, || Value::Str(values[index].clone()))
            }
            Column::Date { values, nulls } => packed(nulls, index, || Value::Date(values[index])),
        })
    }

    /// Replace the cell at `index`. A value that does not fit a packed
    /// representation demotes the column to untyped first; only the
    /// position can make this fail.
    pub fn set(&mut self, index: usize, value: Value) -> Result<()> {
        let size = self.len();
        if index >= size {
            return Err(Error::IndexOutOfBounds { index, size });
        }
        if !self.accepts(&value) {
            self.demote();
        }
        match self {
            Column::Untyped(v) => v[index] = value,
            Column::Int64 { values, nulls } => match value {
                Value::Int64(x) => {
                    values[index] = x;
                    nulls.remove(index as u64);
                }
                _ => {
                    values[index] = 0;
                    nulls.insert(index as u64);
                }
            },
            Column::Float64 { values, nulls } => match value {
                Value::Float64(x) => {
                    values[index] = x;
                    nulls.remove(index as u64);
                }
                _ => {
                    values[index] = 0.0;
                    nulls.insert(index as u64);
                }
            },
            Column::Bool { values, nulls } => match value {
                Value::Bool(x) => {
                    values[index] = x;
                    nulls.remove(index as u64);
                }
                _ => {
                    values[index] = false;
                    nulls.insert(index as u64);
                }
            },
            Column::Str { values, nulls } => match value {
                Value::Str(x) => {
                    values[index] = x;
                    nulls.remove(index as u64);
                }
                _ => {
                    values[index] = String::new();
                    nulls.insert(index as u64);
                }
            },
            Column::Date { values, nulls } => match value {
                Value::Date(x) => {
                    values[index] = x;
                    nulls.remove(index as u64);
                }
                _ => {
                    values[index] = DATE_NULL_SLOT;
                    nulls.insert(index as u64);
                }
            },
        }
        Ok(())
    }

    /// Append a cell, demoting to untyped on a representation mismatch.
    pub fn push(&mut self, value: Value) {
        if !self.accepts(&value) {
            self.demote();
        }
        match self {
            Column::Untyped(v) => v.push(value),
            Column::Int64 { values, nulls } => push_packed(values, nulls, value, 0, |v| match v {
                Value::Int64(x) => Some(x),
                _ => None,
            }),
            Column::Float64 { values, nulls } => {
                push_packed(values, nulls, value, 0.0, |v| match v {
                    Value::Float64(x) => Some(x),
                    _ => None,
                })
            }
            Column::Bool { values, nulls } => push_packed(values, nulls, value, false, |v| match v {
                Value::Bool(x) => Some(x),
                _ => None,
            }),
            Column::Str { values, nulls } => {
                push_packed(values, nulls, value, String::new(), |v| match v {
                    Value::Str(x) => Some(x),
                    _ => None,
                })
            }
            Column::Date { values, nulls } => {
                push_packed(values, nulls, value, DATE_NULL_SLOT, |v| match v {
                    Value::Date(x) => Some(x),
                    _ => None,
                })
            }
        }
    }

    /// Whether the value can be stored without leaving the current
    /// representation. Null fits every representation.
    fn accepts(&self, value: &Value) -> bool {
        match value.column_type() {
            None => true,
            Some(t) => {
                let own = self.column_type();
                own == ColumnType::Untyped || own == t
            }
        }
    }

    /// Collapse to the untyped representation in place.
    pub fn demote(&mut self) {
        if matches!(self, Column::Untyped(_)) {
            return;
        }
        let values = self.iter().collect();
        *self = Column::Untyped(values);
    }

    /// Clone of the cells in order.
    pub fn iter(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.len()).map(move |i| match self.get(i) {
            Ok(v) => v,
            // get only fails past len, which the range excludes.
            Err(_) => Value::Null,
        })
    }

    /// Positions holding null, as a selection mask.
    pub fn null_mask(&self) -> SparseBitSet {
        match self {
            Column::Untyped(values) => {
                let mut mask = SparseBitSet::new();
                for (i, v) in values.iter().enumerate() {
                    if v.is_null() {
                        mask.insert(i as u64);
                    }
                }
                mask
            }
            Column::Int64 { nulls, .. }
            | Column::Float64 { nulls, .. }
            | Column::Bool { nulls, .. }
            | Column::Str { nulls, .. }
            | Column::Date { nulls, .. } => nulls.clone(),
        }
    }

    /// New column with every cell coerced to `target`; fails on the
    /// first cell that cannot be represented, leaving no partial state.
    pub fn cast(&self, target: ColumnType) -> Result<Column> {
        let mut out = Column::empty_of(target);
        for value in self.iter() {
            out.push(value.cast_to(target)?);
        }
        Ok(out)
    }

    /// Empty column already in the packed representation for `target`.
    pub fn empty_of(target: ColumnType) -> Column {
        match target {
            ColumnType::Untyped => Column::Untyped(Vec::new()),
            ColumnType::Int64 => Column::Int64 {
                values: Vec::new(),
                nulls: SparseBitSet::new(),
            },
            ColumnType::Float64 => Column::Float64 {
                values: Vec::new(),
                nulls: SparseBitSet::new(),
            },
            ColumnType::Bool => Column::Bool {
                values: Vec::new(),
                nulls: SparseBitSet::new(),
            },
            ColumnType::Str => Column::Str {
                values: Vec::new(),
                nulls: SparseBitSet::new(),
            },
            ColumnType::Date => Column::Date {
                values: Vec::new(),
                nulls: SparseBitSet::new(),
            },
        }
    }

    /// Gather cells by position, keeping the representation; `None`
    /// picks produce null padding (used by join materialization).
    pub fn gather(&self, picks: &[Option<usize>]) -> Result<Column> {
        let mut out = Column::empty_of(self.column_type());
        for pick in picks {
            match pick {
                Some(i) => out.push(self.get(*i)?),
                None => out.push(Value::Null),
            }
        }
        Ok(out)
    }

    /// Gather cells by position without padding.
    pub fn take(&self, picks: &[usize]) -> Result<Column> {
        let mut out = Column::empty_of(self.column_type());
        for &i in picks {
            out.push(self.get(i)?);
        }
        Ok(out)
    }

    /// Sub-column over the half-open row range `[from, to)`.
    pub fn slice(&self, from: usize, to: usize) -> Result<Column> {
        let picks: Vec<usize> = (from..to).collect();
        self.take(&picks)
    }

    /// Truncate to `len` rows, or pad with nulls up to `len`.
    pub fn resize(&mut self, len: usize) {
        while self.len() > len {
            self.pop();
        }
        while self.len() < len {
            self.push(Value::Null);
        }
    }

    fn pop(&mut self) {
        let last = self.len().saturating_sub(1);
        match self {
            Column::Untyped(v) => {
                v.pop();
            }
            Column::Int64 { values, nulls } => {
                values.pop();
                nulls.remove(last as u64);
            }
            Column::Float64 { values, nulls } => {
                values.pop();
                nulls.remove(last as u64);
            }
            Column::Bool { values, nulls } => {
                values.pop();
                nulls.remove(last as u64);
            }
            Column::Str { values, nulls } => {
                values.pop();
                nulls.remove(last as u64);
            }
            Column::Date { values, nulls } => {
                values.pop();
                nulls.remove(last as u64);
            }
        }
    }
}

fn packed(nulls: &SparseBitSet, index: usize, value: impl FnOnce() -> Value) -> Value {
    if nulls.contains(index as u64) {
        Value::Null
    } else {
        value()
    }
}

fn push_packed<T>(
    values: &mut Vec<T>,
    nulls: &mut SparseBitSet,
    value: Value,
    null_slot: T,
    unpack: impl FnOnce(Value) -> Option<T>,
) {
    let index = values.len() as u64;
    match unpack(value) {
        Some(x) => values.push(x),
        // accepts() already demoted on any non-null mismatch, so a
        // failed unpack here can only be a null.
        None => {
            values.push(null_slot);
            nulls.insert(index);
        }
    }
}
