//! Grouped partitioning and per-group aggregation.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use super::core::Frame;
use crate::column::Column;
use crate::error::{Error, Result};
use crate::index::Index;
use crate::stats::{median, Moments};
use crate::value::Value;

/// Composite key identifying one group, in key-column order.
pub type GroupKey = Vec<Value>;

/// Built-in aggregators. All but `Count` are numeric-only and fail
/// with a type error on a non-numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aggregate {
    Count,
    Sum,
    Mean,
    Min,
    Max,
    Median,
    Variance,
    StdDev,
    Skewness,
    Kurtosis,
}

/// Row partitions of a frame, in first-seen key order.
pub struct GroupBy<'a> {
    frame: &'a Frame,
    /// Column positions the key is drawn from; empty for key-function
    /// grouping.
    key_columns: Vec<usize>,
    keys: Vec<GroupKey>,
    groups: Vec<Vec<usize>>,
    /// Group of each source row, for cumulative passes.
    assignment: Vec<usize>,
}

impl Frame {
    /// Partition rows by the composite value of the named columns.
    pub fn group_by(&self, columns: &[&str]) -> Result<GroupBy<'_>> {
        let positions = columns
            .iter()
            .map(|c| self.cols.position(c))
            .collect::<Result<Vec<_>>>()?;
        self.group_by_at(&positions)
    }

    /// Partition rows by the composite value of the columns at the
    /// given positions.
    pub fn group_by_at(&self, positions: &[usize]) -> Result<GroupBy<'_>> {
        for &p in positions {
            self.cols.label(p)?;
        }
        if positions.is_empty() {
            return Err(Error::InvalidInput("no grouping columns given".to_string()));
        }
        self.build_groups(positions.to_vec(), |frame, row| {
            positions
                .iter()
                .map(|&c| frame.columns[c].get(row))
                .collect()
        })
    }

    /// Partition rows by a per-row key function.
    pub fn group_by_with<F>(&self, key: F) -> Result<GroupBy<'_>>
    where
        F: Fn(&[Value]) -> Value,
    {
        self.build_groups(Vec::new(), |frame, row| Ok(vec![key(&frame.row(row)?)]))
    }

    fn build_groups<F>(&self, key_columns: Vec<usize>, key_of: F) -> Result<GroupBy<'_>>
    where
        F: Fn(&Frame, usize) -> Result<GroupKey>,
    {
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut keys: Vec<GroupKey> = Vec::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut assignment = Vec::with_capacity(self.length());
        for row in 0..self.length() {
            let key = key_of(self, row)?;
            let rendered = key
                .iter()
                .map(Value::key_string)
                .collect::<Vec<_>>()
                .join("\u{1f}");
            let slot = match seen.get(&rendered) {
                Some(&slot) => slot,
                None => {
                    let slot = keys.len();
                    seen.insert(rendered, slot);
                    keys.push(key);
                    groups.push(Vec::new());
                    slot
                }
            };
            groups[slot].push(row);
            assignment.push(slot);
        }
        debug!("grouped {} rows into {} groups", self.length(), keys.len());
        Ok(GroupBy {
            frame: self,
            key_columns,
            keys,
            groups,
            assignment,
        })
    }
}

impl<'a> GroupBy<'a> {
    /// Number of groups.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Group keys in first-seen order.
    pub fn keys(&self) -> &[GroupKey] {
        &self.keys
    }

    /// Materialize every partition as an independent sub-frame,
    /// original row labels preserved.
    pub fn groups(&self) -> Result<Vec<Frame>> {
        self.groups
            .iter()
            .map(|rows| self.frame.select_positions(rows))
            .collect()
    }

    /// Replace every group with one row, applying `f` to each non-key
    /// column's cells within the group.
    pub fn aggregate_with<F>(&self, f: F) -> Result<Frame>
    where
        F: Fn(&[Value]) -> Value,
    {
        self.materialize(|column, rows| {
            let cells = rows
                .iter()
                .map(|&r| column.get(r))
                .collect::<Result<Vec<_>>>()?;
            Ok(f(&cells))
        })
    }

    /// Apply a built-in aggregator to every non-key column. Each
    /// non-key column is checked up front: anything non-numeric fails
    /// with a type error (`Count` excepted), before any output exists.
    pub fn agg(&self, op: Aggregate) -> Result<Frame> {
        if op != Aggregate::Count {
            for (c, label) in self.frame.cols.labels().iter().enumerate() {
                if !self.key_columns.contains(&c) && !aggregable(&self.frame.columns[c]) {
                    return Err(Error::Type(format!(
                        "{:?} requires a numeric column, but {:?} is not",
                        op, label
                    )));
                }
            }
        }
        self.materialize(|column, rows| apply_aggregate(op, column, rows))
    }

    pub fn count(&self) -> Result<Frame> {
        self.agg(Aggregate::Count)
    }

    pub fn sum(&self) -> Result<Frame> {
        self.agg(Aggregate::Sum)
    }

    pub fn mean(&self) -> Result<Frame> {
        self.agg(Aggregate::Mean)
    }

    pub fn min(&self) -> Result<Frame> {
        self.agg(Aggregate::Min)
    }

    pub fn max(&self) -> Result<Frame> {
        self.agg(Aggregate::Max)
    }

    pub fn median(&self) -> Result<Frame> {
        self.agg(Aggregate::Median)
    }

    pub fn var(&self) -> Result<Frame> {
        self.agg(Aggregate::Variance)
    }

    pub fn std(&self) -> Result<Frame> {
        self.agg(Aggregate::StdDev)
    }

    pub fn skew(&self) -> Result<Frame> {
        self.agg(Aggregate::Skewness)
    }

    pub fn kurt(&self) -> Result<Frame> {
        self.agg(Aggregate::Kurtosis)
    }

    /// Running per-group aggregate, one output row per source row in
    /// source order. Key columns pass through unchanged; every other
    /// column must be numeric. A null cell emits null and leaves the
    /// accumulator untouched. Supported: count, sum, mean, min, max.
    pub fn cumulative(&self, op: Aggregate) -> Result<Frame> {
        match op {
            Aggregate::Count
            | Aggregate::Sum
            | Aggregate::Mean
            | Aggregate::Min
            | Aggregate::Max => {}
            other => {
                return Err(Error::InvalidInput(format!(
                    "{:?} has no cumulative variant",
                    other
                )))
            }
        }
        let value_cols: Vec<usize> = (0..self.frame.size())
            .filter(|c| !self.key_columns.contains(c))
            .collect();
        for &c in &value_cols {
            if !aggregable(&self.frame.columns[c]) {
                return Err(Error::Type(format!(
                    "cumulative {:?} requires numeric columns, but {:?} is not",
                    op,
                    self.frame.cols.label(c)?
                )));
            }
        }
        let mut running: Vec<Vec<Moments>> =
            vec![vec![Moments::new(); value_cols.len()]; self.len()];
        let mut out_columns: Vec<Column> = self
            .frame
            .cols
            .labels()
            .iter()
            .map(|_| Column::new())
            .collect();
        for row in 0..self.frame.length() {
            let slot = self.assignment[row];
            for (vi, &c) in value_cols.iter().enumerate() {
                let cell = self.frame.columns[c].get(row)?;
                let out = match cell.as_f64() {
                    Some(x) => {
                        let acc = &mut running[slot][vi];
                        acc.push(x);
                        match op {
                            Aggregate::Count => Value::Int64(acc.count() as i64),
                            Aggregate::Sum => Value::from(acc.sum()),
                            Aggregate::Mean => Value::from(acc.mean()),
                            Aggregate::Min => Value::from(acc.min()),
                            Aggregate::Max => Value::from(acc.max()),
                            _ => Value::Null,
                        }
                    }
                    None => Value::Null,
                };
                out_columns[c].push(out);
            }
            for &c in &self.key_columns {
                out_columns[c].push(self.frame.columns[c].get(row)?);
            }
        }
        Ok(Frame {
            rows: self.frame.rows.clone(),
            cols: self.frame.cols.clone(),
            columns: out_columns,
        })
    }

    /// Per-group battery {count, mean, std, var, min, max} for every
    /// numeric non-key column, one row per group and one output column
    /// per (column, statistic).
    pub fn describe(&self) -> Result<Frame> {
        let mut out = self.keyed_skeleton()?;
        for (c, label) in self.frame.cols.labels().iter().enumerate() {
            if self.key_columns.contains(&c) || !self.frame.columns[c].is_numeric() {
                continue;
            }
            let mut per_stat: Vec<Vec<Value>> = vec![Vec::with_capacity(self.len()); 6];
            for rows in &self.groups {
                let moments = collect_moments(&self.frame.columns[c], rows)?;
                per_stat[0].push(Value::Int64(moments.count() as i64));
                per_stat[1].push(Value::from(moments.mean()));
                per_stat[2].push(Value::from(moments.stddev()));
                per_stat[3].push(Value::from(moments.variance()));
                per_stat[4].push(Value::from(moments.min()));
                per_stat[5].push(Value::from(moments.max()));
            }
            for (stat, cells) in ["count", "mean", "std", "var", "min", "max"]
                .iter()
                .zip(per_stat)
            {
                out.add_values(format!("{}_{}", label, stat), cells)?;
            }
        }
        Ok(out)
    }

    /// One output row per group: row labels from the rendered keys,
    /// key columns holding each group's key values.
    fn keyed_skeleton(&self) -> Result<Frame> {
        let mut rows = Index::new();
        for key in &self.keys {
            let label = key
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            if rows.contains(&label) {
                rows.add_synthesized();
            } else {
                rows.add(label)?;
            }
        }
        let mut out = Frame {
            rows,
            cols: Index::new(),
            columns: Vec::new(),
        };
        for (ki, &c) in self.key_columns.iter().enumerate() {
            let cells = self.keys.iter().map(|k| k[ki].clone()).collect();
            out.add_values(self.frame.cols.label(c)?.to_string(), cells)?;
        }
        Ok(out)
    }

    /// Shared materialization for aggregate paths: the skeleton plus
    /// one aggregated cell per (group, non-key column).
    fn materialize<F>(&self, cell: F) -> Result<Frame>
    where
        F: Fn(&Column, &[usize]) -> Result<Value>,
    {
        let mut out = self.keyed_skeleton()?;
        for (c, label) in self.frame.cols.labels().iter().enumerate() {
            if self.key_columns.contains(&c) {
                continue;
            }
            let cells = self
                .groups
                .iter()
                .map(|rows| cell(&self.frame.columns[c], rows))
                .collect::<Result<Vec<_>>>()?;
            out.add_values(label.clone(), cells)?;
        }
        Ok(out)
    }
}

/// Whether a column may feed the numeric-only aggregators: packed
/// numerics always; untyped columns when no non-null cell is
/// non-numeric (an all-null column aggregates to null, not an error).
fn aggregable(column: &Column) -> bool {
    match column {
        Column::Int64 { .. } | Column::Float64 { .. } => true,
        Column::Untyped(values) => values.iter().all(|v| v.is_null() || v.is_numeric()),
        _ => false,
    }
}

fn collect_moments(column: &Column, rows: &[usize]) -> Result<Moments> {
    let mut moments = Moments::new();
    for &r in rows {
        if let Some(x) = column.get(r)?.as_f64() {
            moments.push(x);
        }
    }
    Ok(moments)
}

fn apply_aggregate(op: Aggregate, column: &Column, rows: &[usize]) -> Result<Value> {
    if op == Aggregate::Count {
        let mut n = 0i64;
        for &r in rows {
            if !column.get(r)?.is_null() {
                n += 1;
            }
        }
        return Ok(Value::Int64(n));
    }
    if op == Aggregate::Median {
        let mut values = Vec::new();
        for &r in rows {
            if let Some(x) = column.get(r)?.as_f64() {
                values.push(x);
            }
        }
        return Ok(Value::from(median(&mut values)));
    }
    let moments = collect_moments(column, rows)?;
    let result = match op {
        Aggregate::Sum => moments.sum(),
        Aggregate::Mean => moments.mean(),
        Aggregate::Min => moments.min(),
        Aggregate::Max => moments.max(),
        Aggregate::Variance => moments.variance(),
        Aggregate::StdDev => moments.stddev(),
        Aggregate::Skewness => moments.skewness(),
        Aggregate::Kurtosis => moments.kurtosis(),
        Aggregate::Count | Aggregate::Median => None,
    };
    Ok(Value::from(result))
}

impl Frame {
    /// Frame-wide battery {count, mean, std, var, min, max}: one row
    /// per statistic, one column per numeric column.
    pub fn describe(&self) -> Result<Frame> {
        let mut out = Frame::new();
        let mut first = true;
        for (c, label) in self.cols.labels().iter().enumerate() {
            if !self.columns[c].is_numeric() {
                continue;
            }
            let all: Vec<usize> = (0..self.length()).collect();
            let moments = collect_moments(&self.columns[c], &all)?;
            if first {
                for stat in ["count", "mean", "std", "var", "min", "max"] {
                    out.rows.add(stat.to_string())?;
                }
                first = false;
            }
            out.add_values(
                label.clone(),
                vec![
                    Value::Int64(moments.count() as i64),
                    Value::from(moments.mean()),
                    Value::from(moments.stddev()),
                    Value::from(moments.variance()),
                    Value::from(moments.min()),
                    Value::from(moments.max()),
                ],
            )?;
        }
        Ok(out)
    }
}
