//! Stable row reordering by column values or by row labels.

use std::cmp::Ordering;

use log::debug;

use super::core::Frame;
use crate::error::Result;
use crate::value::Value;

impl Frame {
    /// New frame with rows reordered by the given columns, stably. A
    /// leading `-` on a column name sorts that key descending; ties
    /// fall through to the next key and finally keep source order.
    /// Nulls order before every non-null value.
    pub fn sort_by(&self, columns: &[&str]) -> Result<Frame> {
        let mut keys: Vec<(usize, bool)> = Vec::with_capacity(columns.len());
        for &name in columns {
            let (name, descending) = match name.strip_prefix('-') {
                Some(rest) => (rest, true),
                None => (name, false),
            };
            keys.push((self.cols.position(name)?, descending));
        }
        let cells: Vec<Vec<Value>> = keys
            .iter()
            .map(|&(c, _)| {
                (0..self.length())
                    .map(|r| self.columns[c].get(r))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        let mut order: Vec<usize> = (0..self.length()).collect();
        order.sort_by(|&a, &b| {
            for (k, &(_, descending)) in keys.iter().enumerate() {
                let ord = cells[k][a].compare(&cells[k][b]);
                let ord = if descending { ord.reverse() } else { ord };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
        debug!("sorted {} rows by {:?}", self.length(), columns);
        self.select_positions(&order)
    }

    /// New frame with rows reordered by row label. Labels that both
    /// parse as integers compare numerically, everything else
    /// lexicographically. A negative `direction` reverses the order;
    /// the sort is stable either way.
    pub fn sort_index(&self, direction: i32) -> Result<Frame> {
        let labels = self.rows.labels();
        let mut order: Vec<usize> = (0..self.length()).collect();
        order.sort_by(|&a, &b| {
            let ord = compare_labels(&labels[a], &labels[b]);
            if direction < 0 {
                ord.reverse()
            } else {
                ord
            }
        });
        self.select_positions(&order)
    }
}

fn compare_labels(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}
