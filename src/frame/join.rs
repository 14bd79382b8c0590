//! Relational combination of two frames by key equality.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use super::core::Frame;
use crate::error::{Error, Result};
use crate::index::Index;
use crate::value::Value;

/// Join semantics. LEFT keeps every left row (null-padding the right
/// side on a miss), RIGHT mirrors it with output order following the
/// right operand, INNER keeps matches only, OUTER keeps matches once
/// plus both sides' unmatched rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Outer,
}

/// Separator between the components of a composite key.
const KEY_SEP: char = '\u{1f}';

impl Frame {
    /// Join on row labels.
    pub fn join(&self, other: &Frame, how: JoinType) -> Result<Frame> {
        let left_keys = self.rows.labels().iter().map(|l| Some(l.clone())).collect();
        let right_keys = other.rows.labels().iter().map(|l| Some(l.clone())).collect();
        self.join_impl(other, how, left_keys, right_keys)
    }

    /// Join on a per-row key function applied to both operands' rows.
    /// A null key never matches.
    pub fn join_by<F>(&self, other: &Frame, how: JoinType, key: F) -> Result<Frame>
    where
        F: Fn(&[Value]) -> Value,
    {
        let left_keys = self.row_keys(|row| key(row))?;
        let right_keys = other.row_keys(|row| key(row))?;
        self.join_impl(other, how, left_keys, right_keys)
    }

    /// Join on named key columns, present on both operands. The key
    /// columns are retained on both sides of the output; a row whose
    /// key holds any null never matches.
    pub fn join_on(&self, other: &Frame, how: JoinType, keys: &[&str]) -> Result<Frame> {
        if keys.is_empty() {
            return Err(Error::InvalidInput("no key columns given".to_string()));
        }
        let left_pos: Vec<usize> = keys
            .iter()
            .map(|k| self.cols.position(k))
            .collect::<Result<_>>()?;
        let right_pos: Vec<usize> = keys
            .iter()
            .map(|k| other.cols.position(k))
            .collect::<Result<_>>()?;
        let left_keys = composite_keys(self, &left_pos)?;
        let right_keys = composite_keys(other, &right_pos)?;
        self.join_impl(other, how, left_keys, right_keys)
    }

    /// Natural join: keys are the column names shared by both
    /// operands, in the receiver's column order.
    pub fn merge(&self, other: &Frame, how: JoinType) -> Result<Frame> {
        let shared: Vec<&str> = self
            .cols
            .labels()
            .iter()
            .filter(|l| other.cols.contains(l))
            .map(String::as_str)
            .collect();
        if shared.is_empty() {
            return Err(Error::InvalidInput(
                "merge requires at least one shared column name".to_string(),
            ));
        }
        self.join_on(other, how, &shared)
    }

    fn row_keys<F>(&self, key: F) -> Result<Vec<Option<String>>>
    where
        F: Fn(&[Value]) -> Value,
    {
        (0..self.length())
            .map(|r| {
                let k = key(&self.row(r)?);
                Ok(if k.is_null() { None } else { Some(k.key_string()) })
            })
            .collect()
    }

    fn join_impl(
        &self,
        other: &Frame,
        how: JoinType,
        left_keys: Vec<Option<String>>,
        right_keys: Vec<Option<String>>,
    ) -> Result<Frame> {
        // Pair list: (left row, right row), either side absent on a
        // non-match destined for null padding.
        let pairs = match how {
            JoinType::Left | JoinType::Inner | JoinType::Outer => {
                let mut by_key: HashMap<&str, Vec<usize>> = HashMap::new();
                for (r, key) in right_keys.iter().enumerate() {
                    if let Some(key) = key {
                        by_key.entry(key).or_default().push(r);
                    }
                }
                let mut pairs: Vec<(Option<usize>, Option<usize>)> = Vec::new();
                for (l, key) in left_keys.iter().enumerate() {
                    match key.as_deref().and_then(|k| by_key.get(k)) {
                        Some(matches) => {
                            for &r in matches {
                                pairs.push((Some(l), Some(r)));
                            }
                        }
                        None if how != JoinType::Inner => pairs.push((Some(l), None)),
                        None => {}
                    }
                }
                if how == JoinType::Outer {
                    let mut matched = vec![false; other.length()];
                    for (_, r) in &pairs {
                        if let Some(r) = r {
                            matched[*r] = true;
                        }
                    }
                    for (r, hit) in matched.iter().enumerate() {
                        if !hit {
                            pairs.push((None, Some(r)));
                        }
                    }
                }
                pairs
            }
            JoinType::Right => {
                // The mirror of LEFT: build on the left, iterate the
                // right, so output order follows the right operand
                // while columns stay (left, right).
                let mut by_key: HashMap<&str, Vec<usize>> = HashMap::new();
                for (l, key) in left_keys.iter().enumerate() {
                    if let Some(key) = key {
                        by_key.entry(key).or_default().push(l);
                    }
                }
                let mut pairs = Vec::new();
                for (r, key) in right_keys.iter().enumerate() {
                    match key.as_deref().and_then(|k| by_key.get(k)) {
                        Some(matches) => {
                            for &l in matches {
                                pairs.push((Some(l), Some(r)));
                            }
                        }
                        None => pairs.push((None, Some(r))),
                    }
                }
                pairs
            }
        };

        // Result row labels come from the owning side; collisions from
        // Cartesian expansion get synthesized labels.
        let mut rows = Index::new();
        for (l, r) in &pairs {
            let label = match (l, r) {
                (Some(l), _) => self.rows.label(*l)?,
                (None, Some(r)) => other.rows.label(*r)?,
                (None, None) => unreachable!("pair with neither side"),
            };
            if rows.contains(label) {
                rows.add_synthesized();
            } else {
                rows.add(label.to_string())?;
            }
        }

        let left_picks: Vec<Option<usize>> = pairs.iter().map(|(l, _)| *l).collect();
        let right_picks: Vec<Option<usize>> = pairs.iter().map(|(_, r)| *r).collect();

        let mut cols = Index::new();
        let mut columns = Vec::with_capacity(self.size() + other.size());
        for (c, label) in self.cols.labels().iter().enumerate() {
            cols.add(label.clone())?;
            columns.push(self.columns[c].gather(&left_picks)?);
        }
        for (c, label) in other.cols.labels().iter().enumerate() {
            let mut name = label.clone();
            while cols.contains(&name) {
                name.push_str("_right");
            }
            cols.add(name)?;
            columns.push(other.columns[c].gather(&right_picks)?);
        }
        debug!(
            "{:?} join: {} x {} -> {} rows",
            how,
            self.length(),
            other.length(),
            rows.len()
        );
        Ok(Frame { rows, cols, columns })
    }
}

/// Per-row composite key over the given column positions; `None` when
/// any component is null.
fn composite_keys(frame: &Frame, positions: &[usize]) -> Result<Vec<Option<String>>> {
    let mut keys = Vec::with_capacity(frame.length());
    for r in 0..frame.length() {
        let mut parts = Vec::with_capacity(positions.len());
        let mut null = false;
        for &c in positions {
            let v = frame.columns[c].get(r)?;
            if v.is_null() {
                null = true;
                break;
            }
            parts.push(v.key_string());
        }
        keys.push(if null {
            None
        } else {
            Some(parts.join(&KEY_SEP.to_string()))
        });
    }
    Ok(keys)
}
