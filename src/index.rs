//! Bidirectional label↔position mapping for one frame axis.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Ordered sequence of unique labels plus the reverse label→position
/// map. The mapping is a bijection between positions `[0, n)` and
/// labels at all times.
#[derive(Debug, Clone, Default)]
pub struct Index {
    labels: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Index {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an index from labels, failing on duplicates.
    pub fn from_labels<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = Self::new();
        for label in labels {
            index.add(label)?;
        }
        Ok(index)
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Append a label at the next position, failing on a duplicate.
    pub fn add(&mut self, label: impl Into<String>) -> Result<usize> {
        let label = label.into();
        if self.positions.contains_key(&label) {
            return Err(Error::DuplicateLabel(label));
        }
        let pos = self.labels.len();
        self.positions.insert(label.clone(), pos);
        self.labels.push(label);
        Ok(pos)
    }

    /// Remove a label, renumbering every subsequent position down by
    /// one. Returns the position the label held.
    pub fn remove(&mut self, label: &str) -> Result<usize> {
        let pos = self
            .positions
            .remove(label)
            .ok_or_else(|| Error::LabelNotFound(label.to_string()))?;
        self.labels.remove(pos);
        for p in self.positions.values_mut() {
            if *p > pos {
                *p -= 1;
            }
        }
        Ok(pos)
    }

    /// Swap a label in place, keeping its position. Renaming a label
    /// to itself is a no-op; any other collision is an error.
    pub fn rename(&mut self, old: &str, new: impl Into<String>) -> Result<()> {
        let new = new.into();
        if new == old {
            return Ok(());
        }
        if self.positions.contains_key(&new) {
            return Err(Error::DuplicateLabel(new));
        }
        let pos = self
            .positions
            .remove(old)
            .ok_or_else(|| Error::LabelNotFound(old.to_string()))?;
        self.positions.insert(new.clone(), pos);
        self.labels[pos] = new;
        Ok(())
    }

    /// Position of a label, failing when unknown.
    pub fn position(&self, label: &str) -> Result<usize> {
        self.positions
            .get(label)
            .copied()
            .ok_or_else(|| Error::LabelNotFound(label.to_string()))
    }

    /// Label at a position, failing when out of range.
    pub fn label(&self, pos: usize) -> Result<&str> {
        self.labels
            .get(pos)
            .map(String::as_str)
            .ok_or(Error::IndexOutOfBounds {
                index: pos,
                size: self.labels.len(),
            })
    }

    pub fn contains(&self, label: &str) -> bool {
        self.positions.contains_key(label)
    }

    /// All labels in position order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The smallest unused non-negative integer, formatted as a string.
    /// Used wherever a label is synthesized rather than supplied.
    pub fn synthesize(&self) -> String {
        let mut candidate = 0usize;
        loop {
            let label = candidate.to_string();
            if !self.positions.contains_key(&label) {
                return label;
            }
            candidate += 1;
        }
    }

    /// Append a synthesized label and return it.
    pub fn add_synthesized(&mut self) -> String {
        let label = self.synthesize();
        // The synthesized label is unused by construction.
        let _ = self.add(label.clone());
        label
    }
}
