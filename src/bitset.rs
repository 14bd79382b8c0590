//! Compact set of non-negative integers for row-selection masks.
//!
//! The structure is three-level: an ordered map of non-empty 4096-bit
//! blocks, a 64-bit summary word per block (bit i set when payload word
//! i is non-zero), and 64 payload words of 64 bits each. Fully-empty
//! regions of the domain cost no memory, and forward scans skip them by
//! consulting the summary word and the block map instead of walking
//! individual words.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use crate::error::{Error, Result};

const WORD_BITS: u64 = 64;
const WORDS_PER_BLOCK: u64 = 64;
const BLOCK_BITS: u64 = WORD_BITS * WORDS_PER_BLOCK;

/// One 4096-bit block: payload words plus a summary of which are non-zero.
#[derive(Debug, Clone)]
struct Block {
    summary: u64,
    words: Box<[u64; WORDS_PER_BLOCK as usize]>,
}

impl Block {
    fn new() -> Self {
        Self {
            summary: 0,
            words: Box::new([0u64; WORDS_PER_BLOCK as usize]),
        }
    }
}

/// Sparse set of non-negative integers.
///
/// Single-index and half-open-range mutation take `i64` and reject
/// negative indices with a range error; the cardinality is maintained
/// incrementally so `cardinality()` is O(1).
#[derive(Debug, Clone, Default)]
pub struct SparseBitSet {
    blocks: BTreeMap<u64, Block>,
    cardinality: u64,
}

impl SparseBitSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            blocks: BTreeMap::new(),
            cardinality: 0,
        }
    }

    /// Number of set bits.
    pub fn cardinality(&self) -> u64 {
        self.cardinality
    }

    /// Whether no bit is set.
    pub fn is_empty(&self) -> bool {
        self.cardinality == 0
    }

    /// Set a single bit.
    pub fn set(&mut self, i: i64) -> Result<()> {
        let bit = check_index(i)?;
        self.insert(bit);
        Ok(())
    }

    /// Set every bit in the half-open range `[i, j)`.
    pub fn set_range(&mut self, i: i64, j: i64) -> Result<()> {
        let (from, to) = check_range(i, j)?;
        self.apply_range(from, to, RangeOp::Set);
        Ok(())
    }

    /// Clear a single bit.
    pub fn clear(&mut self, i: i64) -> Result<()> {
        let bit = check_index(i)?;
        self.remove(bit);
        Ok(())
    }

    /// Clear every bit in the half-open range `[i, j)`.
    pub fn clear_range(&mut self, i: i64, j: i64) -> Result<()> {
        let (from, to) = check_range(i, j)?;
        self.apply_range(from, to, RangeOp::Clear);
        Ok(())
    }

    /// Invert a single bit.
    pub fn flip(&mut self, i: i64) -> Result<()> {
        let bit = check_index(i)?;
        if self.contains(bit) {
            self.remove(bit);
        } else {
            self.insert(bit);
        }
        Ok(())
    }

    /// Invert every bit in the half-open range `[i, j)`.
    pub fn flip_range(&mut self, i: i64, j: i64) -> Result<()> {
        let (from, to) = check_range(i, j)?;
        self.apply_range(from, to, RangeOp::Flip);
        Ok(())
    }

    /// Whether the bit is set. Untouched or cleared indices report
    /// `false` without allocating storage for their region.
    pub fn get(&self, i: i64) -> Result<bool> {
        let bit = check_index(i)?;
        Ok(self.contains(bit))
    }

    /// Smallest set index greater than or equal to `from`, or `None`
    /// when no such bit exists. A negative `from` behaves as zero, so
    /// the method is safe for unbounded forward iteration.
    pub fn next_set_bit(&self, from: i64) -> Option<i64> {
        let start = if from < 0 { 0 } else { from as u64 };
        self.next_set(start).map(|b| b as i64)
    }

    /// Iterate over set bits in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        let mut cursor = Some(0u64);
        std::iter::from_fn(move || {
            let here = self.next_set(cursor?)?;
            cursor = here.checked_add(1);
            Some(here)
        })
    }

    // --- infallible internal contract used by the frame layer ---

    /// Set `bit`, reporting whether it was newly set.
    pub(crate) fn insert(&mut self, bit: u64) -> bool {
        let (block_id, word_idx, mask) = split(bit);
        let block = self.blocks.entry(block_id).or_insert_with(Block::new);
        let word = &mut block.words[word_idx];
        if *word & mask != 0 {
            return false;
        }
        *word |= mask;
        block.summary |= 1 << word_idx;
        self.cardinality += 1;
        true
    }

    /// Clear `bit`, reporting whether it was previously set.
    pub(crate) fn remove(&mut self, bit: u64) -> bool {
        let (block_id, word_idx, mask) = split(bit);
        let Some(block) = self.blocks.get_mut(&block_id) else {
            return false;
        };
        let word = &mut block.words[word_idx];
        if *word & mask == 0 {
            return false;
        }
        *word &= !mask;
        if *word == 0 {
            block.summary &= !(1 << word_idx);
        }
        self.cardinality -= 1;
        if block.summary == 0 {
            self.blocks.remove(&block_id);
        }
        true
    }

    /// Whether `bit` is set.
    pub(crate) fn contains(&self, bit: u64) -> bool {
        let (block_id, word_idx, mask) = split(bit);
        match self.blocks.get(&block_id) {
            Some(block) => block.words[word_idx] & mask != 0,
            None => false,
        }
    }

    fn next_set(&self, from: u64) -> Option<u64> {
        let start_block = from / BLOCK_BITS;
        for (&block_id, block) in self.blocks.range(start_block..) {
            let base = block_id * BLOCK_BITS;
            // Word offset to resume from inside the first candidate block.
            let mut word_idx = if block_id == start_block {
                ((from - base) / WORD_BITS) as usize
            } else {
                0
            };
            let mut summary = block.summary >> word_idx << word_idx;
            while summary != 0 {
                word_idx = summary.trailing_zeros() as usize;
                let mut word = block.words[word_idx];
                let word_base = base + word_idx as u64 * WORD_BITS;
                if word_base < from {
                    word &= !0u64 << (from - word_base);
                }
                if word != 0 {
                    return Some(word_base + word.trailing_zeros() as u64);
                }
                summary &= !(1u64 << word_idx);
            }
        }
        None
    }

    fn apply_range(&mut self, from: u64, to: u64, op: RangeOp) {
        if from >= to {
            return;
        }
        let first_word = from / WORD_BITS;
        let last_word = (to - 1) / WORD_BITS;
        let mut w = first_word;
        while w <= last_word {
            let block_id = w / WORDS_PER_BLOCK;
            // Clearing inside a region that holds no block is a no-op;
            // skip straight to the next allocated block.
            if op == RangeOp::Clear && !self.blocks.contains_key(&block_id) {
                match self.blocks.range(block_id + 1..).next() {
                    Some((&next_id, _)) => {
                        w = (next_id * WORDS_PER_BLOCK).max(w + 1);
                        continue;
                    }
                    None => return,
                }
            }
            let mut mask = !0u64;
            if w == first_word {
                mask &= !0u64 << (from % WORD_BITS);
            }
            if w == last_word && to % WORD_BITS != 0 {
                mask &= !0u64 >> (WORD_BITS - to % WORD_BITS);
            }
            self.apply_word(block_id, (w % WORDS_PER_BLOCK) as usize, mask, op);
            w += 1;
        }
    }

    fn apply_word(&mut self, block_id: u64, word_idx: usize, mask: u64, op: RangeOp) {
        let block = self.blocks.entry(block_id).or_insert_with(Block::new);
        let word = &mut block.words[word_idx];
        let before = word.count_ones() as u64;
        match op {
            RangeOp::Set => *word |= mask,
            RangeOp::Clear => *word &= !mask,
            RangeOp::Flip => *word ^= mask,
        }
        let after = word.count_ones() as u64;
        self.cardinality = self.cardinality + after - before;
        if *word == 0 {
            block.summary &= !(1 << word_idx);
        } else {
            block.summary |= 1 << word_idx;
        }
        if block.summary == 0 {
            self.blocks.remove(&block_id);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RangeOp {
    Set,
    Clear,
    Flip,
}

fn check_index(i: i64) -> Result<u64> {
    if i < 0 {
        return Err(Error::NegativeIndex(i));
    }
    Ok(i as u64)
}

fn check_range(i: i64, j: i64) -> Result<(u64, u64)> {
    if i < 0 {
        return Err(Error::NegativeIndex(i));
    }
    if j < i {
        return Err(Error::InvalidInput(format!(
            "invalid range: [{}, {})",
            i, j
        )));
    }
    Ok((i as u64, j as u64))
}

fn split(bit: u64) -> (u64, usize, u64) {
    let block_id = bit / BLOCK_BITS;
    let word_idx = ((bit % BLOCK_BITS) / WORD_BITS) as usize;
    let mask = 1u64 << (bit % WORD_BITS);
    (block_id, word_idx, mask)
}

/// Readable report of the set as coalesced ranges, e.g. `{3, 8..12}`.
/// Not a persistence format.
impl Display for SparseBitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut run: Option<(u64, u64)> = None;
        let mut first = true;
        let mut emit = |f: &mut fmt::Formatter<'_>, (lo, hi): (u64, u64)| -> fmt::Result {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            if lo == hi {
                write!(f, "{}", lo)
            } else {
                write!(f, "{}..{}", lo, hi + 1)
            }
        };
        for bit in self.iter() {
            match run {
                Some((lo, hi)) if bit == hi + 1 => run = Some((lo, bit)),
                Some(done) => {
                    emit(f, done)?;
                    run = Some((bit, bit));
                }
                None => run = Some((bit, bit)),
            }
        }
        if let Some(done) = run {
            emit(f, done)?;
        }
        write!(f, "}}")
    }
}
