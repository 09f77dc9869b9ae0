//! Line alignment by recursive longest-matching-block search.
//!
//! The aligner finds the longest run of equal keys shared by both
//! sequences, then recurses into the regions to its left and right. The
//! resulting matching blocks are merged when adjacent and turned into a
//! list of [`AlignmentOp`]s that tiles both sequences.
//!
//! When the optimized side has at least [`POPULAR_THRESHOLD_LEN`] lines,
//! keys that occur in more than one percent of it (typically blank lines
//! and closing braces) are not used to seed a match. They can still extend
//! a match that was seeded elsewhere. This keeps alignment of long files
//! anchored on distinctive lines.

use std::collections::HashMap;
use std::ops::Range;

use serde::Serialize;

/// Minimum length of the optimized sequence before popular keys are
/// ignored as match seeds.
pub const POPULAR_THRESHOLD_LEN: usize = 200;

/// Classification of one alignment op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpTag {
    /// Both ranges hold equal keys, pairwise.
    Equal,
    /// Both ranges are non-empty and differ.
    Replace,
    /// Only the original range is non-empty.
    Delete,
    /// Only the optimized range is non-empty.
    Insert,
}

/// One contiguous correspondence between original and optimized lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignmentOp {
    /// How the two ranges relate.
    pub tag: OpTag,
    /// Half-open range into the original sequence.
    pub original: Range<usize>,
    /// Half-open range into the optimized sequence.
    pub optimized: Range<usize>,
}

impl AlignmentOp {
    /// Builds an op from raw indices `[i1, i2)` and `[j1, j2)`.
    #[must_use]
    pub const fn new(tag: OpTag, i1: usize, i2: usize, j1: usize, j2: usize) -> Self {
        Self {
            tag,
            original: i1..i2,
            optimized: j1..j2,
        }
    }

    fn differing(i1: usize, i2: usize, j1: usize, j2: usize) -> Option<Self> {
        let tag = match (i1 < i2, j1 < j2) {
            (true, true) => OpTag::Replace,
            (true, false) => OpTag::Delete,
            (false, true) => OpTag::Insert,
            (false, false) => return None,
        };
        Some(Self::new(tag, i1, i2, j1, j2))
    }
}

/// A run of `size` equal keys starting at `original` and `optimized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchingBlock {
    /// Start index in the original sequence.
    pub original: usize,
    /// Start index in the optimized sequence.
    pub optimized: usize,
    /// Number of equal keys in the run.
    pub size: usize,
}

/// Aligns two key sequences.
///
/// Built once per comparison; the index over the optimized side is reused
/// by every longest-match search.
#[derive(Debug)]
pub struct SequenceMatcher<'a> {
    original: &'a [&'a str],
    optimized: &'a [&'a str],
    seeds: HashMap<&'a str, Vec<usize>>,
}

impl<'a> SequenceMatcher<'a> {
    /// Indexes the optimized sequence.
    #[must_use]
    pub fn new(original: &'a [&'a str], optimized: &'a [&'a str]) -> Self {
        let mut seeds: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (index, key) in optimized.iter().enumerate() {
            seeds.entry(*key).or_default().push(index);
        }

        let len = optimized.len();
        if len >= POPULAR_THRESHOLD_LEN {
            let limit = len.div_euclid(100).saturating_add(1);
            seeds.retain(|_, positions| positions.len() <= limit);
        }

        Self {
            original,
            optimized,
            seeds,
        }
    }

    fn same(&self, i: usize, j: usize) -> bool {
        match (self.original.get(i), self.optimized.get(j)) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        }
    }

    /// Finds the longest block of equal keys inside the given ranges.
    ///
    /// Ties resolve to the block starting earliest in the original, then
    /// earliest in the optimized sequence. Returns a zero-sized block at
    /// the range starts when nothing matches.
    #[must_use]
    pub fn find_longest_match(&self, original: Range<usize>, optimized: Range<usize>) -> MatchingBlock {
        let mut best = MatchingBlock {
            original: original.start,
            optimized: optimized.start,
            size: 0,
        };
        // Length of the match ending at (i - 1, j), keyed by j.
        let mut run_lengths: HashMap<usize, usize> = HashMap::new();

        for i in original.clone() {
            let mut next_lengths: HashMap<usize, usize> = HashMap::new();
            let positions = self
                .original
                .get(i)
                .and_then(|key| self.seeds.get(key))
                .map_or(&[][..], Vec::as_slice);

            for &j in positions {
                if j < optimized.start {
                    continue;
                }
                if j >= optimized.end {
                    break;
                }
                let previous = j
                    .checked_sub(1)
                    .and_then(|before| run_lengths.get(&before))
                    .copied()
                    .unwrap_or(0);
                let length = previous.saturating_add(1);
                next_lengths.insert(j, length);
                if length > best.size {
                    best = MatchingBlock {
                        original: (i + 1).saturating_sub(length),
                        optimized: (j + 1).saturating_sub(length),
                        size: length,
                    };
                }
            }
            run_lengths = next_lengths;
        }

        self.extend_block(best, &original, &optimized)
    }

    /// Grows a block over neighbouring equal keys, including keys that
    /// were too popular to seed a match.
    fn extend_block(
        &self,
        mut block: MatchingBlock,
        original: &Range<usize>,
        optimized: &Range<usize>,
    ) -> MatchingBlock {
        while block.original > original.start
            && block.optimized > optimized.start
            && self.same(block.original - 1, block.optimized - 1)
        {
            block.original -= 1;
            block.optimized -= 1;
            block.size += 1;
        }

        while block.original + block.size < original.end
            && block.optimized + block.size < optimized.end
            && self.same(block.original + block.size, block.optimized + block.size)
        {
            block.size += 1;
        }

        block
    }

    /// Returns the maximal matching blocks in increasing order, adjacent
    /// blocks merged, terminated by a zero-sized block at the sequence ends.
    #[must_use]
    pub fn matching_blocks(&self) -> Vec<MatchingBlock> {
        let mut pending = vec![(0..self.original.len(), 0..self.optimized.len())];
        let mut found = Vec::new();

        while let Some((original, optimized)) = pending.pop() {
            let block = self.find_longest_match(original.clone(), optimized.clone());
            if block.size == 0 {
                continue;
            }
            found.push(block);

            let original_end = block.original + block.size;
            let optimized_end = block.optimized + block.size;
            if original.start < block.original && optimized.start < block.optimized {
                pending.push((original.start..block.original, optimized.start..block.optimized));
            }
            if original_end < original.end && optimized_end < optimized.end {
                pending.push((original_end..original.end, optimized_end..optimized.end));
            }
        }
        found.sort_unstable();

        let mut merged: Vec<MatchingBlock> = Vec::with_capacity(found.len() + 1);
        for block in found {
            match merged.last_mut() {
                Some(last)
                    if last.original + last.size == block.original
                        && last.optimized + last.size == block.optimized =>
                {
                    last.size += block.size;
                }
                _ => merged.push(block),
            }
        }
        merged.push(MatchingBlock {
            original: self.original.len(),
            optimized: self.optimized.len(),
            size: 0,
        });
        merged
    }

    /// Converts the matching blocks into ops tiling both sequences.
    #[must_use]
    pub fn ops(&self) -> Vec<AlignmentOp> {
        let mut ops = Vec::new();
        let mut i = 0;
        let mut j = 0;

        for block in self.matching_blocks() {
            ops.extend(AlignmentOp::differing(i, block.original, j, block.optimized));
            i = block.original + block.size;
            j = block.optimized + block.size;
            if block.size > 0 {
                ops.push(AlignmentOp::new(
                    OpTag::Equal,
                    block.original,
                    i,
                    block.optimized,
                    j,
                ));
            }
        }

        ops
    }
}

/// Aligns two key sequences and returns the ops in order.
///
/// Deterministic for identical inputs. Empty inputs yield an empty list.
#[must_use]
pub fn align(original: &[&str], optimized: &[&str]) -> Vec<AlignmentOp> {
    SequenceMatcher::new(original, optimized).ops()
}

#[cfg(test)]
#[path = "align_tests.rs"]
mod tests;
