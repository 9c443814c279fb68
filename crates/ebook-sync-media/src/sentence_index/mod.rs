//! Sentence-to-chunk index for playback.
//!
//! Playback asks "which chunk holds sentence N" many times per second. The
//! index answers from an exact map (chunks whose sentences are inlined) and
//! falls back to a binary search over sorted sentence ranges.
//!
//! The index is built once per chunk list and never mutated; a new chunk list
//! gets a new index.

mod builder;

pub use builder::SentenceIndexBuilder;

use std::collections::HashMap;

use serde::Serialize;

use crate::chunk::lenient::truncate;
use crate::chunk::Chunk;

/// Where a sentence lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentenceChunkEntry {
    /// Position of the chunk in the chunk list.
    pub chunk_index: usize,
    /// Position within `chunk.sentences`; `None` when only the range is known.
    pub local_index: Option<usize>,
    /// Number of inlined sentences in the chunk; `None` when only the range is known.
    pub total: Option<usize>,
    pub chunk_key: Option<String>,
}

/// Inclusive sentence range covered by one chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentenceRange {
    pub start: i64,
    pub end: i64,
    pub chunk_index: usize,
    pub chunk_key: Option<String>,
}

impl SentenceRange {
    /// Whether `sentence` falls inside this range.
    pub fn contains(&self, sentence: i64) -> bool {
        self.start <= sentence && sentence <= self.end
    }
}

/// Exact map plus sorted ranges, with the known sentence extent.
#[derive(Debug, Clone, Default)]
pub struct SentenceChunkIndex {
    map: HashMap<i64, SentenceChunkEntry>,
    /// Sorted ascending by `start`.
    ranges: Vec<SentenceRange>,
    /// Running maximum of `ranges[..=i].end`.
    reach: Vec<i64>,
    min: Option<i64>,
    max: Option<i64>,
}

impl SentenceChunkIndex {
    /// Build the index for a chunk list.
    pub fn build(chunks: &[Chunk]) -> Self {
        let mut builder = SentenceIndexBuilder::new();
        for (chunk_index, chunk) in chunks.iter().enumerate() {
            builder.add_chunk(chunk_index, chunk);
        }
        let index = builder.build();
        tracing::debug!(
            chunks = chunks.len(),
            exact = index.map.len(),
            ranges = index.ranges.len(),
            min = ?index.min,
            max = ?index.max,
            "Built sentence index"
        );
        index
    }

    /// Smallest known sentence number.
    pub fn min(&self) -> Option<i64> {
        self.min
    }

    /// Largest known sentence number.
    pub fn max(&self) -> Option<i64> {
        self.max
    }

    /// Whether the index knows no sentences at all.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty() && self.ranges.is_empty()
    }

    /// Ranges sorted by start.
    pub fn ranges(&self) -> &[SentenceRange] {
        &self.ranges
    }

    /// Exact-map entry for a sentence number.
    pub fn exact(&self, sentence: i64) -> Option<&SentenceChunkEntry> {
        self.map.get(&sentence)
    }

    /// Locate a sentence. The number is truncated toward zero; non-finite
    /// input yields `None`.
    pub fn lookup(&self, sentence_number: f64) -> Option<SentenceChunkEntry> {
        let sentence = truncate(sentence_number)?;
        if let Some(entry) = self.map.get(&sentence) {
            return Some(entry.clone());
        }
        self.find_range(sentence).map(|range| SentenceChunkEntry {
            chunk_index: range.chunk_index,
            local_index: None,
            total: None,
            chunk_key: range.chunk_key.clone(),
        })
    }

    /// Range containing `sentence`; among overlapping ranges the one with the
    /// latest start wins.
    pub fn find_range(&self, sentence: i64) -> Option<&SentenceRange> {
        let upper = self.ranges.partition_point(|range| range.start <= sentence);
        // `reach[i]` is the furthest end among ranges[..=i], so the walk stops
        // at the first range that cannot be followed by a covering one.
        for i in (0..upper).rev() {
            if self.reach[i] < sentence {
                return None;
            }
            if self.ranges[i].contains(sentence) {
                return Some(&self.ranges[i]);
            }
        }
        None
    }
}

/// Build the index for a chunk list.
pub fn build_sentence_chunk_index(chunks: &[Chunk]) -> SentenceChunkIndex {
    SentenceChunkIndex::build(chunks)
}

/// Locate a sentence in the index.
pub fn lookup_sentence(index: &SentenceChunkIndex, sentence_number: f64) -> Option<SentenceChunkEntry> {
    index.lookup(sentence_number)
}

/// The chunk that holds a sentence.
///
/// Returns `None` if the index points past the end of `chunks`, which happens
/// when the index was built for a different chunk list.
pub fn find_chunk_by_sentence<'a>(
    index: &SentenceChunkIndex,
    chunks: &'a [Chunk],
    sentence_number: f64,
) -> Option<&'a Chunk> {
    let entry = index.lookup(sentence_number)?;
    chunks.get(entry.chunk_index)
}
