//! Sentence index builder.

use std::collections::HashMap;

use super::{SentenceChunkEntry, SentenceChunkIndex, SentenceRange};
use crate::chunk::{resolve_chunk_key, Chunk};

/// Builds a [`SentenceChunkIndex`] from a chunk list.
#[derive(Debug, Default)]
pub struct SentenceIndexBuilder {
    map: HashMap<i64, SentenceChunkEntry>,
    ranges: Vec<SentenceRange>,
    min: Option<i64>,
    max: Option<i64>,
}

impl SentenceIndexBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one chunk at position `chunk_index` of the chunk list.
    ///
    /// Chunks must be added in list order: for a sentence number inlined in
    /// several chunks, the first one added keeps it.
    pub fn add_chunk(&mut self, chunk_index: usize, chunk: &Chunk) {
        if !chunk.is_identifiable() {
            tracing::warn!(chunk_index, "Skipping chunk without key, bounds or sentences");
            return;
        }
        let chunk_key = resolve_chunk_key(chunk);
        let bounds = chunk.sentence_bounds();

        if let Some((start, end)) = bounds {
            self.ranges.push(SentenceRange {
                start,
                end,
                chunk_index,
                chunk_key: chunk_key.clone(),
            });
            self.extend(start);
            self.extend(end);
        }

        if let Some(sentences) = &chunk.sentences {
            let total = sentences.len();
            for (local_index, sentence) in sentences.iter().enumerate() {
                let Some(number) = sentence.sentence_number else {
                    continue;
                };
                self.map.entry(number).or_insert_with(|| SentenceChunkEntry {
                    chunk_index,
                    local_index: Some(local_index),
                    total: Some(total),
                    chunk_key: chunk_key.clone(),
                });
                self.extend(number);
            }
        }
    }

    /// Finish the index, sorting ranges by start.
    pub fn build(mut self) -> SentenceChunkIndex {
        self.ranges.sort_by_key(|range| range.start);
        let reach = self
            .ranges
            .iter()
            .scan(i64::MIN, |furthest, range| {
                *furthest = (*furthest).max(range.end);
                Some(*furthest)
            })
            .collect();
        SentenceChunkIndex {
            map: self.map,
            ranges: self.ranges,
            reach,
            min: self.min,
            max: self.max,
        }
    }

    fn extend(&mut self, number: i64) {
        self.min = Some(self.min.map_or(number, |min| min.min(number)));
        self.max = Some(self.max.map_or(number, |max| max.max(number)));
    }
}
