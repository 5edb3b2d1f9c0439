//! File Segmenter
//!
//! Splits one file's text into overlapping segments bounded by an
//! estimated token cost, so every segment fits the oracle's input budget.
//! Lines are numbered with their absolute 1-based file line so the
//! oracle's line references need no translation back.

use serde::{Deserialize, Serialize};

use crate::models::settings::ReviewConfig;

/// One bounded, possibly-overlapping slice of a file.
///
/// Created by the segmenter, consumed exactly once by the segment
/// analyzer, not retained afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Line-numbered text submitted to the oracle
    pub content: String,
    /// First file line covered (1-based)
    pub start_line: usize,
    /// Last file line covered (inclusive)
    pub end_line: usize,
    /// Zero-based index of this segment within the file
    pub index: usize,
    /// Total number of segments for the file
    pub total_count: usize,
}

/// Estimate the token cost of a piece of text.
///
/// Four characters per token, the usual rough cut for code.
pub fn estimate_cost(text: &str) -> usize {
    text.len() / 4
}

/// Splits file text into cost-bounded segments with line overlap.
pub struct Segmenter {
    chunk_cost: usize,
    chunk_overlap: usize,
}

impl Segmenter {
    /// Create a segmenter with a cost budget (token units) and an overlap
    /// (lines). The overlap is clamped below the budget-implied minimum
    /// progress of one line.
    pub fn new(chunk_cost: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_cost: chunk_cost.max(1),
            chunk_overlap,
        }
    }

    /// Create a segmenter from a review configuration.
    pub fn from_config(config: &ReviewConfig) -> Self {
        Self::new(config.chunk_cost, config.chunk_overlap)
    }

    /// Split `text` into ordered segments.
    ///
    /// Guarantees: the segments' ranges cover every line with no gap;
    /// consecutive segments overlap by exactly the configured number of
    /// lines except when clamping is needed to guarantee forward
    /// progress; terminates in at most one step per line even when a
    /// single line's cost exceeds the budget.
    pub fn segment(&self, text: &str) -> Vec<Segment> {
        if text.is_empty() {
            return Vec::new();
        }

        let numbered: Vec<String> = text
            .lines()
            .enumerate()
            .map(|(i, line)| format!("{:>5} | {}", i + 1, line))
            .collect();
        let costs: Vec<usize> = numbered.iter().map(|l| estimate_cost(l)).collect();
        let line_count = numbered.len();

        let total_cost: usize = costs.iter().sum();
        if total_cost <= self.chunk_cost {
            return vec![Segment {
                content: numbered.join("\n"),
                start_line: 1,
                end_line: line_count,
                index: 0,
                total_count: 1,
            }];
        }

        // Greedy walk: accumulate lines while the budget holds, always
        // taking at least one line so an oversized line cannot stall.
        let mut ranges: Vec<(usize, usize)> = Vec::new();
        let mut start = 0usize;
        loop {
            let mut end = start;
            let mut acc = 0usize;
            while end < line_count {
                let cost = costs[end];
                if end > start && acc + cost > self.chunk_cost {
                    break;
                }
                acc += cost;
                end += 1;
            }
            let last = end - 1;
            ranges.push((start, last));

            if end >= line_count {
                break;
            }

            // Next segment re-reads the configured overlap, clamped to
            // strictly advance past the previous start.
            let mut next = last.saturating_sub(self.chunk_overlap);
            if next <= start {
                next = start + 1;
            }
            start = next;
        }

        let total_count = ranges.len();
        ranges
            .into_iter()
            .enumerate()
            .map(|(index, (from, to))| Segment {
                content: numbered[from..=to].join("\n"),
                start_line: from + 1,
                end_line: to + 1,
                index,
                total_count,
            })
            .collect()
    }
}
