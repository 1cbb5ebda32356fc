//! Boundary-safe text chunking
//!
//! Splits text into bounded segments sized for single synthesis calls.
//! The character bound is a soft target; word integrity is the hard
//! invariant, so a single word longer than the bound still becomes its
//! own oversized chunk.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_CHUNK_CHARS: usize = 1000;

/// Listening speed used for per-chunk duration estimates. Intentionally
/// different from the 200 wpm reading rate in readaloud-extract.
pub const LISTENING_WORDS_PER_MINUTE: f64 = 150.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextChunk {
    /// 0-based, sequential.
    pub index: usize,
    pub text: String,
    pub estimated_duration_minutes: f64,
}

/// Greedy word-packing chunker.
///
/// Joining the resulting chunk texts with single spaces reproduces the
/// whitespace-normalized input exactly. Empty input yields no chunks.
pub fn chunk_text(text: &str, max_chunk_chars: usize) -> Vec<TextChunk> {
    let max_chunk_chars = max_chunk_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    let close = |chunks: &mut Vec<TextChunk>, current: &mut String| {
        if current.is_empty() {
            return;
        }
        let text = std::mem::take(current);
        let words = text.split_whitespace().count();
        chunks.push(TextChunk {
            index: chunks.len(),
            estimated_duration_minutes: words as f64 / LISTENING_WORDS_PER_MINUTE,
            text,
        });
    };

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();
        if !current.is_empty() && current_chars + 1 + word_chars > max_chunk_chars {
            close(&mut chunks, &mut current);
            current_chars = 0;
        }
        if current.is_empty() {
            current_chars = word_chars;
        } else {
            current.push(' ');
            current_chars += 1 + word_chars;
        }
        current.push_str(word);
    }
    close(&mut chunks, &mut current);

    chunks
}
