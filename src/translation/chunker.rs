/*!
 * Chunk splitting for large documents.
 *
 * Chunks are borrowed slices of the source; concatenating them in order
 * reproduces the source exactly. Sizes are counted in characters, never bytes,
 * so a split can never land inside a multi-byte character.
 */

use std::ops::Range;

/// A bounded slice of a larger text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Zero-based position of the chunk
    pub index: usize,
    /// Number of chunks the text was split into
    pub total: usize,
    /// Chunk content
    pub text: &'a str,
    /// Byte range of the chunk in the source text
    pub span: Range<usize>,
}

impl Chunk<'_> {
    /// Whether this is the final chunk
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.total
    }
}

/// Split `text` into chunks of at most `max_size` characters.
///
/// Each cut prefers, within the current window, the last paragraph break, then
/// the last line break, and falls back to a hard cut at `max_size`. Texts that
/// already fit come back as a single chunk. A `max_size` of zero is treated as one.
pub fn split(text: &str, max_size: usize) -> Vec<Chunk<'_>> {
    let max_size = max_size.max(1);
    let mut spans = Vec::new();
    let mut start = 0;

    loop {
        let rest = &text[start..];
        let window_end = match rest.char_indices().nth(max_size) {
            Some((offset, _)) => offset,
            None => {
                spans.push(start..text.len());
                break;
            }
        };

        let window = &rest[..window_end];
        let cut = boundary_in(window).unwrap_or(window_end);
        spans.push(start..start + cut);
        start += cut;
    }

    let total = spans.len();
    spans
        .into_iter()
        .enumerate()
        .map(|(index, span)| Chunk {
            index,
            total,
            text: &text[span.clone()],
            span,
        })
        .collect()
}

/// Byte offset just after the best break in `window`, if any
fn boundary_in(window: &str) -> Option<usize> {
    match window.rfind("\n\n") {
        Some(p) if p > 0 => return Some(p + 2),
        _ => {}
    }
    match window.rfind('\n') {
        Some(p) if p > 0 => Some(p + 1),
        _ => None,
    }
}
