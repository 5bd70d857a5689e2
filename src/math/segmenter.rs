/*!
 * Math segmentation.
 *
 * Scans a document once, left to right, and partitions it into plain-text
 * and math segments. Two delimiter forms are recognised:
 *
 * - block math: `$$ ... $$`
 * - inline math: `\( ... \)`
 *
 * The first opener found wins and closes at the nearest matching closer.
 * An opener with no closer anywhere after it stays plain text and scanning
 * goes on, so a stray `$$` does not hide later formulas of either form.
 * The scanner never fails and never alters content.
 */

use std::ops::Range;

const BLOCK_DELIM: &str = "$$";
const INLINE_OPEN: &str = "\\(";
const INLINE_CLOSE: &str = "\\)";

/// One span of the source document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text outside any math delimiters, verbatim
    Plain {
        /// Source text
        text: &'a str,
        /// Byte range in the source document
        span: Range<usize>,
    },
    /// Formula between math delimiters (delimiters excluded)
    Math {
        /// Formula text
        formula: &'a str,
        /// `true` for `$$` block math, `false` for `\(` inline math
        block: bool,
        /// Byte range in the source document, delimiters included
        span: Range<usize>,
    },
}

impl<'a> Segment<'a> {
    /// Byte range covered in the source document
    pub fn span(&self) -> Range<usize> {
        match self {
            Self::Plain { span, .. } | Self::Math { span, .. } => span.clone(),
        }
    }

    /// Whether this is a math segment
    pub fn is_math(&self) -> bool {
        matches!(self, Self::Math { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Plain,
    InBlockMath { open: usize },
    InInlineMath { open: usize },
}

/// Partition `text` into plain and math segments.
///
/// The segments cover the whole input in order, without gaps or overlaps.
/// Empty plain spans are not emitted; an empty document yields no segments.
pub fn segment(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut state = ScanState::Plain;
    // Start of the plain span that has not been emitted yet
    let mut plain_start = 0;
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        match state {
            ScanState::Plain => {
                if opens(rest, BLOCK_DELIM, BLOCK_DELIM) {
                    state = ScanState::InBlockMath { open: pos };
                    pos += BLOCK_DELIM.len();
                    continue;
                }
                if opens(rest, INLINE_OPEN, INLINE_CLOSE) {
                    state = ScanState::InInlineMath { open: pos };
                    pos += INLINE_OPEN.len();
                    continue;
                }
            }
            ScanState::InBlockMath { open } => {
                if rest.starts_with(BLOCK_DELIM) {
                    let end = pos + BLOCK_DELIM.len();
                    push_plain(&mut segments, text, plain_start..open);
                    segments.push(Segment::Math {
                        formula: &text[open + BLOCK_DELIM.len()..pos],
                        block: true,
                        span: open..end,
                    });
                    plain_start = end;
                    pos = end;
                    state = ScanState::Plain;
                    continue;
                }
            }
            ScanState::InInlineMath { open } => {
                if rest.starts_with(INLINE_CLOSE) {
                    let end = pos + INLINE_CLOSE.len();
                    push_plain(&mut segments, text, plain_start..open);
                    segments.push(Segment::Math {
                        formula: &text[open + INLINE_OPEN.len()..pos],
                        block: false,
                        span: open..end,
                    });
                    plain_start = end;
                    pos = end;
                    state = ScanState::Plain;
                    continue;
                }
            }
        }
        pos += rest.chars().next().map_or(1, char::len_utf8);
    }

    push_plain(&mut segments, text, plain_start..text.len());
    segments
}

/// Whether the document contains at least one complete math segment
pub fn contains_math(text: &str) -> bool {
    segment(text).iter().any(Segment::is_math)
}

/// Whether `rest` starts with `open` and `close` follows somewhere after it
fn opens(rest: &str, open: &str, close: &str) -> bool {
    rest.strip_prefix(open).is_some_and(|after| after.contains(close))
}

fn push_plain<'a>(segments: &mut Vec<Segment<'a>>, text: &'a str, span: Range<usize>) {
    if span.is_empty() {
        return;
    }
    segments.push(Segment::Plain {
        text: &text[span.clone()],
        span,
    });
}
