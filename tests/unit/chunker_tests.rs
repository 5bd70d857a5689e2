/*!
 * Tests for chunk splitting
 */

use brailleflow::translation::chunker::split;

use crate::common;

/// Test that chunks always reassemble to the source
#[test]
fn test_split_withVariousSizes_shouldReassembleExactly() {
    let text = format!("{}Tail without newline é ü ñ", common::sample_document(30));

    for size in [1, 7, 40, 64, 65, 200, 5000] {
        let chunks = split(&text, size);
        let joined: String = chunks.iter().map(|c| c.text).collect();
        assert_eq!(joined, text, "size {}", size);
        assert!(chunks.iter().all(|c| c.text.chars().count() <= size), "size {}", size);
        assert!(chunks.iter().enumerate().all(|(i, c)| c.index == i && c.total == chunks.len()));
    }
}

/// Test that spans point back into the source
#[test]
fn test_split_spans_shouldBeContiguous() {
    let text = common::sample_document(10);
    let chunks = split(&text, 100);

    let mut expected_start = 0;
    for chunk in &chunks {
        assert_eq!(chunk.span.start, expected_start);
        assert_eq!(&text[chunk.span.clone()], chunk.text);
        expected_start = chunk.span.end;
    }
    assert_eq!(expected_start, text.len());
}

/// Test that paragraph breaks are preferred when available
#[test]
fn test_split_withParagraphs_shouldEndChunksAtParagraphs() {
    let text = common::sample_document(20);
    let chunks = split(&text, 300);

    assert!(chunks.len() > 1);
    for chunk in &chunks[..chunks.len() - 1] {
        assert!(chunk.text.ends_with("\n\n"), "chunk {} ends mid-paragraph", chunk.index);
    }
}
