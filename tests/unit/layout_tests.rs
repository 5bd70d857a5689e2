/*!
 * Tests for wrapping and pagination
 */

use brailleflow::layout::{
    PageGeometry, ascii_to_unicode, display_pages, embosser_output, paginate, to_display,
    to_embosser_output, wrap,
};

fn owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

/// Test that wrapped lines never exceed the width
#[test]
fn test_wrap_withVariousWidths_shouldRespectWidth() {
    let line = "BRAILLE IS A TACTILE WRITING SYSTEM USED BY PEOPLE WHO ARE VISUALLY IMPAIRED";
    for width in 1..=line.len() {
        let wrapped = wrap(line, width, ' ');
        assert!(wrapped.iter().all(|l| l.chars().count() <= width), "width {}", width);
    }
}

/// Test that words that fit are never split
#[test]
fn test_wrap_wordsShorterThanWidth_shouldStayIntact() {
    let line = "ONE TWO THREE FOUR FIVE SIX SEVEN EIGHT NINE TEN";
    let wrapped = wrap(line, 12, ' ');

    let words: Vec<&str> = wrapped.iter().flat_map(|l| l.split(' ')).collect();
    assert_eq!(words, line.split(' ').collect::<Vec<_>>());
}

/// Test that oversize words split into full pieces plus a remainder
#[test]
fn test_wrap_oversizeWord_shouldSplitIntoWidthPieces() {
    assert_eq!(wrap("ABCDEFGHIJK", 4, ' '), owned(&["ABCD", "EFGH", "IJK"]));
}

/// Test that a line that already fits is returned byte-identical
#[test]
fn test_wrap_lineAtWidth_shouldBeUnchanged() {
    assert_eq!(wrap("A  B", 4, ' '), owned(&["A  B"]));
}

/// Test the page size bound
#[test]
fn test_paginate_withVariousSizes_shouldBoundPages() {
    let lines: Vec<String> = (0..23).map(|i| format!("LINE {}", i)).collect();
    for per_page in 1..30 {
        let pages = paginate(lines.clone(), per_page);
        assert!(pages.iter().all(|p| p.len() <= per_page));
        assert_eq!(pages.iter().map(|p| p.len()).sum::<usize>(), 23);
    }
}

/// Test a short document laid out for the screen
#[test]
fn test_displayPages_helloWorld_shouldBeSingleUnwrappedPage() {
    let translated = ",HELLO _W";
    let pages = display_pages(translated, PageGeometry::new(40, 25));

    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0], ascii_to_unicode(translated));
    assert!(!pages[0].contains('\n'));
}

/// Test that display pages use plain line breaks only
#[test]
fn test_toDisplay_shouldNotUseCrlfOrFormFeed() {
    let pages = paginate(owned(&["A", "B", "C"]), 2);
    for page in to_display(&pages) {
        assert!(!page.contains('\r'));
        assert!(!page.contains('\x0C'));
    }
}

/// Test embosser byte layout for one page
#[test]
fn test_toEmbosserOutput_singlePage_shouldHaveNoFormFeed() {
    assert_eq!(to_embosser_output(owned(&["AB", "CD"]), 5), b"AB\r\nCD\r\n");
}

/// Test embosser byte layout across pages
#[test]
fn test_toEmbosserOutput_twoPages_shouldJoinWithCrlfFormFeed() {
    assert_eq!(to_embosser_output(owned(&["A", "B"]), 1), b"A\r\n\x0CB\r\n");
}

/// Test the full embosser layout of a multi-line document
#[test]
fn test_embosserOutput_document_shouldWrapPaginateAndTrim() {
    let translated = "AAAA BBBB CCCC\nDD\n\n\n";
    let output = embosser_output(translated, PageGeometry::new(10, 2));
    assert_eq!(output, b"AAAA BBBB\r\nCCCC\r\n\x0CDD\r\n");
}

/// Test that an empty document still produces one page
#[test]
fn test_embosserOutput_emptyDocument_shouldBeOneBlankPage() {
    assert_eq!(embosser_output("", PageGeometry::default()), b"\r\n");
    assert_eq!(display_pages("\n\n", PageGeometry::default()), vec![String::new()]);
}
