/*!
 * Pagination and page serialization.
 *
 * Pages are built from already wrapped lines. Trailing blank lines are trimmed
 * first so the last page is not mostly empty; an empty document still yields
 * one page holding one blank line.
 *
 * Two serializations exist:
 * - display: one string per page, lines joined with `\n`
 * - embosser: CRLF between lines, CRLF + form feed between pages, and a
 *   trailing CRLF. Embosser drivers depend on this exact byte layout.
 */

use super::cells::is_blank_line;

const EMBOSSER_LINE_BREAK: &str = "\r\n";
const EMBOSSER_PAGE_BREAK: &str = "\r\n\x0C";

/// Physical or virtual page size in cells and lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGeometry {
    /// Cells per row
    pub cells_per_row: usize,
    /// Lines per page
    pub lines_per_page: usize,
}

impl PageGeometry {
    /// Create a geometry; both dimensions are raised to at least one
    pub fn new(cells_per_row: usize, lines_per_page: usize) -> Self {
        Self {
            cells_per_row: cells_per_row.max(1),
            lines_per_page: lines_per_page.max(1),
        }
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::new(40, 25)
    }
}

/// One page of wrapped lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    lines: Vec<String>,
}

impl Page {
    /// Lines on this page
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines on this page
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the page has no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines joined with `\n`
    pub fn to_display(&self) -> String {
        self.lines.join("\n")
    }

    fn to_embosser(&self) -> String {
        self.lines.join(EMBOSSER_LINE_BREAK)
    }
}

/// Drop blank lines from the end of `lines`
pub fn trim_trailing_blank(lines: &mut Vec<String>) {
    while lines.last().is_some_and(|line| is_blank_line(line)) {
        lines.pop();
    }
}

/// Group wrapped lines into pages of at most `lines_per_page` lines.
///
/// Never returns zero pages.
pub fn paginate(mut lines: Vec<String>, lines_per_page: usize) -> Vec<Page> {
    trim_trailing_blank(&mut lines);
    if lines.is_empty() {
        return vec![Page {
            lines: vec![String::new()],
        }];
    }

    let lines_per_page = lines_per_page.max(1);
    let mut pages = Vec::with_capacity(lines.len().div_ceil(lines_per_page));
    let mut remaining = lines.into_iter().peekable();
    while remaining.peek().is_some() {
        pages.push(Page {
            lines: remaining.by_ref().take(lines_per_page).collect(),
        });
    }
    pages
}

/// One display string per page
pub fn to_display(pages: &[Page]) -> Vec<String> {
    pages.iter().map(Page::to_display).collect()
}

/// Paginate wrapped lines and serialize them for an embosser
pub fn to_embosser_output(lines: Vec<String>, lines_per_page: usize) -> Vec<u8> {
    pages_to_embosser(&paginate(lines, lines_per_page))
}

/// Serialize pages for an embosser
pub fn pages_to_embosser(pages: &[Page]) -> Vec<u8> {
    let mut output = pages
        .iter()
        .map(Page::to_embosser)
        .collect::<Vec<_>>()
        .join(EMBOSSER_PAGE_BREAK);
    output.push_str(EMBOSSER_LINE_BREAK);
    output.into_bytes()
}
