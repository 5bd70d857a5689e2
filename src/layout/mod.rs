/*!
 * Page layout for translated braille.
 *
 * - `cells`: Braille ASCII and Unicode braille conversion
 * - `wrap`: word-aware wrapping to a cell width
 * - `paginate`: grouping into pages and the display/embosser serializations
 */

pub mod cells;
pub mod paginate;
pub mod wrap;

pub use cells::{BLANK_CELL, ascii_to_unicode, unicode_to_ascii};
pub use paginate::{
    Page, PageGeometry, pages_to_embosser, paginate, to_display, to_embosser_output,
};
pub use wrap::{wrap, wrap_text};

/// Lay out translated text as on-screen pages of Unicode braille
pub fn display_pages(translated: &str, geometry: PageGeometry) -> Vec<String> {
    let unicode = ascii_to_unicode(translated);
    let lines = wrap_text(&unicode, geometry.cells_per_row, BLANK_CELL);
    to_display(&paginate(lines, geometry.lines_per_page))
}

/// Pages of Braille ASCII for an embosser
pub fn embosser_pages(translated: &str, geometry: PageGeometry) -> Vec<Page> {
    let ascii = unicode_to_ascii(translated);
    let lines = wrap_text(&ascii, geometry.cells_per_row, ' ');
    paginate(lines, geometry.lines_per_page)
}

/// Lay out translated text as an embosser-ready Braille ASCII file
pub fn embosser_output(translated: &str, geometry: PageGeometry) -> Vec<u8> {
    pages_to_embosser(&embosser_pages(translated, geometry))
}
