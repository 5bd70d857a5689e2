/*!
 * Braille cell encodings.
 *
 * Engines emit North American Braille ASCII, where each printable character
 * from 0x20 to 0x5F stands for one six-dot cell. Screens want Unicode braille
 * patterns (U+2800..U+283F). These helpers convert between the two.
 */

/// Braille ASCII characters in Unicode dot-pattern order
const ASCII_CELLS: &str = " A1B'K2L@CIF/MSP\"E3H9O6R^DJG>NTQ,*5<-U8V.%[$+X!&;:4\\0Z7(_?W]#Y)=";

/// The empty braille cell
pub const BLANK_CELL: char = '\u{2800}';

const UNICODE_BASE: u32 = 0x2800;

/// Convert one Braille ASCII character to its Unicode cell.
///
/// The range 0x60..=0x7F is read as 0x40..=0x5F, so lower case letters and
/// `` ` { | } ~ `` share cells with their upper half. Characters outside the
/// Braille ASCII range come back unchanged.
pub fn ascii_to_unicode_char(c: char) -> char {
    let upper = if ('\u{60}'..='\u{7F}').contains(&c) {
        char::from(c as u8 - 0x20)
    } else {
        c
    };
    match ASCII_CELLS.find(upper) {
        Some(index) => char::from_u32(UNICODE_BASE + index as u32).unwrap_or(c),
        None => c,
    }
}

/// Convert one six-dot Unicode cell to Braille ASCII; anything else is unchanged
pub fn unicode_to_ascii_char(c: char) -> char {
    let code = c as u32;
    if (UNICODE_BASE..UNICODE_BASE + 64).contains(&code) {
        ASCII_CELLS.as_bytes()[(code - UNICODE_BASE) as usize] as char
    } else {
        c
    }
}

/// Convert Braille ASCII text to Unicode braille, keeping line breaks
pub fn ascii_to_unicode(text: &str) -> String {
    text.chars().map(ascii_to_unicode_char).collect()
}

/// Convert Unicode braille text to Braille ASCII, keeping line breaks
pub fn unicode_to_ascii(text: &str) -> String {
    text.chars().map(unicode_to_ascii_char).collect()
}

/// A line is blank when it holds nothing but spaces and empty cells
pub fn is_blank_line(line: &str) -> bool {
    line.chars().all(|c| c == ' ' || c == BLANK_CELL)
}
