/*!
 * Word-aware line wrapping.
 *
 * Widths are counted in cells (characters). Words are packed greedily; a word
 * wider than the line is the only thing ever cut mid-word.
 */

/// Wrap one line to at most `width` cells, breaking on `separator`.
///
/// Lines that already fit are returned unchanged. Otherwise runs of separators
/// collapse to one, words never split unless longer than `width`, and an
/// oversize word is cut into `width`-sized pieces whose remainder starts the
/// next line. A `width` of zero is treated as one.
pub fn wrap(line: &str, width: usize, separator: char) -> Vec<String> {
    let width = width.max(1);
    if line.chars().count() <= width {
        return vec![line.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in line.split(separator).filter(|w| !w.is_empty()) {
        let word_len = word.chars().count();

        if word_len > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
            }
            let (full, remainder) = hard_split(word, width);
            lines.extend(full);
            current_len = remainder.chars().count();
            current = remainder;
        } else if current_len == 0 {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current.push(separator);
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_len = word_len;
        }
    }

    if current_len > 0 {
        lines.push(current);
    }
    if lines.is_empty() {
        // Nothing but separators
        lines.push(String::new());
    }
    lines
}

/// Cut `word` into full `width`-sized pieces and a final remainder
fn hard_split(word: &str, width: usize) -> (Vec<String>, String) {
    let chars: Vec<char> = word.chars().collect();
    let mut pieces: Vec<String> = chars.chunks(width).map(|c| c.iter().collect()).collect();
    let remainder = pieces.pop().unwrap_or_default();
    (pieces, remainder)
}

/// Split `text` into lines and wrap each of them.
///
/// Empty lines are kept so paragraph spacing survives. A trailing carriage
/// return on a line is dropped.
pub fn wrap_text(text: &str, width: usize, separator: char) -> Vec<String> {
    text.split('\n')
        .flat_map(|line| wrap(line.strip_suffix('\r').unwrap_or(line), width, separator))
        .collect()
}
