//
// utf16.rs
//
// Conversions between LSP positions and byte offsets
//

use tower_lsp::lsp_types::Position;

/// Convert a UTF-16 column offset (from LSP Position.character) to a byte
/// offset within the given line. The dependency engine works in byte offsets,
/// not UTF-16 code units.
pub fn utf16_column_to_byte_offset(line: &str, utf16_col: u32) -> usize {
    let mut utf16_count = 0;
    for (byte_idx, ch) in line.char_indices() {
        if utf16_count >= utf16_col as usize {
            return byte_idx;
        }
        utf16_count += ch.len_utf16();
    }
    line.len()
}

/// Byte offset of `position` in `text`, clamped to the end of its line or of
/// the text.
pub fn position_to_byte_offset(text: &str, position: Position) -> usize {
    let mut line_start = 0;
    for _ in 0..position.line {
        match text[line_start..].find('\n') {
            Some(i) => line_start += i + 1,
            None => return text.len(),
        }
    }
    let line_end = text[line_start..]
        .find('\n')
        .map(|i| line_start + i)
        .unwrap_or(text.len());
    line_start + utf16_column_to_byte_offset(&text[line_start..line_end], position.character)
}
