//! Leading-whitespace rewriting for block reindentation.
//!
//! Lines are processed top to bottom and each one is measured against the
//! already-rewritten text, so a line indented relative to an opener line
//! sees that opener line's final indentation.

use super::calculator::{calculate_indentation, IndentationConfig};
use super::context::{detect_context, line_start_offset};

/// Reindents every line that begins within `start..=end` (byte offsets).
///
/// A line that begins before `start` (because `start` points into the
/// middle of it) is left alone. Whitespace-only lines are emptied.
///
/// # Returns
///
/// The full source text with the affected lines reindented.
pub fn reindent_region(source: &str, start: usize, end: usize, config: &IndentationConfig) -> String {
    let start = start.min(source.len());
    let end = end.min(source.len());
    if start > end {
        return source.to_string();
    }

    let mut first_line = source[..start].matches('\n').count() as u32;
    if start > 0 && !source[..start].ends_with('\n') {
        first_line += 1;
    }
    let last_line = source[..end].matches('\n').count() as u32;

    let mut text = source.to_string();
    for line in first_line..=last_line {
        let Some(line_start) = line_start_offset(&text, line) else {
            break;
        };
        let line_end = text[line_start..]
            .find('\n')
            .map(|i| line_start + i)
            .unwrap_or(text.len());
        let line_text = &text[line_start..line_end];
        let existing_ws_len = line_text
            .bytes()
            .take_while(|b| *b == b' ' || *b == b'\t')
            .count();

        let new_indent = if line_text.trim().is_empty() {
            String::new()
        } else {
            let context = detect_context(&text, line);
            let target_column = calculate_indentation(context, config, &text);
            generate_whitespace(target_column, config)
        };

        if text[line_start..line_start + existing_ws_len] != new_indent {
            log::trace!("Reindenting line {} to {:?}", line, new_indent);
            text.replace_range(line_start..line_start + existing_ws_len, &new_indent);
        }
    }

    text
}

/// Generates a whitespace string for the target column.
///
/// When `insert_spaces` is true, generates only spaces.
/// When `insert_spaces` is false, generates tabs with trailing spaces
/// for alignment if needed.
pub fn generate_whitespace(target_column: u32, config: &IndentationConfig) -> String {
    if config.insert_spaces {
        " ".repeat(target_column as usize)
    } else {
        let tab_size = config.tab_size.max(1); // Avoid division by zero
        let tabs = target_column / tab_size;
        let spaces = target_column % tab_size;
        let mut result = "\t".repeat(tabs as usize);
        result.push_str(&" ".repeat(spaces as usize));
        result
    }
}
