//
// dependency/symbol.rs
//
// Identifier extraction from JavaScript source
//

use std::ops::Range;

use indexmap::IndexSet;

use super::block::DependencyBlock;
use crate::reserved_words::is_reserved_word;

/// An identifier and where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolAtPoint {
    pub name: String,
    pub start: usize,
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// The identifier touching `offset`, either under it or ending right at it.
pub fn symbol_at(text: &str, offset: usize) -> Option<SymbolAtPoint> {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }

    let start = text[..offset]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_identifier_char(*c))
        .last()
        .map(|(i, _)| i)
        .unwrap_or(offset);
    let end = text[offset..]
        .char_indices()
        .find(|(_, c)| !is_identifier_char(*c))
        .map(|(i, _)| offset + i)
        .unwrap_or(text.len());

    let name = &text[start..end];
    match name.chars().next() {
        Some(first) if !first.is_numeric() => Some(SymbolAtPoint {
            name: name.to_string(),
            start,
        }),
        _ => None,
    }
}

/// Offset of the first whole-identifier occurrence of `name` at or after `from`.
pub fn find_identifier(text: &str, name: &str, from: usize) -> Option<usize> {
    if name.is_empty() || from > text.len() || !text.is_char_boundary(from) {
        return None;
    }
    text[from..]
        .match_indices(name)
        .map(|(i, _)| from + i)
        .find(|&start| {
            let before = text[..start].chars().next_back();
            let after = text[start + name.len()..].chars().next();
            !before.is_some_and(is_identifier_char) && !after.is_some_and(is_identifier_char)
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Code,
    String(char),
    LineComment,
    BlockComment,
}

/// Identifiers used after the block's parameter list, in first-use order.
///
/// Reserved words, property names (`obj.name`), object keys (`name:`), and
/// anything inside strings or comments are skipped.
pub fn body_identifiers(text: &str, block: &DependencyBlock) -> Vec<String> {
    let body_start = (block.names_span.end + 1).min(text.len());
    identifiers_in(&text[body_start..])
}

/// Identifiers in `source`, in first-use order, deduplicated.
pub fn identifiers_in(source: &str) -> Vec<String> {
    let mut found: IndexSet<String> = IndexSet::new();
    let mut state = ScanState::Code;
    let mut chars = source.char_indices().peekable();
    let mut previous_significant: Option<char> = None;

    while let Some((i, c)) = chars.next() {
        match state {
            ScanState::Code => {
                let next = chars.peek().map(|(_, n)| *n);
                if c == '"' || c == '\'' || c == '`' {
                    state = ScanState::String(c);
                } else if c == '/' && next == Some('/') {
                    state = ScanState::LineComment;
                } else if c == '/' && next == Some('*') {
                    chars.next();
                    state = ScanState::BlockComment;
                } else if is_identifier_char(c) && !c.is_numeric() {
                    let mut end = i + c.len_utf8();
                    while let Some(&(j, n)) = chars.peek() {
                        if !is_identifier_char(n) {
                            break;
                        }
                        end = j + n.len_utf8();
                        chars.next();
                    }
                    let ident = &source[i..end];
                    let is_property = previous_significant == Some('.');
                    let is_key = matches!(previous_significant, Some('{') | Some(','))
                        && source[end..].trim_start().starts_with(':');
                    if !is_property && !is_key && !is_reserved_word(ident) {
                        found.insert(ident.to_string());
                    }
                    previous_significant = ident.chars().last();
                    continue;
                } else if c.is_numeric() {
                    // skip the rest of a number literal such as 1e5 or 0x1F
                    while let Some(&(_, n)) = chars.peek() {
                        if !is_identifier_char(n) && n != '.' {
                            break;
                        }
                        chars.next();
                    }
                }
                if !c.is_whitespace() {
                    previous_significant = Some(c);
                }
            }
            ScanState::String(quote) => {
                if c == '\\' {
                    chars.next();
                } else if c == quote {
                    state = ScanState::Code;
                    previous_significant = Some(c);
                }
            }
            ScanState::LineComment => {
                if c == '\n' {
                    state = ScanState::Code;
                }
            }
            ScanState::BlockComment => {
                if c == '*' && chars.peek().map(|(_, n)| *n) == Some('/') {
                    chars.next();
                    state = ScanState::Code;
                }
            }
        }
    }

    found.into_iter().collect()
}

/// Byte ranges of string literals and comments in `source`, delimiters
/// included. An unterminated literal or comment runs to the end.
pub fn non_code_ranges(source: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut state = ScanState::Code;
    let mut start = 0;
    let mut chars = source.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match state {
            ScanState::Code => {
                let next = chars.peek().map(|(_, n)| *n);
                if c == '"' || c == '\'' || c == '`' {
                    state = ScanState::String(c);
                    start = i;
                } else if c == '/' && next == Some('/') {
                    state = ScanState::LineComment;
                    start = i;
                } else if c == '/' && next == Some('*') {
                    chars.next();
                    state = ScanState::BlockComment;
                    start = i;
                }
            }
            ScanState::String(quote) => {
                if c == '\\' {
                    chars.next();
                } else if c == quote {
                    ranges.push(start..i + 1);
                    state = ScanState::Code;
                }
            }
            ScanState::LineComment => {
                if c == '\n' {
                    ranges.push(start..i);
                    state = ScanState::Code;
                }
            }
            ScanState::BlockComment => {
                if c == '*' && chars.peek().map(|(_, n)| *n) == Some('/') {
                    chars.next();
                    ranges.push(start..i + 2);
                    state = ScanState::Code;
                }
            }
        }
    }

    if state != ScanState::Code {
        ranges.push(start..source.len());
    }
    ranges
}
