//! Delimiter context detection for JavaScript reindentation.
//!
//! There is no syntax tree here: the source is scanned from the start,
//! skipping string literals and comments, while a stack of unclosed
//! `(`, `[` and `{` is maintained.

/// Syntactic context at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentContext {
    /// Inside an unclosed `(` or `[`.
    InsideBrackets {
        /// Line number of the opening delimiter.
        opener_line: u32,
        /// Column of the opening delimiter.
        opener_col: u32,
        /// Whether there is content after the opener on the same line.
        has_content_on_opener_line: bool,
    },

    /// Inside an unclosed `{`.
    InsideBraces {
        /// Line number of the opening brace.
        opener_line: u32,
        /// Column of the opening brace.
        opener_col: u32,
    },

    /// The line starts with the closer of an unclosed delimiter.
    ClosingDelimiter {
        /// Line number of the matching opening delimiter.
        opener_line: u32,
        /// Column of the matching opening delimiter.
        opener_col: u32,
        /// The closing delimiter character.
        delimiter: char,
    },

    /// No unclosed delimiter.
    TopLevel,
}

#[derive(Debug, Clone, Copy)]
struct Opener {
    ch: char,
    line: u32,
    col: u32,
    /// Byte offset just past the opener
    after: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Code,
    String(char),
    LineComment,
    BlockComment,
}

/// Detect the context for `line` (0-indexed) of `source`.
pub fn detect_context(source: &str, line: u32) -> IndentContext {
    let line_start = match line_start_offset(source, line) {
        Some(offset) => offset,
        None => return IndentContext::TopLevel,
    };

    let stack = unclosed_openers(&source[..line_start]);
    let Some(top) = stack.last().copied() else {
        return IndentContext::TopLevel;
    };

    let rest = &source[line_start..];
    let first = rest.chars().find(|c| *c != ' ' && *c != '\t');
    if let Some(closer) = first {
        if matches!(closer, ')' | ']' | '}') {
            return IndentContext::ClosingDelimiter {
                opener_line: top.line,
                opener_col: top.col,
                delimiter: closer,
            };
        }
    }

    if top.ch == '{' {
        return IndentContext::InsideBraces {
            opener_line: top.line,
            opener_col: top.col,
        };
    }

    IndentContext::InsideBrackets {
        opener_line: top.line,
        opener_col: top.col,
        has_content_on_opener_line: has_content_after(source, top.after),
    }
}

/// Byte offset of the first character of `line`, if the line exists.
pub(crate) fn line_start_offset(source: &str, line: u32) -> Option<usize> {
    if line == 0 {
        return Some(0);
    }
    source
        .match_indices('\n')
        .nth(line as usize - 1)
        .map(|(idx, _)| idx + 1)
}

/// Whether anything other than whitespace or a comment follows `offset` on its line.
fn has_content_after(source: &str, offset: usize) -> bool {
    let tail = &source[offset..];
    let line = tail.split('\n').next().unwrap_or("");
    let trimmed = line.trim();
    !(trimmed.is_empty() || trimmed.starts_with("//") || trimmed.starts_with("/*"))
}

fn unclosed_openers(prefix: &str) -> Vec<Opener> {
    let mut stack: Vec<Opener> = Vec::new();
    let mut state = ScanState::Code;
    let mut line = 0u32;
    let mut col = 0u32;
    let mut chars = prefix.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        let next = chars.peek().map(|(_, c)| *c);
        match state {
            ScanState::Code => match ch {
                '"' | '\'' | '`' => state = ScanState::String(ch),
                '/' if next == Some('/') => state = ScanState::LineComment,
                '/' if next == Some('*') => {
                    state = ScanState::BlockComment;
                    chars.next();
                    col += 1;
                }
                '(' | '[' | '{' => stack.push(Opener {
                    ch,
                    line,
                    col,
                    after: idx + ch.len_utf8(),
                }),
                ')' | ']' | '}' => {
                    stack.pop();
                }
                _ => {}
            },
            ScanState::String(quote) => {
                if ch == '\\' {
                    if let Some((_, escaped)) = chars.next() {
                        if escaped == '\n' {
                            line += 1;
                            col = 0;
                            continue;
                        }
                        col += 1;
                    }
                } else if ch == quote || (ch == '\n' && quote != '`') {
                    state = ScanState::Code;
                }
            }
            ScanState::LineComment => {
                if ch == '\n' {
                    state = ScanState::Code;
                }
            }
            ScanState::BlockComment => {
                if ch == '*' && next == Some('/') {
                    state = ScanState::Code;
                    chars.next();
                    col += 1;
                }
            }
        }

        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }

    stack
}
