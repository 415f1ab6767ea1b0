//
// document.rs
//
// Rope-backed documents for the language server
//

use ropey::Rope;
use tower_lsp::lsp_types::TextDocumentContentChangeEvent;

use crate::dependency::TextBuffer;
use crate::indentation::{reindent_region, IndentationConfig};

/// An open document as last reported by the client
#[derive(Debug, Clone)]
pub struct Document {
    pub contents: Rope,
    pub version: Option<i32>,
    pub revision: u64,
}

impl Document {
    pub fn new(text: &str, version: Option<i32>) -> Self {
        Self {
            contents: Rope::from_str(text),
            version,
            revision: 0,
        }
    }

    pub fn apply_change(&mut self, change: TextDocumentContentChangeEvent) {
        apply_change_to_rope(&mut self.contents, change);
        self.revision += 1;
    }

    pub fn text(&self) -> String {
        self.contents.to_string()
    }
}

/// Apply a single change to a Rope
fn apply_change_to_rope(contents: &mut Rope, change: TextDocumentContentChangeEvent) {
    if let Some(range) = change.range {
        let start_line = (range.start.line as usize).min(contents.len_lines().saturating_sub(1));
        let end_line = (range.end.line as usize).min(contents.len_lines().saturating_sub(1));

        let start_line_text = contents.line(start_line).to_string();
        let end_line_text = contents.line(end_line).to_string();

        let start_char = utf16_offset_to_char_offset(&start_line_text, range.start.character as usize);
        let end_char = utf16_offset_to_char_offset(&end_line_text, range.end.character as usize);

        let start_idx = contents.line_to_char(start_line) + start_char;
        let end_idx = (contents.line_to_char(end_line) + end_char).max(start_idx);

        contents.remove(start_idx..end_idx);
        contents.insert(start_idx, &change.text);
    } else {
        // Full document sync
        *contents = Rope::from_str(&change.text);
    }
}

/// Convert UTF-16 offset to char offset
fn utf16_offset_to_char_offset(line_text: &str, utf16_offset: usize) -> usize {
    let mut utf16_count = 0;
    let mut char_count = 0;

    for ch in line_text.chars() {
        if utf16_count >= utf16_offset {
            return char_count;
        }
        utf16_count += ch.len_utf16();
        char_count += 1;
    }
    char_count
}

/// A [`TextBuffer`] over a rope. Byte offsets are converted to char indices
/// at the edges.
#[derive(Debug, Clone)]
pub struct RopeBuffer {
    pub contents: Rope,
    pub indentation: IndentationConfig,
}

impl RopeBuffer {
    pub fn new(contents: Rope, indentation: IndentationConfig) -> Self {
        Self {
            contents,
            indentation,
        }
    }

    fn char_index(&self, byte: usize) -> usize {
        self.contents.byte_to_char(byte.min(self.contents.len_bytes()))
    }
}

impl TextBuffer for RopeBuffer {
    fn text(&self) -> String {
        self.contents.to_string()
    }

    fn read_region(&self, start: usize, end: usize) -> String {
        let start = self.char_index(start);
        let end = self.char_index(end).max(start);
        self.contents.slice(start..end).to_string()
    }

    fn replace_region(&mut self, start: usize, end: usize, text: &str) {
        let start = self.char_index(start);
        let end = self.char_index(end).max(start);
        self.contents.remove(start..end);
        self.contents.insert(start, text);
    }

    fn reindent(&mut self, start: usize, end: usize) {
        let text = self.contents.to_string();
        let reindented = reindent_region(&text, start, end, &self.indentation);
        if reindented != text {
            self.contents = Rope::from_str(&reindented);
        }
    }
}
