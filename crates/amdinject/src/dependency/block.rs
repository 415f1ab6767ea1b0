//
// dependency/block.rs
//
// In-memory model of one require/define dependency block
//
// The block is located with marker scans rather than a syntax tree:
//
//   require([ "pathA",          <- paths span: after `[` (leading whitespace
//             "pathB"              skipped) up to the matching `]`
//   ], function (ClassA, ClassB) {   <- names span: inside the first `(`
//   });                                 after the array, up to its `)`
//
// Only block forms without stray `[`, `]`, `(` or `)` inside those spans
// are supported.
//

use std::sync::OnceLock;

use regex::Regex;

use super::error::{DependencyError, Result};
use super::format::{join_paths, wrap_names};
use super::symbol::non_code_ranges;

/// A byte range in the buffer text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn slice<'t>(&self, text: &'t str) -> &'t str {
        &text[self.start..self.end]
    }
}

/// The call that introduces the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKeyword {
    Require,
    Define,
}

impl BlockKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKeyword::Require => "require",
            BlockKeyword::Define => "define",
        }
    }
}

/// One positional pairing of a require path and the parameter bound to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyEntry {
    pub path: String,
    pub name: String,
}

impl DependencyEntry {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

/// Parallel path and name sequences plus where they live in the source.
///
/// `paths[i]` binds to `names[i]`. While valid the two have equal length;
/// names may run ahead of paths transiently, never the reverse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyBlock {
    pub keyword: BlockKeyword,
    pub keyword_offset: usize,
    /// Offset of the `[` opening the path array
    pub array_open: usize,
    pub paths: Vec<String>,
    pub names: Vec<String>,
    pub paths_span: Span,
    pub names_span: Span,
    /// Quote character used when writing paths
    pub quote: char,
}

struct BlockPatterns {
    keyword: Regex,
    array_prefix: Regex,
    path_separator: Regex,
    name_separator: Regex,
}

fn patterns() -> &'static BlockPatterns {
    static PATTERNS: OnceLock<BlockPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| BlockPatterns {
        keyword: Regex::new(r"\b(require|define)\s*\(").unwrap(),
        // Whatever may sit between `define(` and `[`: nothing, or a module id
        array_prefix: Regex::new(r#"^\s*(?:"[^"]*"|'[^']*')?\s*,?\s*$"#).unwrap(),
        path_separator: Regex::new(r",\s*\n\s*").unwrap(),
        name_separator: Regex::new(r",\s*").unwrap(),
    })
}

impl DependencyBlock {
    /// Locate and parse the first dependency block in `text`.
    ///
    /// `require(` and `define(` calls inside strings and comments, or whose
    /// first argument is not a dependency array, are passed over.
    pub fn parse(text: &str) -> Result<Self> {
        let patterns = patterns();
        let skipped = non_code_ranges(text);
        let mut rejected: Option<BlockKeyword> = None;

        for caps in patterns.keyword.captures_iter(text) {
            let Some(keyword_match) = caps.get(1) else {
                continue;
            };
            if skipped.iter().any(|r| r.contains(&keyword_match.start())) {
                continue;
            }
            let keyword = if keyword_match.as_str() == "define" {
                BlockKeyword::Define
            } else {
                BlockKeyword::Require
            };
            let call_open = caps.get(0).map(|m| m.end()).unwrap_or(keyword_match.end());

            let array_open = text[call_open..]
                .find('[')
                .map(|i| call_open + i)
                .filter(|&open| patterns.array_prefix.is_match(&text[call_open..open]));
            match array_open {
                Some(array_open) => {
                    return Self::parse_at(text, keyword, keyword_match.start(), array_open)
                }
                None => {
                    log::trace!(
                        "Skipping '{}' call at {} without a dependency array",
                        keyword.as_str(),
                        keyword_match.start()
                    );
                    rejected.get_or_insert(keyword);
                }
            }
        }

        match rejected {
            Some(keyword) => Err(DependencyError::MalformedBlock(format!(
                "no dependency array after '{}'",
                keyword.as_str()
            ))),
            None => Err(DependencyError::NoDependencyBlock),
        }
    }

    /// Parse the block whose path array opens at `array_open`.
    fn parse_at(
        text: &str,
        keyword: BlockKeyword,
        keyword_offset: usize,
        array_open: usize,
    ) -> Result<Self> {
        let array_close = find_matching_bracket(text, array_open).ok_or_else(|| {
            DependencyError::MalformedBlock("unterminated dependency array".to_string())
        })?;

        let leading_ws = text[array_open + 1..array_close].len()
            - text[array_open + 1..array_close].trim_start().len();
        let paths_span = Span::new(array_open + 1 + leading_ws, array_close);

        let params_open = text[array_close..]
            .find('(')
            .map(|i| array_close + i)
            .ok_or_else(|| {
                DependencyError::MalformedBlock("no factory function parameter list".to_string())
            })?;
        let params_close = text[params_open..]
            .find(')')
            .map(|i| params_open + i)
            .ok_or_else(|| {
                DependencyError::MalformedBlock("unterminated parameter list".to_string())
            })?;
        let names_span = Span::new(params_open + 1, params_close);

        let (paths, quote) = parse_paths(paths_span.slice(text));
        let names = parse_names(names_span.slice(text));

        log::trace!(
            "Parsed {} block at {}: {} paths, {} names",
            keyword.as_str(),
            keyword_offset,
            paths.len(),
            names.len()
        );

        Ok(Self {
            keyword,
            keyword_offset,
            array_open,
            paths,
            names,
            paths_span,
            names_span,
            quote,
        })
    }

    /// A block holding `entries`, with no source location.
    pub fn from_entries(keyword: BlockKeyword, entries: &[DependencyEntry]) -> Self {
        Self {
            keyword,
            keyword_offset: 0,
            array_open: 0,
            paths: entries.iter().map(|e| e.path.clone()).collect(),
            names: entries.iter().map(|e| e.name.clone()).collect(),
            paths_span: Span::default(),
            names_span: Span::default(),
            quote: '"',
        }
    }

    /// Positional pairs; names without a path are not included.
    pub fn entries(&self) -> Vec<DependencyEntry> {
        self.paths
            .iter()
            .zip(self.names.iter())
            .map(|(path, name)| DependencyEntry::new(path.clone(), name.clone()))
            .collect()
    }

    /// Paths past the last name, such as side-effect imports.
    pub fn unpaired_paths(&self) -> &[String] {
        let paired = self.paths.len().min(self.names.len());
        &self.paths[paired..]
    }

    /// Names that have no path slot yet.
    pub fn unpaired_names(&self) -> &[String] {
        let paired = self.paths.len().min(self.names.len());
        &self.names[paired..]
    }

    /// Both sequences have the same length.
    pub fn is_aligned(&self) -> bool {
        self.paths.len() == self.names.len()
    }

    /// Paths never outnumber names.
    pub fn is_valid(&self) -> bool {
        self.paths.len() <= self.names.len()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn path_for(&self, name: &str) -> Option<&str> {
        let index = self.names.iter().position(|n| n == name)?;
        self.paths.get(index).map(|p| p.as_str())
    }

    /// Text for the path array region.
    pub fn render_paths(&self) -> String {
        join_paths(&self.paths, self.quote)
    }

    /// Text for the parameter list region.
    pub fn render_names(&self, width: usize) -> String {
        wrap_names(&self.names, width)
    }
}

/// Offset of the `]` closing the `[` at `open`. String literals are skipped.
fn find_matching_bracket(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string: Option<char> = None;
    let mut escaped = false;

    for (i, ch) in text[open..].char_indices() {
        if let Some(quote) = in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote {
                in_string = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => in_string = Some(ch),
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split the path array text into unquoted paths.
///
/// Elements are separated by a comma that ends a line; commas inside a line
/// stay part of the element.
fn parse_paths(span_text: &str) -> (Vec<String>, char) {
    let trimmed = span_text.trim();
    let trimmed = trimmed.strip_suffix(',').unwrap_or(trimmed).trim_end();
    if trimmed.is_empty() {
        return (Vec::new(), '"');
    }

    let quote = match trimmed.chars().next() {
        Some('\'') => '\'',
        _ => '"',
    };

    let paths = patterns()
        .path_separator
        .split(trimmed)
        .map(|element| unquote(element.trim()).to_string())
        .collect();
    (paths, quote)
}

fn parse_names(span_text: &str) -> Vec<String> {
    let trimmed = span_text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    patterns()
        .name_separator
        .split(trimmed)
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
        .collect()
}

fn unquote(element: &str) -> &str {
    for quote in ['"', '\''] {
        if element.len() >= 2 && element.starts_with(quote) && element.ends_with(quote) {
            return &element[1..element.len() - 1];
        }
    }
    element
}
