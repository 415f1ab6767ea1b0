//! Indentation calculation for block reindentation.
//!
//! This module computes the correct indentation amount based on the
//! detected context and user configuration (tab size, style preference).

use super::context::IndentContext;

/// Configuration for indentation calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentationConfig {
    /// Number of columns per indentation level.
    pub tab_size: u32,
    /// Whether to use spaces (true) or tabs (false) for indentation.
    pub insert_spaces: bool,
    /// The indentation style to use.
    pub style: IndentationStyle,
}

impl Default for IndentationConfig {
    fn default() -> Self {
        Self {
            tab_size: 4,
            insert_spaces: true,
            style: IndentationStyle::Aligned,
        }
    }
}

/// Indentation style variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndentationStyle {
    /// Continuation lines align to the column after the opener when the
    /// opener line has content after it; otherwise they indent +tab_size
    /// from the opener line.
    #[default]
    Aligned,
    /// Continuation lines always indent +tab_size from the opener line.
    Block,
}

/// Calculates the target indentation column based on context and configuration.
///
/// # Arguments
///
/// * `context` - The detected delimiter context
/// * `config` - User configuration for tab size and style
/// * `source` - The source code text (used for line indent lookups)
///
/// # Returns
///
/// The target column number for indentation (0-indexed).
pub fn calculate_indentation(context: IndentContext, config: &IndentationConfig, source: &str) -> u32 {
    match context {
        IndentContext::InsideBrackets {
            opener_line,
            opener_col,
            has_content_on_opener_line,
        } => match config.style {
            IndentationStyle::Aligned if has_content_on_opener_line => opener_col + 1,
            _ => get_line_indent(source, opener_line, config.tab_size) + config.tab_size,
        },
        IndentContext::InsideBraces { opener_line, .. } => {
            get_line_indent(source, opener_line, config.tab_size) + config.tab_size
        }
        IndentContext::ClosingDelimiter { opener_line, .. } => {
            get_line_indent(source, opener_line, config.tab_size)
        }
        IndentContext::TopLevel => 0,
    }
}

/// Gets the indentation (leading whitespace column) of a specific line.
///
/// Tabs advance to the next multiple of `tab_size`.
pub fn get_line_indent(source: &str, line: u32, tab_size: u32) -> u32 {
    let tab_size = tab_size.max(1);
    source
        .lines()
        .nth(line as usize)
        .map(|l| {
            l.chars()
                .take_while(|c| *c == ' ' || *c == '\t')
                .fold(0, |col, c| {
                    if c == '\t' {
                        (col / tab_size + 1) * tab_size
                    } else {
                        col + 1
                    }
                })
        })
        .unwrap_or(0)
}
