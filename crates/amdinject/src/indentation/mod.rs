//! JavaScript block reindentation
//!
//! Reindents the lines of a dependency block after its regions have been
//! rewritten. The approach is context-based: scan the text for unclosed
//! delimiters, derive a syntactic context for the line, and compute the
//! target column from it.
//!
//! # Architecture
//!
//! - `context`: Detects the delimiter context at the start of a line
//! - `calculator`: Computes indentation amount based on context and style configuration
//! - `formatter`: Rewrites leading whitespace for a range of lines

mod calculator;
mod context;
mod formatter;

pub use calculator::{calculate_indentation, get_line_indent, IndentationConfig, IndentationStyle};
pub use context::{detect_context, IndentContext};
pub use formatter::{generate_whitespace, reindent_region};
