/// Reserved words module for JavaScript.
///
/// This module provides a centralized list of JavaScript reserved words and
/// literal keywords, and a function to check whether a given identifier is
/// one of them. Reserved words are never treated as module symbols.

/// JavaScript reserved words (ES5 keywords, strict-mode future reserved
/// words, ES2015 additions) plus the literal keywords.
pub const RESERVED_WORDS: &[&str] = &[
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "export",
    "extends",
    "finally",
    "for",
    "function",
    "if",
    "implements",
    "import",
    "in",
    "instanceof",
    "interface",
    "let",
    "new",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
    "true",
    "false",
    "null",
];

/// Check if a name is a JavaScript reserved word.
///
/// The check is case-sensitive.
///
/// # Examples
///
/// ```
/// use amdinject::reserved_words::is_reserved_word;
///
/// assert!(is_reserved_word("function"));
/// assert!(is_reserved_word("null"));
///
/// assert!(!is_reserved_word("Widget"));
/// assert!(!is_reserved_word("Function")); // Case-sensitive
/// ```
pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}
