//
// dependency/host.rs
//
// Services the dependency engine consumes from its environment
//

use std::path::PathBuf;

/// One file known to the project: its file name and absolute location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFile {
    /// File name including extension, e.g. `Widget.js`
    pub base_name: String,
    pub path: PathBuf,
}

impl ProjectFile {
    /// Build an entry from an absolute path, taking the base name from its last component.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let base_name = path.file_name()?.to_str()?.to_string();
        Some(Self { base_name, path })
    }
}

/// An addressable, mutable text buffer. Offsets are byte offsets into `text()`.
pub trait TextBuffer {
    /// The full buffer contents
    fn text(&self) -> String;

    fn read_region(&self, start: usize, end: usize) -> String {
        let text = self.text();
        text.get(start..end).unwrap_or_default().to_string()
    }

    fn replace_region(&mut self, start: usize, end: usize, text: &str);

    /// Reindent every line that begins within `start..=end`.
    fn reindent(&mut self, start: usize, end: usize);
}

/// Produces the current project file listing.
pub trait ProjectLister {
    fn list_project_files(&self) -> Vec<ProjectFile>;
}

/// Picks one of several candidates. `hint` is the byte offset of the symbol
/// that triggered the choice. Returning `None` aborts the operation.
pub trait Chooser {
    fn choose_one(&mut self, options: &[String], hint: usize) -> Option<String>;
}

/// A fixed listing, for hosts that already know their files.
impl ProjectLister for Vec<ProjectFile> {
    fn list_project_files(&self) -> Vec<ProjectFile> {
        self.clone()
    }
}

/// Always picks the first option.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstChoice;

impl Chooser for FirstChoice {
    fn choose_one(&mut self, options: &[String], _hint: usize) -> Option<String> {
        options.first().cloned()
    }
}

/// Answers from a list of preselected values and records the first
/// question it could not answer.
///
/// Hosts whose real prompt is asynchronous run an operation with
/// `PresetChoice::none()` to collect the options, ask the user, then run it
/// again with the answers gathered so far.
#[derive(Debug, Default, Clone)]
pub struct PresetChoice {
    answers: Vec<String>,
    used: usize,
    /// Options of the unanswered question, empty if every question was answered
    pub offered: Vec<String>,
    pub hint: Option<usize>,
}

impl PresetChoice {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn answer(answer: impl Into<String>) -> Self {
        Self::with_answers(vec![answer.into()])
    }

    pub fn with_answers(answers: Vec<String>) -> Self {
        Self {
            answers,
            ..Default::default()
        }
    }
}

impl Chooser for PresetChoice {
    fn choose_one(&mut self, options: &[String], hint: usize) -> Option<String> {
        if let Some(answer) = self.answers.get(self.used) {
            self.used += 1;
            return Some(answer.clone());
        }
        self.offered = options.to_vec();
        self.hint = Some(hint);
        None
    }
}

/// In-memory buffer used by tests and by hosts that edit whole strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringBuffer {
    pub contents: String,
    pub indentation: crate::indentation::IndentationConfig,
}

impl StringBuffer {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
            indentation: Default::default(),
        }
    }

    pub fn with_indentation(mut self, indentation: crate::indentation::IndentationConfig) -> Self {
        self.indentation = indentation;
        self
    }
}

impl TextBuffer for StringBuffer {
    fn text(&self) -> String {
        self.contents.clone()
    }

    fn replace_region(&mut self, start: usize, end: usize, text: &str) {
        self.contents.replace_range(start..end, text);
    }

    fn reindent(&mut self, start: usize, end: usize) {
        self.contents =
            crate::indentation::reindent_region(&self.contents, start, end, &self.indentation);
    }
}
