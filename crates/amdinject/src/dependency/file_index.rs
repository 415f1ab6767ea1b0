//
// dependency/file_index.rs
//
// Base-name index over the project file listing
//

use std::path::Path;

use indexmap::{IndexMap, IndexSet};

use super::host::ProjectFile;
use super::path_resolve::{dot_prefixed, relative_path, strip_extension};

/// Maps a file name (`Widget.js`) to the locations where such a file exists.
///
/// Candidates keep insertion order. A single build never records the same
/// location twice, but [`ProjectFileIndex::rescan`] appends to what is
/// already there, so repeated scans of one listing accumulate duplicates.
#[derive(Debug, Clone, Default)]
pub struct ProjectFileIndex {
    entries: IndexMap<String, Vec<String>>,
    extension: String,
}

impl ProjectFileIndex {
    pub fn new(extension: &str) -> Self {
        Self {
            entries: IndexMap::new(),
            extension: extension.to_string(),
        }
    }

    /// Index the absolute locations of every file accepted by `subtree_filter`.
    pub fn build(
        files: &[ProjectFile],
        subtree_filter: impl Fn(&Path) -> bool,
        extension: &str,
    ) -> Self {
        let mut index = Self::new(extension);
        index.rescan(files, subtree_filter);
        index
    }

    /// Index every file by its location relative to `from_directory`.
    ///
    /// No subtree filter applies. Values start with `./` unless they already
    /// climb out with `../`.
    pub fn build_relative(files: &[ProjectFile], from_directory: &Path, extension: &str) -> Self {
        let mut batch: IndexMap<String, IndexSet<String>> = IndexMap::new();
        for file in files {
            let relative = relative_path(&file.path, from_directory);
            let relative = relative.to_string_lossy().replace('\\', "/");
            batch
                .entry(file.base_name.clone())
                .or_default()
                .insert(dot_prefixed(&relative));
        }

        let mut index = Self::new(extension);
        index.append(batch);
        log::trace!(
            "Built relative index from {}: {} names",
            from_directory.display(),
            index.len()
        );
        index
    }

    /// Scan `files` again and append their candidates to the existing entries.
    pub fn rescan(&mut self, files: &[ProjectFile], subtree_filter: impl Fn(&Path) -> bool) {
        let mut batch: IndexMap<String, IndexSet<String>> = IndexMap::new();
        let mut retained = 0usize;
        for file in files.iter().filter(|f| subtree_filter(&f.path)) {
            retained += 1;
            batch
                .entry(file.base_name.clone())
                .or_default()
                .insert(file.path.to_string_lossy().into_owned());
        }
        log::trace!(
            "Indexed {} of {} project files under {} names",
            retained,
            files.len(),
            batch.len()
        );
        self.append(batch);
    }

    fn append(&mut self, batch: IndexMap<String, IndexSet<String>>) {
        for (base_name, candidates) in batch {
            self.entries
                .entry(base_name)
                .or_default()
                .extend(candidates);
        }
    }

    /// Candidates for `symbol`, looked up as `symbol.<extension>`, with the
    /// extension stripped from each value.
    pub fn lookup(&self, symbol: &str) -> Vec<String> {
        let key = format!("{}.{}", symbol, self.extension);
        self.entries
            .get(&key)
            .map(|candidates| {
                candidates
                    .iter()
                    .map(|c| strip_extension(c, &self.extension).to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Raw candidates for a file name, extension included.
    pub fn candidates(&self, base_name: &str) -> Option<&[String]> {
        self.entries.get(base_name).map(|v| v.as_slice())
    }

    /// Whether any file is named after `symbol`.
    pub fn contains_symbol(&self, symbol: &str) -> bool {
        !self.lookup(symbol).is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
