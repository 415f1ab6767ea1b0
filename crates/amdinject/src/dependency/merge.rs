//
// dependency/merge.rs
//
// Merging (path, name) pairs into a dependency block
//
// Paths are addressed by position, never looked up through a name->path
// map: the name only decides which slot a path lands in. If a block's
// sequences were already misaligned, merging keeps them that way.
//

use super::block::{DependencyBlock, DependencyEntry};

/// How incoming entries are combined with the existing block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Fold each entry into the existing sequences.
    Incremental,
    /// Replace both sequences with the incoming ones.
    ReplaceAll,
}

impl From<bool> for MergeMode {
    fn from(replace_all: bool) -> Self {
        if replace_all {
            MergeMode::ReplaceAll
        } else {
            MergeMode::Incremental
        }
    }
}

/// Merge `incoming` into `existing`, returning the updated block.
///
/// Source spans and quote style carry over from `existing`.
pub fn merge(
    existing: &DependencyBlock,
    incoming: &[DependencyEntry],
    mode: impl Into<MergeMode>,
) -> DependencyBlock {
    let mut block = existing.clone();

    match mode.into() {
        MergeMode::ReplaceAll => {
            block.paths = incoming.iter().map(|e| e.path.clone()).collect();
            block.names = incoming.iter().map(|e| e.name.clone()).collect();
        }
        MergeMode::Incremental => {
            for entry in incoming {
                merge_entry(&mut block.names, &mut block.paths, entry);
            }
        }
    }

    log::trace!(
        "Merged {} entries: {} paths, {} names",
        incoming.len(),
        block.paths.len(),
        block.names.len()
    );
    block
}

fn merge_entry(names: &mut Vec<String>, paths: &mut Vec<String>, entry: &DependencyEntry) {
    let index = match names.iter().position(|n| *n == entry.name) {
        Some(index) => index,
        None => {
            names.push(entry.name.clone());
            names.len() - 1
        }
    };

    if index < paths.len() {
        paths[index] = entry.path.clone();
    } else {
        paths.push(entry.path.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency::block::BlockKeyword;

    fn block(paths: &[&str], names: &[&str]) -> DependencyBlock {
        let mut block = DependencyBlock::from_entries(BlockKeyword::Require, &[]);
        block.paths = paths.iter().map(|s| s.to_string()).collect();
        block.names = names.iter().map(|s| s.to_string()).collect();
        block
    }

    #[test]
    fn test_incremental_appends_new_entry() {
        let existing = block(&["./a", "./b"], &["A", "B"]);
        let merged = merge(&existing, &[DependencyEntry::new("./c", "C")], false);
        assert_eq!(merged.names, vec!["A", "B", "C"]);
        assert_eq!(merged.paths, vec!["./a", "./b", "./c"]);
        assert!(merged.is_aligned());
    }

    #[test]
    fn test_incremental_overwrites_existing_path() {
        let existing = block(&["./a", "./b"], &["A", "B"]);
        let merged = merge(&existing, &[DependencyEntry::new("./bb", "B")], false);
        assert_eq!(merged.names, vec!["A", "B"]);
        assert_eq!(merged.paths, vec!["./a", "./bb"]);
    }

    #[test]
    fn test_incremental_applies_in_incoming_order() {
        let existing = block(&[], &[]);
        let merged = merge(
            &existing,
            &[
                DependencyEntry::new("./x1", "X"),
                DependencyEntry::new("./y", "Y"),
                DependencyEntry::new("./x2", "X"),
            ],
            MergeMode::Incremental,
        );
        assert_eq!(merged.names, vec!["X", "Y"]);
        assert_eq!(merged.paths, vec!["./x2", "./y"]);
    }

    #[test]
    fn test_incremental_fills_unpaired_name_slot() {
        // name appended earlier without a path
        let existing = block(&["./a"], &["A", "B"]);
        let merged = merge(&existing, &[DependencyEntry::new("./b", "B")], false);
        assert_eq!(merged.paths, vec!["./a", "./b"]);
        assert!(merged.is_aligned());
    }

    #[test]
    fn test_incremental_keeps_misalignment() {
        // names reordered without their paths: the slot is picked by position
        let existing = block(&["./a", "./b"], &["B", "A"]);
        let merged = merge(&existing, &[DependencyEntry::new("./b2", "B")], false);
        assert_eq!(merged.paths, vec!["./b2", "./b"]);
    }

    #[test]
    fn test_incremental_is_case_sensitive() {
        let existing = block(&["./w"], &["Widget"]);
        let merged = merge(&existing, &[DependencyEntry::new("./w2", "widget")], false);
        assert_eq!(merged.names, vec!["Widget", "widget"]);
        assert_eq!(merged.paths, vec!["./w", "./w2"]);
    }

    #[test]
    fn test_replace_all() {
        let existing = block(&["./a", "./b"], &["A", "B"]);
        let incoming = [DependencyEntry::new("./z", "Z")];
        let merged = merge(&existing, &incoming, true);
        assert_eq!(merged.paths, vec!["./z"]);
        assert_eq!(merged.names, vec!["Z"]);
        assert_eq!(merged.paths_span, existing.paths_span);
    }

    #[test]
    fn test_replace_all_idempotent() {
        let existing = block(&["./a"], &["A"]);
        let incoming = [DependencyEntry::new("./b", "B"), DependencyEntry::new("./c", "C")];
        let once = merge(&existing, &incoming, true);
        let twice = merge(&once, &incoming, true);
        assert_eq!(once, twice);
    }
}
