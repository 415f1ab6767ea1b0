//
// dependency/sort.rs
//
// Ordering a block by require path
//

use super::block::{DependencyBlock, DependencyEntry};
use super::merge::{merge, MergeMode};

/// Reorder entries by path (ordinal, ascending), keeping each name with its path.
///
/// The sort is stable, so equal paths keep their relative order. Names that
/// have no path yet follow the sorted pairs in their original order, and so
/// do paths that have no name.
pub fn sort_by_path(block: &DependencyBlock) -> DependencyBlock {
    let mut pairs: Vec<DependencyEntry> = block.entries();
    pairs.sort_by(|a, b| a.path.cmp(&b.path));

    let mut sorted = merge(block, &pairs, MergeMode::ReplaceAll);
    sorted.names.extend_from_slice(block.unpaired_names());
    sorted.paths.extend_from_slice(block.unpaired_paths());
    sorted
}
