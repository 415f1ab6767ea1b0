//
// dependency/mod.rs
//
// Dependency resolution and block merging for AMD modules
//

pub mod block;
pub mod error;
pub mod file_index;
pub mod format;
pub mod host;
pub mod manifest;
pub mod merge;
pub mod operations;
pub mod path_resolve;
pub mod sort;
pub mod symbol;


pub use block::*;
pub use error::*;
pub use file_index::*;
pub use format::*;
pub use host::*;
pub use manifest::*;
pub use merge::*;
pub use operations::*;
pub use path_resolve::*;
pub use sort::*;
pub use symbol::*;
