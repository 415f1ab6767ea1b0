//
// dependency/error.rs
//
// Error taxonomy for dependency operations
//

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DependencyError>;

#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("No require or define block found")]
    NoDependencyBlock,

    #[error("Malformed dependency block: {0}")]
    MalformedBlock(String),

    #[error("No module found for symbol '{0}'")]
    SymbolNotFound(String),

    #[error("No candidate was chosen")]
    NoChoiceMade,

    #[error("Failed to read manifest {}: {reason}", path.display())]
    Manifest { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DependencyError {
    /// Whether the failure came from the user declining a choice rather than a real problem
    pub fn is_cancellation(&self) -> bool {
        matches!(self, DependencyError::NoChoiceMade)
    }
}
