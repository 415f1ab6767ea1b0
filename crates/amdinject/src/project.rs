//
// project.rs
//
// Filesystem project listing
//

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::AmdConfig;
use crate::dependency::{ProjectFile, ProjectLister};

/// Lists every file under a root directory, skipping configured directories.
#[derive(Debug, Clone)]
pub struct FsProject {
    root: PathBuf,
    config: AmdConfig,
}

impl FsProject {
    pub fn new(root: impl Into<PathBuf>, config: &AmdConfig) -> Self {
        Self {
            root: root.into(),
            config: config.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ProjectLister for FsProject {
    fn list_project_files(&self) -> Vec<ProjectFile> {
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                // the root itself is never skipped
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| self.config.should_skip_directory(name))
            });

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable project entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(file) = ProjectFile::from_path(entry.path()) {
                files.push(file);
            }
        }

        log::trace!("Listed {} files under {}", files.len(), self.root.display());
        files
    }
}

/// The directory to list for `file`: the configured project root, or else
/// the nearest ancestor holding a `package.json` or `.git`, or else the
/// file's own directory.
pub fn find_project_root(file: &Path, config: &AmdConfig) -> PathBuf {
    if let Some(root) = &config.project_root {
        return root.clone();
    }
    let start = file.parent().unwrap_or(file);
    start
        .ancestors()
        .find(|dir| dir.join("package.json").is_file() || dir.join(".git").exists())
        .unwrap_or(start)
        .to_path_buf()
}
