//! Deterministic fixture project generator for benchmarks and tests.
//!
//! Generates synthetic RequireJS projects with controlled characteristics:
//! module count, directories under `public/script/`, dependencies per module,
//! and how many module names are repeated across directories.
//!
//! All output is deterministic, so benchmarks are reproducible.

use std::fmt::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::dependency::ProjectFile;

/// Configuration for generating a fixture project.
#[derive(Debug, Clone)]
pub struct FixtureConfig {
    pub module_count: usize,
    pub directory_count: usize,
    pub dependencies_per_module: usize,
    /// Every n-th module reuses the name of the module before it (0 disables)
    pub duplicate_every: usize,
}

/// Package names written into the fixture's `package.json`.
const PACKAGES: &[&str] = &[
    "jquery", "underscore", "backbone", "moment", "socket.io-client",
];

impl FixtureConfig {
    /// Small project: 10 modules in 2 directories.
    pub fn small() -> Self {
        Self {
            module_count: 10,
            directory_count: 2,
            dependencies_per_module: 2,
            duplicate_every: 0,
        }
    }

    /// Medium project: 100 modules in 10 directories, some names repeated.
    pub fn medium() -> Self {
        Self {
            module_count: 100,
            directory_count: 10,
            dependencies_per_module: 5,
            duplicate_every: 10,
        }
    }

    /// Large project: 1000 modules in 40 directories, some names repeated.
    pub fn large() -> Self {
        Self {
            module_count: 1000,
            directory_count: 40,
            dependencies_per_module: 10,
            duplicate_every: 25,
        }
    }
}

/// Class name of module `index`.
pub fn module_name(index: usize, config: &FixtureConfig) -> String {
    if config.duplicate_every > 0 && index > 0 && index % config.duplicate_every == 0 {
        format!("Module{}", index - 1)
    } else {
        format!("Module{}", index)
    }
}

/// Path of module `index` relative to the project root.
pub fn module_path(index: usize, config: &FixtureConfig) -> PathBuf {
    let dir = index % config.directory_count.max(1);
    PathBuf::from(format!(
        "public/script/pkg{}/{}.js",
        dir,
        module_name(index, config)
    ))
}

/// Generate the content of a single module deterministically.
///
/// Module `index` depends on the modules just before it.
fn generate_module_content(index: usize, config: &FixtureConfig) -> String {
    let deps: Vec<usize> = (index.saturating_sub(config.dependencies_per_module)..index).collect();

    let paths: Vec<String> = deps
        .iter()
        .map(|&d| {
            let path = module_path(d, config);
            let reference = path
                .to_string_lossy()
                .trim_start_matches("public/script/")
                .trim_end_matches(".js")
                .to_string();
            format!("    \"{}\"", reference)
        })
        .collect();
    let names: Vec<String> = deps.iter().map(|&d| format!("Dep{}", d)).collect();

    let mut content = String::new();
    writeln!(content, "define([").unwrap();
    if !paths.is_empty() {
        writeln!(content, "{}", paths.join(",\n")).unwrap();
    }
    writeln!(content, "], function ({}) {{", names.join(", ")).unwrap();
    writeln!(content, "    var {} = {{}};", module_name(index, config)).unwrap();
    for name in &names {
        writeln!(content, "    {}.use({});", module_name(index, config), name).unwrap();
    }
    writeln!(content, "    return {};", module_name(index, config)).unwrap();
    writeln!(content, "}});").unwrap();
    content
}

fn generate_manifest() -> String {
    let deps: Vec<String> = PACKAGES
        .iter()
        .map(|p| format!("    \"{}\": \"*\"", p))
        .collect();
    format!(
        "{{\n  \"name\": \"fixture\",\n  \"dependencies\": {{\n{}\n  }}\n}}\n",
        deps.join(",\n")
    )
}

/// Create a temporary fixture project from the given configuration.
///
/// Returns a `TempDir` holding `package.json` and the generated modules.
/// The directory is cleaned up when the `TempDir` is dropped.
pub fn create_fixture_workspace(config: &FixtureConfig) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory for fixture workspace");
    write_fixture_workspace(temp_dir.path(), config);
    temp_dir
}

/// Write fixture files into an existing directory.
pub fn write_fixture_workspace(dir: &Path, config: &FixtureConfig) {
    std::fs::write(dir.join("package.json"), generate_manifest())
        .unwrap_or_else(|e| panic!("Failed to write fixture manifest: {}", e));
    for i in 0..config.module_count {
        let path = dir.join(module_path(i, config));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("Failed to create {}: {}", parent.display(), e));
        }
        std::fs::write(&path, generate_module_content(i, config))
            .unwrap_or_else(|e| panic!("Failed to write fixture file {}: {}", path.display(), e));
    }
}

/// The project listing the fixture would produce under `root`, without
/// touching the filesystem.
pub fn fixture_listing(root: &Path, config: &FixtureConfig) -> Vec<ProjectFile> {
    (0..config.module_count)
        .filter_map(|i| ProjectFile::from_path(root.join(module_path(i, config))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency::DependencyBlock;

    #[test]
    fn test_preset_values() {
        assert_eq!(FixtureConfig::small().module_count, 10);
        assert_eq!(FixtureConfig::medium().module_count, 100);
        assert_eq!(FixtureConfig::large().module_count, 1000);
    }

    #[test]
    fn test_duplicate_names() {
        let config = FixtureConfig::medium();
        assert_eq!(module_name(10, &config), "Module9");
        assert_eq!(module_name(11, &config), "Module11");
        assert_ne!(module_path(9, &config), module_path(10, &config));
    }

    #[test]
    fn test_generated_modules_parse() {
        let config = FixtureConfig::small();
        for i in 0..config.module_count {
            let content = generate_module_content(i, &config);
            let block = DependencyBlock::parse(&content).unwrap();
            assert!(block.is_aligned(), "module {} misaligned", i);
            assert_eq!(block.paths.len(), i.min(config.dependencies_per_module));
        }
    }

    #[test]
    fn test_deterministic_output() {
        let config = FixtureConfig::small();
        let ws1 = create_fixture_workspace(&config);
        let ws2 = create_fixture_workspace(&config);

        for i in 0..config.module_count {
            let path = module_path(i, &config);
            let content1 = std::fs::read_to_string(ws1.path().join(&path)).unwrap();
            let content2 = std::fs::read_to_string(ws2.path().join(&path)).unwrap();
            assert_eq!(content1, content2, "{} should be identical across runs", path.display());
        }
        assert!(ws1.path().join("package.json").is_file());
    }

    #[test]
    fn test_listing_matches_disk() {
        let config = FixtureConfig::small();
        let ws = create_fixture_workspace(&config);
        let listing = fixture_listing(ws.path(), &config);
        assert_eq!(listing.len(), config.module_count);
        assert!(listing.iter().all(|f| f.path.is_file()));
    }
}
