//
// config.rs
//
// Configuration for dependency resolution and block formatting
//

use std::path::{Path, PathBuf};

use crate::indentation::IndentationConfig;

/// Directories never descended into when listing project files
const DEFAULT_SKIP_DIRECTORIES: &[&str] = &[
    "node_modules",
    ".git",
    ".hg",
    ".svn",
    "bower_components",
    "dist",
];

/// A module-path alias, e.g. `vendor -> /project/lib/third_party`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathAlias {
    pub alias: String,
    pub directory: PathBuf,
}

/// Dependency injection configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AmdConfig {
    /// Path segment a candidate must contain to be indexed
    pub subtree_marker: String,
    /// Extension of module files, without the dot
    pub extension: String,
    /// Whether `devDependencies` are offered for node modules
    pub include_dev_dependencies: bool,
    /// Column at which the parameter list is wrapped
    pub wrap_width: usize,
    /// Module aliases tried before the subtree marker
    pub aliases: Vec<PathAlias>,
    /// Project root used when neither an alias nor the marker matches
    pub project_root: Option<PathBuf>,
    /// Directory names skipped by the filesystem lister
    pub skip_directories: Vec<String>,
    /// Indentation used when reindenting a block
    pub indentation: IndentationConfig,
}

impl Default for AmdConfig {
    /// Defaults mirror a conventional RequireJS layout: modules live under a
    /// `script/` directory, files end in `.js`, and the parameter list wraps
    /// at 70 columns.
    ///
    /// # Examples
    ///
    /// ```
    /// use amdinject::config::AmdConfig;
    ///
    /// let cfg = AmdConfig::default();
    /// assert_eq!(cfg.subtree_marker, "/script/");
    /// assert_eq!(cfg.extension, "js");
    /// assert!(!cfg.include_dev_dependencies);
    /// ```
    fn default() -> Self {
        Self {
            subtree_marker: "/script/".to_string(),
            extension: "js".to_string(),
            include_dev_dependencies: false,
            wrap_width: 70,
            aliases: Vec::new(),
            project_root: None,
            skip_directories: DEFAULT_SKIP_DIRECTORIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            indentation: IndentationConfig::default(),
        }
    }
}

impl AmdConfig {
    /// The default subtree predicate: the path contains the marker segment.
    pub fn subtree_filter(&self) -> impl Fn(&Path) -> bool + '_ {
        move |path: &Path| path.to_string_lossy().contains(&self.subtree_marker)
    }

    /// File name used to look up a symbol in the project index
    pub fn file_name_for(&self, symbol: &str) -> String {
        format!("{}.{}", symbol, self.extension)
    }

    /// Check whether a directory name should be skipped while listing files
    pub fn should_skip_directory(&self, name: &str) -> bool {
        self.skip_directories.iter().any(|d| d == name)
    }
}

/// Parse configuration from a JSON settings object.
///
/// Accepts either the bare settings object or one nested under an
/// `amdinject` key (the shape clients send in `didChangeConfiguration`).
/// Unknown keys are ignored and missing keys keep their defaults. Returns
/// `None` when `settings` is not a JSON object.
pub fn parse_config(settings: &serde_json::Value) -> Option<AmdConfig> {
    let settings = settings.get("amdinject").unwrap_or(settings);
    let obj = settings.as_object()?;

    let mut config = AmdConfig::default();

    if let Some(v) = obj.get("subtreeMarker").and_then(|v| v.as_str()) {
        config.subtree_marker = v.to_string();
    }
    if let Some(v) = obj.get("extension").and_then(|v| v.as_str()) {
        config.extension = v.trim_start_matches('.').to_string();
    }
    if let Some(v) = obj.get("includeDevDependencies").and_then(|v| v.as_bool()) {
        config.include_dev_dependencies = v;
    }
    if let Some(v) = obj.get("wrapWidth").and_then(|v| v.as_u64()) {
        config.wrap_width = v as usize;
    }
    if let Some(v) = obj.get("projectRoot").and_then(|v| v.as_str()) {
        config.project_root = Some(PathBuf::from(v));
    }
    if let Some(aliases) = obj.get("aliases").and_then(|v| v.as_object()) {
        config.aliases = aliases
            .iter()
            .filter_map(|(alias, dir)| {
                let dir = dir.as_str()?;
                Some(PathAlias {
                    alias: alias.clone(),
                    directory: PathBuf::from(dir),
                })
            })
            .collect();
    }
    if let Some(dirs) = obj.get("skipDirectories").and_then(|v| v.as_array()) {
        config.skip_directories = dirs
            .iter()
            .filter_map(|d| d.as_str().map(|s| s.to_string()))
            .collect();
    }
    if let Some(v) = obj.get("tabSize").and_then(|v| v.as_u64()) {
        config.indentation.tab_size = v as u32;
    }
    if let Some(v) = obj.get("insertSpaces").and_then(|v| v.as_bool()) {
        config.indentation.insert_spaces = v;
    }

    log::trace!("Parsed configuration: {:?}", config);
    Some(config)
}

/// Resolve relative alias directories and the project root against `base`.
pub fn anchor_config(mut config: AmdConfig, base: &Path) -> AmdConfig {
    for alias in &mut config.aliases {
        if alias.directory.is_relative() {
            alias.directory = base.join(&alias.directory);
        }
    }
    config.project_root = match config.project_root.take() {
        Some(root) if root.is_relative() => Some(base.join(root)),
        Some(root) => Some(root),
        None => Some(base.to_path_buf()),
    };
    config
}
