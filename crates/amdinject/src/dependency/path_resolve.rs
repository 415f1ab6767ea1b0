//
// dependency/path_resolve.rs
//
// Turning candidate file locations into require-array references
//
// Two reference forms exist:
//
// 1. Module references (`PathResolver::reference_for`) - used for files found
//    through the project index. Aliases win over the subtree marker, which
//    wins over the project root.
//
// 2. Relative references (`relativize`) - used by the relative-module
//    operation. Always relative to the directory of the file being edited
//    and always starting with `.` so RequireJS treats them as relative.
//

use std::path::{Component, Path, PathBuf};

use super::error::{DependencyError, Result};
use super::host::Chooser;
use crate::config::AmdConfig;

/// Resolves candidate locations to the single reference written into a block.
#[derive(Debug, Clone)]
pub struct PathResolver<'a> {
    config: &'a AmdConfig,
}

impl<'a> PathResolver<'a> {
    pub fn new(config: &'a AmdConfig) -> Self {
        Self { config }
    }

    /// Pick one reference out of `candidates`.
    ///
    /// A single candidate is returned as-is and the chooser is never asked.
    /// Several candidates are handed to the chooser together with `hint`
    /// (the symbol's offset) and its answer is returned verbatim.
    pub fn resolve(
        &self,
        symbol: &str,
        candidates: &[String],
        chooser: &mut dyn Chooser,
        hint: usize,
    ) -> Result<String> {
        match candidates {
            [] => Err(DependencyError::SymbolNotFound(symbol.to_string())),
            [only] => {
                log::trace!("Resolved '{}' to sole candidate '{}'", symbol, only);
                Ok(only.clone())
            }
            _ => self.choose(symbol, candidates, chooser, hint),
        }
    }

    /// Ask the chooser even when there is only one option.
    pub fn choose(
        &self,
        symbol: &str,
        candidates: &[String],
        chooser: &mut dyn Chooser,
        hint: usize,
    ) -> Result<String> {
        if candidates.is_empty() {
            return Err(DependencyError::SymbolNotFound(symbol.to_string()));
        }
        log::trace!(
            "Asking chooser for '{}' among {} candidates",
            symbol,
            candidates.len()
        );
        match chooser.choose_one(candidates, hint) {
            Some(choice) => {
                if !candidates.contains(&choice) {
                    log::warn!("Chooser returned '{}', which was not offered", choice);
                }
                Ok(choice)
            }
            None => Err(DependencyError::NoChoiceMade),
        }
    }

    /// The module reference for an absolute file location.
    pub fn reference_for(&self, path: &Path) -> String {
        let normalized = normalize_path(path).unwrap_or_else(|| path.to_path_buf());

        let alias = self
            .config
            .aliases
            .iter()
            .filter(|a| normalized.starts_with(&a.directory))
            .max_by_key(|a| a.directory.components().count());

        let reference = if let Some(alias) = alias {
            let rest = normalized
                .strip_prefix(&alias.directory)
                .map(to_module_string)
                .unwrap_or_default();
            if rest.is_empty() {
                alias.alias.clone()
            } else {
                format!("{}/{}", alias.alias, rest)
            }
        } else {
            let full = normalized.to_string_lossy().replace('\\', "/");
            if let Some(idx) = full.rfind(&self.config.subtree_marker) {
                full[idx + self.config.subtree_marker.len()..].to_string()
            } else if let Some(rest) = self
                .config
                .project_root
                .as_ref()
                .and_then(|root| normalized.strip_prefix(root).ok())
            {
                to_module_string(rest)
            } else {
                full
            }
        };

        let reference = strip_extension(&reference, &self.config.extension).to_string();
        log::trace!("Reference for '{}' is '{}'", path.display(), reference);
        reference
    }
}

/// Relative reference from `from_directory` to `path`, extension stripped.
///
/// `./` is prepended unless the result already starts with `.` or `/`.
pub fn relativize(path: &Path, from_directory: &Path, extension: &str) -> String {
    let relative = to_module_string(&relative_path(path, from_directory));
    strip_extension(&dot_prefixed(&relative), extension).to_string()
}

/// Prefix `./` onto a relative reference that starts with a name character.
pub fn dot_prefixed(relative: &str) -> String {
    if relative.starts_with('.') || relative.starts_with('/') {
        relative.to_string()
    } else {
        format!("./{}", relative)
    }
}

/// Remove a trailing `.<extension>` if present.
pub fn strip_extension<'s>(value: &'s str, extension: &str) -> &'s str {
    if extension.is_empty() {
        return value;
    }
    value
        .strip_suffix(extension)
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|rest| !rest.is_empty() && !rest.ends_with('/'))
        .unwrap_or(value)
}

/// Path of `path` relative to `from_directory`, using `..` where needed.
pub fn relative_path(path: &Path, from_directory: &Path) -> PathBuf {
    let path = normalize_path(path).unwrap_or_else(|| path.to_path_buf());
    let base = normalize_path(from_directory).unwrap_or_else(|| from_directory.to_path_buf());

    let path_components: Vec<Component> = path.components().collect();
    let base_components: Vec<Component> = base.components().collect();

    let common = path_components
        .iter()
        .zip(base_components.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = PathBuf::new();
    for _ in common..base_components.len() {
        result.push("..");
    }
    for component in &path_components[common..] {
        result.push(component.as_os_str());
    }
    result
}

/// Join path components with `/` regardless of platform.
fn to_module_string(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            Component::CurDir => Some(".".to_string()),
            Component::RootDir | Component::Prefix(_) => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Normalize a path by resolving . and .. components
pub fn normalize_path(path: &Path) -> Option<PathBuf> {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                // Only pop if the last component is a Normal segment
                // Preserve RootDir and Prefix components
                if let Some(last) = components.last() {
                    if matches!(last, Component::Normal(_)) {
                        components.pop();
                    }
                }
            }
            Component::CurDir => {}
            c => components.push(c),
        }
    }

    if components.is_empty() {
        return None;
    }

    let mut result = PathBuf::new();
    for c in components {
        result.push(c);
    }
    Some(result)
}
