//
// dependency/manifest.rs
//
// Node module names from the nearest package.json
//

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use serde::Deserialize;

use super::error::{DependencyError, Result};

pub const MANIFEST_FILE_NAME: &str = "package.json";

/// The parts of a package manifest that name installable modules.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageManifest {
    #[serde(default)]
    dependencies: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    dev_dependencies: serde_json::Map<String, serde_json::Value>,
}

/// Walk up from `start` and return the first directory's `package.json`.
pub fn find_manifest(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(MANIFEST_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Module names declared by the manifest nearest to `start`.
///
/// Names from `dependencies` come first in document order, followed by any
/// `devDependencies` not already listed when `include_dev` is set.
pub fn manifest_module_names(start: &Path, include_dev: bool) -> Result<Vec<String>> {
    let path = find_manifest(start).ok_or_else(|| DependencyError::Manifest {
        path: start.join(MANIFEST_FILE_NAME),
        reason: "no package.json in this directory or any parent".to_string(),
    })?;
    log::trace!("Using manifest {}", path.display());

    let text = fs::read_to_string(&path).map_err(|e| DependencyError::Manifest {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    module_names_from_str(&text, include_dev).map_err(|reason| DependencyError::Manifest {
        path,
        reason,
    })
}

/// Module names from manifest JSON text.
pub fn module_names_from_str(text: &str, include_dev: bool) -> std::result::Result<Vec<String>, String> {
    let manifest: PackageManifest = serde_json::from_str(text).map_err(|e| e.to_string())?;

    let mut names: IndexSet<String> = manifest.dependencies.keys().cloned().collect();
    if include_dev {
        names.extend(manifest.dev_dependencies.keys().cloned());
    }
    Ok(names.into_iter().collect())
}

/// Canonical form used to match a symbol against module names:
/// lowercase, with `-`, `_` and `.` removed.
pub fn normalize_module_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | '.'))
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Modules whose normalized name equals the normalized symbol.
pub fn matching_modules(symbol: &str, modules: &[String]) -> Vec<String> {
    let wanted = normalize_module_name(symbol);
    modules
        .iter()
        .filter(|m| {
            // scoped packages match on the part after the scope
            let bare = m.rsplit('/').next().unwrap_or(m);
            normalize_module_name(bare) == wanted
        })
        .cloned()
        .collect()
}
