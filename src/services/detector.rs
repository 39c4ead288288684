//! Package manager detection
//!
//! Lockfiles are the strongest signal, then the `packageManager` field of
//! `package.json`, then the user's configured default, and finally whichever
//! supported binary is installed.

use crate::model::manifest::{load_manifest, MANIFEST_FILE};
use crate::model::PackageManager;
use std::fmt;
use std::path::{Path, PathBuf};

/// Number of parent directories searched above the starting directory.
pub const MAX_TRAVERSE_DEPTH: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectError {
    /// Nothing in the project, the config or `PATH` names a package manager
    NotFound,
}

impl fmt::Display for DetectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => {
                write!(f, "no package manager detected (supported: npm, yarn, pnpm, bun)")
            }
        }
    }
}

impl std::error::Error for DetectError {}

/// First directory at or above `start` that contains `package.json`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .take(MAX_TRAVERSE_DEPTH + 1)
        .find(|dir| dir.join(MANIFEST_FILE).is_file())
        .map(Path::to_path_buf)
}

/// Detect the package manager for `start`, probing `PATH` as a last resort.
pub fn detect(start: &Path, default: Option<PackageManager>) -> Result<PackageManager, DetectError> {
    detect_with(start, default, |binary| which::which(binary).is_ok())
}

/// [`detect`] with a custom check for installed binaries.
pub fn detect_with(
    start: &Path,
    default: Option<PackageManager>,
    is_installed: impl Fn(&str) -> bool,
) -> Result<PackageManager, DetectError> {
    if let Some(root) = find_project_root(start) {
        if let Some(pm) = detect_in_project(&root) {
            tracing::info!("Detected {} from project at {}", pm, root.display());
            return Ok(pm);
        }
        tracing::debug!("No package manager hint in {}", root.display());
    }

    if let Some(pm) = default {
        tracing::info!("Using configured default package manager {}", pm);
        return Ok(pm);
    }

    match PackageManager::PROBE_ORDER
        .into_iter()
        .find(|pm| is_installed(pm.binary()))
    {
        Some(pm) => {
            tracing::info!("Using installed package manager {}", pm);
            Ok(pm)
        }
        None => Err(DetectError::NotFound),
    }
}

/// Lockfiles first, then the `packageManager` field.
pub fn detect_in_project(root: &Path) -> Option<PackageManager> {
    let declared = load_manifest(&root.join(MANIFEST_FILE))
        .ok()
        .and_then(|manifest| manifest.declared_package_manager());

    if root.join("package-lock.json").exists() {
        return Some(PackageManager::Npm);
    }
    if root.join("yarn.lock").exists() {
        return Some(yarn_variant(root, declared));
    }
    if root.join("pnpm-lock.yaml").exists() {
        return Some(PackageManager::Pnpm);
    }
    if root.join("bun.lock").exists() || root.join("bun.lockb").exists() {
        return Some(PackageManager::Bun);
    }

    declared
}

fn yarn_variant(root: &Path, declared: Option<PackageManager>) -> PackageManager {
    if let Some(pm) = declared.filter(|pm| pm.is_yarn()) {
        return pm;
    }

    const BERRY_MARKERS: [&str; 4] = [".yarnrc.yml", ".yarnrc.yaml", ".pnp.cjs", ".pnp.mjs"];
    if BERRY_MARKERS.iter().any(|marker| root.join(marker).exists())
        || root.join(".yarn").join("releases").is_dir()
    {
        return PackageManager::YarnBerry;
    }

    PackageManager::Yarn
}
