//! `package.json` loading
//!
//! Only the fields `pm` cares about are read. Scripts keep the order in
//! which they are declared in the file, which is the order the picker shows.

use crate::model::package_manager::PackageManager;
use crate::model::script::Script;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    pub dependencies: Vec<String>,
    pub dev_dependencies: Vec<String>,
    /// Raw `packageManager` field, e.g. `"pnpm@9.1.0"`
    pub package_manager: Option<String>,
    pub scripts: Vec<Script>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawManifest {
    #[serde(default)]
    dependencies: Map<String, Value>,
    #[serde(default)]
    dev_dependencies: Map<String, Value>,
    #[serde(default)]
    package_manager: Option<Value>,
    #[serde(default)]
    scripts: Map<String, Value>,
}

impl Manifest {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawManifest = serde_json::from_str(json)?;

        let scripts = raw
            .scripts
            .into_iter()
            .filter_map(|(name, value)| match value {
                Value::String(command) => Some(Script { name, command }),
                other => {
                    tracing::warn!(script = %name, value = %other, "skipping non-string script");
                    None
                }
            })
            .collect();

        Ok(Self {
            dependencies: raw.dependencies.into_iter().map(|(k, _)| k).collect(),
            dev_dependencies: raw.dev_dependencies.into_iter().map(|(k, _)| k).collect(),
            package_manager: raw
                .package_manager
                .and_then(|v| v.as_str().map(str::to_string)),
            scripts,
        })
    }

    /// Package manager named by the `packageManager` field, if any.
    pub fn declared_package_manager(&self) -> Option<PackageManager> {
        self.package_manager
            .as_deref()
            .and_then(PackageManager::from_package_manager_field)
    }

    pub fn depends_on(&self, name: &str) -> bool {
        self.dependencies.iter().any(|d| d == name) || self.dev_dependencies.iter().any(|d| d == name)
    }
}

#[derive(Debug)]
pub enum ManifestError {
    NotFound { start: PathBuf },
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { start } => {
                write!(f, "cannot find package.json in {} or its parents", start.display())
            }
            Self::Read { path, source } => write!(f, "cannot read {}: {}", path.display(), source),
            Self::Parse { path, source } => write!(f, "cannot parse {}: {}", path.display(), source),
        }
    }
}

impl std::error::Error for ManifestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound { .. } => None,
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

pub fn load_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Manifest::from_json(&contents).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Path of the nearest `package.json` at or above `start`.
pub fn find_manifest(start: &Path) -> Result<PathBuf, ManifestError> {
    crate::services::detector::find_project_root(start)
        .map(|root| root.join(MANIFEST_FILE))
        .ok_or_else(|| ManifestError::NotFound {
            start: start.to_path_buf(),
        })
}

/// A project uses TypeScript when it has a `tsconfig.json` or depends on `typescript`.
pub fn is_typescript(root: &Path) -> bool {
    if root.join("tsconfig.json").is_file() {
        return true;
    }
    load_manifest(&root.join(MANIFEST_FILE))
        .map(|manifest| manifest.depends_on("typescript"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripts_keep_declaration_order() {
        let manifest = Manifest::from_json(
            r#"{
                "name": "demo",
                "scripts": {
                    "zeta": "echo z",
                    "alpha": "echo a",
                    "mid": "echo m"
                }
            }"#,
        )
        .unwrap();

        let names: Vec<_> = manifest.scripts.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
        assert_eq!(manifest.scripts[1].command, "echo a");
    }

    #[test]
    fn test_non_string_scripts_skipped() {
        let manifest =
            Manifest::from_json(r#"{"scripts": {"a": "x", "b": 1, "c": null, "d": "y"}}"#).unwrap();
        let names: Vec<_> = manifest.scripts.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["a", "d"]);
    }

    #[test]
    fn test_missing_sections() {
        let manifest = Manifest::from_json("{}").unwrap();
        assert!(manifest.scripts.is_empty());
        assert!(manifest.package_manager.is_none());
        assert!(!manifest.depends_on("typescript"));
    }

    #[test]
    fn test_dependencies_and_package_manager() {
        let manifest = Manifest::from_json(
            r#"{
                "packageManager": "yarn@4.1.0",
                "dependencies": {"react": "^18.0.0"},
                "devDependencies": {"typescript": "^5.0.0"}
            }"#,
        )
        .unwrap();
        assert!(manifest.depends_on("react"));
        assert!(manifest.depends_on("typescript"));
        assert_eq!(
            manifest.declared_package_manager(),
            Some(PackageManager::YarnBerry)
        );
    }

    #[test]
    fn test_non_string_package_manager_ignored() {
        let manifest = Manifest::from_json(r#"{"packageManager": 3}"#).unwrap();
        assert_eq!(manifest.package_manager, None);
    }

    #[test]
    fn test_invalid_json() {
        assert!(Manifest::from_json("{not json").is_err());
    }

    #[test]
    fn test_load_and_typescript_detection() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("package.json"), r#"{"scripts": {"dev": "vite"}}"#).unwrap();

        let manifest = load_manifest(&root.join("package.json")).unwrap();
        assert_eq!(manifest.scripts, vec![Script::new("dev", "vite")]);
        assert!(!is_typescript(root));

        std::fs::write(root.join("tsconfig.json"), "{}").unwrap();
        assert!(is_typescript(root));
    }

    #[test]
    fn test_typescript_from_dev_dependency() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            r#"{"devDependencies": {"typescript": "5.4.0"}}"#,
        )
        .unwrap();
        assert!(is_typescript(dir.path()));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_manifest(&dir.path().join("package.json")).unwrap_err();
        assert!(matches!(err, ManifestError::Read { .. }));
    }

    #[test]
    fn test_find_manifest_from_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("package.json"), "{}").unwrap();
        let nested = dir.path().join("src/components");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(
            find_manifest(&nested).unwrap(),
            dir.path().join("package.json")
        );
    }
}
