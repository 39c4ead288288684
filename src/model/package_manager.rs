//! Supported JavaScript package managers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackageManager {
    #[serde(rename = "npm")]
    Npm,
    /// Yarn classic (1.x)
    #[serde(rename = "yarn")]
    Yarn,
    /// Yarn 2 and later
    #[serde(rename = "yarn-berry")]
    YarnBerry,
    #[serde(rename = "pnpm")]
    Pnpm,
    #[serde(rename = "bun")]
    Bun,
}

impl PackageManager {
    /// Order in which installed binaries are probed.
    pub const PROBE_ORDER: [PackageManager; 4] = [Self::Npm, Self::Yarn, Self::Pnpm, Self::Bun];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::YarnBerry => "yarn-berry",
            Self::Pnpm => "pnpm",
            Self::Bun => "bun",
        }
    }

    /// Executable name on `PATH`.
    pub fn binary(self) -> &'static str {
        match self {
            Self::YarnBerry => "yarn",
            other => other.as_str(),
        }
    }

    pub fn is_yarn(self) -> bool {
        matches!(self, Self::Yarn | Self::YarnBerry)
    }

    /// Interpret a `packageManager` field such as `"pnpm@9.1.0"` or `"yarn@4.0.2"`.
    ///
    /// Yarn maps to [`PackageManager::YarnBerry`] when the major version is 2 or
    /// later. Empty and unknown names yield `None`.
    pub fn from_package_manager_field(field: &str) -> Option<Self> {
        let field = field.trim();
        if field.is_empty() {
            return None;
        }

        let (name, version) = match field.split_once('@') {
            Some((name, version)) => (name.trim(), version.trim()),
            None => (field, ""),
        };

        match name {
            "npm" => Some(Self::Npm),
            "pnpm" => Some(Self::Pnpm),
            "bun" => Some(Self::Bun),
            "yarn" => match semver_major(version) {
                Some(major) if major >= 2 => Some(Self::YarnBerry),
                _ => Some(Self::Yarn),
            },
            _ => None,
        }
    }
}

/// Leading integer of a version string, after an optional `v`.
fn semver_major(version: &str) -> Option<u64> {
    let version = version.trim();
    let version = version.strip_prefix('v').unwrap_or(version);
    let end = version
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(version.len());
    version[..end].parse().ok()
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPackageManager(pub String);

impl fmt::Display for UnknownPackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown package manager '{}' (supported: npm, yarn, yarn-berry, pnpm, bun)",
            self.0
        )
    }
}

impl std::error::Error for UnknownPackageManager {}

impl FromStr for PackageManager {
    type Err = UnknownPackageManager;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "npm" => Ok(Self::Npm),
            "yarn" => Ok(Self::Yarn),
            "yarn-berry" => Ok(Self::YarnBerry),
            "pnpm" => Ok(Self::Pnpm),
            "bun" => Ok(Self::Bun),
            other => Err(UnknownPackageManager(other.to_string())),
        }
    }
}
