//! Project data: scripts, manifests and package managers.

pub mod manifest;
pub mod package_manager;
pub mod script;

pub use manifest::{Manifest, ManifestError};
pub use package_manager::PackageManager;
pub use script::Script;
