//! Running translated commands
//!
//! The package manager runs as a child process that inherits the terminal.
//! After adding runtime packages to a TypeScript project, matching
//! `@types/*` packages are installed as dev dependencies when the package
//! does not ship its own declarations.

use crate::model::manifest::is_typescript;
use crate::model::PackageManager;
use crate::services::registry::RegistryClient;
use crate::translator::{Command, CommandKind, Translator};
use anyhow::{Context, Result as AnyhowResult};
use std::path::PathBuf;
use std::process::{self, ExitStatus, Stdio};

pub struct Executor {
    registry: RegistryClient,
    auto_install_types: bool,
    /// Directory with `package.json`, used for TypeScript detection
    project_root: Option<PathBuf>,
}

impl Executor {
    pub fn new(
        registry: RegistryClient,
        auto_install_types: bool,
        project_root: Option<PathBuf>,
    ) -> Self {
        Self {
            registry,
            auto_install_types,
            project_root,
        }
    }

    /// Run `command` with the package manager and return its exit status.
    pub fn execute(&self, pm: PackageManager, command: &Command) -> AnyhowResult<ExitStatus> {
        let status = run(pm, &command.argv())?;
        if status.success() && self.wants_types(command) {
            self.install_missing_types(pm, &command.args);
        }
        Ok(status)
    }

    fn wants_types(&self, command: &Command) -> bool {
        self.auto_install_types
            && command.kind == CommandKind::Add
            && !command.is_global()
            && self.project_root.as_deref().is_some_and(is_typescript)
    }

    fn install_missing_types(&self, pm: PackageManager, packages: &[String]) {
        let types = missing_type_packages(&self.registry, packages);
        if types.is_empty() {
            return;
        }

        let command = Translator::new(pm).add_dev(types);
        tracing::info!("Installing type declarations: {}", command);
        match run(pm, &command.argv()) {
            Ok(status) if status.success() => {}
            Ok(status) => {
                tracing::warn!("Type declaration install exited with {}", status);
                eprintln!("Warning: failed to install @types packages ({status})");
            }
            Err(e) => {
                tracing::warn!("Type declaration install failed: {:#}", e);
                eprintln!("Warning: failed to install @types packages: {e:#}");
            }
        }
    }
}

fn run(pm: PackageManager, argv: &[String]) -> AnyhowResult<ExitStatus> {
    tracing::info!("Running {} {}", pm.binary(), argv.join(" "));
    process::Command::new(pm.binary())
        .args(argv)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("failed to run {}", pm.binary()))
}

/// Strip a version or tag suffix: `lodash@4` → `lodash`, `@scope/pkg@^1` → `@scope/pkg`.
pub fn strip_version(spec: &str) -> &str {
    match spec.rfind('@') {
        Some(0) | None => spec,
        Some(at) => &spec[..at],
    }
}

/// Name of the DefinitelyTyped package for `spec`, if it could have one.
///
/// `@types/*` packages themselves have none; scoped packages use the
/// `@types/scope__name` convention.
pub fn types_package_name(spec: &str) -> Option<String> {
    let name = strip_version(spec);
    if name.is_empty() || name.starts_with("@types/") {
        return None;
    }
    match name.strip_prefix('@') {
        Some(scoped) => {
            let (scope, pkg) = scoped.split_once('/')?;
            Some(format!("@types/{scope}__{pkg}"))
        }
        None => Some(format!("@types/{name}")),
    }
}

/// `@types` packages to install for `packages`: those without bundled
/// declarations whose `@types` counterpart is published.
pub fn missing_type_packages(registry: &RegistryClient, packages: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    for spec in packages {
        let Some(types) = types_package_name(spec) else {
            continue;
        };
        let name = strip_version(spec);
        if registry.is_typed(name) {
            tracing::debug!("{} ships its own types", name);
            continue;
        }
        match registry.package_exists(&types) {
            Ok(true) => out.push(types),
            Ok(false) => tracing::debug!("{} is not published", types),
            Err(e) => tracing::warn!("Could not check {}: {:#}", types, e),
        }
    }
    out
}
