//! Commands each package manager implements itself.
//!
//! `pm <word>` passes these through unchanged instead of treating the word as
//! a script name. Some yarn berry commands are several words long; an entry
//! matches when it is a prefix of the command line.

use crate::model::PackageManager;

// npm v11
const NPM: &[&[&str]] = &[
    &["access"],
    &["adduser"],
    &["audit"],
    &["bugs"],
    &["cache"],
    &["ci"],
    &["completion"],
    &["config"],
    &["dedupe"],
    &["deprecate"],
    &["diff"],
    &["dist-tag"],
    &["docs"],
    &["doctor"],
    &["edit"],
    &["exec"],
    &["explain"],
    &["explore"],
    &["find-dupes"],
    &["fund"],
    &["help"],
    &["help-search"],
    &["init"],
    &["install"],
    &["install-ci-test"],
    &["install-test"],
    &["link"],
    &["login"],
    &["logout"],
    &["ls"],
    &["org"],
    &["outdated"],
    &["owner"],
    &["pack"],
    &["ping"],
    &["pkg"],
    &["prefix"],
    &["profile"],
    &["prune"],
    &["publish"],
    &["query"],
    &["rebuild"],
    &["repo"],
    &["restart"],
    &["root"],
    &["run"],
    &["sbom"],
    &["search"],
    &["shrinkwrap"],
    &["star"],
    &["stars"],
    &["start"],
    &["stop"],
    &["team"],
    &["test"],
    &["token"],
    &["undeprecate"],
    &["uninstall"],
    &["unpublish"],
    &["unstar"],
    &["update"],
    &["version"],
    &["view"],
    &["whoami"],
];

const YARN_CLASSIC: &[&[&str]] = &[
    &["add"],
    &["audit"],
    &["autoclean"],
    &["bin"],
    &["cache"],
    &["check"],
    &["config"],
    &["create"],
    &["dedupe"],
    &["generate-lock-entry"],
    &["global"],
    &["help"],
    &["import"],
    &["info"],
    &["init"],
    &["install"],
    &["licenses"],
    &["link"],
    &["list"],
    &["lockfile"],
    &["login"],
    &["logout"],
    &["outdated"],
    &["owner"],
    &["pack"],
    &["policies"],
    &["prune"],
    &["publish"],
    &["remove"],
    &["run"],
    &["self-update"],
    &["tag"],
    &["team"],
    &["test"],
    &["unlink"],
    &["upgrade"],
    &["upgrade-interactive"],
    &["version"],
    &["versions"],
    &["why"],
    &["workspace"],
    &["workspaces"],
];

const YARN_BERRY: &[&[&str]] = &[
    &["add"],
    &["bin"],
    &["cache", "clean"],
    &["config", "get"],
    &["config", "set"],
    &["config", "unset"],
    &["constraints"],
    &["dedupe"],
    &["dlx"],
    &["exec"],
    &["explain"],
    &["info"],
    &["init"],
    &["install"],
    &["link"],
    &["node"],
    &["npm", "audit"],
    &["npm", "info"],
    &["npm", "login"],
    &["npm", "logout"],
    &["npm", "publish"],
    &["npm", "tag", "add"],
    &["npm", "tag", "list"],
    &["npm", "tag", "remove"],
    &["npm", "whoami"],
    &["pack"],
    &["patch"],
    &["patch-commit"],
    &["plugin", "check"],
    &["plugin", "import", "from", "sources"],
    &["plugin", "list"],
    &["plugin", "remove"],
    &["plugin", "runtime"],
    &["rebuild"],
    &["remove"],
    &["run"],
    &["search"],
    &["set", "resolution"],
    &["set", "version"],
    &["stage"],
    &["unlink"],
    &["unplug"],
    &["up"],
    &["upgrade-interactive"],
    &["version", "apply"],
    &["version", "check"],
    &["why"],
    &["workspace"],
    &["workspaces", "focus"],
    &["workspaces", "foreach"],
    &["workspaces", "list"],
];

const PNPM: &[&[&str]] = &[
    // dependencies
    &["add"],
    &["install"],
    &["update"],
    &["remove"],
    &["link"],
    &["unlink"],
    &["import"],
    &["rebuild"],
    &["prune"],
    &["fetch"],
    &["install-test"],
    &["dedupe"],
    &["patch"],
    &["patch-commit"],
    &["patch-remove"],
    &["audit"],
    &["list"],
    &["outdated"],
    &["why"],
    &["licenses"],
    // scripts
    &["run"],
    &["test"],
    &["exec"],
    &["dlx"],
    &["create"],
    &["start"],
    &["approve-builds"],
    &["ignored-builds"],
    // environment and store
    &["env"],
    &["cat-file"],
    &["cat-index"],
    &["find-hash"],
    &["cache", "list"],
    &["cache", "list-registries"],
    &["cache", "view"],
    &["cache", "delete"],
    &["self-update"],
    &["publish"],
    &["pack"],
    &["-r"],
    &["--recursive"],
    &["recursive"],
    &["server"],
    &["store"],
    &["root"],
    &["bin"],
    &["setup"],
    &["init"],
    &["deploy"],
    &["doctor"],
    &["config"],
];

const BUN: &[&[&str]] = &[
    &["run"],
    &["test"],
    &["x"],
    &["repl"],
    &["exec"],
    &["install"],
    &["i"],
    &["add"],
    &["a"],
    &["remove"],
    &["rm"],
    &["audit"],
    &["outdated"],
    &["link"],
    &["unlink"],
    &["publish"],
    &["patch"],
    &["pm"],
    &["info"],
    &["build"],
    &["init"],
    &["create"],
    &["c"],
    &["upgrade"],
];

fn table(pm: PackageManager) -> &'static [&'static [&'static str]] {
    match pm {
        PackageManager::Npm => NPM,
        PackageManager::Yarn => YARN_CLASSIC,
        PackageManager::YarnBerry => YARN_BERRY,
        PackageManager::Pnpm => PNPM,
        PackageManager::Bun => BUN,
    }
}

/// True when the command line starts with one of `pm`'s own commands.
pub fn is_built_in<S: AsRef<str>>(pm: PackageManager, argv: &[S]) -> bool {
    table(pm).iter().any(|entry| {
        entry.len() <= argv.len()
            && entry
                .iter()
                .zip(argv)
                .all(|(expected, actual)| *expected == actual.as_ref())
    })
}
