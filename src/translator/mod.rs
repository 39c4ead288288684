//! Translation of universal commands into package-manager syntax
//!
//! `pm add -D jest` becomes `npm install --save-dev jest`, `yarn add --dev jest`,
//! `pnpm add --save-dev jest` or `bun add --dev jest` depending on the project.
//! Flags keep the order in which they appeared on the command line.

pub mod builtin;

pub use builtin::is_built_in;

use crate::model::PackageManager;

/// Which universal verb a command line was translated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Install,
    Add,
    Uninstall,
    Ci,
    Run,
    /// One of the package manager's own commands, passed through
    BuiltIn,
    Empty,
}

/// A translated command line: `command.. flags.. args..`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
    pub command: Vec<String>,
    pub flags: Vec<String>,
    pub args: Vec<String>,
}

impl Command {
    fn new(kind: CommandKind, command: &[&str]) -> Self {
        Self {
            kind,
            command: command.iter().map(|s| s.to_string()).collect(),
            flags: Vec::new(),
            args: Vec::new(),
        }
    }

    /// Arguments passed to the package manager binary.
    pub fn argv(&self) -> Vec<String> {
        self.command
            .iter()
            .chain(&self.flags)
            .chain(&self.args)
            .cloned()
            .collect()
    }

    /// True when the command installs globally rather than into the project.
    pub fn is_global(&self) -> bool {
        self.flags.iter().any(|f| f == "--global")
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.argv().join(" "))
    }
}

/// Flags that consume the following word as their value.
const FLAGS_WITH_VALUES: &[&str] = &[
    "omit",
    "registry",
    "tag",
    "workspace",
    "workspaces",
    "production",
    "only",
    "also",
    "save-bundle",
    "save-exact",
    "loglevel",
    "logs-max",
    "logs-dir",
    "script-shell",
    "cache-folder",
    "cache-dir",
    "prefix",
    "userconfig",
];

fn expand_short_flag(short: char) -> String {
    let long = match short {
        'D' => "save-dev",
        'P' => "save-peer",
        'O' => "save-optional",
        'E' => "save-exact",
        'g' => "global",
        'S' => "save",
        'B' => "save-bundle",
        'f' => "force",
        's' => "silent",
        'd' => "loglevel",
        other => return other.to_string(),
    };
    long.to_string()
}

fn takes_value(flag: &str) -> bool {
    FLAGS_WITH_VALUES.contains(&flag)
}

/// Package names and flags of a command line, flags in first-seen order.
#[derive(Debug, Default, PartialEq, Eq)]
struct ParsedArgs {
    packages: Vec<String>,
    flags: Vec<(String, Option<String>)>,
}

impl ParsedArgs {
    /// Later occurrences of a flag replace the earlier value in place.
    fn set_flag(&mut self, name: String, value: Option<String>) {
        match self.flags.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.flags.push((name, value)),
        }
    }
}

fn parse_args(args: &[String]) -> ParsedArgs {
    let mut parsed = ParsedArgs::default();
    let next_is_value = |i: usize| args.get(i + 1).is_some_and(|next| !next.starts_with('-'));

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        if let Some(name) = arg.strip_prefix("--") {
            if let Some((name, value)) = name.split_once('=') {
                parsed.set_flag(name.to_string(), Some(value.to_string()));
            } else if takes_value(name) && next_is_value(i) {
                parsed.set_flag(name.to_string(), Some(args[i + 1].clone()));
                i += 1;
            } else {
                parsed.set_flag(name.to_string(), None);
            }
        } else if let Some(cluster) = arg.strip_prefix('-').filter(|c| !c.is_empty()) {
            let count = cluster.chars().count();
            for (j, short) in cluster.chars().enumerate() {
                let name = expand_short_flag(short);
                // only the last flag of a cluster can take a value
                if j + 1 == count && takes_value(&name) && next_is_value(i) {
                    parsed.set_flag(name, Some(args[i + 1].clone()));
                    i += 1;
                } else {
                    parsed.set_flag(name, None);
                }
            }
        } else {
            parsed.packages.push(arg.clone());
        }
        i += 1;
    }

    parsed
}

fn pass_through(out: &mut Vec<String>, name: &str, value: Option<&str>) {
    out.push(format!("--{name}"));
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        out.push(value.to_string());
    }
}

pub struct Translator {
    pm: PackageManager,
}

impl Translator {
    pub fn new(pm: PackageManager) -> Self {
        Self { pm }
    }

    /// Translate a universal command line such as `["add", "-D", "jest"]`.
    pub fn translate<S: AsRef<str>>(&self, argv: &[S]) -> Command {
        let argv: Vec<String> = argv.iter().map(|s| s.as_ref().to_string()).collect();
        let Some((first, rest)) = argv.split_first() else {
            return Command::new(CommandKind::Empty, &[]);
        };

        match first.as_str() {
            "i" | "install" => self.install(rest),
            "add" => self.add(rest),
            "rm" | "remove" | "uninstall" | "un" => self.uninstall(rest),
            "ci" => self.ci(rest),
            "run" => {
                let mut command = Command::new(CommandKind::Run, &["run"]);
                command.args = rest.to_vec();
                command
            }
            _ if is_built_in(self.pm, argv.as_slice()) => Command {
                kind: CommandKind::BuiltIn,
                command: vec![first.clone()],
                flags: Vec::new(),
                args: rest.to_vec(),
            },
            _ => {
                let mut command = Command::new(CommandKind::Run, &["run"]);
                command.args = argv.clone();
                command
            }
        }
    }

    /// `run <name>` for a script chosen in the picker.
    pub fn run_script(&self, name: &str) -> Command {
        let mut command = Command::new(CommandKind::Run, &["run"]);
        command.args.push(name.to_string());
        command
    }

    /// Install `packages` as dev dependencies.
    pub fn add_dev(&self, packages: Vec<String>) -> Command {
        let mut command = Command::new(CommandKind::Add, &[self.add_verb()]);
        command.flags = self.dev_flag();
        command.args = packages;
        command
    }

    fn install(&self, args: &[String]) -> Command {
        let parsed = parse_args(args);
        if !parsed.packages.is_empty() {
            return self.add(args);
        }

        let mut command = Command::new(CommandKind::Install, &["install"]);
        for (name, value) in &parsed.flags {
            let value = value.as_deref();
            match name.as_str() {
                "frozen-lockfile" => command.flags.extend(self.frozen_lockfile_flag()),
                "omit" => command.flags.extend(self.omit_flag(value.unwrap_or_default())),
                "global" => command.flags.extend(self.global_flag()),
                "production" => command.flags.extend(self.production_flag()),
                _ => pass_through(&mut command.flags, name, value),
            }
        }
        command
    }

    fn add(&self, args: &[String]) -> Command {
        let parsed = parse_args(args);
        let mut command = Command::new(CommandKind::Add, &[self.add_verb()]);
        for (name, value) in &parsed.flags {
            let value = value.as_deref();
            match name.as_str() {
                "save-dev" => command.flags.extend(self.dev_flag()),
                "save-peer" => command.flags.extend(self.peer_flag()),
                "save-optional" => command.flags.extend(self.optional_flag()),
                "save-exact" => command.flags.extend(self.exact_flag()),
                "global" => command.flags.extend(self.global_flag()),
                "omit" => command.flags.extend(self.omit_flag(value.unwrap_or_default())),
                _ => pass_through(&mut command.flags, name, value),
            }
        }
        command.args = parsed.packages;
        command
    }

    fn uninstall(&self, args: &[String]) -> Command {
        let parsed = parse_args(args);
        let verb = match self.pm {
            PackageManager::Npm => "uninstall",
            _ => "remove",
        };
        let mut command = Command::new(CommandKind::Uninstall, &[verb]);
        for (name, value) in &parsed.flags {
            match name.as_str() {
                "save-dev" => command.flags.extend(self.dev_flag()),
                "global" => command.flags.extend(self.global_flag()),
                _ => pass_through(&mut command.flags, name, value.as_deref()),
            }
        }
        command.args = parsed.packages;
        command
    }

    fn ci(&self, args: &[String]) -> Command {
        let verb: &[&str] = match self.pm {
            PackageManager::Npm => &["ci"],
            PackageManager::YarnBerry => &["install", "--immutable"],
            PackageManager::Yarn | PackageManager::Pnpm | PackageManager::Bun => {
                &["install", "--frozen-lockfile"]
            }
        };
        let mut command = Command::new(CommandKind::Ci, verb);
        command.args = args.to_vec();
        command
    }

    fn add_verb(&self) -> &'static str {
        match self.pm {
            PackageManager::Npm => "install",
            _ => "add",
        }
    }

    fn flag(&self, npm_pnpm: &str, yarn_bun: &str) -> Vec<String> {
        let flag = match self.pm {
            PackageManager::Npm | PackageManager::Pnpm => npm_pnpm,
            PackageManager::Yarn | PackageManager::YarnBerry | PackageManager::Bun => yarn_bun,
        };
        vec![flag.to_string()]
    }

    fn dev_flag(&self) -> Vec<String> {
        self.flag("--save-dev", "--dev")
    }

    fn peer_flag(&self) -> Vec<String> {
        self.flag("--save-peer", "--peer")
    }

    fn optional_flag(&self) -> Vec<String> {
        self.flag("--save-optional", "--optional")
    }

    fn exact_flag(&self) -> Vec<String> {
        self.flag("--save-exact", "--exact")
    }

    fn global_flag(&self) -> Vec<String> {
        vec!["--global".to_string()]
    }

    fn production_flag(&self) -> Vec<String> {
        match self.pm {
            PackageManager::Pnpm => vec!["--prod".to_string()],
            _ => vec!["--production".to_string()],
        }
    }

    fn frozen_lockfile_flag(&self) -> Vec<String> {
        match self.pm {
            PackageManager::Npm => Vec::new(),
            PackageManager::YarnBerry => vec!["--immutable".to_string()],
            _ => vec!["--frozen-lockfile".to_string()],
        }
    }

    fn omit_flag(&self, value: &str) -> Vec<String> {
        let omit = || vec!["--omit".to_string(), value.to_string()];
        match self.pm {
            PackageManager::Npm => omit(),
            PackageManager::Pnpm if value == "dev" => vec!["--prod".to_string()],
            PackageManager::Pnpm => omit(),
            PackageManager::Yarn | PackageManager::YarnBerry | PackageManager::Bun => {
                if value == "dev" {
                    vec!["--production".to_string()]
                } else {
                    Vec::new()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(pm: PackageManager, input: &[&str]) -> String {
        Translator::new(pm).translate(input).to_string()
    }

    #[test]
    fn test_translations() {
        let cases: &[(PackageManager, &[&str], &str)] = &[
            (PackageManager::Npm, &["i", "-g", "axios", "-D", "--omit", "dev"], "install --global --save-dev --omit dev axios"),
            (PackageManager::Yarn, &["i", "-g", "axios", "-D", "--omit", "dev"], "add --global --dev --production axios"),
            (PackageManager::Pnpm, &["i", "-g", "axios", "-D", "--omit", "dev"], "add --global --save-dev --prod axios"),
            (PackageManager::Npm, &["ci"], "ci"),
            (PackageManager::Yarn, &["ci"], "install --frozen-lockfile"),
            (PackageManager::YarnBerry, &["ci"], "install --immutable"),
            (PackageManager::Pnpm, &["ci"], "install --frozen-lockfile"),
            (PackageManager::Bun, &["ci"], "install --frozen-lockfile"),
            (PackageManager::Npm, &["install"], "install"),
            (PackageManager::Npm, &["add", "express", "react"], "install express react"),
            (PackageManager::Yarn, &["add", "express", "react"], "add express react"),
            (PackageManager::YarnBerry, &["add", "express", "react"], "add express react"),
            (PackageManager::Npm, &["rm", "express"], "uninstall express"),
            (PackageManager::Yarn, &["rm", "express"], "remove express"),
            (PackageManager::Npm, &["run", "test"], "run test"),
            (PackageManager::Npm, &["test"], "test"),
            (PackageManager::Npm, &["dev"], "run dev"),
            (PackageManager::Npm, &["dev --host 0.0.0.0"], "run dev --host 0.0.0.0"),
        ];

        for (pm, input, expected) in cases {
            assert_eq!(&translate(*pm, input), expected, "{pm} {input:?}");
        }
    }

    #[test]
    fn test_empty_input() {
        let command = Translator::new(PackageManager::Npm).translate::<&str>(&[]);
        assert_eq!(command.kind, CommandKind::Empty);
        assert!(command.argv().is_empty());
    }

    #[test]
    fn test_command_and_args() {
        let command = Translator::new(PackageManager::Npm).translate(&["add", "lodash"]);
        assert_eq!(command.kind, CommandKind::Add);
        assert_eq!(command.command, ["install"]);
        assert_eq!(command.args, ["lodash"]);

        let command = Translator::new(PackageManager::Npm).translate(&["un", "lodash"]);
        assert_eq!(command.kind, CommandKind::Uninstall);
        assert_eq!(command.command, ["uninstall"]);

        let command = Translator::new(PackageManager::Yarn).translate(&["remove", "lodash"]);
        assert_eq!(command.command, ["remove"]);
        assert_eq!(command.args, ["lodash"]);
    }

    #[test]
    fn test_dev_and_exact_flags() {
        let cases: &[(PackageManager, &[&str], &str)] = &[
            (PackageManager::Npm, &["add", "jest", "-D"], "install --save-dev jest"),
            (PackageManager::Yarn, &["add", "jest", "-D"], "add --dev jest"),
            (PackageManager::YarnBerry, &["add", "jest", "-D"], "add --dev jest"),
            (PackageManager::Bun, &["add", "jest", "-D"], "add --dev jest"),
            (PackageManager::Npm, &["add", "react", "-E"], "install --save-exact react"),
            (PackageManager::Yarn, &["add", "react", "-E"], "add --exact react"),
            (PackageManager::Pnpm, &["add", "react", "-P"], "add --save-peer react"),
            (PackageManager::Bun, &["add", "react", "-O"], "add --optional react"),
        ];
        for (pm, input, expected) in cases {
            assert_eq!(&translate(*pm, input), expected, "{pm} {input:?}");
        }
    }

    #[test]
    fn test_short_flag_cluster() {
        assert_eq!(
            translate(PackageManager::Yarn, &["add", "-gD", "typescript"]),
            "add --global --dev typescript"
        );
    }

    #[test]
    fn test_install_flags() {
        assert_eq!(
            translate(PackageManager::YarnBerry, &["install", "--frozen-lockfile"]),
            "install --immutable"
        );
        assert_eq!(translate(PackageManager::Npm, &["install", "--frozen-lockfile"]), "install");
        assert_eq!(
            translate(PackageManager::Pnpm, &["install", "--production"]),
            "install --prod"
        );
        assert_eq!(
            translate(PackageManager::Bun, &["install", "--omit=dev"]),
            "install --production"
        );
        assert_eq!(
            translate(PackageManager::Yarn, &["install", "--omit=optional"]),
            "install"
        );
    }

    #[test]
    fn test_unknown_flags_pass_through() {
        assert_eq!(
            translate(PackageManager::Pnpm, &["add", "--registry", "http://r.local", "left-pad", "--ignore-scripts"]),
            "add --registry http://r.local --ignore-scripts left-pad"
        );
        assert_eq!(
            translate(PackageManager::Npm, &["add", "--foo=bar", "x"]),
            "install --foo bar x"
        );
    }

    #[test]
    fn test_repeated_flag_keeps_first_position() {
        assert_eq!(
            translate(PackageManager::Npm, &["add", "--tag", "a", "-D", "--tag", "b", "x"]),
            "install --tag b --save-dev x"
        );
    }

    #[test]
    fn test_uninstall_flags() {
        assert_eq!(
            translate(PackageManager::Bun, &["uninstall", "-g", "serve"]),
            "remove --global serve"
        );
    }

    #[test]
    fn test_built_in_pass_through() {
        let command = Translator::new(PackageManager::YarnBerry).translate(&["npm", "whoami"]);
        assert_eq!(command.kind, CommandKind::BuiltIn);
        assert_eq!(command.to_string(), "npm whoami");

        assert_eq!(translate(PackageManager::Pnpm, &["dlx", "create-vite"]), "dlx create-vite");
        assert_eq!(translate(PackageManager::Npm, &["dlx", "create-vite"]), "run dlx create-vite");
    }

    #[test]
    fn test_run_script_and_add_dev() {
        let tr = Translator::new(PackageManager::Bun);
        assert_eq!(tr.run_script("build").to_string(), "run build");
        assert_eq!(
            tr.add_dev(vec!["@types/node".into()]).to_string(),
            "add --dev @types/node"
        );
        let npm = Translator::new(PackageManager::Npm);
        assert_eq!(
            npm.add_dev(vec!["@types/lodash".into()]).to_string(),
            "install --save-dev @types/lodash"
        );
    }

    #[test]
    fn test_is_global() {
        let tr = Translator::new(PackageManager::Npm);
        assert!(tr.translate(&["add", "-g", "serve"]).is_global());
        assert!(!tr.translate(&["add", "serve"]).is_global());
    }
}
