use anyhow::{Context, Result as AnyhowResult};
use clap::{Parser, Subcommand};
use pm::app::{show_script_prompt, PromptOptions, PromptOutcome};
use pm::config::Config;
use pm::model::manifest::{find_manifest, load_manifest};
use pm::model::PackageManager;
use pm::services::detector::{self, find_project_root};
use pm::services::executor::Executor;
use pm::services::registry::RegistryClient;
use pm::services::terminal_modes;
use pm::services::{log_dirs, tracing_setup};
use pm::translator::{Command, Translator};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Exit code for a picker closed with Escape or Ctrl-C
const CANCELLED_EXIT_CODE: u8 = 130;

/// One command line for npm, yarn, pnpm and bun
#[derive(Parser, Debug)]
#[command(name = "pm")]
#[command(about = "A universal JavaScript package manager wrapper", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file (default: ~/.pmrc)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to log file for diagnostics (default: $XDG_STATE_HOME/pm/logs)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the translated command instead of running it
    #[arg(long)]
    dry_run: bool,

    /// Print the detected package manager and exit
    #[arg(long)]
    show_pm: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install dependencies, or add packages when any are given
    #[command(visible_alias = "i")]
    Install {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Add packages to the project
    Add {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Remove packages from the project
    #[command(visible_aliases = ["rm", "remove", "un"])]
    Uninstall {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Clean install from the lockfile
    Ci {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Run a script; without a name, pick one interactively
    Run {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// A package manager command or a script name
    #[command(external_subcommand)]
    External(Vec<String>),
}

impl Commands {
    /// The universal command line handed to the translator.
    fn into_argv(self) -> Vec<String> {
        let (verb, args) = match self {
            Commands::Install { args } => ("install", args),
            Commands::Add { args } => ("add", args),
            Commands::Uninstall { args } => ("uninstall", args),
            Commands::Ci { args } => ("ci", args),
            Commands::Run { args } => ("run", args),
            Commands::External(argv) => return argv,
        };
        std::iter::once(verb.to_string()).chain(args).collect()
    }
}

fn initialize_logging(args: &Args) {
    let log_file = args.log_file.clone().unwrap_or_else(log_dirs::main_log_path);
    if !tracing_setup::init_global(&log_file) {
        return;
    }

    log_dirs::cleanup_stale_logs();
    tracing::info!("pm {} starting", env!("CARGO_PKG_VERSION"));
}

/// `None` when the user should pick a script: bare `pm` or `pm run`.
fn requested_argv(command: Option<Commands>) -> Option<Vec<String>> {
    let argv = command?.into_argv();
    if argv.len() == 1 && argv[0] == "run" {
        return None;
    }
    Some(argv)
}

/// Show the picker for the scripts of the nearest `package.json`.
///
/// `Err(code)` when nothing was picked and pm should exit with `code`.
fn pick_script(
    cwd: &Path,
    translator: &Translator,
    config: &Config,
) -> AnyhowResult<Result<Command, ExitCode>> {
    let manifest_path = find_manifest(cwd)?;
    let manifest = load_manifest(&manifest_path)?;
    tracing::debug!(
        "Loaded {} scripts from {}",
        manifest.scripts.len(),
        manifest_path.display()
    );

    let options = PromptOptions::from(&config.picker);
    match show_script_prompt(manifest.scripts, &options).context("script picker failed")? {
        PromptOutcome::Selected(script) => Ok(Ok(translator.run_script(&script.name))),
        PromptOutcome::Cancelled => Ok(Err(ExitCode::from(CANCELLED_EXIT_CODE))),
        PromptOutcome::NoScripts => {
            eprintln!("No scripts found in {}", manifest_path.display());
            Ok(Err(ExitCode::FAILURE))
        }
    }
}

fn exit_code(status: std::process::ExitStatus) -> ExitCode {
    if status.success() {
        return ExitCode::SUCCESS;
    }
    status
        .code()
        .and_then(|code| u8::try_from(code).ok())
        .map(ExitCode::from)
        .unwrap_or(ExitCode::FAILURE)
}

fn run(args: Args) -> AnyhowResult<ExitCode> {
    let config = Config::load(args.config.as_deref()).context("failed to load configuration")?;
    let cwd = std::env::current_dir().context("failed to read the current directory")?;

    let pm: PackageManager = detector::detect(&cwd, config.default_package_manager)?;
    tracing::info!("Using {}", pm);

    if args.show_pm {
        println!("{}", pm);
        return Ok(ExitCode::SUCCESS);
    }

    let translator = Translator::new(pm);
    let command = match requested_argv(args.command) {
        Some(argv) => translator.translate(&argv),
        None => match pick_script(&cwd, &translator, &config)? {
            Ok(command) => command,
            Err(code) => return Ok(code),
        },
    };

    if args.dry_run {
        println!("{} {}", pm.binary(), command);
        return Ok(ExitCode::SUCCESS);
    }

    let executor = Executor::new(
        RegistryClient::new(&config.registry),
        config.auto_install_types,
        find_project_root(&cwd),
    );
    let status = executor.execute(pm, &command)?;
    tracing::info!("{} exited with {}", pm.binary(), status);
    Ok(exit_code(status))
}

fn main() -> AnyhowResult<ExitCode> {
    let args = Args::parse();

    initialize_logging(&args);

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        terminal_modes::emergency_cleanup();
        original_hook(panic);
    }));

    let result = run(args);
    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }
    result
}
