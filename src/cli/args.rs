//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Basecamp - Python development environment bootstrapper.
#[derive(Debug, Parser)]
#[command(name = "basecamp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Set up the development environment (default if no command specified)
    Run(RunArgs),

    /// Show current environment status
    Status(StatusArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RunArgs {
    /// Python interpreter to bootstrap from (name on PATH or a path)
    #[arg(long, env = "BASECAMP_PYTHON")]
    pub python: Option<String>,

    /// Virtual environment directory, relative to the project root
    #[arg(long, default_value = "venv", env = "BASECAMP_VENV_DIR")]
    pub venv_dir: String,

    /// Requirements file, relative to the project root
    #[arg(long, default_value = "requirements.txt")]
    pub requirements: String,

    /// Extras group for the editable install
    #[arg(long, default_value = "dev")]
    pub extras: String,

    /// Install the project without any extras group
    #[arg(long)]
    pub no_extras: bool,

    /// Packages imported by the smoke test (comma-separated)
    #[arg(
        long = "probe",
        value_delimiter = ',',
        default_values_t = [String::from("torch"), String::from("transformers")]
    )]
    pub probes: Vec<String>,

    /// Run only specified steps (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Skip specified steps (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Recreate the virtual environment even if it exists
    #[arg(short, long)]
    pub force: bool,

    /// Preview commands without executing
    #[arg(long)]
    pub dry_run: bool,

    /// No prompts, take defaults
    #[arg(long)]
    pub non_interactive: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            python: None,
            venv_dir: "venv".to_string(),
            requirements: "requirements.txt".to_string(),
            extras: "dev".to_string(),
            no_extras: false,
            probes: vec!["torch".to_string(), "transformers".to_string()],
            only: Vec::new(),
            skip: Vec::new(),
            force: false,
            dry_run: false,
            non_interactive: false,
        }
    }
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Python interpreter to report on (name on PATH or a path)
    #[arg(long, env = "BASECAMP_PYTHON")]
    pub python: Option<String>,

    /// Virtual environment directory, relative to the project root
    #[arg(long, default_value = "venv", env = "BASECAMP_VENV_DIR")]
    pub venv_dir: String,

    /// Requirements file, relative to the project root
    #[arg(long, default_value = "requirements.txt")]
    pub requirements: String,

    /// Packages checked by the import probes (comma-separated)
    #[arg(
        long = "probe",
        value_delimiter = ',',
        default_values_t = [String::from("torch"), String::from("transformers")]
    )]
    pub probes: Vec<String>,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_args_defaults_match_clap_defaults() {
        let cli = Cli::try_parse_from(["basecamp", "run"]).unwrap();
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run command");
        };

        let defaults = RunArgs::default();
        assert_eq!(args.venv_dir, defaults.venv_dir);
        assert_eq!(args.requirements, defaults.requirements);
        assert_eq!(args.extras, defaults.extras);
        assert_eq!(args.probes, defaults.probes);
    }

    #[test]
    fn probe_list_splits_on_commas() {
        let cli = Cli::try_parse_from(["basecamp", "run", "--probe", "numpy,pandas"]).unwrap();
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.probes, ["numpy", "pandas"]);
    }

    #[test]
    fn only_and_skip_split_on_commas() {
        let cli = Cli::try_parse_from([
            "basecamp",
            "run",
            "--only",
            "python-version,create-venv",
            "--skip",
            "smoke-test",
        ])
        .unwrap();
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.only, ["python-version", "create-venv"]);
        assert_eq!(args.skip, ["smoke-test"]);
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["basecamp", "--quiet", "status"]).unwrap();
        assert!(cli.quiet);
        assert!(matches!(cli.command, Some(Commands::Status(_))));
    }

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["basecamp"]).unwrap();
        assert!(cli.command.is_none());
    }
}
