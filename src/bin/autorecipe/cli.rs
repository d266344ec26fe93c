//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// autorecipe - declarative build recipes for autotools-based C libraries
#[derive(Parser)]
#[command(name = "autorecipe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags accepted by every subcommand.
#[derive(Args, Clone, Debug)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Platform tag to configure for (defaults to the host, e.g. `Linux`)
    #[arg(long, global = true, env = "AUTORECIPE_PLATFORM")]
    pub platform: Option<String>,

    /// Distribution id for system packages (defaults to /etc/os-release)
    #[arg(long, global = true, env = "AUTORECIPE_DISTRO")]
    pub distro: Option<String>,

    /// Load the recipe from a TOML file instead of the built-in set
    #[arg(long, global = true)]
    pub recipe_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List built-in recipes
    List,

    /// Show a recipe's options, requirements, and patches
    Show(ShowArgs),

    /// Print the configure arguments for a set of options
    Args(ArgsArgs),

    /// Fetch, build, and package a recipe
    Create(CreateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ShowArgs {
    /// Recipe reference (`name` or `name/version`)
    pub reference: Option<String>,
}

#[derive(Args)]
pub struct ArgsArgs {
    /// Recipe reference (`name` or `name/version`)
    pub reference: Option<String>,

    /// Option value, e.g. `-o shared=True` (repeatable)
    #[arg(short = 'o', long = "option")]
    pub options: Vec<String>,

    /// Print the arguments as a JSON array
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CreateArgs {
    /// Recipe reference (`name` or `name/version`)
    pub reference: Option<String>,

    /// Option value, e.g. `-o shared=True` (repeatable)
    #[arg(short = 'o', long = "option")]
    pub options: Vec<String>,

    /// Working directory (defaults to `<work_dir>/<name>/<version>/<package_id>`)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Do not install system packages
    #[arg(long)]
    pub skip_system: bool,

    /// Number of parallel make jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Build type (`Release` or `Debug`)
    #[arg(long)]
    pub build_type: Option<String>,

    /// Print package metadata as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
