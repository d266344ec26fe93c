//! autorecipe CLI - declarative build recipes for autotools-based C libraries

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use autorecipe::util::diagnostic::emit;
use autorecipe::util::Shell;
use autorecipe::RecipeError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.global.verbose {
        EnvFilter::new("autorecipe=debug")
    } else if cli.global.quiet {
        EnvFilter::new("autorecipe=warn")
    } else {
        EnvFilter::new("autorecipe=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let shell = Shell::from_flags(cli.global.quiet, cli.global.verbose, cli.global.no_color);

    if let Err(e) = run(cli, &shell) {
        match e.downcast_ref::<RecipeError>() {
            Some(err) => emit(&err.to_diagnostic(), shell.use_color()),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, shell: &Shell) -> Result<()> {
    let global = cli.global;

    // Execute command
    match cli.command {
        Commands::List => commands::list::execute(&global),
        Commands::Show(args) => commands::show::execute(&global, args),
        Commands::Args(args) => commands::args::execute(&global, args),
        Commands::Create(args) => commands::create::execute(&global, args, shell),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
