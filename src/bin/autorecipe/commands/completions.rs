//! `autorecipe completions` command

use std::io::{self, Write};

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::generate;

use crate::cli::{Cli, CompletionsArgs};

pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();

    let mut out = io::stdout().lock();
    generate(args.shell, &mut cmd, bin, &mut out);
    out.flush()?;

    Ok(())
}
