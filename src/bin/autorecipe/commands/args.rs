//! `autorecipe args` command
//!
//! Prints the `configure` arguments a recipe would use. Nothing is fetched
//! or spawned.

use anyhow::Result;

use crate::cli::{ArgsArgs, GlobalArgs};
use crate::commands::{configure, load_recipe};
use autorecipe::util::GlobalContext;

pub fn execute(global: &GlobalArgs, args: ArgsArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let def = load_recipe(global, args.reference.as_deref())?;
    let work_dir = ctx.work_dir();

    let recipe = configure(global, &ctx, def, &args.options, None, work_dir)?;
    let configure_args = recipe.configure_args();

    if args.json {
        println!("{}", serde_json::to_string(&configure_args)?);
    } else {
        for arg in configure_args {
            println!("{}", arg);
        }
    }

    Ok(())
}
