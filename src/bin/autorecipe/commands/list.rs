//! `autorecipe list` command

use anyhow::Result;

use crate::cli::GlobalArgs;
use autorecipe::recipes;
use autorecipe::RecipeDef;

pub fn execute(global: &GlobalArgs) -> Result<()> {
    let recipes = match &global.recipe_file {
        Some(path) => vec![RecipeDef::load(path)?],
        None => recipes::all(),
    };

    for recipe in recipes {
        println!(
            "{:<20} {}",
            recipe.reference(),
            recipe.package.description.as_deref().unwrap_or("")
        );
    }

    Ok(())
}
