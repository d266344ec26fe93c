//! Command implementations

pub mod args;
pub mod completions;
pub mod create;
pub mod list;
pub mod show;

use anyhow::{bail, Result};

use crate::cli::GlobalArgs;
use autorecipe::core::options::parse_assignments;
use autorecipe::core::settings::Settings;
use autorecipe::recipes;
use autorecipe::util::diagnostic::suggestions;
use autorecipe::util::GlobalContext;
use autorecipe::{Recipe, RecipeDef};

/// Resolve the recipe a command operates on.
///
/// `--recipe-file` wins over the built-in set; a reference given alongside
/// it must name the loaded recipe.
pub fn load_recipe(global: &GlobalArgs, reference: Option<&str>) -> Result<RecipeDef> {
    if let Some(path) = &global.recipe_file {
        let recipe = RecipeDef::load(path)?;
        if let Some(reference) = reference {
            let loaded = recipe.reference().to_string();
            if reference != recipe.package.name && reference != loaded {
                bail!(
                    "`{}` does not match the recipe in {} (`{}`)",
                    reference,
                    path.display(),
                    loaded
                );
            }
        }
        return Ok(recipe);
    }

    match reference {
        Some(reference) => recipes::find(reference)
            .map_err(|e| anyhow::anyhow!("{:#}\nhint: {}", e, suggestions::UNKNOWN_RECIPE)),
        None => bail!("no recipe given\nhint: pass a reference such as `glib/2.40.0`, or --recipe-file"),
    }
}

/// Host settings, with the global platform override and the configured build type.
pub fn settings(global: &GlobalArgs, ctx: &GlobalContext, build_type: Option<&str>) -> Settings {
    let mut settings = Settings::detect();

    if let Some(platform) = &global.platform {
        settings = settings.with_os(platform.as_str());
    }

    // CLI > config > default
    if let Some(build_type) = build_type.or(ctx.config().build.build_type.as_deref()) {
        settings = settings.with_build_type(build_type);
    }

    settings
}

/// Configure a recipe instance from CLI arguments.
pub fn configure(
    global: &GlobalArgs,
    ctx: &GlobalContext,
    def: RecipeDef,
    options: &[String],
    build_type: Option<&str>,
    work_dir: std::path::PathBuf,
) -> Result<Recipe> {
    let requested = parse_assignments(options)?;
    let settings = settings(global, ctx, build_type);

    Ok(Recipe::new(def, settings, &requested, work_dir)?)
}
