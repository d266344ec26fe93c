//! `autorecipe show` command

use anyhow::Result;

use crate::cli::{GlobalArgs, ShowArgs};
use crate::commands::load_recipe;
use autorecipe::sources::source_url;

pub fn execute(global: &GlobalArgs, args: ShowArgs) -> Result<()> {
    let recipe = load_recipe(global, args.reference.as_deref())?;

    println!("{}", recipe.reference());
    if let Some(description) = &recipe.package.description {
        println!("  {}", description);
    }
    if let Some(homepage) = &recipe.package.homepage {
        println!("homepage: {}", homepage);
    }
    if let Some(license) = &recipe.package.license {
        println!("license: {}", license);
    }
    println!("source: {}", source_url(&recipe)?);
    if !recipe.platforms.is_empty() {
        println!("platforms: {}", recipe.platforms.join(", "));
    }

    println!("options:");
    for (name, decl) in &recipe.options {
        let allowed: Vec<String> = decl.allowed.iter().map(ToString::to_string).collect();
        println!("  {} = {} [{}]", name, decl.default, allowed.join(", "));
    }

    println!("requirements:");
    for requirement in &recipe.requirements {
        println!("  {}", requirement);
    }
    for optional in &recipe.optional_requirements {
        println!(
            "  {} (when {}={})",
            optional.requirement, optional.option, optional.value
        );
    }

    if !recipe.patches.is_empty() {
        println!("patches:");
        for patch in &recipe.patches {
            println!("  {}", patch.describe());
        }
    }

    if !recipe.system.packages.is_empty() {
        println!("system packages:");
        for (distro, packages) in &recipe.system.packages {
            println!("  {}: {}", distro, packages.join(", "));
        }
    }

    Ok(())
}
