//! Implementation of `autorecipe create`: every phase, in order.

use std::time::Instant;

use crate::core::errors::RecipeError;
use crate::ops::lifecycle::Recipe;
use crate::ops::package::PackageMetadata;
use crate::ops::system_requirements::SystemOptions;
use crate::util::shell::{Shell, Status};

/// Options for the create command.
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// System package handling
    pub system: SystemOptions,

    /// Skip the system requirements phase entirely
    pub skip_system: bool,
}

/// Run system requirements, source, build, and package, then collect the
/// package metadata. Stops at the first failing phase.
pub fn create(
    recipe: &mut Recipe,
    opts: &CreateOptions,
    shell: &Shell,
) -> Result<PackageMetadata, RecipeError> {
    let start = Instant::now();
    let reference = recipe.def().reference();

    if opts.skip_system {
        shell.status(Status::Skipped, "system requirements");
    } else {
        for package in recipe.system_requirements(&opts.system)? {
            shell.status(Status::Installing, package);
        }
    }

    for requirement in recipe.requirements() {
        tracing::info!("{} requires {}", reference, requirement);
    }

    let spinner = shell.spinner(Status::Fetching, &reference);
    let source = recipe.source();
    spinner.finish_and_clear();
    source?;

    let patches = recipe.def().patches.len();
    if patches > 0 {
        shell.status(
            Status::Patching,
            format!("{} ({} edit{})", reference, patches, if patches == 1 { "" } else { "s" }),
        );
    }

    let spinner = shell.spinner(Status::Configuring, &reference);
    let configured = recipe.configure_toolchain().map(|_| ());
    spinner.finish_and_clear();
    configured?;

    let spinner = shell.spinner(Status::Building, &reference);
    let built = recipe.build();
    spinner.finish_and_clear();
    built?;

    let spinner = shell.spinner(Status::Packaging, &reference);
    let packaged = recipe.package();
    spinner.finish_and_clear();
    let package_dir = packaged?;

    let metadata = recipe.package_info()?;

    shell.status(
        Status::Finished,
        format!(
            "{} in {} ({:.2}s)",
            reference,
            package_dir.display(),
            start.elapsed().as_secs_f64()
        ),
    );

    Ok(metadata)
}
