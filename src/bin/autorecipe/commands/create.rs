//! `autorecipe create` command

use anyhow::Result;

use crate::cli::{CreateArgs, GlobalArgs};
use crate::commands::{configure, load_recipe};
use autorecipe::ops::{create, detect_distro, CreateOptions, PackageMetadata, SystemOptions};
use autorecipe::sources::HttpFetcher;
use autorecipe::util::process::{find_executable, find_make};
use autorecipe::util::diagnostic::{emit, Diagnostic};
use autorecipe::util::{GlobalContext, Shell};

pub fn execute(global: &GlobalArgs, args: CreateArgs, shell: &Shell) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let config = ctx.config();
    let def = load_recipe(global, args.reference.as_deref())?;

    let recipe_dir = ctx
        .work_dir()
        .join(&def.package.name)
        .join(&def.package.version);

    // Jobs: CLI > config > None (make's default)
    let jobs = args.jobs.or(config.build.jobs);

    let mut recipe = configure(
        global,
        &ctx,
        def,
        &args.options,
        args.build_type.as_deref(),
        recipe_dir.clone(),
    )?
    .with_fetcher(HttpFetcher::new().offline(config.net.offline))
    .with_jobs(jobs);

    // One directory per instance: <work_dir>/<name>/<version>/<package_id>
    recipe = match &args.dir {
        Some(dir) => recipe.with_work_dir(dir.clone()),
        None => {
            let dir = recipe_dir.join(recipe.package_id().as_str());
            recipe.with_work_dir(dir)
        }
    };

    if let Some(make) = find_make() {
        recipe = recipe.with_make(make);
    }

    let distro = global.distro.clone().or_else(detect_distro);
    let mut install = config.system.install_packages;
    if !args.skip_system {
        if distro.is_none() {
            shell.warn("could not detect the distribution; pass --distro to install system packages");
        }
        if install && find_executable("apt-get").is_none() {
            let diag = Diagnostic::warning("apt-get not found; system packages will not be installed")
                .with_suggestion("Install the recipe's system packages manually")
                .with_suggestion("Pass --skip-system to silence this warning");
            emit(&diag, shell.use_color());
            install = false;
        }
    }

    let opts = CreateOptions {
        system: SystemOptions {
            distro,
            install,
            sudo: config.system.sudo,
        },
        skip_system: args.skip_system,
    };

    let metadata = create(&mut recipe, &opts, shell)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
    } else {
        print_metadata(&metadata);
    }

    Ok(())
}

fn print_metadata(metadata: &PackageMetadata) {
    println!("{}/{}", metadata.name, metadata.version);
    println!("package_id: {}", metadata.package_id);
    println!("package_dir: {}", metadata.package_dir.display());
    println!("libs: {}", metadata.libs.join(" "));
    println!("include_dirs: {}", metadata.include_dirs.join(" "));
    println!("lib_dirs: {}", metadata.lib_dirs.join(" "));
    if !metadata.requires.is_empty() {
        let requires: Vec<String> = metadata.requires.iter().map(ToString::to_string).collect();
        println!("requires: {}", requires.join(" "));
    }
}
