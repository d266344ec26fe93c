//! Autotools driver: bootstrap, configure, make, make install.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::errors::RecipeError;
use crate::core::options::OptionSet;
use crate::core::recipe::ConfigureSpec;
use crate::core::settings::Settings;
use crate::util::process::{Executor, ProcessBuilder, ProcessOutput};

/// Arguments passed to `./configure` for the given options.
///
/// Static arguments come first, then the flag table rows whose option has the
/// matching effective value, in table order. The install prefix is not part
/// of this list.
pub fn configure_args(spec: &ConfigureSpec, options: &OptionSet) -> Vec<String> {
    let mut args = spec.args.clone();

    for row in &spec.flags {
        if options.effective(&row.option) == Some(&row.value) {
            args.extend(row.args.iter().cloned());
        }
    }

    args
}

/// Environment for every autotools step.
pub fn configure_env(
    spec: &ConfigureSpec,
    options: &OptionSet,
    settings: &Settings,
) -> BTreeMap<String, String> {
    let mut cflags = Vec::new();

    if let Some(fpic) = &spec.fpic_option {
        if options.flag(fpic) {
            cflags.push("-fPIC");
        }
    }
    if settings.is_debug() {
        cflags.push("-g");
    }

    let mut env = BTreeMap::new();
    if !cflags.is_empty() {
        let cflags = cflags.join(" ");
        env.insert("CFLAGS".to_string(), cflags.clone());
        env.insert("CXXFLAGS".to_string(), cflags);
    }
    env
}

/// A configured source tree, ready for `make`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainHandle {
    /// Arguments passed to `./configure`, without `--prefix`
    pub args: Vec<String>,
    /// Environment shared by configure, make, and install
    pub env: BTreeMap<String, String>,
    /// The configured source tree
    pub source_dir: PathBuf,
    /// Install prefix
    pub prefix: PathBuf,
}

/// Runs autotools steps through an [`Executor`].
pub struct AutotoolsBuilder<'a> {
    executor: &'a dyn Executor,
    make: PathBuf,
    jobs: Option<usize>,
}

impl<'a> AutotoolsBuilder<'a> {
    pub fn new(executor: &'a dyn Executor) -> Self {
        AutotoolsBuilder {
            executor,
            make: PathBuf::from("make"),
            jobs: None,
        }
    }

    /// Use a specific `make` binary.
    pub fn make_program(mut self, make: impl Into<PathBuf>) -> Self {
        self.make = make.into();
        self
    }

    /// Number of parallel make jobs.
    pub fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Bootstrap and configure `source_dir` to install into `prefix`.
    pub fn configure(
        &self,
        spec: &ConfigureSpec,
        options: &OptionSet,
        settings: &Settings,
        source_dir: &Path,
        prefix: &Path,
    ) -> Result<ToolchainHandle, RecipeError> {
        let handle = ToolchainHandle {
            args: configure_args(spec, options),
            env: configure_env(spec, options, settings),
            source_dir: source_dir.to_path_buf(),
            prefix: prefix.to_path_buf(),
        };

        if let Some((program, rest)) = spec.bootstrap.split_first() {
            tracing::info!("Bootstrapping {}", source_dir.display());
            let cmd = ProcessBuilder::new(program)
                .args(rest)
                .envs(&handle.env)
                .cwd(source_dir);
            self.run(&cmd, configure_error)?;
        }

        tracing::info!("Configuring with {}", handle.args.join(" "));
        let cmd = ProcessBuilder::new("./configure")
            .args(&handle.args)
            .arg(format!("--prefix={}", prefix.display()))
            .envs(&handle.env)
            .cwd(source_dir);
        self.run(&cmd, configure_error)?;

        Ok(handle)
    }

    /// Run `make` in a configured tree.
    pub fn make(&self, handle: &ToolchainHandle) -> Result<(), RecipeError> {
        let mut cmd = ProcessBuilder::new(&self.make);
        if let Some(jobs) = self.jobs {
            cmd = cmd.arg(format!("-j{}", jobs));
        }
        let cmd = cmd.envs(&handle.env).cwd(&handle.source_dir);

        tracing::info!("Building in {}", handle.source_dir.display());
        self.run(&cmd, build_error)?;
        Ok(())
    }

    /// Run `make install` into the handle's prefix.
    pub fn install(&self, handle: &ToolchainHandle) -> Result<(), RecipeError> {
        let cmd = ProcessBuilder::new(&self.make)
            .arg("install")
            .envs(&handle.env)
            .cwd(&handle.source_dir);

        tracing::info!("Installing into {}", handle.prefix.display());
        self.run(&cmd, build_error)?;
        Ok(())
    }

    fn run(
        &self,
        cmd: &ProcessBuilder,
        to_error: fn(String, Option<i32>, String) -> RecipeError,
    ) -> Result<ProcessOutput, RecipeError> {
        let command = cmd.display_command();

        let output = self
            .executor
            .exec(cmd)
            .map_err(|e| to_error(command.clone(), None, format!("{:#}", e)))?;

        if !output.success() {
            tracing::debug!("`{}` failed:\n{}", command, output.stderr);
            return Err(to_error(command, output.status, output.stderr));
        }

        Ok(output)
    }
}

fn configure_error(command: String, status: Option<i32>, stderr: String) -> RecipeError {
    RecipeError::Configure {
        command,
        status,
        stderr,
    }
}

fn build_error(command: String, status: Option<i32>, stderr: String) -> RecipeError {
    RecipeError::Build {
        command,
        status,
        stderr,
    }
}
