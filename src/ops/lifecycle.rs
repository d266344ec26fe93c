//! Recipe lifecycle.
//!
//! A [`Recipe`] is one configured instance of a [`RecipeDef`]: fixed settings,
//! resolved options, and a working directory it owns exclusively. Phases run
//! in a fixed order and each one checks the current [`RecipeState`] before
//! touching the filesystem or spawning anything:
//!
//! | phase                 | allowed in                                  | moves to               |
//! |-----------------------|---------------------------------------------|------------------------|
//! | `system_requirements` | `Unconfigured`                              |                        |
//! | `requirements`        | any                                         |                        |
//! | `source`              | `Unconfigured`                              | `SourceAcquired`       |
//! | `configure_toolchain` | `SourceAcquired` (memoized afterwards)      | `ToolchainConfigured`  |
//! | `build`               | `SourceAcquired`, `ToolchainConfigured`     | `Built`                |
//! | `package`             | `Built`                                     | `Packaged`             |
//! | `package_info`        | `Packaged`                                  |                        |
//!
//! A failing phase leaves the state where it was.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::builder::autotools::{configure_args, AutotoolsBuilder, ToolchainHandle};
use crate::core::errors::RecipeError;
use crate::core::options::{OptionSet, OptionValue};
use crate::core::package_id::PackageId;
use crate::core::recipe::RecipeDef;
use crate::core::reference::RecipeRef;
use crate::core::settings::Settings;
use crate::core::state::RecipeState;
use crate::ops::package::{collect_metadata, copy_licenses, PackageMetadata};
use crate::ops::system_requirements::{packages_for, SystemOptions, SystemPackageTool};
use crate::sources::acquire::SourceAcquirer;
use crate::sources::fetch::{Fetcher, HttpFetcher};
use crate::util::process::{Executor, SystemExecutor};

/// A configured recipe instance.
pub struct Recipe {
    def: RecipeDef,
    settings: Settings,
    options: OptionSet,
    package_id: PackageId,
    work_dir: PathBuf,
    state: RecipeState,
    toolchain: Option<ToolchainHandle>,
    executor: Box<dyn Executor>,
    fetcher: Box<dyn Fetcher>,
    make: PathBuf,
    jobs: Option<usize>,
}

impl Recipe {
    /// Configure a recipe for `settings` with the `requested` option values.
    ///
    /// The platform is checked first, then the recipe itself, then the
    /// options. Nothing is fetched or spawned.
    pub fn new(
        def: RecipeDef,
        settings: Settings,
        requested: &BTreeMap<String, OptionValue>,
        work_dir: impl Into<PathBuf>,
    ) -> Result<Self, RecipeError> {
        if !def.supports(&settings.os) {
            return Err(RecipeError::UnsupportedPlatform {
                recipe: def.reference().to_string(),
                os: settings.os.clone(),
                supported: def.platforms.clone(),
            });
        }

        def.validate()?;
        let options = OptionSet::configure(&def.options, requested)?;
        let package_id = PackageId::compute(
            &def.package.name,
            &def.package.version,
            &settings,
            &options,
        );

        tracing::debug!(
            "Configured {} for {} ({}), package id {}",
            def.reference(),
            settings.os,
            settings.build_type,
            package_id
        );

        Ok(Recipe {
            def,
            settings,
            options,
            package_id,
            work_dir: work_dir.into(),
            state: RecipeState::Unconfigured,
            toolchain: None,
            executor: Box::new(SystemExecutor),
            fetcher: Box::new(HttpFetcher::new()),
            make: PathBuf::from("make"),
            jobs: None,
        })
    }

    /// Move the instance to another working directory before any phase runs.
    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    /// Run external tools through `executor`.
    pub fn with_executor(mut self, executor: impl Executor + 'static) -> Self {
        self.executor = Box::new(executor);
        self
    }

    /// Download archives through `fetcher`.
    pub fn with_fetcher(mut self, fetcher: impl Fetcher + 'static) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    /// Use a specific `make` binary.
    pub fn with_make(mut self, make: impl Into<PathBuf>) -> Self {
        self.make = make.into();
        self
    }

    /// Number of parallel make jobs.
    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn def(&self) -> &RecipeDef {
        &self.def
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    pub fn package_id(&self) -> &PackageId {
        &self.package_id
    }

    pub fn state(&self) -> RecipeState {
        self.state
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Where the sources live once acquired.
    pub fn source_dir(&self) -> PathBuf {
        self.work_dir.join(&self.def.source.subfolder)
    }

    /// Install prefix of this instance.
    pub fn package_dir(&self) -> PathBuf {
        self.work_dir
            .join("package")
            .join(self.package_id.as_str())
    }

    /// Arguments `configure` will receive, without running anything.
    pub fn configure_args(&self) -> Vec<String> {
        configure_args(&self.def.configure, &self.options)
    }

    /// The memoized toolchain, if configured.
    pub fn toolchain(&self) -> Option<&ToolchainHandle> {
        self.toolchain.as_ref()
    }

    /// Install the OS packages the recipe declares for the distribution.
    ///
    /// Returns the packages that were actually installed. With installs
    /// disabled the missing packages are only logged.
    pub fn system_requirements(&self, opts: &SystemOptions) -> Result<Vec<String>, RecipeError> {
        self.expect_state("system_requirements", &[RecipeState::Unconfigured])?;

        let packages = packages_for(&self.def, opts.distro.as_deref());
        if packages.is_empty() {
            tracing::debug!("No system packages for distro {:?}", opts.distro);
            return Ok(Vec::new());
        }

        if !opts.install {
            tracing::warn!(
                "Skipping system packages (installs disabled): {}",
                packages.join(", ")
            );
            return Ok(Vec::new());
        }

        let tool = SystemPackageTool::new(self.executor.as_ref(), opts.sudo);
        let mut installed = Vec::new();
        for package in packages {
            if tool.install(package)? {
                installed.push(package.clone());
            }
        }
        Ok(installed)
    }

    /// Every requirement of this instance: fixed ones first, then those
    /// selected by option values.
    pub fn requirements(&self) -> Vec<RecipeRef> {
        let mut requirements = self.def.requirements.clone();

        for optional in &self.def.optional_requirements {
            if self.options.effective(&optional.option) == Some(&optional.value)
                && !requirements.contains(&optional.requirement)
            {
                requirements.push(optional.requirement.clone());
            }
        }

        requirements
    }

    /// Fetch, extract, patch, and complete the sources.
    pub fn source(&mut self) -> Result<&Path, RecipeError> {
        self.expect_state("source", &[RecipeState::Unconfigured])?;

        tracing::info!("Acquiring sources for {}", self.def.reference());
        SourceAcquirer::new(self.fetcher.as_ref(), self.executor.as_ref())
            .acquire(&self.def, &self.work_dir)?;

        self.state = RecipeState::SourceAcquired;
        Ok(&self.work_dir)
    }

    /// Bootstrap and configure the sources, once.
    ///
    /// Later calls return the same handle without running anything.
    pub fn configure_toolchain(&mut self) -> Result<&ToolchainHandle, RecipeError> {
        if self.toolchain.is_none() {
            self.expect_state("configure_toolchain", &[RecipeState::SourceAcquired])?;

            let handle = self.autotools().configure(
                &self.def.configure,
                &self.options,
                &self.settings,
                &self.source_dir(),
                &self.package_dir(),
            )?;
            self.toolchain = Some(handle);
            self.state = RecipeState::ToolchainConfigured;
        }

        self.toolchain
            .as_ref()
            .ok_or(RecipeError::Sequence {
                operation: "configure_toolchain",
                state: self.state,
            })
    }

    /// Configure if needed, then run `make`.
    pub fn build(&mut self) -> Result<(), RecipeError> {
        self.expect_state(
            "build",
            &[RecipeState::SourceAcquired, RecipeState::ToolchainConfigured],
        )?;

        let handle = self.configure_toolchain()?.clone();
        self.autotools().make(&handle)?;

        self.state = RecipeState::Built;
        Ok(())
    }

    /// Copy licenses and run `make install` through the memoized toolchain.
    pub fn package(&mut self) -> Result<PathBuf, RecipeError> {
        self.expect_state("package", &[RecipeState::Built])?;

        let handle = self.toolchain.as_ref().ok_or(RecipeError::Sequence {
            operation: "package",
            state: self.state,
        })?;
        let package_dir = self.package_dir();

        copy_licenses(&self.def, &self.source_dir(), &package_dir)?;
        self.autotools().install(handle)?;

        self.state = RecipeState::Packaged;
        Ok(package_dir)
    }

    /// Consumer metadata for the packaged output.
    pub fn package_info(&self) -> Result<PackageMetadata, RecipeError> {
        self.expect_state("package_info", &[RecipeState::Packaged])?;

        collect_metadata(
            &self.def,
            &self.settings.os,
            self.package_id.clone(),
            &self.package_dir(),
            self.requirements(),
        )
    }

    fn autotools(&self) -> AutotoolsBuilder<'_> {
        AutotoolsBuilder::new(self.executor.as_ref())
            .make_program(&self.make)
            .jobs(self.jobs)
    }

    fn expect_state(
        &self,
        operation: &'static str,
        allowed: &[RecipeState],
    ) -> Result<(), RecipeError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(RecipeError::Sequence {
                operation,
                state: self.state,
            })
        }
    }
}
