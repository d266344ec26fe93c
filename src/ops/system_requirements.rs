//! OS packages a recipe needs before it can build.

use std::path::Path;

use crate::core::errors::RecipeError;
use crate::core::recipe::RecipeDef;
use crate::util::process::{Executor, ProcessBuilder};

/// How system packages are handled for one run.
#[derive(Debug, Clone, Default)]
pub struct SystemOptions {
    /// Distribution id (`ubuntu`, `debian`, ...); `None` when unknown
    pub distro: Option<String>,
    /// Install missing packages; when false they are only reported
    pub install: bool,
    /// Prefix installs with `sudo`
    pub sudo: bool,
}

/// Extract `ID=` from the contents of an os-release file.
pub fn parse_os_release_id(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let id = line.trim().strip_prefix("ID=")?;
        let id = id.trim_matches('"').trim_matches('\'').trim();
        (!id.is_empty()).then(|| id.to_ascii_lowercase())
    })
}

/// Distribution id of the running system.
pub fn detect_distro() -> Option<String> {
    let content = std::fs::read_to_string(Path::new("/etc/os-release")).ok()?;
    parse_os_release_id(&content)
}

/// Packages the recipe declares for `distro`.
pub fn packages_for<'r>(recipe: &'r RecipeDef, distro: Option<&str>) -> &'r [String] {
    distro
        .and_then(|d| recipe.system.packages.get(d))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Installs packages with apt.
pub struct SystemPackageTool<'a> {
    executor: &'a dyn Executor,
    sudo: bool,
}

impl<'a> SystemPackageTool<'a> {
    pub fn new(executor: &'a dyn Executor, sudo: bool) -> Self {
        SystemPackageTool { executor, sudo }
    }

    /// Whether `package` is already installed.
    pub fn is_installed(&self, package: &str) -> bool {
        let cmd = ProcessBuilder::new("dpkg-query")
            .arg("-W")
            .arg("-f=${Status}")
            .arg(package);

        match self.executor.exec(&cmd) {
            Ok(output) => output.success() && output.stdout.contains("install ok installed"),
            Err(_) => false,
        }
    }

    /// Install `package` unless it is already present.
    ///
    /// Returns whether an install was performed.
    pub fn install(&self, package: &str) -> Result<bool, RecipeError> {
        if self.is_installed(package) {
            tracing::debug!("System package {} already installed", package);
            return Ok(false);
        }

        let cmd = if self.sudo {
            ProcessBuilder::new("sudo").arg("apt-get")
        } else {
            ProcessBuilder::new("apt-get")
        };
        let cmd = cmd.args(["install", "-y", package]);

        tracing::info!("Installing system package {}", package);
        let output = self
            .executor
            .exec(&cmd)
            .map_err(|e| RecipeError::SystemPackage {
                package: package.to_string(),
                message: format!("{:#}", e),
            })?;

        if !output.success() {
            return Err(RecipeError::SystemPackage {
                package: package.to_string(),
                message: output.stderr.trim().to_string(),
            });
        }

        Ok(true)
    }
}
