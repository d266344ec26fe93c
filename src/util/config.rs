//! Configuration file support for autorecipe.
//!
//! Two configuration file locations are read:
//! - Global: `~/.autorecipe/config.toml` - User-wide defaults
//! - Project: `.autorecipe/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// autorecipe configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,

    /// Network settings
    pub net: NetConfig,

    /// System package settings
    pub system: SystemConfig,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Parallel jobs passed to `make` (None = make's default)
    pub jobs: Option<usize>,

    /// Directory recipes are built in (defaults to `.autorecipe/work`)
    pub work_dir: Option<PathBuf>,

    /// Build type recorded in the package id (Release, Debug)
    pub build_type: Option<String>,
}

/// Network-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    /// Offline mode (don't fetch from network)
    pub offline: bool,
}

/// System package installation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Install missing OS packages declared by recipes
    pub install_packages: bool,

    /// Prefix package manager invocations with `sudo`
    pub sudo: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        SystemConfig {
            install_packages: true,
            sudo: false,
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.jobs.is_some() {
            self.build.jobs = other.build.jobs;
        }
        if other.build.work_dir.is_some() {
            self.build.work_dir = other.build.work_dir;
        }
        if other.build.build_type.is_some() {
            self.build.build_type = other.build.build_type;
        }

        if other.net.offline {
            self.net.offline = true;
        }

        // install_packages defaults to true, so only an explicit opt-out propagates
        if !other.system.install_packages {
            self.system.install_packages = false;
        }
        if other.system.sudo {
            self.system.sudo = true;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.autorecipe/config.toml)
/// 2. Global config (~/.autorecipe/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}
