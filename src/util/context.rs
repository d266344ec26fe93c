//! Global context for autorecipe operations.
//!
//! Provides centralized access to configuration and paths.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;

use crate::util::config::{load_config, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global autorecipe data (~/.autorecipe/)
    home: PathBuf,

    /// Merged global + project configuration
    config: Config,
}

impl GlobalContext {
    /// Create a new GlobalContext rooted at the current directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        let home = BaseDirs::new()
            .map(|b| b.home_dir().join(".autorecipe"))
            .unwrap_or_else(|| PathBuf::from(".autorecipe"));

        let config = load_config(
            &home.join("config.toml"),
            &cwd.join(".autorecipe").join("config.toml"),
        );

        GlobalContext { cwd, home, config }
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the autorecipe home directory (~/.autorecipe/).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Get the merged configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Directory recipes are built in.
    ///
    /// Relative `work_dir` settings are resolved against the current directory.
    pub fn work_dir(&self) -> PathBuf {
        match &self.config.build.work_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => self.cwd.join(dir),
            None => self.cwd.join(".autorecipe").join("work"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_work_dir() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf());

        assert_eq!(ctx.work_dir(), tmp.path().join(".autorecipe").join("work"));
    }

    #[test]
    fn test_project_config_work_dir() {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join(".autorecipe");
        std::fs::create_dir_all(&project).unwrap();
        std::fs::write(project.join("config.toml"), "[build]\nwork_dir = \"build\"\n").unwrap();

        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf());
        assert_eq!(ctx.work_dir(), tmp.path().join("build"));
    }
}
