//! Source acquisition: download, extract, lay out, patch.

use std::path::{Path, PathBuf};

use url::Url;

use crate::core::errors::RecipeError;
use crate::core::recipe::RecipeDef;
use crate::sources::fetch::{extract_tarball, verify_sha256, Fetcher};
use crate::sources::patch::apply_patches;
use crate::sources::template::render;
use crate::util::fs::is_non_empty_dir;
use crate::util::process::Executor;

/// Resolve the source archive URL of a recipe.
pub fn source_url(recipe: &RecipeDef) -> Result<Url, RecipeError> {
    let vars = recipe.template_vars()?;
    let rendered = render(&recipe.source.url, &vars).map_err(|e| RecipeError::InvalidRecipe {
        recipe: recipe.reference().to_string(),
        message: e.to_string(),
    })?;

    Url::parse(&rendered).map_err(|e| RecipeError::Fetch {
        url: rendered.clone(),
        message: e.to_string(),
    })
}

/// Fetches and prepares the sources of one recipe in a working directory.
pub struct SourceAcquirer<'a> {
    fetcher: &'a dyn Fetcher,
    executor: &'a dyn Executor,
}

impl<'a> SourceAcquirer<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, executor: &'a dyn Executor) -> Self {
        SourceAcquirer { fetcher, executor }
    }

    /// Acquire the sources of `recipe` into `work_dir/<subfolder>`.
    ///
    /// Fails rather than overwrite when the subfolder already holds files, so
    /// a stale or partial checkout is never silently reused.
    pub fn acquire(&self, recipe: &RecipeDef, work_dir: &Path) -> Result<PathBuf, RecipeError> {
        let target = work_dir.join(&recipe.source.subfolder);
        if is_non_empty_dir(&target) {
            return Err(RecipeError::Layout {
                path: target,
                reason: "source folder already exists and is not empty".to_string(),
            });
        }

        let url = source_url(recipe)?;
        let fetch_error = |message: String| RecipeError::Fetch {
            url: url.to_string(),
            message,
        };

        let data = self
            .fetcher
            .fetch(&url)
            .map_err(|e| fetch_error(format!("{:#}", e)))?;

        if let Some(expected) = &recipe.source.sha256 {
            verify_sha256(&data, expected).map_err(|e| fetch_error(format!("{:#}", e)))?;
        }

        std::fs::create_dir_all(work_dir).map_err(|e| {
            RecipeError::io(format!("failed to create {}", work_dir.display()), e)
        })?;

        // Extract next to the target so the final rename stays on one filesystem
        let staging = tempfile::Builder::new()
            .prefix(".extract-")
            .tempdir_in(work_dir)
            .map_err(|e| RecipeError::io("failed to create staging directory", e))?;

        extract_tarball(&data, staging.path()).map_err(|e| fetch_error(format!("{:#}", e)))?;

        let vars = recipe.template_vars()?;
        let extracted_name =
            render(&recipe.source.extracted_dir, &vars).map_err(|e| RecipeError::InvalidRecipe {
                recipe: recipe.reference().to_string(),
                message: e.to_string(),
            })?;
        let extracted = staging.path().join(&extracted_name);
        if !extracted.is_dir() {
            return Err(RecipeError::Layout {
                path: extracted,
                reason: format!("archive has no top-level directory `{}`", extracted_name),
            });
        }

        if target.exists() {
            std::fs::remove_dir(&target).map_err(|e| {
                RecipeError::io(format!("failed to remove {}", target.display()), e)
            })?;
        }
        std::fs::rename(&extracted, &target).map_err(|e| {
            RecipeError::io(
                format!("failed to move sources to {}", target.display()),
                e,
            )
        })?;
        tracing::debug!("Sources laid out in {}", target.display());

        apply_patches(
            &recipe.patches,
            &target,
            recipe.base_dir.as_deref(),
            self.executor,
        )?;

        write_placeholders(recipe, &target)?;

        Ok(target)
    }
}

/// Create the files the recipe's build system expects but upstream omits.
///
/// Existing files are left alone.
fn write_placeholders(recipe: &RecipeDef, source_dir: &Path) -> Result<(), RecipeError> {
    for placeholder in &recipe.placeholders {
        let path = source_dir.join(&placeholder.path);
        if path.exists() {
            continue;
        }
        crate::util::fs::write_string(&path, &placeholder.contents).map_err(|e| {
            RecipeError::io(
                format!("failed to write placeholder {}", path.display()),
                std::io::Error::other(format!("{:#}", e)),
            )
        })?;
    }
    Ok(())
}
