//! Source patches.
//!
//! Two kinds of edits can be applied to extracted sources:
//! - `replace`: exact substring replacement in one file
//! - `file`: a unified diff applied with `git apply`
//!
//! Patches apply in declaration order, and each one must hit its target.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::RecipeError;
use crate::util::process::{Executor, ProcessBuilder};

/// A single edit to the extracted sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Patch {
    /// Replace every occurrence of `find` with `replace` in `file`.
    Replace {
        file: String,
        find: String,
        replace: String,
    },

    /// Apply a unified diff from `patch_file`, rooted at `base_path`.
    File {
        patch_file: PathBuf,
        #[serde(default)]
        base_path: Option<String>,
    },
}

impl Patch {
    pub fn replace(
        file: impl Into<String>,
        find: impl Into<String>,
        replace: impl Into<String>,
    ) -> Self {
        Patch::Replace {
            file: file.into(),
            find: find.into(),
            replace: replace.into(),
        }
    }

    /// Short human description for status output.
    pub fn describe(&self) -> String {
        match self {
            Patch::Replace { file, .. } => format!("edit {}", file),
            Patch::File { patch_file, .. } => format!("apply {}", patch_file.display()),
        }
    }
}

/// Replace every occurrence of `find` in `content`.
///
/// Returns `None` when `find` does not occur.
pub fn replace_in_str(content: &str, find: &str, replace: &str) -> Option<String> {
    if find.is_empty() || !content.contains(find) {
        return None;
    }
    Some(content.replace(find, replace))
}

/// Apply `patches` in order to the sources in `source_dir`.
///
/// Relative patch files are resolved against `base_dir` (the recipe file's
/// directory) when one is given.
pub fn apply_patches(
    patches: &[Patch],
    source_dir: &Path,
    base_dir: Option<&Path>,
    executor: &dyn Executor,
) -> Result<(), RecipeError> {
    for patch in patches {
        tracing::debug!("Patching: {}", patch.describe());
        match patch {
            Patch::Replace {
                file,
                find,
                replace,
            } => apply_replace(&source_dir.join(file), find, replace)?,
            Patch::File {
                patch_file,
                base_path,
            } => {
                let patch_path = match base_dir {
                    Some(base) if patch_file.is_relative() => base.join(patch_file),
                    _ => patch_file.clone(),
                };
                let root = match base_path {
                    Some(sub) => source_dir.join(sub),
                    None => source_dir.to_path_buf(),
                };
                apply_patch_file(&patch_path, &root, executor)?;
            }
        }
    }
    Ok(())
}

fn apply_replace(path: &Path, find: &str, replace: &str) -> Result<(), RecipeError> {
    let not_found = || RecipeError::PatchTargetNotFound {
        file: path.to_path_buf(),
        needle: find.to_string(),
    };

    if !path.is_file() {
        return Err(not_found());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| RecipeError::io(format!("failed to read {}", path.display()), e))?;
    let patched = replace_in_str(&content, find, replace).ok_or_else(not_found)?;

    std::fs::write(path, patched)
        .map_err(|e| RecipeError::io(format!("failed to write {}", path.display()), e))
}

fn apply_patch_file(
    patch_path: &Path,
    root: &Path,
    executor: &dyn Executor,
) -> Result<(), RecipeError> {
    let apply_error = |message: String| RecipeError::PatchApply {
        patch: patch_path.to_path_buf(),
        message,
    };

    if !patch_path.is_file() {
        return Err(apply_error("patch file not found".to_string()));
    }

    tracing::info!("Applying patch: {}", patch_path.display());

    // Check first so a conflicting patch leaves the tree untouched
    for check in [true, false] {
        let mut cmd = ProcessBuilder::new("git").arg("apply");
        if check {
            cmd = cmd.arg("--check");
        }
        let cmd = cmd.arg(patch_path).cwd(root);

        let output = executor
            .exec(&cmd)
            .map_err(|e| apply_error(format!("{:#}", e)))?;
        if !output.success() {
            return Err(apply_error(output.stderr.trim().to_string()));
        }
    }

    Ok(())
}
