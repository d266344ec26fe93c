//! Packaged output: licenses, library discovery, consumer metadata.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::core::errors::RecipeError;
use crate::core::package_id::PackageId;
use crate::core::recipe::RecipeDef;
use crate::core::reference::RecipeRef;
use crate::sources::template::render;
use crate::util::fs::{glob_files, relative_path};

/// What a consumer needs to compile and link against a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    pub package_id: PackageId,
    pub package_dir: PathBuf,
    /// Link libraries: produced libraries first, then platform libraries
    pub libs: Vec<String>,
    /// Include directories, relative to `package_dir`
    pub include_dirs: Vec<String>,
    /// Library directories, relative to `package_dir`
    pub lib_dirs: Vec<String>,
    /// Requirements the consumer must also link
    pub requires: Vec<RecipeRef>,
}

/// Copy the files matching the recipe's license patterns into
/// `package_dir/licenses`, keeping their path relative to `source_dir`.
pub fn copy_licenses(
    recipe: &RecipeDef,
    source_dir: &Path,
    package_dir: &Path,
) -> Result<Vec<PathBuf>, RecipeError> {
    let io_error = |context: String, message: String| {
        RecipeError::io(context, std::io::Error::other(message))
    };

    let files = glob_files(source_dir, &recipe.package_info.licenses)
        .map_err(|e| io_error("failed to find license files".to_string(), format!("{:#}", e)))?;

    if files.is_empty() {
        tracing::warn!(
            "No license files matching {} in {}",
            recipe.package_info.licenses.join(", "),
            source_dir.display()
        );
    }

    let licenses_dir = package_dir.join("licenses");
    let mut copied = Vec::new();

    for file in files {
        let dest = licenses_dir.join(relative_path(source_dir, &file));
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                RecipeError::io(format!("failed to create {}", parent.display()), e)
            })?;
        }
        std::fs::copy(&file, &dest).map_err(|e| {
            RecipeError::io(format!("failed to copy license {}", file.display()), e)
        })?;
        copied.push(dest);
    }

    Ok(copied)
}

/// Library name of a file in `lib/`, if it is a library.
///
/// `libglib-2.0.so.0.4000.0` -> `glib-2.0`, `libz.a` -> `z`, `zlib.lib` -> `zlib`.
pub fn library_name(file_name: &str) -> Option<String> {
    if let Some(stem) = file_name.strip_suffix(".lib") {
        return (!stem.is_empty()).then(|| stem.to_string());
    }

    let stem = file_name.strip_prefix("lib")?;

    let name = if let Some(name) = stem.strip_suffix(".a") {
        name
    } else if let Some(name) = stem.strip_suffix(".dylib") {
        name
    } else if let Some(idx) = stem.find(".so") {
        // `.so` must end the name or be followed by a numeric version
        let rest = &stem[idx + 3..];
        let versioned = rest.strip_prefix('.').is_some_and(|v| {
            v.split('.')
                .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
        });
        if !rest.is_empty() && !versioned {
            return None;
        }
        &stem[..idx]
    } else {
        return None;
    };

    (!name.is_empty()).then(|| name.to_string())
}

/// Names of the libraries installed directly in `lib_dir`, sorted and deduplicated.
pub fn collect_libs(lib_dir: &Path) -> Vec<String> {
    let libs: BTreeSet<String> = WalkDir::new(lib_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| !e.file_type().is_dir())
        .filter_map(|e| library_name(&e.file_name().to_string_lossy()))
        .collect();

    libs.into_iter().collect()
}

/// Build consumer metadata for an installed package.
pub fn collect_metadata(
    recipe: &RecipeDef,
    os: &str,
    package_id: PackageId,
    package_dir: &Path,
    requires: Vec<RecipeRef>,
) -> Result<PackageMetadata, RecipeError> {
    let mut libs = collect_libs(&package_dir.join("lib"));
    tracing::debug!("Found libraries: {}", libs.join(", "));

    if let Some(system_libs) = recipe.package_info.system_libs.get(os) {
        for lib in system_libs {
            if !libs.contains(lib) {
                libs.push(lib.clone());
            }
        }
    }

    let vars = recipe.template_vars()?;
    let mut include_dirs = vec!["include".to_string()];
    for template in &recipe.package_info.include_dirs {
        let dir = render(template, &vars).map_err(|e| RecipeError::InvalidRecipe {
            recipe: recipe.reference().to_string(),
            message: e.to_string(),
        })?;
        if !include_dirs.contains(&dir) {
            include_dirs.push(dir);
        }
    }

    Ok(PackageMetadata {
        name: recipe.package.name.clone(),
        version: recipe.package.version.clone(),
        package_id,
        package_dir: package_dir.to_path_buf(),
        libs,
        include_dirs,
        lib_dirs: vec!["lib".to_string()],
        requires,
    })
}
