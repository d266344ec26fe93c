//! Recipe definitions.
//!
//! A recipe describes how to obtain, patch, configure, build, and package one
//! version of an external library. Recipes are plain data: they can be built
//! in code (see [`crate::recipes`]) or loaded from a TOML file:
//!
//! ```toml
//! platforms = ["Linux"]
//! requirements = ["zlib/1.2.11@conan/stable"]
//!
//! [package]
//! name = "glib"
//! version = "2.40.0"
//! license = "LGPL-2.1"
//!
//! [source]
//! url = "https://github.com/GNOME/glib/archive/{version}.tar.gz"
//! extracted_dir = "{name}-{version}"
//!
//! [[patches]]
//! kind = "replace"
//! file = "m4macros/glib-gettext.m4"
//! find = "m4_copy"
//! replace = "m4_copy_force"
//!
//! [options.shared]
//! allowed = [true, false]
//! default = false
//!
//! [configure]
//! args = ["--disable-man"]
//!
//! [[configure.flags]]
//! option = "shared"
//! value = false
//! args = ["--enable-static", "--disable-shared"]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::errors::RecipeError;
use crate::core::options::{OptionDecl, OptionValue};
use crate::core::reference::RecipeRef;
use crate::sources::patch::Patch;
use crate::sources::template::{render, TemplateVars};
use crate::util::hash::is_sha256_hex;

/// A complete recipe definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDef {
    /// Identity and descriptive metadata
    pub package: PackageMeta,

    /// Where the sources come from
    pub source: SourceSpec,

    /// Edits applied to the extracted sources, in order
    #[serde(default)]
    pub patches: Vec<Patch>,

    /// Files the build system expects but upstream does not ship
    #[serde(default)]
    pub placeholders: Vec<Placeholder>,

    /// Declared options
    #[serde(default)]
    pub options: BTreeMap<String, OptionDecl>,

    /// Unconditional requirements
    #[serde(default)]
    pub requirements: Vec<RecipeRef>,

    /// Requirements pulled in by an option value
    #[serde(default)]
    pub optional_requirements: Vec<OptionalRequirement>,

    /// Autotools invocation
    pub configure: ConfigureSpec,

    /// OS packages needed before building
    #[serde(default)]
    pub system: SystemSpec,

    /// Supported platform tags; empty means any
    #[serde(default)]
    pub platforms: Vec<String>,

    /// Consumer-facing metadata rules
    #[serde(default)]
    pub package_info: PackageInfoSpec,

    /// Directory relative patch files are resolved against
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// Package identity and descriptive metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageMeta {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
}

/// Source archive location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSpec {
    /// URL template, e.g. `https://host/archive/{version}.tar.gz`
    pub url: String,

    /// Name of the top-level directory inside the archive (template)
    pub extracted_dir: String,

    /// Expected SHA256 of the archive
    #[serde(default)]
    pub sha256: Option<String>,

    /// Folder the sources are moved to inside the working directory
    #[serde(default = "default_subfolder")]
    pub subfolder: String,
}

fn default_subfolder() -> String {
    "source_subfolder".to_string()
}

/// A file synthesized into the source tree after patching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    pub path: String,
    #[serde(default)]
    pub contents: String,
}

impl Placeholder {
    pub fn empty(path: impl Into<String>) -> Self {
        Placeholder {
            path: path.into(),
            contents: String::new(),
        }
    }
}

/// A requirement added when an option has a given value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionalRequirement {
    pub option: String,
    pub value: OptionValue,
    pub requirement: RecipeRef,
}

/// Autotools invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigureSpec {
    /// Bootstrap command run before `configure`
    #[serde(default = "default_bootstrap")]
    pub bootstrap: Vec<String>,

    /// Flags always passed to `configure`
    #[serde(default)]
    pub args: Vec<String>,

    /// Flags passed when an option has a given value, in table order
    #[serde(default)]
    pub flags: Vec<OptionFlag>,

    /// Boolean option that adds `-fPIC` to CFLAGS
    #[serde(default)]
    pub fpic_option: Option<String>,
}

pub fn default_bootstrap() -> Vec<String> {
    ["autoreconf", "--force", "--install", "--verbose"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// One row of the option-to-flag table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionFlag {
    pub option: String,
    pub value: OptionValue,
    pub args: Vec<String>,
}

/// OS packages keyed by distribution id (`ubuntu`, `debian`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemSpec {
    #[serde(default)]
    pub packages: BTreeMap<String, Vec<String>>,
}

/// Rules for the metadata handed to consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageInfoSpec {
    /// Library family used in layout templates (`glib` -> `include/glib-2.0`)
    #[serde(default)]
    pub family: Option<String>,

    /// Stable API series used in layout templates, e.g. `2.0` for every
    /// GLib 2.x release. Defaults to `{major}.{minor}` of the release.
    #[serde(default)]
    pub api_version: Option<String>,

    /// Include directories added after `include` (templates)
    #[serde(default)]
    pub include_dirs: Vec<String>,

    /// Extra link libraries keyed by platform tag
    #[serde(default)]
    pub system_libs: BTreeMap<String, Vec<String>>,

    /// Glob patterns, relative to the sources, copied into `licenses/`
    #[serde(default = "default_licenses")]
    pub licenses: Vec<String>,
}

impl Default for PackageInfoSpec {
    fn default() -> Self {
        PackageInfoSpec {
            family: None,
            api_version: None,
            include_dirs: Vec::new(),
            system_libs: BTreeMap::new(),
            licenses: default_licenses(),
        }
    }
}

fn default_licenses() -> Vec<String> {
    vec!["COPYING".to_string()]
}

impl RecipeDef {
    /// Load a recipe from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read recipe file: {}", path.display()))?;

        let mut recipe: RecipeDef = toml::from_str(&contents)
            .with_context(|| format!("failed to parse recipe file: {}", path.display()))?;
        recipe.base_dir = path.parent().map(Path::to_path_buf);

        recipe.validate()?;
        Ok(recipe)
    }

    /// `name/version` of this recipe.
    pub fn reference(&self) -> RecipeRef {
        RecipeRef::new(&self.package.name, &self.package.version)
    }

    /// The semantic version of the recipe.
    pub fn version(&self) -> Result<semver::Version, RecipeError> {
        semver::Version::parse(&self.package.version).map_err(|e| self.invalid(e.to_string()))
    }

    /// Library family name; defaults to the package name.
    pub fn family(&self) -> &str {
        self.package_info
            .family
            .as_deref()
            .unwrap_or(&self.package.name)
    }

    /// Placeholder values available to every template of this recipe.
    pub fn template_vars(&self) -> Result<TemplateVars, RecipeError> {
        Ok(TemplateVars::new(
            &self.package.name,
            self.family(),
            &self.version()?,
            self.package_info.api_version.as_deref(),
        ))
    }

    /// Whether the recipe can be built for `os`.
    pub fn supports(&self, os: &str) -> bool {
        self.platforms.is_empty() || self.platforms.iter().any(|p| p == os)
    }

    /// Check the recipe for internal consistency.
    pub fn validate(&self) -> Result<(), RecipeError> {
        validate_name(&self.package.name).map_err(|m| self.invalid(m))?;

        let vars = self.template_vars()?;
        let url = render(&self.source.url, &vars).map_err(|e| self.invalid(e.to_string()))?;
        url::Url::parse(&url).map_err(|e| self.invalid(format!("invalid source url `{}`: {}", url, e)))?;
        render(&self.source.extracted_dir, &vars).map_err(|e| self.invalid(e.to_string()))?;
        for dir in &self.package_info.include_dirs {
            render(dir, &vars).map_err(|e| self.invalid(e.to_string()))?;
        }

        if let Some(sha) = &self.source.sha256 {
            if !is_sha256_hex(sha) {
                return Err(self.invalid(format!(
                    "source sha256 must be a 64-character hex string, got `{}`",
                    sha
                )));
            }
        }

        if self.source.subfolder.is_empty() || Path::new(&self.source.subfolder).is_absolute() {
            return Err(self.invalid("source subfolder must be a relative path"));
        }

        for (name, decl) in &self.options {
            if !decl.allows(&decl.default) {
                return Err(self.invalid(format!(
                    "default `{}` of option `{}` is not an allowed value",
                    decl.default, name
                )));
            }
        }

        let option_refs = self
            .configure
            .flags
            .iter()
            .map(|f| (&f.option, &f.value))
            .chain(
                self.optional_requirements
                    .iter()
                    .map(|r| (&r.option, &r.value)),
            );
        for (option, value) in option_refs {
            let decl = self
                .options
                .get(option)
                .ok_or_else(|| self.invalid(format!("undeclared option `{}`", option)))?;
            if !decl.allows(value) {
                return Err(self.invalid(format!(
                    "`{}` is not an allowed value of option `{}`",
                    value, option
                )));
            }
        }

        if let Some(fpic) = &self.configure.fpic_option {
            if !self.options.contains_key(fpic) {
                return Err(self.invalid(format!("undeclared option `{}`", fpic)));
            }
        }

        if self.configure.bootstrap.is_empty() {
            return Err(self.invalid("bootstrap command must not be empty"));
        }

        Ok(())
    }

    fn invalid(&self, message: impl Into<String>) -> RecipeError {
        RecipeError::InvalidRecipe {
            recipe: self.reference().to_string(),
            message: message.into(),
        }
    }
}

/// Validate a recipe name (lowercase `[a-z0-9_-]`, starting with a letter).
pub fn validate_name(name: &str) -> std::result::Result<(), String> {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return Err(format!("recipe name `{}` must start with a lowercase letter", name)),
    }
    if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-') {
        return Err(format!(
            "recipe name `{}` may only contain lowercase letters, digits, `_` and `-`",
            name
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RECIPE: &str = r#"
platforms = ["Linux"]
requirements = ["zlib/1.2.11@conan/stable"]

[package]
name = "glib"
version = "2.40.0"

[source]
url = "https://github.com/GNOME/glib/archive/{version}.tar.gz"
extracted_dir = "{name}-{version}"

[[patches]]
kind = "replace"
file = "m4macros/glib-gettext.m4"
find = "m4_copy"
replace = "m4_copy_force"

[[placeholders]]
path = "README"

[options.shared]
allowed = [true, false]
default = false

[configure]
args = ["--disable-man"]

[[configure.flags]]
option = "shared"
value = false
args = ["--enable-static", "--disable-shared"]

[package_info]
api_version = "2.0"
include_dirs = ["include/{family}-{api_version}"]

[package_info.system_libs]
Linux = ["pthread"]
"#;

    #[test]
    fn test_load_recipe_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("glib.toml");
        std::fs::write(&path, RECIPE).unwrap();

        let recipe = RecipeDef::load(&path).unwrap();

        assert_eq!(recipe.reference().to_string(), "glib/2.40.0");
        assert_eq!(recipe.source.subfolder, "source_subfolder");
        assert_eq!(recipe.configure.bootstrap, default_bootstrap());
        assert_eq!(recipe.package_info.licenses, vec!["COPYING"]);
        assert_eq!(recipe.requirements[0].to_string(), "zlib/1.2.11@conan/stable");
        assert_eq!(recipe.base_dir.as_deref(), Some(tmp.path()));
        assert!(recipe.supports("Linux"));
        assert!(!recipe.supports("Windows"));
        assert_eq!(
            render(&recipe.package_info.include_dirs[0], &recipe.template_vars().unwrap()).unwrap(),
            "include/glib-2.0"
        );
    }

    #[test]
    fn test_flag_on_undeclared_option_is_invalid() {
        let text = RECIPE.replace("option = \"shared\"", "option = \"static\"");
        let recipe: RecipeDef = toml::from_str(&text).unwrap();

        let err = recipe.validate().unwrap_err();
        assert!(err.to_string().contains("undeclared option `static`"));
    }

    #[test]
    fn test_default_outside_domain_is_invalid() {
        let text = RECIPE.replace("default = false", "default = \"maybe\"");
        let recipe: RecipeDef = toml::from_str(&text).unwrap();

        assert!(matches!(
            recipe.validate(),
            Err(RecipeError::InvalidRecipe { .. })
        ));
    }

    #[test]
    fn test_unknown_placeholder_is_invalid() {
        let text = RECIPE.replace("{name}-{version}", "{name}-{tag}");
        let recipe: RecipeDef = toml::from_str(&text).unwrap();

        assert!(recipe.validate().unwrap_err().to_string().contains("tag"));
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("glib").is_ok());
        assert!(validate_name("gtk-doc_2").is_ok());
        assert!(validate_name("GLib").is_err());
        assert!(validate_name("2glib").is_err());
        assert!(validate_name("").is_err());
    }
}
