//! Placeholder rendering for source URLs and layout paths.
//!
//! Templates use `{placeholder}` syntax. Rendering is a pure function of the
//! template and the recipe's name and version, so the URL a recipe fetches can
//! be checked without touching the network.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder pattern is valid"));

/// Error rendering a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown placeholder `{{{name}}}` in template `{template}`")]
pub struct TemplateError {
    pub name: String,
    pub template: String,
}

/// Values available to templates.
///
/// | placeholder            | `glib` 2.19.10 |
/// |------------------------|----------------|
/// | `{name}`               | `glib`         |
/// | `{family}`             | `glib`         |
/// | `{version}`            | `2.19.10`      |
/// | `{version_underscore}` | `2_19_10`      |
/// | `{major}`              | `2`            |
/// | `{minor}`              | `19`           |
/// | `{patch}`              | `10`           |
/// | `{api_version}`        | `2.0`          |
///
/// `{api_version}` is the library's stable API series. It is set per recipe
/// and falls back to `{major}.{minor}` of the release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVars {
    vars: BTreeMap<&'static str, String>,
}

impl TemplateVars {
    pub fn new(
        name: &str,
        family: &str,
        version: &semver::Version,
        api_version: Option<&str>,
    ) -> Self {
        let version_str = version.to_string();
        let mut vars = BTreeMap::new();
        vars.insert("name", name.to_string());
        vars.insert("family", family.to_string());
        vars.insert("version_underscore", version_str.replace(['.', '-'], "_"));
        vars.insert("version", version_str);
        vars.insert("major", version.major.to_string());
        vars.insert("minor", version.minor.to_string());
        vars.insert("patch", version.patch.to_string());
        vars.insert(
            "api_version",
            api_version
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}.{}", version.major, version.minor)),
        );
        TemplateVars { vars }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

/// Substitute every `{placeholder}` in `template`.
pub fn render(template: &str, vars: &TemplateVars) -> Result<String, TemplateError> {
    if let Some(unknown) = PLACEHOLDER
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .find(|name| vars.get(name).is_none())
    {
        return Err(TemplateError {
            name: unknown,
            template: template.to_string(),
        });
    }

    Ok(PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            vars.get(&caps[1]).unwrap_or_default().to_string()
        })
        .into_owned())
}
