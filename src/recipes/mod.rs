//! Built-in recipes.

use anyhow::{bail, Result};

use crate::core::recipe::RecipeDef;

pub mod glib;

/// Every built-in recipe, oldest version first within a name.
pub fn all() -> Vec<RecipeDef> {
    vec![glib::glib_2_19_10(), glib::glib_2_40_0()]
}

/// Find a built-in recipe by `name` or `name/version`.
///
/// A bare name selects the newest version. Any `@user/channel` suffix is
/// ignored.
pub fn find(spec: &str) -> Result<RecipeDef> {
    let spec = spec.split('@').next().unwrap_or(spec);
    let (name, version) = match spec.split_once('/') {
        Some((name, version)) => (name, Some(version)),
        None => (spec, None),
    };

    let mut candidates: Vec<RecipeDef> = all()
        .into_iter()
        .filter(|r| r.package.name == name)
        .collect();

    if candidates.is_empty() {
        bail!("no built-in recipe named `{}`", name);
    }

    match version {
        Some(version) => {
            let known: Vec<String> = candidates.iter().map(|r| r.package.version.clone()).collect();
            candidates
                .into_iter()
                .find(|r| r.package.version == version)
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "no built-in recipe `{}/{}` (available versions: {})",
                        name,
                        version,
                        known.join(", ")
                    )
                })
        }
        None => {
            candidates.sort_by_key(|r| r.version().ok());
            candidates
                .pop()
                .ok_or_else(|| anyhow::anyhow!("no built-in recipe named `{}`", name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_reference() {
        assert_eq!(find("glib/2.19.10").unwrap().package.version, "2.19.10");
        assert_eq!(find("glib/2.40.0@conan/stable").unwrap().package.version, "2.40.0");
    }

    #[test]
    fn test_bare_name_selects_newest() {
        assert_eq!(find("glib").unwrap().package.version, "2.40.0");
    }

    #[test]
    fn test_find_unknown() {
        assert!(find("gtk").is_err());

        let err = find("glib/2.0.0").unwrap_err();
        assert!(err.to_string().contains("2.19.10, 2.40.0"));
    }
}
