//! Package identification - WHICH binary a recipe instance produces.
//!
//! Two instances of the same recipe produce the same package exactly when
//! their name, version, settings, and effective options agree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::options::OptionSet;
use crate::core::settings::Settings;
use crate::util::hash::Fingerprint;

/// Identifier of one configured package binary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageId(String);

impl PackageId {
    /// Compute the id of a recipe instance.
    pub fn compute(name: &str, version: &str, settings: &Settings, options: &OptionSet) -> Self {
        let mut fp = Fingerprint::new();
        fp.update_pair("name", name)
            .update_pair("version", version)
            .update_pair("os", &settings.os)
            .update_pair("arch", &settings.arch)
            .update_pair("build_type", &settings.build_type);

        // OptionSet iterates in name order
        for (option, value) in options.iter() {
            fp.update_pair(&format!("option.{}", option), &value.to_string());
        }

        PackageId(fp.finish_short())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::{OptionDecl, OptionValue};
    use std::collections::BTreeMap;

    fn options(shared: bool) -> OptionSet {
        let mut decls = BTreeMap::new();
        decls.insert("shared".to_string(), OptionDecl::boolean(false));
        decls.insert("fPIC".to_string(), OptionDecl::boolean(true));

        let mut requested = BTreeMap::new();
        requested.insert("shared".to_string(), OptionValue::Bool(shared));
        OptionSet::configure(&decls, &requested).unwrap()
    }

    fn linux() -> Settings {
        Settings::detect().with_os("Linux")
    }

    #[test]
    fn test_package_id_is_stable() {
        let a = PackageId::compute("glib", "2.40.0", &linux(), &options(false));
        let b = PackageId::compute("glib", "2.40.0", &linux(), &options(false));

        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 16);
    }

    #[test]
    fn test_package_id_changes_with_inputs() {
        let base = PackageId::compute("glib", "2.40.0", &linux(), &options(false));

        assert_ne!(
            base,
            PackageId::compute("glib", "2.40.0", &linux(), &options(true))
        );
        assert_ne!(
            base,
            PackageId::compute("glib", "2.19.10", &linux(), &options(false))
        );
        assert_ne!(
            base,
            PackageId::compute(
                "glib",
                "2.40.0",
                &linux().with_build_type("Debug"),
                &options(false)
            )
        );
    }
}
