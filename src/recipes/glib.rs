//! GNOME GLib.
//!
//! Two upstream releases are packaged. They share options, the flag table,
//! placeholders, and metadata rules, and differ in how upstream tags the
//! archive, which configure switches exist, which m4 fixes are needed, and
//! what the build pulls in from the system.

use std::collections::BTreeMap;

use crate::core::options::{OptionDecl, OptionValue};
use crate::core::recipe::{
    default_bootstrap, ConfigureSpec, OptionFlag, OptionalRequirement, PackageInfoSpec,
    PackageMeta, Placeholder, RecipeDef, SourceSpec, SystemSpec,
};
use crate::core::reference::RecipeRef;
use crate::sources::patch::Patch;

pub const NAME: &str = "glib";

/// GLib 2.19.10, fetched from the `GLIB_2_19_10` tag.
pub fn glib_2_19_10() -> RecipeDef {
    let mut recipe = common("2.19.10");

    recipe.source = SourceSpec {
        url: "https://github.com/GNOME/glib/archive/GLIB_{version_underscore}.tar.gz".to_string(),
        extracted_dir: "{name}-GLIB_{version_underscore}".to_string(),
        sha256: None,
        subfolder: "source_subfolder".to_string(),
    };
    recipe.patches = vec![
        gettext_m4_copy_fix(),
        // gnome bug 591840: trailing dnl swallows the next macro line
        Patch::replace(
            "acglib.m4",
            "m4_ifvaln([$3],[$3])dnl])dnl",
            "m4_ifvaln([$3],[$3])dnl])",
        ),
        Patch::replace(
            "acglib.m4",
            "([$1], [AC_LANG_CONFTEST([$1])])dnl",
            "([$1], [AC_LANG_CONFTEST([$1])])",
        ),
    ];
    recipe.configure.args = strings(&["--enable-gtk-doc-html=no", "--disable-libmount"]);
    recipe.system = ubuntu_package("gtk-doc-tools");

    recipe
}

/// GLib 2.40.0, fetched from the plain version tag.
pub fn glib_2_40_0() -> RecipeDef {
    let mut recipe = common("2.40.0");

    recipe.source = SourceSpec {
        url: "https://github.com/GNOME/glib/archive/{version}.tar.gz".to_string(),
        extracted_dir: "{name}-{version}".to_string(),
        sha256: None,
        subfolder: "source_subfolder".to_string(),
    };
    recipe.patches = vec![gettext_m4_copy_fix()];
    recipe.requirements = vec![RecipeRef::new("zlib", "1.2.11").with_channel("conan", "stable")];
    recipe.configure.args = strings(&["--disable-man"]);
    recipe.system = ubuntu_package("libffi-dev");

    recipe
}

/// Everything both releases agree on.
fn common(version: &str) -> RecipeDef {
    let mut options = BTreeMap::new();
    options.insert("shared".to_string(), OptionDecl::boolean(false));
    options.insert("fPIC".to_string(), OptionDecl::boolean(true));
    options.insert("with_pcre".to_string(), OptionDecl::boolean(false));

    let mut system_libs = BTreeMap::new();
    system_libs.insert("Linux".to_string(), strings(&["pthread"]));

    RecipeDef {
        package: PackageMeta {
            name: NAME.to_string(),
            version: version.to_string(),
            description: Some(
                "GLib provides the core application building blocks for libraries \
                 and applications written in C"
                    .to_string(),
            ),
            homepage: Some("https://github.com/GNOME/glib".to_string()),
            license: Some("LGPL-2.1".to_string()),
        },
        source: SourceSpec {
            url: String::new(),
            extracted_dir: String::new(),
            sha256: None,
            subfolder: "source_subfolder".to_string(),
        },
        patches: Vec::new(),
        placeholders: vec![
            Placeholder {
                path: "gtk-doc.make".to_string(),
                contents: "EXTRA_DIST =\nCLEANFILES =\n".to_string(),
            },
            Placeholder::empty("README"),
            Placeholder::empty("INSTALL"),
        ],
        options,
        requirements: Vec::new(),
        optional_requirements: vec![OptionalRequirement {
            option: "with_pcre".to_string(),
            value: OptionValue::Bool(true),
            requirement: RecipeRef::new("pcre", "8.41").with_channel("bincrafters", "stable"),
        }],
        configure: ConfigureSpec {
            bootstrap: default_bootstrap(),
            args: Vec::new(),
            flags: vec![
                OptionFlag {
                    option: "with_pcre".to_string(),
                    value: OptionValue::Bool(false),
                    args: strings(&["--without-pcre"]),
                },
                OptionFlag {
                    option: "shared".to_string(),
                    value: OptionValue::Bool(false),
                    args: strings(&["--enable-static", "--disable-shared"]),
                },
            ],
            fpic_option: Some("fPIC".to_string()),
        },
        system: SystemSpec::default(),
        platforms: strings(&["Linux"]),
        package_info: PackageInfoSpec {
            family: Some("glib".to_string()),
            api_version: Some("2.0".to_string()),
            include_dirs: strings(&[
                "include/{family}-{api_version}",
                "lib/{family}-{api_version}/include",
            ]),
            system_libs,
            licenses: strings(&["COPYING"]),
        },
        base_dir: None,
    }
}

/// Newer autoconf refuses to redefine `glib_DEFUN` with plain `m4_copy`.
fn gettext_m4_copy_fix() -> Patch {
    Patch::replace("m4macros/glib-gettext.m4", "m4_copy", "m4_copy_force")
}

fn ubuntu_package(package: &str) -> SystemSpec {
    let mut packages = BTreeMap::new();
    packages.insert("ubuntu".to_string(), vec![package.to_string()]);
    SystemSpec { packages }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::acquire::source_url;

    #[test]
    fn test_both_releases_validate() {
        glib_2_19_10().validate().unwrap();
        glib_2_40_0().validate().unwrap();
    }

    #[test]
    fn test_release_differences() {
        let old = glib_2_19_10();
        let new = glib_2_40_0();

        assert_eq!(
            source_url(&old).unwrap().as_str(),
            "https://github.com/GNOME/glib/archive/GLIB_2_19_10.tar.gz"
        );
        assert_eq!(old.patches.len(), 3);
        assert_eq!(new.patches.len(), 1);
        assert!(old.requirements.is_empty());
        assert_eq!(new.requirements[0].to_string(), "zlib/1.2.11@conan/stable");
        assert_eq!(old.system.packages["ubuntu"], vec!["gtk-doc-tools"]);
        assert_eq!(new.system.packages["ubuntu"], vec!["libffi-dev"]);
    }

    #[test]
    fn test_shared_option_table() {
        let recipe = glib_2_40_0();

        assert_eq!(recipe.options["shared"].default, OptionValue::Bool(false));
        assert_eq!(recipe.options["fPIC"].default, OptionValue::Bool(true));
        assert_eq!(recipe.options["with_pcre"].default, OptionValue::Bool(false));
        assert_eq!(
            recipe.optional_requirements[0].requirement.to_string(),
            "pcre/8.41@bincrafters/stable"
        );
        assert!(recipe.supports("Linux"));
        assert!(!recipe.supports("Macos"));
    }
}
