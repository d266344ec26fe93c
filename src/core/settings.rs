//! Host settings a recipe is configured for.

use serde::{Deserialize, Serialize};

/// Platform tag, architecture, and build type of one recipe instance.
///
/// Tags follow the capitalized convention used in recipe files (`Linux`,
/// `Macos`, `Windows`), not Rust's `std::env::consts::OS` spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub os: String,
    pub arch: String,
    pub build_type: String,
}

impl Settings {
    /// Settings for the machine we are running on.
    pub fn detect() -> Self {
        Settings {
            os: os_tag(std::env::consts::OS),
            arch: arch_tag(std::env::consts::ARCH),
            build_type: "Release".to_string(),
        }
    }

    /// Override the platform tag.
    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = os.into();
        self
    }

    /// Override the build type.
    pub fn with_build_type(mut self, build_type: impl Into<String>) -> Self {
        self.build_type = build_type.into();
        self
    }

    pub fn is_debug(&self) -> bool {
        self.build_type.eq_ignore_ascii_case("debug")
    }
}

/// Map a Rust OS name to a platform tag.
pub fn os_tag(os: &str) -> String {
    match os {
        "linux" => "Linux".to_string(),
        "macos" => "Macos".to_string(),
        "windows" => "Windows".to_string(),
        "freebsd" => "FreeBSD".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

fn arch_tag(arch: &str) -> String {
    match arch {
        "x86" => "x86".to_string(),
        "aarch64" => "armv8".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_tags() {
        assert_eq!(os_tag("linux"), "Linux");
        assert_eq!(os_tag("macos"), "Macos");
        assert_eq!(os_tag("netbsd"), "Netbsd");
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::detect().with_os("Windows").with_build_type("Debug");

        assert_eq!(settings.os, "Windows");
        assert!(settings.is_debug());
    }
}
