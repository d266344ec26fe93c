//! Recipe lifecycle states.

use std::fmt;

use serde::Serialize;

/// Where a recipe instance is in its lifecycle.
///
/// Transitions only move forward:
/// `Unconfigured -> SourceAcquired -> ToolchainConfigured -> Built -> Packaged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecipeState {
    Unconfigured,
    SourceAcquired,
    ToolchainConfigured,
    Built,
    Packaged,
}

impl RecipeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeState::Unconfigured => "unconfigured",
            RecipeState::SourceAcquired => "source-acquired",
            RecipeState::ToolchainConfigured => "toolchain-configured",
            RecipeState::Built => "built",
            RecipeState::Packaged => "packaged",
        }
    }
}

impl fmt::Display for RecipeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_states_are_ordered() {
        assert!(RecipeState::Unconfigured < RecipeState::SourceAcquired);
        assert!(RecipeState::SourceAcquired < RecipeState::ToolchainConfigured);
        assert!(RecipeState::ToolchainConfigured < RecipeState::Built);
        assert!(RecipeState::Built < RecipeState::Packaged);
    }
}
