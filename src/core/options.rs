//! Recipe options.
//!
//! A recipe declares each option with its allowed values and a default:
//!
//! ```toml
//! [options.shared]
//! allowed = [true, false]
//! default = false
//! ```
//!
//! Users request values as `name=value` pairs. Resolution happens once, when
//! the recipe is configured; afterwards every option holds a value from its
//! declared domain.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::errors::RecipeError;

/// A single option value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Str(String),
}

impl OptionValue {
    /// Parse a user-supplied value. `true`/`false` are case-insensitive so
    /// `shared=True` works as well as `shared=true`; `1`/`0` are booleans too.
    pub fn parse(s: &str) -> OptionValue {
        match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => OptionValue::Bool(true),
            "false" | "0" => OptionValue::Bool(false),
            _ => OptionValue::Str(s.trim().to_string()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            OptionValue::Str(_) => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Str(s.to_string())
    }
}

/// Declaration of one option: its domain and default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDecl {
    pub allowed: Vec<OptionValue>,
    pub default: OptionValue,
}

impl OptionDecl {
    /// A boolean option with the given default.
    pub fn boolean(default: bool) -> Self {
        OptionDecl {
            allowed: vec![OptionValue::Bool(true), OptionValue::Bool(false)],
            default: OptionValue::Bool(default),
        }
    }

    /// Whether `value` is in the declared domain.
    pub fn allows(&self, value: &OptionValue) -> bool {
        self.allowed.contains(value)
    }
}

/// Resolved option values for one recipe instance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OptionSet {
    values: BTreeMap<String, OptionValue>,
}

impl OptionSet {
    /// Resolve requested values against the declarations.
    ///
    /// Unset options take their declared default. Fails on the first name that
    /// is not declared or value outside the declared domain.
    pub fn configure(
        decls: &BTreeMap<String, OptionDecl>,
        requested: &BTreeMap<String, OptionValue>,
    ) -> Result<OptionSet, RecipeError> {
        for (name, value) in requested {
            let decl = decls.get(name).ok_or_else(|| RecipeError::UnknownOption {
                name: name.clone(),
                known: decls.keys().cloned().collect(),
            })?;

            if !decl.allows(value) {
                return Err(RecipeError::InvalidOption {
                    name: name.clone(),
                    value: value.to_string(),
                    allowed: decl.allowed.iter().map(ToString::to_string).collect(),
                });
            }
        }

        let values = decls
            .iter()
            .map(|(name, decl)| {
                let value = requested.get(name).unwrap_or(&decl.default).clone();
                (name.clone(), value)
            })
            .collect();

        Ok(OptionSet { values })
    }

    /// The effective value of an option.
    pub fn effective(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    /// The effective value of a boolean option; `false` if absent or not boolean.
    pub fn flag(&self, name: &str) -> bool {
        self.effective(name)
            .and_then(OptionValue::as_bool)
            .unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &OptionValue)> {
        self.values.iter()
    }
}

/// Parse `name=value` assignments, as given on the command line.
pub fn parse_assignments<S: AsRef<str>>(
    items: &[S],
) -> anyhow::Result<BTreeMap<String, OptionValue>> {
    let mut requested = BTreeMap::new();

    for item in items {
        let item = item.as_ref();
        let (name, value) = item
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("expected `name=value`, got `{}`", item))?;

        let name = name.trim();
        if name.is_empty() {
            anyhow::bail!("missing option name in `{}`", item);
        }

        requested.insert(name.to_string(), OptionValue::parse(value));
    }

    Ok(requested)
}
