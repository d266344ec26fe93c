//! Recipe references.
//!
//! A reference pins a recipe to an exact version and channel:
//! `name/version@user/channel`, e.g. `zlib/1.2.11@conan/stable`. The
//! `@user/channel` part is optional when naming a built-in recipe.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// A pinned recipe reference.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecipeRef {
    pub name: String,
    pub version: String,
    pub user: Option<String>,
    pub channel: Option<String>,
}

impl RecipeRef {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        RecipeRef {
            name: name.into(),
            version: version.into(),
            user: None,
            channel: None,
        }
    }

    /// Attach `@user/channel`.
    pub fn with_channel(mut self, user: impl Into<String>, channel: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.channel = Some(channel.into());
        self
    }
}

impl FromStr for RecipeRef {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (name_version, user_channel) = match s.split_once('@') {
            Some((nv, uc)) => (nv, Some(uc)),
            None => (s, None),
        };

        let Some((name, version)) = name_version.split_once('/') else {
            bail!("invalid recipe reference `{}`: expected `name/version`", s);
        };
        if name.is_empty() || version.is_empty() {
            bail!("invalid recipe reference `{}`: empty name or version", s);
        }

        let mut reference = RecipeRef::new(name, version);

        if let Some(uc) = user_channel {
            match uc.split_once('/') {
                Some((user, channel)) if !user.is_empty() && !channel.is_empty() => {
                    reference = reference.with_channel(user, channel);
                }
                _ => bail!("invalid recipe reference `{}`: expected `@user/channel`", s),
            }
        }

        Ok(reference)
    }
}

impl TryFrom<String> for RecipeRef {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<RecipeRef> for String {
    fn from(r: RecipeRef) -> String {
        r.to_string()
    }
}

impl fmt::Display for RecipeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = format!("{}/{}", self.name, self.version);
        if let (Some(user), Some(channel)) = (&self.user, &self.channel) {
            s.push_str(&format!("@{}/{}", user, channel));
        }
        f.pad(&s)
    }
}
