//! Module identity.
//!
//! A module is a named, independently buildable unit of source living in a
//! subtree of the workspace. Modules never contain other modules; edges
//! between them are expressed only through dependency specs.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::errors::ConfigError;

/// A validated module (or target) name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleName(String);

impl ModuleName {
    /// Validate and wrap a name.
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();

        if name.is_empty() {
            return Err(ConfigError::invalid("module name", name, "must not be empty"));
        }
        if name == "." || name == ".." {
            return Err(ConfigError::invalid(
                "module name",
                name,
                "must not be a relative directory reference",
            ));
        }
        if name.contains(['/', '\\']) {
            return Err(ConfigError::invalid(
                "module name",
                name,
                "must not contain path separators",
            ));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(ConfigError::invalid(
                "module name",
                name,
                "must not contain whitespace",
            ));
        }

        Ok(ModuleName(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ModuleName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleName::new(s)
    }
}

impl AsRef<str> for ModuleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for ModuleName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ModuleName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ModuleName::new(s).map_err(serde::de::Error::custom)
    }
}

/// A module and the workspace subtree holding its sources.
///
/// The same subtree is mirrored below the build root for the module's
/// generated artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Module {
    name: ModuleName,
    subtree: PathBuf,
}

impl Module {
    /// Create a module rooted at `subtree` (relative to the workspace root).
    pub fn new(name: impl Into<String>, subtree: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let name = ModuleName::new(name)?;
        let subtree = subtree.into();

        if !is_plain_relative(&subtree) {
            return Err(ConfigError::invalid(
                "module subtree",
                subtree.display().to_string(),
                "must be a non-empty relative path without `..`",
            ));
        }

        Ok(Module { name, subtree })
    }

    pub fn name(&self) -> &ModuleName {
        &self.name
    }

    pub fn subtree(&self) -> &Path {
        &self.subtree
    }
}

fn is_plain_relative(path: &Path) -> bool {
    let mut components = path.components().peekable();
    if components.peek().is_none() {
        return false;
    }
    components.all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        && path.components().any(|c| matches!(c, Component::Normal(_)))
}
