//! Preprocessor defines.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::ConfigError;

/// A preprocessor define.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Define {
    /// Simple flag: -DFOO
    Flag(String),
    /// Key-value: -DFOO=bar
    KeyValue { name: String, value: String },
}

impl Define {
    /// Create a simple flag define.
    pub fn flag(name: impl Into<String>) -> Self {
        Define::Flag(name.into())
    }

    /// Create a key-value define.
    pub fn key_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Define::KeyValue {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Get the define name.
    pub fn name(&self) -> &str {
        match self {
            Define::Flag(n) => n,
            Define::KeyValue { name, .. } => name,
        }
    }

    /// Get the define value, if any.
    pub fn value(&self) -> Option<&str> {
        match self {
            Define::Flag(_) => None,
            Define::KeyValue { value, .. } => Some(value),
        }
    }

    /// Convert to compiler flag format.
    pub fn to_flag(&self) -> String {
        format!("-D{}", self)
    }
}

impl fmt::Display for Define {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Define::Flag(name) => f.write_str(name),
            Define::KeyValue { name, value } => write!(f, "{}={}", name, value),
        }
    }
}

/// Parses `NAME` or `NAME=VALUE`.
impl FromStr for Define {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = match s.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (s, None),
        };

        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(ConfigError::invalid(
                "define",
                s,
                "name must be non-empty without whitespace",
            ));
        }

        Ok(match value {
            Some(value) => Define::key_value(name, value),
            None => Define::flag(name),
        })
    }
}
