//! CgtBuild.toml manifest parsing and schema.
//!
//! The manifest declares the targets of a workspace. Where a module's
//! headers and archives live is not declared here; that is the registry's
//! job.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::errors::ConfigError;
use crate::core::target::TargetDecl;

/// Manifest file name.
pub const MANIFEST_NAME: &str = "CgtBuild.toml";

/// The parsed CgtBuild.toml manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Targets in declaration order
    #[serde(default, rename = "target")]
    pub targets: Vec<TargetDecl>,
}

impl Manifest {
    /// Load and validate a manifest from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        let manifest: Manifest = toml::from_str(&contents)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))?;
        manifest.validate(Some(path))?;
        Ok(manifest)
    }

    /// Parse and validate manifest contents.
    pub fn parse(contents: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(contents)?;
        manifest.validate(None)?;
        Ok(manifest)
    }

    /// Check that target names are unique. `path` is reported on failure.
    pub fn validate(&self, path: Option<&Path>) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for target in &self.targets {
            if !seen.insert(target.name.as_str()) {
                return Err(ConfigError::DuplicateTarget {
                    name: target.name.to_string(),
                    manifest: path.map(Path::to_path_buf),
                });
            }
        }
        Ok(())
    }

    /// Find a target by name.
    pub fn target(&self, name: &str) -> Option<&TargetDecl> {
        self.targets.iter().find(|t| t.name.as_str() == name)
    }
}
