//! Workspace - central configuration hub.
//!
//! A Workspace ties together the workspace root, its manifest, the
//! effective configuration and the path layout derived from them. The root
//! is fixed for the lifetime of the workspace.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::layout::PathLayout;
use crate::core::manifest::{Manifest, MANIFEST_NAME};
use crate::util::config::Config;

/// A workspace rooted at a single absolute directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    manifest: Manifest,
    manifest_path: Option<PathBuf>,
    layout: PathLayout,
    config: Config,
}

impl Workspace {
    /// Open the workspace at `root`.
    ///
    /// The manifest is optional: without one the workspace has no targets
    /// but layout and registry queries still work.
    pub fn new(root: &Path, config: Config) -> Result<Self> {
        let root = absolute_root(root)?;

        let manifest_path = root.join(MANIFEST_NAME);
        let (manifest, manifest_path) = if manifest_path.is_file() {
            (Manifest::load(&manifest_path)?, Some(manifest_path))
        } else {
            tracing::debug!("no {} in {}", MANIFEST_NAME, root.display());
            (Manifest::default(), None)
        };

        let layout = config.apply_layout(PathLayout::new(root)?);

        Ok(Workspace {
            manifest,
            manifest_path,
            layout,
            config,
        })
    }

    /// Get the workspace root directory.
    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn manifest_path(&self) -> Option<&Path> {
        self.manifest_path.as_deref()
    }

    pub fn layout(&self) -> &PathLayout {
        &self.layout
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// External library prefixes in probe order.
    pub fn external_prefixes(&self) -> Vec<PathBuf> {
        self.config.external_prefixes()
    }
}

fn absolute_root(root: &Path) -> Result<PathBuf> {
    root.canonicalize()
        .with_context(|| format!("failed to resolve workspace root: {}", root.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::OutputCategory;
    use tempfile::TempDir;

    #[test]
    fn test_workspace_without_manifest() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::new(tmp.path(), Config::default()).unwrap();

        assert!(ws.root().is_absolute());
        assert!(ws.manifest().targets.is_empty());
        assert!(ws.manifest_path().is_none());
        assert_eq!(
            ws.layout().output_dir(OutputCategory::Bin),
            ws.root().join("output").join("bin")
        );
    }

    #[test]
    fn test_workspace_with_manifest() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(MANIFEST_NAME),
            r#"
[[target]]
name = "sonlib"
kind = "static-lib"
module = "sonlib"
"#,
        )
        .unwrap();

        let ws = Workspace::new(tmp.path(), Config::default()).unwrap();
        assert_eq!(ws.manifest().targets.len(), 1);
        assert!(ws.manifest_path().is_some());
    }

    #[test]
    fn test_missing_root_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(Workspace::new(&tmp.path().join("missing"), Config::default()).is_err());
    }
}
