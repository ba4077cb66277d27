//! Global context for cgtbuild operations.
//!
//! Provides centralized access to the working directory, workspace root
//! discovery and configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::MANIFEST_NAME;
use crate::core::workspace::Workspace;
use crate::util::config::{global_config_path, load_config, project_config_path, Config};

/// Global context containing paths and overrides from the command line.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Explicit workspace root, if given
    root: Option<PathBuf>,

    /// Prefixes replacing every configured prefix list
    prefixes: Vec<PathBuf>,
}

impl GlobalContext {
    /// Create a new GlobalContext for the current directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            root: None,
            prefixes: Vec::new(),
        }
    }

    /// Use `root` as the workspace root instead of searching for it.
    pub fn with_root(mut self, root: Option<PathBuf>) -> Self {
        self.root = root.map(|r| self.cwd.join(r));
        self
    }

    /// Replace the external prefix list.
    pub fn with_prefixes(mut self, prefixes: Vec<PathBuf>) -> Self {
        self.prefixes = prefixes;
        self
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// The workspace root: the explicit root, else the nearest ancestor of
    /// the working directory holding a manifest, else the working directory.
    pub fn workspace_root(&self) -> PathBuf {
        if let Some(ref root) = self.root {
            return root.clone();
        }

        self.cwd
            .ancestors()
            .find(|dir| dir.join(MANIFEST_NAME).is_file())
            .unwrap_or(&self.cwd)
            .to_path_buf()
    }

    /// Effective configuration for a workspace root.
    pub fn config(&self, root: &Path) -> Config {
        let global = global_config_path();
        let mut config = load_config(global.as_deref(), &project_config_path(root));

        if !self.prefixes.is_empty() {
            config.external.prefixes = Some(self.prefixes.clone());
        }

        config
    }

    /// Open the workspace.
    pub fn workspace(&self) -> Result<Workspace> {
        let root = self.workspace_root();
        let config = self.config(&root);
        Workspace::new(&root, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_workspace_root_found_upward() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("cactus").join("impl");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(tmp.path().join(MANIFEST_NAME), "").unwrap();

        let ctx = GlobalContext::with_cwd(nested);
        assert_eq!(ctx.workspace_root(), tmp.path());
    }

    #[test]
    fn test_explicit_root_wins() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf())
            .with_root(Some(PathBuf::from("elsewhere")));
        assert_eq!(ctx.workspace_root(), tmp.path().join("elsewhere"));
    }

    #[test]
    fn test_cli_prefixes_replace_config() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf())
            .with_prefixes(vec![PathBuf::from("/mine")]);

        let config = ctx.config(tmp.path());
        assert_eq!(config.external_prefixes(), vec![PathBuf::from("/mine")]);
    }
}
