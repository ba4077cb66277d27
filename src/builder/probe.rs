//! External library discovery.
//!
//! An installed library is located by looking for a well-known header under
//! `<prefix>/include/` for each candidate prefix, in the order given. The
//! first hit wins; putting a local prefix ahead of a system one shadows the
//! system copy.

use std::path::{Component, Path, PathBuf};

use crate::core::errors::ConfigError;

/// Read-only filesystem queries used while probing.
pub trait FileSystem: Send + Sync {
    /// Whether `path` exists.
    fn exists(&self, path: &Path) -> bool;
}

/// The host filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Find the first prefix containing `include/<marker_header>`.
pub fn find_prefix(
    fs: &dyn FileSystem,
    marker_header: &str,
    prefixes: &[PathBuf],
) -> Result<PathBuf, ConfigError> {
    if marker_header.trim().is_empty() {
        return Err(ConfigError::invalid(
            "marker header",
            marker_header,
            "must not be empty",
        ));
    }
    // The header must stay below `<prefix>/include`.
    if !Path::new(marker_header)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return Err(ConfigError::invalid(
            "marker header",
            marker_header,
            "must be a relative path below the include directory",
        ));
    }

    for prefix in prefixes {
        let candidate = prefix.join("include").join(marker_header);
        tracing::debug!("probing {}", candidate.display());
        if fs.exists(&candidate) {
            return Ok(prefix.clone());
        }
    }

    Err(ConfigError::LibraryNotFound {
        header: marker_header.to_string(),
        prefixes: prefixes.to_vec(),
    })
}

/// An external library installation found under a prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalLibrary {
    prefix: PathBuf,
}

impl ExternalLibrary {
    /// Probe `prefixes` for `marker_header`.
    pub fn probe(
        fs: &dyn FileSystem,
        marker_header: &str,
        prefixes: &[PathBuf],
    ) -> Result<Self, ConfigError> {
        let prefix = find_prefix(fs, marker_header, prefixes)?;
        tracing::info!("found {} under {}", marker_header, prefix.display());
        Ok(ExternalLibrary { prefix })
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    pub fn include_dir(&self) -> PathBuf {
        self.prefix.join("include")
    }

    pub fn lib_dir(&self) -> PathBuf {
        self.prefix.join("lib")
    }
}
