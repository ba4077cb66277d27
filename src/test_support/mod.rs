//! Test utilities and mocks for cgtbuild unit tests.
//!
//! Provides an in-memory filesystem for deterministic prefix probing and
//! fixtures describing a small multi-module source tree.
//!
//! # Example
//!
//! ```rust,ignore
//! use cgtbuild::test_support::MockFileSystem;
//!
//! let mut fs = MockFileSystem::new();
//! fs.add_file("/usr/include/kcdb.h", "");
//! assert!(find_prefix(&fs, "kcdb.h", &prefixes).is_ok());
//! ```

pub mod fixtures;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::builder::probe::FileSystem;

pub use fixtures::*;

/// Mock filesystem for testing without real I/O.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: HashSet<PathBuf>,
}

impl MockFileSystem {
    /// Create a new empty mock filesystem.
    pub fn new() -> Self {
        MockFileSystem::default()
    }

    /// Add a file with the given content.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref().to_path_buf();
        // Ensure parent directories exist
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.files.insert(path, content.into());
    }

    /// Add a directory and all of its parents.
    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        for dir in path.as_ref().ancestors() {
            if dir.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(dir.to_path_buf());
        }
    }

    /// Check if a path is a file.
    pub fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    /// Check if a path is a directory.
    pub fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_filesystem_parents() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/usr/include/kcdb.h", "");

        assert!(fs.exists(Path::new("/usr/include/kcdb.h")));
        assert!(fs.is_dir(Path::new("/usr/include")));
        assert!(fs.is_dir(Path::new("/usr")));
        assert!(!fs.exists(Path::new("/usr/include/tcbdb.h")));
    }
}
