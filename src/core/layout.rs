//! Workspace path layout.
//!
//! Every location is derived from a single absolute workspace root:
//!
//! ```text
//! <root>/<subtree>/...                    module sources
//! <root>/<build-dir>/<subtree>/<subdir>/  per-module build tree
//! <root>/<output-dir>/{bin,testbin,lib,include}/
//! ```
//!
//! Derivations do no I/O, so callers may cache the results freely.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::ConfigError;
use crate::core::module::Module;

/// Default per-module build tree root, relative to the workspace root.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Default canonical output tree root, relative to the workspace root.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Prefix prepended to a library base name to form its archive file name.
pub const STATIC_LIB_PREFIX: &str = "lib";

/// Suffix appended to a library base name to form its archive file name.
pub const STATIC_LIB_SUFFIX: &str = ".a";

/// Canonical output tree categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputCategory {
    Bin,
    TestBin,
    Lib,
    Include,
}

impl OutputCategory {
    pub const ALL: [OutputCategory; 4] = [
        OutputCategory::Bin,
        OutputCategory::TestBin,
        OutputCategory::Lib,
        OutputCategory::Include,
    ];

    /// Directory name of this category below the output root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            OutputCategory::Bin => "bin",
            OutputCategory::TestBin => "testbin",
            OutputCategory::Lib => "lib",
            OutputCategory::Include => "include",
        }
    }
}

impl fmt::Display for OutputCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for OutputCategory {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputCategory::ALL
            .into_iter()
            .find(|c| c.dir_name() == s)
            .ok_or_else(|| {
                ConfigError::invalid(
                    "output category",
                    s,
                    "expected one of bin, testbin, lib, include",
                )
            })
    }
}

/// File name of the static archive for a library base name (`sonlib` -> `libsonlib.a`).
pub fn static_lib_file_name(base: &str) -> String {
    format!("{}{}{}", STATIC_LIB_PREFIX, base, STATIC_LIB_SUFFIX)
}

/// Path derivations for one workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathLayout {
    root: PathBuf,
    build_dir: PathBuf,
    output_dir: PathBuf,
}

impl PathLayout {
    /// Create a layout for an absolute workspace root with default tree names.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let root = root.into();
        if !root.is_absolute() {
            return Err(ConfigError::invalid(
                "workspace root",
                root.display().to_string(),
                "must be an absolute path",
            ));
        }

        Ok(PathLayout {
            build_dir: root.join(DEFAULT_BUILD_DIR),
            output_dir: root.join(DEFAULT_OUTPUT_DIR),
            root,
        })
    }

    /// Relocate the per-module build tree (relative to the workspace root).
    pub fn with_build_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.build_dir = self.root.join(dir);
        self
    }

    /// Relocate the canonical output tree (relative to the workspace root).
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = self.root.join(dir);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn build_root(&self) -> &Path {
        &self.build_dir
    }

    pub fn output_root(&self) -> &Path {
        &self.output_dir
    }

    /// Source tree of a module.
    pub fn module_source_dir(&self, module: &Module) -> PathBuf {
        self.root.join(module.subtree())
    }

    /// A path inside a module's source tree. `rel` is kept intact.
    pub fn source_path(&self, module: &Module, rel: impl AsRef<Path>) -> PathBuf {
        self.module_source_dir(module).join(rel)
    }

    /// A subdirectory of a module's build tree (e.g. `include`, `lib`).
    pub fn module_build_dir(&self, module: &Module, subdir: &str) -> PathBuf {
        self.build_dir.join(module.subtree()).join(subdir)
    }

    /// Location of a generated artifact in a module's build tree.
    ///
    /// Only the final file name of `rel` is kept, so artifacts from
    /// different source subdirectories land side by side.
    pub fn build_path(
        &self,
        module: &Module,
        subdir: &str,
        rel: impl AsRef<Path>,
    ) -> Result<PathBuf, ConfigError> {
        let name = basename(rel.as_ref())?;
        Ok(self.module_build_dir(module, subdir).join(name))
    }

    /// Directory of an output category.
    pub fn output_dir(&self, category: OutputCategory) -> PathBuf {
        self.output_dir.join(category.dir_name())
    }

    /// Install location of an artifact in the canonical output tree.
    ///
    /// Depends only on the file name of `rel`.
    pub fn output_path(
        &self,
        category: OutputCategory,
        rel: impl AsRef<Path>,
    ) -> Result<PathBuf, ConfigError> {
        let name = basename(rel.as_ref())?;
        Ok(self.output_dir(category).join(name))
    }
}

fn basename(rel: &Path) -> Result<&Path, ConfigError> {
    match rel.components().next_back() {
        Some(Component::Normal(name)) => Ok(Path::new(name)),
        _ => Err(ConfigError::invalid(
            "artifact path",
            rel.display().to_string(),
            "must end in a file name",
        )),
    }
}
