//! Dependency specification.
//!
//! A DependencySpec describes what one library contributes to a consumer's
//! compile and link steps: where its headers and archives live, which
//! libraries to link (in order), and which defines to set.

use std::path::{Path, PathBuf};

use crate::core::define::Define;
use crate::core::errors::ConfigError;

/// The resolved compile/link inputs of one library.
///
/// Immutable once built. Registry constructors return a fresh spec on each
/// call; mutation only happens in the environment it is merged into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    include_dirs: Vec<PathBuf>,
    lib_dir: PathBuf,
    lib_names: Vec<String>,
    transitive_lib_names: Vec<String>,
    defines: Vec<Define>,
    record_rpath: bool,
}

impl DependencySpec {
    /// Start building a spec whose archives live in `lib_dir`.
    pub fn builder(lib_dir: impl Into<PathBuf>) -> DependencySpecBuilder {
        DependencySpecBuilder {
            include_dirs: Vec::new(),
            lib_dir: lib_dir.into(),
            lib_names: Vec::new(),
            transitive_lib_names: Vec::new(),
            defines: Vec::new(),
            record_rpath: false,
        }
    }

    pub fn include_dirs(&self) -> &[PathBuf] {
        &self.include_dirs
    }

    pub fn lib_dir(&self) -> &Path {
        &self.lib_dir
    }

    /// Library base names, in link order.
    pub fn lib_names(&self) -> &[String] {
        &self.lib_names
    }

    /// Libraries this library itself needs at link time.
    pub fn transitive_lib_names(&self) -> &[String] {
        &self.transitive_lib_names
    }

    pub fn defines(&self) -> &[Define] {
        &self.defines
    }

    /// Whether `lib_dir` should be baked into the runtime search path.
    pub fn records_rpath(&self) -> bool {
        self.record_rpath
    }
}

/// Builder for [`DependencySpec`].
///
/// Every list-valued setter accepts any iterable, so a single library name is
/// just a one-element array at the call site.
#[derive(Debug, Clone)]
pub struct DependencySpecBuilder {
    include_dirs: Vec<PathBuf>,
    lib_dir: PathBuf,
    lib_names: Vec<String>,
    transitive_lib_names: Vec<String>,
    defines: Vec<Define>,
    record_rpath: bool,
}

impl DependencySpecBuilder {
    pub fn include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_dirs.push(dir.into());
        self
    }

    pub fn lib_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lib_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn transitive_lib_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.transitive_lib_names
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn define(mut self, define: Define) -> Self {
        self.defines.push(define);
        self
    }

    /// Record `lib_dir` as a runtime search path when merged.
    pub fn record_rpath(mut self) -> Self {
        self.record_rpath = true;
        self
    }

    /// Validate and freeze the dependency.
    ///
    /// At least one library name is required and no name may be empty.
    pub fn build(self) -> Result<DependencySpec, ConfigError> {
        if self.lib_names.is_empty() {
            return Err(ConfigError::invalid(
                "dependency spec",
                self.lib_dir.display().to_string(),
                "at least one library name is required",
            ));
        }

        for name in self.lib_names.iter().chain(&self.transitive_lib_names) {
            if name.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "library name",
                    name.clone(),
                    "must not be empty",
                ));
            }
        }

        Ok(DependencySpec {
            include_dirs: self.include_dirs,
            lib_dir: self.lib_dir,
            lib_names: self.lib_names,
            transitive_lib_names: self.transitive_lib_names,
            defines: self.defines,
            record_rpath: self.record_rpath,
        })
    }
}
