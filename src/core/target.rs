//! Target definitions - what gets built.
//!
//! A target is one artifact produced from a module's sources: a static
//! library, a program, or a test program.

use serde::{Deserialize, Serialize};

use crate::core::layout::{static_lib_file_name, OutputCategory};
use crate::core::module::ModuleName;

/// The kind of target being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    /// Static archive (`lib<name>.a`)
    #[serde(alias = "lib", alias = "static")]
    StaticLib,

    /// Program installed into `bin`
    #[serde(alias = "bin", alias = "exe")]
    Program,

    /// Test program installed into `testbin`
    #[serde(alias = "test")]
    TestProgram,
}

impl TargetKind {
    /// Get the output filename for a target.
    pub fn output_filename(&self, name: &str) -> String {
        match self {
            TargetKind::StaticLib => static_lib_file_name(name),
            TargetKind::Program | TargetKind::TestProgram => name.to_string(),
        }
    }

    /// Subdirectory of the module build tree the artifact is written to.
    pub fn build_subdir(&self) -> &'static str {
        match self {
            TargetKind::StaticLib => "lib",
            TargetKind::Program | TargetKind::TestProgram => "bin",
        }
    }

    /// Output tree category the artifact is installed into.
    pub fn install_category(&self) -> OutputCategory {
        match self {
            TargetKind::StaticLib => OutputCategory::Lib,
            TargetKind::Program => OutputCategory::Bin,
            TargetKind::TestProgram => OutputCategory::TestBin,
        }
    }
}

/// A target as declared in the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetDecl {
    /// Target name; also the library base name for static libraries
    pub name: ModuleName,

    pub kind: TargetKind,

    /// Known in-tree module whose source tree holds this target
    pub module: ModuleName,

    /// Source globs relative to the module source tree
    #[serde(default)]
    pub sources: Vec<String>,

    /// Files excluded from `sources`, relative to the module source tree
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Header globs to install, relative to the module source tree
    #[serde(default)]
    pub headers: Vec<String>,

    /// Registry modules this target uses, in link order
    #[serde(default)]
    pub deps: Vec<ModuleName>,
}
