//! Build configuration.
//!
//! This module discovers external libraries, merges dependency descriptors
//! into a build environment, and plans per-target builds.

pub mod environment;
pub mod plan;
pub mod probe;
pub mod registry;

pub use environment::BuildEnvironment;
pub use plan::{BuildPlan, InstallStep, TargetPlan};
pub use probe::{find_prefix, ExternalLibrary, FileSystem, RealFileSystem};
pub use registry::{KnownModule, ModuleRegistry};
