//! cgtbuild - build configuration for multi-module C projects
//!
//! This crate provides the library side of cgtbuild: the source/build/output
//! path layout, external library discovery, dependency descriptors and the
//! environment they merge into, and the registry of known modules.

pub mod builder;
pub mod core;
pub mod util;

/// Test utilities and mocks for cgtbuild unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides an in-memory filesystem for prefix probing
/// and a sample source tree.
#[cfg(test)]
pub mod test_support;

pub use builder::{BuildEnvironment, BuildPlan, KnownModule, ModuleRegistry};
pub use core::{ConfigError, DependencySpec, Manifest, PathLayout, Workspace};
pub use util::context::GlobalContext;
