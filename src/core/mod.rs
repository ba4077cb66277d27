//! Core data structures for cgtbuild.
//!
//! This module contains the foundational types used throughout cgtbuild:
//! - Module identity and the source/build/output layout
//! - Dependency descriptors and preprocessor defines
//! - Manifests, targets and workspace management
//! - The configuration error taxonomy

pub mod define;
pub mod dependency;
pub mod errors;
pub mod layout;
pub mod manifest;
pub mod module;
pub mod target;
pub mod workspace;

pub use define::Define;
pub use dependency::{DependencySpec, DependencySpecBuilder};
pub use errors::{ConfigError, ErrorKind};
pub use layout::{static_lib_file_name, OutputCategory, PathLayout};
pub use manifest::{Manifest, MANIFEST_NAME};
pub use module::{Module, ModuleName};
pub use target::{TargetDecl, TargetKind};
pub use workspace::Workspace;
