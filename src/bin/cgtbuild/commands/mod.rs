//! Command implementations

pub mod completions;
pub mod flags;
pub mod modules;
pub mod path;
pub mod plan;
pub mod probe;
