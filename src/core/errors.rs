//! Configuration error types and diagnostics.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Broad classification of a [`ConfigError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The environment or project configuration cannot produce a build
    /// (missing external library, unknown module, cyclic targets).
    Configuration,
    /// A caller passed an empty or ill-formed identifier or path.
    InvalidArgument,
}

/// Error raised while resolving layouts, dependencies and build plans.
///
/// None of these are transient: retrying with the same inputs yields the
/// same failure.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ConfigError {
    #[error("can't find header `{header}` on prefixes: {}", display_paths(prefixes))]
    #[diagnostic(
        code(cgtbuild::probe::library_not_found),
        help("install the library under one of the prefixes, or set CGTBUILD_LIB_PREFIXES")
    )]
    LibraryNotFound {
        header: String,
        prefixes: Vec<PathBuf>,
    },

    #[error("unknown module `{name}`")]
    #[diagnostic(
        code(cgtbuild::registry::unknown_module),
        help("run `cgtbuild modules` to see known modules")
    )]
    UnknownModule { name: String, known: Vec<String> },

    #[error("dependency cycle between targets: {}", targets.join(" -> "))]
    #[diagnostic(code(cgtbuild::plan::cycle))]
    DependencyCycle { targets: Vec<String> },

    #[error("target `{name}` is declared more than once")]
    #[diagnostic(code(cgtbuild::manifest::duplicate_target))]
    DuplicateTarget {
        name: String,
        manifest: Option<PathBuf>,
    },

    #[error("invalid {what} `{value}`: {reason}")]
    #[diagnostic(code(cgtbuild::invalid_argument))]
    InvalidArgument {
        what: &'static str,
        value: String,
        reason: &'static str,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "(none)".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ConfigError {
    pub(crate) fn invalid(what: &'static str, value: impl Into<String>, reason: &'static str) -> Self {
        ConfigError::InvalidArgument {
            what,
            value: value.into(),
            reason,
        }
    }

    /// Which half of the error taxonomy this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            ConfigError::LibraryNotFound { .. }
            | ConfigError::UnknownModule { .. }
            | ConfigError::DependencyCycle { .. }
            | ConfigError::DuplicateTarget { .. } => ErrorKind::Configuration,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.to_string());

        match self {
            ConfigError::LibraryNotFound { header, prefixes } => {
                diag = diag.with_context(format!("marker header: include/{}", header));
                for prefix in prefixes {
                    diag = diag.with_context(format!(
                        "searched {}",
                        prefix.join("include").join(header).display()
                    ));
                }
            }
            ConfigError::UnknownModule { known, .. } => {
                diag = diag.with_context(format!("known modules: {}", known.join(", ")));
            }
            ConfigError::DuplicateTarget {
                manifest: Some(path),
                ..
            } => {
                diag = diag.with_location(path);
            }
            ConfigError::DependencyCycle { .. }
            | ConfigError::DuplicateTarget { manifest: None, .. }
            | ConfigError::InvalidArgument { .. } => {}
        }

        if let Some(help) = MietteDiagnostic::help(self) {
            diag = diag.with_suggestion(help.to_string());
        }

        diag
    }
}
