//! Terminal rendering of configuration problems.
//!
//! A report names the problem, where it was found, what was checked, and how
//! to fix it:
//!
//! ```text
//! error: can't find header `tcbdb.h` on prefixes: /opt/local, /usr
//!   -> searched /opt/local/include/tcbdb.h
//!   -> searched /usr/include/tcbdb.h
//!
//! help: install the library under one of the prefixes, or set CGTBUILD_LIB_PREFIXES
//! ```

use std::fmt::{self, Write as _};
use std::path::PathBuf;

const RED: &str = "\x1b[1;31m";
const YELLOW: &str = "\x1b[1;33m";
const GREEN: &str = "\x1b[1;32m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Configuration cannot proceed
    Error,
    /// Configuration proceeds but the result is likely not what was meant
    Warning,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Severity::Error => RED,
            Severity::Warning => YELLOW,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One reported problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// File or directory the problem was found in
    pub location: Option<PathBuf>,
    /// What was checked, one line each
    pub context: Vec<String>,
    /// Possible fixes
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    fn new(severity: Severity, message: String) -> Self {
        Diagnostic {
            severity,
            message,
            location: None,
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic::new(Severity::Error, message.into())
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic::new(Severity::Warning, message.into())
    }

    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    pub fn with_context(mut self, line: impl Into<String>) -> Self {
        self.context.push(line.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Render for a terminal, with ANSI colors when `color` is set.
    pub fn format(&self, color: bool) -> String {
        let paint = |code: &str, text: &str| {
            if color {
                format!("{code}{text}{RESET}")
            } else {
                text.to_string()
            }
        };

        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "{}: {}",
            paint(self.severity.color(), self.severity.label()),
            self.message
        );

        if let Some(path) = &self.location {
            let _ = writeln!(out, "  --> {}", path.display());
        }
        for line in &self.context {
            let _ = writeln!(out, "  -> {line}");
        }

        let help = paint(GREEN, "help");
        match self.suggestions.as_slice() {
            [] => {}
            [only] => {
                let _ = write!(out, "\n{help}: {only}\n");
            }
            many => {
                let _ = write!(out, "\n{help}: try one of:\n");
                for (n, suggestion) in many.iter().enumerate() {
                    let _ = writeln!(out, "  {}. {suggestion}", n + 1);
                }
            }
        }

        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
