//! Source and header file helpers.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::{glob, Pattern};

/// Join each of `files` onto `src_dir`.
///
/// With no `src_dir` the files are taken to be full paths already.
pub fn source_paths<I, P>(src_dir: Option<&Path>, files: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    files
        .into_iter()
        .map(|f| match src_dir {
            Some(dir) => dir.join(f),
            None => f.as_ref().to_path_buf(),
        })
        .collect()
}

/// Files in `src_dir` matching `pattern`, minus `excludes` (relative to `src_dir`).
///
/// Only `pattern` is glob syntax; `src_dir` is matched literally.
pub fn glob_sources(src_dir: &Path, pattern: &str, excludes: &[String]) -> Result<Vec<PathBuf>> {
    let exclude_paths = source_paths(Some(src_dir), excludes);

    let mut results: Vec<PathBuf> = glob_in(src_dir, pattern)?
        .into_iter()
        .filter(|path| path.is_file() && !exclude_paths.contains(path))
        .collect();

    results.sort();
    results.dedup();
    Ok(results)
}

/// Headers named by `patterns` (relative to `src_dir`), in pattern order.
///
/// A pattern matching a directory contributes every `*.h` directly inside
/// it, so both `inc/*.h` and `inc` select the same headers.
pub fn glob_headers(src_dir: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut headers = Vec::new();
    for pattern in patterns {
        let mut matched = glob_in(src_dir, pattern)?;
        matched.sort();

        for path in matched {
            let found = if path.is_dir() {
                glob_sources(&path, "*.h", &[])?
            } else if path.is_file() {
                vec![path]
            } else {
                continue;
            };

            for header in found {
                if !headers.contains(&header) {
                    headers.push(header);
                }
            }
        }
    }
    Ok(headers)
}

fn glob_in(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let escaped = PathBuf::from(Pattern::escape(&dir.to_string_lossy()));
    let full_pattern = escaped.join(pattern);

    let mut paths = Vec::new();
    for entry in glob(&full_pattern.to_string_lossy())
        .with_context(|| format!("invalid glob pattern: {}", pattern))?
    {
        match entry {
            Ok(path) => paths.push(path),
            Err(e) => tracing::warn!("glob error: {}", e),
        }
    }
    Ok(paths)
}
