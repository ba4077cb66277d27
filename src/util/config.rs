//! Configuration file support for cgtbuild.
//!
//! cgtbuild supports two configuration file locations:
//! - Global: `~/.cgtbuild/config.toml` - User-wide defaults
//! - Project: `<root>/.cgtbuild/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. The external library
//! prefix list can additionally be replaced through `CGTBUILD_LIB_PREFIXES`.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::layout::{PathLayout, DEFAULT_BUILD_DIR, DEFAULT_OUTPUT_DIR};

/// Environment variable replacing the configured external prefixes.
pub const LIB_PREFIXES_ENV: &str = "CGTBUILD_LIB_PREFIXES";

/// Installation prefixes probed for external libraries, in probe order.
pub const DEFAULT_EXTERNAL_PREFIXES: &[&str] = &[
    "/hive/groups/recon/local",
    "/opt/local", // MacPorts
    "/usr/local", // FreeBSD, Homebrew
    "/usr",
];

/// cgtbuild configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tree locations
    pub layout: LayoutConfig,

    /// External library discovery
    pub external: ExternalConfig,
}

/// Build and output tree locations, relative to the workspace root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LayoutConfig {
    pub build_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

/// External library discovery settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalConfig {
    /// Candidate prefixes, first match wins. `None` means the defaults.
    pub prefixes: Option<Vec<PathBuf>>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing or broken.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.layout.build_dir.is_some() {
            self.layout.build_dir = other.layout.build_dir;
        }
        if other.layout.output_dir.is_some() {
            self.layout.output_dir = other.layout.output_dir;
        }
        if other.external.prefixes.is_some() {
            self.external.prefixes = other.external.prefixes;
        }
    }

    /// Replace the prefix list from a path-list value such as `$CGTBUILD_LIB_PREFIXES`.
    ///
    /// Empty entries are dropped; an entirely empty value leaves the config alone.
    pub fn apply_prefix_override(&mut self, value: Option<&OsStr>) {
        let Some(value) = value else {
            return;
        };

        let prefixes: Vec<PathBuf> = std::env::split_paths(value)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();

        if !prefixes.is_empty() {
            tracing::debug!("external prefixes overridden: {:?}", prefixes);
            self.external.prefixes = Some(prefixes);
        }
    }

    /// Effective external prefixes in probe order.
    pub fn external_prefixes(&self) -> Vec<PathBuf> {
        match &self.external.prefixes {
            Some(prefixes) => prefixes.clone(),
            None => DEFAULT_EXTERNAL_PREFIXES.iter().map(PathBuf::from).collect(),
        }
    }

    /// Apply the configured tree locations to a layout.
    pub fn apply_layout(&self, layout: PathLayout) -> PathLayout {
        let build_dir = self
            .layout
            .build_dir
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_BUILD_DIR));
        let output_dir = self
            .layout
            .output_dir
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_OUTPUT_DIR));

        layout.with_build_dir(build_dir).with_output_dir(output_dir)
    }
}

/// Load merged configuration from global and project locations, then the environment.
///
/// Order of precedence (highest to lowest):
/// 1. `CGTBUILD_LIB_PREFIXES` (prefixes only)
/// 2. Project config (.cgtbuild/config.toml)
/// 3. Global config (~/.cgtbuild/config.toml)
/// 4. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));
    config.apply_prefix_override(std::env::var_os(LIB_PREFIXES_ENV).as_deref());

    config
}

/// Get the global cgtbuild config directory (~/.cgtbuild).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".cgtbuild"))
}

/// Get the global config path (~/.cgtbuild/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.cgtbuild/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".cgtbuild").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use tempfile::TempDir;

    #[test]
    fn test_default_prefixes_keep_order() {
        let config = Config::default();
        assert_eq!(
            config.external_prefixes(),
            vec![
                PathBuf::from("/hive/groups/recon/local"),
                PathBuf::from("/opt/local"),
                PathBuf::from("/usr/local"),
                PathBuf::from("/usr"),
            ]
        );
    }

    #[test]
    fn test_project_overrides_global() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = project_config_path(tmp.path());

        std::fs::write(
            &global,
            r#"
[layout]
build-dir = "gbuild"
output-dir = "goutput"

[external]
prefixes = ["/global"]
"#,
        )
        .unwrap();
        std::fs::create_dir_all(project.parent().unwrap()).unwrap();
        std::fs::write(&project, "[external]\nprefixes = [\"/mine\", \"/usr\"]\n").unwrap();

        let mut config = Config::default();
        config.merge(Config::load_or_default(&global));
        config.merge(Config::load_or_default(&project));

        assert_eq!(config.layout.build_dir, Some(PathBuf::from("gbuild")));
        assert_eq!(
            config.external_prefixes(),
            vec![PathBuf::from("/mine"), PathBuf::from("/usr")]
        );
    }

    #[test]
    fn test_broken_config_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[layout\nbroken").unwrap();

        assert_eq!(Config::load_or_default(&path), Config::default());
    }

    #[test]
    fn test_prefix_override() {
        let mut config = Config::default();
        let value = std::env::join_paths(["/local/first", "/usr"]).unwrap();
        config.apply_prefix_override(Some(value.as_os_str()));
        assert_eq!(
            config.external_prefixes(),
            vec![PathBuf::from("/local/first"), PathBuf::from("/usr")]
        );

        config.apply_prefix_override(Some(OsString::new().as_os_str()));
        assert_eq!(config.external_prefixes().len(), 2);
    }

    #[test]
    fn test_apply_layout() {
        let config = Config {
            layout: LayoutConfig {
                build_dir: Some(PathBuf::from("_build")),
                output_dir: None,
            },
            ..Default::default()
        };

        let layout = config.apply_layout(PathLayout::new("/ws").unwrap());
        assert_eq!(layout.build_root(), Path::new("/ws/_build"));
        assert_eq!(layout.output_root(), Path::new("/ws/output"));
    }
}
