//! Per-target build environment.
//!
//! A BuildEnvironment accumulates the compile and link inputs of every
//! dependency a target asked for. Each target owns its own environment;
//! nothing is shared between targets.

use std::path::PathBuf;

use serde::Serialize;

use crate::core::define::Define;
use crate::core::dependency::DependencySpec;

/// Accumulated compiler and linker inputs for one build target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildEnvironment {
    /// Include directories (-I), unique
    include_paths: Vec<PathBuf>,
    /// Library search paths (-L), unique
    lib_search_paths: Vec<PathBuf>,
    /// Libraries in link order (-l), duplicates kept
    lib_names: Vec<String>,
    /// Preprocessor defines (-D), unique
    defines: Vec<Define>,
    /// Runtime search paths (-rpath), unique
    rpath_dirs: Vec<PathBuf>,
}

impl BuildEnvironment {
    pub fn new() -> Self {
        BuildEnvironment::default()
    }

    /// Merge a dependency's requirements.
    ///
    /// Set-like fields only gain entries they do not already hold. Library
    /// names are always appended: the dependency's own names, then its transitive
    /// names, so a library reappears on the link line whenever a later
    /// dependency needs it again.
    pub fn merge(&mut self, spec: &DependencySpec) -> &mut Self {
        tracing::debug!(
            "merging {:?} (+{:?}) from {}",
            spec.lib_names(),
            spec.transitive_lib_names(),
            spec.lib_dir().display()
        );

        for dir in spec.include_dirs() {
            append_unique(&mut self.include_paths, dir);
        }
        append_unique(&mut self.lib_search_paths, spec.lib_dir());

        self.lib_names.extend(spec.lib_names().iter().cloned());
        self.lib_names
            .extend(spec.transitive_lib_names().iter().cloned());

        for define in spec.defines() {
            append_unique(&mut self.defines, define);
        }

        if spec.records_rpath() {
            append_unique(&mut self.rpath_dirs, spec.lib_dir());
        }

        self
    }

    pub fn include_paths(&self) -> &[PathBuf] {
        &self.include_paths
    }

    pub fn lib_search_paths(&self) -> &[PathBuf] {
        &self.lib_search_paths
    }

    /// Libraries in link order.
    pub fn lib_names(&self) -> &[String] {
        &self.lib_names
    }

    pub fn defines(&self) -> &[Define] {
        &self.defines
    }

    pub fn rpath_dirs(&self) -> &[PathBuf] {
        &self.rpath_dirs
    }

    pub fn is_empty(&self) -> bool {
        self.include_paths.is_empty()
            && self.lib_search_paths.is_empty()
            && self.lib_names.is_empty()
            && self.defines.is_empty()
            && self.rpath_dirs.is_empty()
    }

    /// Convert to compiler flags.
    pub fn compile_flags(&self) -> Vec<String> {
        let mut flags = Vec::new();

        for dir in &self.include_paths {
            flags.push(format!("-I{}", dir.display()));
        }

        for define in &self.defines {
            flags.push(define.to_flag());
        }

        flags
    }

    /// Convert to linker flags.
    pub fn link_flags(&self) -> Vec<String> {
        let mut flags = Vec::new();

        // Library search paths
        for dir in &self.lib_search_paths {
            flags.push(format!("-L{}", dir.display()));
        }

        for dir in &self.rpath_dirs {
            flags.push(format!("-Wl,-rpath,{}", dir.display()));
        }

        // Libraries, in link order
        for name in &self.lib_names {
            flags.push(format!("-l{}", name));
        }

        flags
    }
}

fn append_unique<T, U>(items: &mut Vec<T>, item: &U)
where
    T: PartialEq<U> + Clone,
    U: ?Sized + ToOwned<Owned = T>,
{
    if !items.iter().any(|existing| existing == item) {
        items.push(item.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(lib: &str) -> DependencySpec {
        DependencySpec::builder(format!("/ws/build/{lib}/lib"))
            .include_dir(format!("/ws/build/{lib}/include"))
            .lib_names([lib])
            .build()
            .unwrap()
    }

    fn external() -> DependencySpec {
        DependencySpec::builder("/usr/lib")
            .include_dir("/usr/include")
            .lib_names(["tokyocabinet"])
            .transitive_lib_names(["z", "pthread"])
            .define(Define::key_value("HAVE_TOKYO_CABINET", "1"))
            .record_rpath()
            .build()
            .unwrap()
    }

    #[test]
    fn test_merge_twice_keeps_sets_but_repeats_libs() {
        let mut env = BuildEnvironment::new();
        env.merge(&external());
        let after_first = env.clone();
        env.merge(&external());

        assert_eq!(env.include_paths(), after_first.include_paths());
        assert_eq!(env.lib_search_paths(), after_first.lib_search_paths());
        assert_eq!(env.defines(), after_first.defines());
        assert_eq!(env.rpath_dirs(), after_first.rpath_dirs());
        assert_eq!(
            env.lib_names(),
            ["tokyocabinet", "z", "pthread", "tokyocabinet", "z", "pthread"]
        );
    }

    #[test]
    fn test_same_lib_twice() {
        let mut env = BuildEnvironment::new();
        env.merge(&spec("cactus")).merge(&spec("cactus"));
        assert_eq!(env.lib_names(), ["cactus", "cactus"]);
        assert_eq!(env.include_paths().len(), 1);
    }

    #[test]
    fn test_transitive_follow_owner() {
        let mut env = BuildEnvironment::new();
        env.merge(&spec("sonlib"));
        env.merge(&external());
        env.merge(&spec("cutest"));

        assert_eq!(
            env.lib_names(),
            ["sonlib", "tokyocabinet", "z", "pthread", "cutest"]
        );
    }

    #[test]
    fn test_rpath_only_when_requested() {
        let mut env = BuildEnvironment::new();
        env.merge(&spec("sonlib"));
        assert!(env.rpath_dirs().is_empty());

        env.merge(&external());
        assert_eq!(env.rpath_dirs(), [PathBuf::from("/usr/lib")]);
    }

    #[test]
    fn test_flags() {
        let mut env = BuildEnvironment::new();
        assert!(env.is_empty());
        env.merge(&spec("sonlib")).merge(&external());

        assert_eq!(
            env.compile_flags(),
            vec![
                "-I/ws/build/sonlib/include",
                "-I/usr/include",
                "-DHAVE_TOKYO_CABINET=1",
            ]
        );
        assert_eq!(
            env.link_flags(),
            vec![
                "-L/ws/build/sonlib/lib",
                "-L/usr/lib",
                "-Wl,-rpath,/usr/lib",
                "-lsonlib",
                "-ltokyocabinet",
                "-lz",
                "-lpthread",
            ]
        );
    }
}
