//! Module dependency registry.
//!
//! The one place that knows the concrete modules of the project, where
//! each one's headers and archives live, and what each needs at link time.
//! Moving a module means editing its constructor here and nothing else.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::builder::environment::BuildEnvironment;
use crate::builder::probe::{ExternalLibrary, FileSystem};
use crate::core::define::Define;
use crate::core::dependency::{DependencySpec, DependencySpecBuilder};
use crate::core::errors::ConfigError;
use crate::core::layout::PathLayout;
use crate::core::module::Module;

/// Core utility library.
pub const SONLIB_LIB_NAME: &str = "sonlib";
/// Unit test harness library.
pub const CUTEST_LIB_NAME: &str = "cutest";
pub const CACTUS_LIB_NAME: &str = "cactus";
pub const CPECAN_LIB_NAME: &str = "cpecan";

/// Define signalling that the embedded key-value store is available.
const KV_STORE_DEFINE: (&str, &str) = ("HAVE_TOKYO_CABINET", "1");

/// System libraries the key-value store libraries link against.
const KV_STORE_SYSTEM_LIBS: &[&str] = &["z", "bz2", "pthread", "m"];

/// Every module the registry can resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownModule {
    SonLib,
    CuTest,
    Cactus,
    CPecan,
    /// Tokyo Cabinet plus Kyoto Tycoon/Cabinet from one prefix
    KyotoDatabase,
    KyotoTycoon,
    TokyoCabinet,
}

impl KnownModule {
    pub const ALL: [KnownModule; 7] = [
        KnownModule::SonLib,
        KnownModule::CuTest,
        KnownModule::Cactus,
        KnownModule::CPecan,
        KnownModule::KyotoDatabase,
        KnownModule::KyotoTycoon,
        KnownModule::TokyoCabinet,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            KnownModule::SonLib => "sonlib",
            KnownModule::CuTest => "cutest",
            KnownModule::Cactus => "cactus",
            KnownModule::CPecan => "cpecan",
            KnownModule::KyotoDatabase => "kyoto",
            KnownModule::KyotoTycoon => "kyototycoon",
            KnownModule::TokyoCabinet => "tokyocabinet",
        }
    }

    /// Libraries the module itself contributes, in link order.
    pub fn lib_names(&self) -> &'static [&'static str] {
        match self {
            KnownModule::SonLib => &[SONLIB_LIB_NAME],
            KnownModule::CuTest => &[CUTEST_LIB_NAME],
            KnownModule::Cactus => &[CACTUS_LIB_NAME],
            KnownModule::CPecan => &[CPECAN_LIB_NAME],
            KnownModule::KyotoDatabase => &["tokyocabinet", "kyototycoon", "kyotocabinet"],
            KnownModule::KyotoTycoon => &["kyototycoon"],
            KnownModule::TokyoCabinet => &["tokyocabinet"],
        }
    }

    /// Whether the module is built inside the workspace (as opposed to probed).
    pub fn is_in_tree(&self) -> bool {
        self.subtree().is_some()
    }

    /// Workspace subtree of an in-tree module.
    pub fn subtree(&self) -> Option<&'static str> {
        match self {
            KnownModule::SonLib => Some("sonLib/sonLib"),
            KnownModule::CuTest => Some("sonLib/cuTest"),
            KnownModule::Cactus => Some("cactus"),
            KnownModule::CPecan => Some("cPecan"),
            KnownModule::KyotoDatabase | KnownModule::KyotoTycoon | KnownModule::TokyoCabinet => {
                None
            }
        }
    }

    /// The in-tree module definition.
    ///
    /// Fails with `InvalidArgument` for modules probed outside the workspace.
    pub fn module(&self) -> Result<Module, ConfigError> {
        let subtree = self.subtree().ok_or_else(|| {
            ConfigError::invalid(
                "in-tree module",
                self.name(),
                "module is not built in the workspace",
            )
        })?;
        Module::new(self.name(), subtree)
    }

    fn known_names() -> Vec<String> {
        KnownModule::ALL
            .iter()
            .map(|m| m.name().to_string())
            .collect()
    }
}

impl fmt::Display for KnownModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KnownModule {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ConfigError::invalid("module name", s, "must not be empty"));
        }

        KnownModule::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| ConfigError::UnknownModule {
                name: s.to_string(),
                known: KnownModule::known_names(),
            })
    }
}

/// Resolves known modules into dependency specs for one workspace.
pub struct ModuleRegistry<'a> {
    layout: &'a PathLayout,
    prefixes: Vec<PathBuf>,
    fs: &'a dyn FileSystem,
}

impl<'a> ModuleRegistry<'a> {
    /// Create a registry probing external libraries under `prefixes`, in order.
    pub fn new(layout: &'a PathLayout, prefixes: Vec<PathBuf>, fs: &'a dyn FileSystem) -> Self {
        ModuleRegistry {
            layout,
            prefixes,
            fs,
        }
    }

    pub fn layout(&self) -> &PathLayout {
        self.layout
    }

    pub fn prefixes(&self) -> &[PathBuf] {
        &self.prefixes
    }

    /// Resolve any known module.
    pub fn spec_for(&self, module: KnownModule) -> Result<DependencySpec, ConfigError> {
        match module {
            KnownModule::SonLib => self.sonlib(),
            KnownModule::CuTest => self.cutest(),
            KnownModule::Cactus => self.cactus(),
            KnownModule::CPecan => self.cpecan(),
            KnownModule::KyotoDatabase => self.kyoto_database(),
            KnownModule::KyotoTycoon => self.kyoto_tycoon(),
            KnownModule::TokyoCabinet => self.tokyo_cabinet(),
        }
    }

    /// Resolve `module` and merge it into `env`.
    pub fn add_to(
        &self,
        env: &mut BuildEnvironment,
        module: KnownModule,
    ) -> Result<(), ConfigError> {
        let spec = self.spec_for(module)?;
        env.merge(&spec);
        Ok(())
    }

    pub fn sonlib(&self) -> Result<DependencySpec, ConfigError> {
        self.in_tree(KnownModule::SonLib)?.build()
    }

    pub fn cutest(&self) -> Result<DependencySpec, ConfigError> {
        self.in_tree(KnownModule::CuTest)?.build()
    }

    pub fn cactus(&self) -> Result<DependencySpec, ConfigError> {
        self.in_tree(KnownModule::Cactus)?
            .transitive_lib_names([SONLIB_LIB_NAME])
            .build()
    }

    pub fn cpecan(&self) -> Result<DependencySpec, ConfigError> {
        self.in_tree(KnownModule::CPecan)?
            .transitive_lib_names([SONLIB_LIB_NAME])
            .build()
    }

    /// Tokyo Cabinet, Kyoto Tycoon and Kyoto Cabinet, found together.
    pub fn kyoto_database(&self) -> Result<DependencySpec, ConfigError> {
        self.external(KnownModule::KyotoDatabase, "tcbdb.h")?
            .transitive_lib_names(KV_STORE_SYSTEM_LIBS.iter().copied())
            .transitive_lib_names(["stdc++"])
            .record_rpath()
            .build()
    }

    pub fn kyoto_tycoon(&self) -> Result<DependencySpec, ConfigError> {
        self.external(KnownModule::KyotoTycoon, "ktcommon.h")?
            .transitive_lib_names(KV_STORE_SYSTEM_LIBS.iter().copied())
            .transitive_lib_names(["stdc++"])
            .record_rpath()
            .build()
    }

    pub fn tokyo_cabinet(&self) -> Result<DependencySpec, ConfigError> {
        self.external(KnownModule::TokyoCabinet, "tcbdb.h")?
            .transitive_lib_names(KV_STORE_SYSTEM_LIBS.iter().copied())
            .record_rpath()
            .build()
    }

    /// Headers and archives from the module's build tree.
    fn in_tree(&self, known: KnownModule) -> Result<DependencySpecBuilder, ConfigError> {
        let module = known.module()?;

        Ok(
            DependencySpec::builder(self.layout.module_build_dir(&module, "lib"))
                .include_dir(self.layout.module_build_dir(&module, "include"))
                .lib_names(known.lib_names().iter().copied()),
        )
    }

    /// Headers and archives from the first prefix holding `marker_header`.
    fn external(
        &self,
        known: KnownModule,
        marker_header: &str,
    ) -> Result<DependencySpecBuilder, ConfigError> {
        let lib = ExternalLibrary::probe(self.fs, marker_header, &self.prefixes)?;

        Ok(DependencySpec::builder(lib.lib_dir())
            .include_dir(lib.include_dir())
            .lib_names(known.lib_names().iter().copied())
            .define(Define::key_value(KV_STORE_DEFINE.0, KV_STORE_DEFINE.1)))
    }
}
