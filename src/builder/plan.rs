//! Build plan generation.
//!
//! A BuildPlan describes, for every target of the manifest, which sources
//! it compiles, where its artifact is written and installed, which headers
//! it publishes, and the compile/link environment it needs. The plan is
//! handed to an external executor; nothing here runs a compiler.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use rayon::prelude::*;
use serde::Serialize;

use crate::builder::environment::BuildEnvironment;
use crate::builder::registry::{KnownModule, ModuleRegistry};
use crate::core::errors::ConfigError;
use crate::core::layout::OutputCategory;
use crate::core::manifest::MANIFEST_NAME;
use crate::core::module::Module;
use crate::core::target::{TargetDecl, TargetKind};
use crate::core::workspace::Workspace;
use crate::util::diagnostic::Diagnostic;
use crate::util::fs::{glob_headers, glob_sources};

/// A complete build plan.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    /// Planned targets, in manifest order
    pub targets: Vec<TargetPlan>,

    /// Target names, libraries before the targets that use them
    pub build_order: Vec<String>,

    /// Problems that do not stop planning (e.g. a source glob matching nothing)
    #[serde(skip)]
    pub warnings: Vec<Diagnostic>,
}

/// Everything the executor needs to build one target.
#[derive(Debug, Clone, Serialize)]
pub struct TargetPlan {
    pub name: String,
    pub kind: TargetKind,
    pub module: String,

    /// Source files to compile
    pub sources: Vec<PathBuf>,

    /// Artifact in the module build tree
    pub artifact: PathBuf,

    /// Artifact copy into the output tree
    pub install: InstallStep,

    /// Header copies into the module build tree and the output tree
    pub headers: Vec<InstallStep>,

    /// Compile and link inputs for this target only
    pub env: BuildEnvironment,
}

/// A file copy from a source location to its installed location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallStep {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl BuildPlan {
    /// Plan every target of the workspace manifest.
    pub fn new(ws: &Workspace, registry: &ModuleRegistry<'_>) -> Result<Self> {
        let decls: Vec<&TargetDecl> = ws.manifest().targets.iter().collect();
        Self::from_decls(&decls, registry)
    }

    /// Plan only the named targets.
    pub fn for_targets(
        ws: &Workspace,
        registry: &ModuleRegistry<'_>,
        names: &[String],
    ) -> Result<Self> {
        let manifest = ws
            .manifest_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| format!("{} (missing)", MANIFEST_NAME));

        let decls = names
            .iter()
            .map(|name| {
                ws.manifest().target(name).ok_or_else(|| {
                    anyhow!(
                        "target `{}` not found in {}\n\
                         help: targets are declared as [[target]] entries in the manifest",
                        name,
                        manifest
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_decls(&decls, registry)
    }

    fn from_decls(decls: &[&TargetDecl], registry: &ModuleRegistry<'_>) -> Result<Self> {
        let build_order = build_order(decls)?;

        // Each target resolves into its own environment.
        let planned = decls
            .par_iter()
            .map(|decl| {
                plan_target(decl, registry)
                    .with_context(|| format!("failed to plan target `{}`", decl.name))
            })
            .collect::<Result<Vec<_>>>()?;

        let (targets, warnings): (Vec<_>, Vec<_>) = planned.into_iter().unzip();
        let warnings: Vec<Diagnostic> = warnings.into_iter().flatten().collect();

        tracing::info!(
            "planned {} targets ({} warnings)",
            targets.len(),
            warnings.len()
        );

        Ok(BuildPlan {
            targets,
            build_order,
            warnings,
        })
    }

    /// Find a planned target by name.
    pub fn target(&self, name: &str) -> Option<&TargetPlan> {
        self.targets.iter().find(|t| t.name == name)
    }
}

fn plan_target(
    decl: &TargetDecl,
    registry: &ModuleRegistry<'_>,
) -> Result<(TargetPlan, Option<Diagnostic>)> {
    let layout = registry.layout();
    let module = target_module(decl)?;
    let src_dir = layout.module_source_dir(&module);

    let mut sources = Vec::new();
    for pattern in &decl.sources {
        for path in glob_sources(&src_dir, pattern, &decl.exclude)? {
            if !sources.contains(&path) {
                sources.push(path);
            }
        }
    }
    let warning = (sources.is_empty() && !decl.sources.is_empty()).then(|| {
        decl.sources.iter().fold(
            Diagnostic::warning(format!("target `{}` matched no sources", decl.name))
                .with_location(&src_dir),
            |diag, pattern| diag.with_context(format!("pattern: {}", pattern)),
        )
    });

    let artifact = layout.build_path(
        &module,
        decl.kind.build_subdir(),
        decl.kind.output_filename(decl.name.as_str()),
    )?;
    let install = InstallStep {
        destination: layout.output_path(decl.kind.install_category(), &artifact)?,
        source: artifact.clone(),
    };

    let mut headers = Vec::new();
    for header in glob_headers(&src_dir, &decl.headers)? {
        headers.push(InstallStep {
            destination: layout.build_path(&module, "include", &header)?,
            source: header.clone(),
        });
        headers.push(InstallStep {
            destination: layout.output_path(OutputCategory::Include, &header)?,
            source: header,
        });
    }

    let mut env = BuildEnvironment::new();
    for dep in &decl.deps {
        let known: KnownModule = dep.as_str().parse()?;
        registry.add_to(&mut env, known)?;
    }

    let plan = TargetPlan {
        name: decl.name.to_string(),
        kind: decl.kind,
        module: module.name().to_string(),
        sources,
        artifact,
        install,
        headers,
        env,
    };

    Ok((plan, warning))
}

fn target_module(decl: &TargetDecl) -> Result<Module, ConfigError> {
    let known: KnownModule = decl.module.as_str().parse()?;
    if !known.is_in_tree() {
        return Err(ConfigError::invalid(
            "target module",
            decl.module.to_string(),
            "targets must live in a module built in the workspace",
        ));
    }
    known.module()
}

/// Order targets so that a target comes after every target it names in `deps`.
///
/// Targets with no ordering constraint between them keep manifest order.
fn build_order(decls: &[&TargetDecl]) -> Result<Vec<String>, ConfigError> {
    let mut graph: DiGraph<usize, ()> = DiGraph::new();
    let nodes: Vec<NodeIndex> = (0..decls.len()).map(|i| graph.add_node(i)).collect();
    let by_name: HashMap<&str, NodeIndex> = decls
        .iter()
        .zip(&nodes)
        .map(|(decl, &node)| (decl.name.as_str(), node))
        .collect();

    // Edge: dependency -> dependent
    for (decl, &node) in decls.iter().zip(&nodes) {
        for dep in &decl.deps {
            if let Some(&dep_node) = by_name.get(dep.as_str()) {
                if dep_node != node {
                    graph.update_edge(dep_node, node, ());
                }
            }
        }
    }

    let mut in_degree: Vec<usize> = nodes
        .iter()
        .map(|&n| graph.neighbors_directed(n, Direction::Incoming).count())
        .collect();
    let mut ready: BTreeSet<usize> = (0..decls.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(decls.len());

    while let Some(i) = ready.pop_first() {
        order.push(decls[i].name.to_string());
        for next in graph.neighbors_directed(nodes[i], Direction::Outgoing) {
            let j = graph[next];
            in_degree[j] -= 1;
            if in_degree[j] == 0 {
                ready.insert(j);
            }
        }
    }

    if order.len() < decls.len() {
        let cycle = tarjan_scc(&graph)
            .into_iter()
            .find(|component| component.len() > 1)
            .unwrap_or_default();
        let mut targets: Vec<String> = cycle
            .iter()
            .map(|&n| decls[graph[n]].name.to_string())
            .collect();
        targets.sort();
        return Err(ConfigError::DependencyCycle { targets });
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::Manifest;
    use crate::test_support::{sample_manifest, write_sample_tree, MockFileSystem};
    use crate::util::config::Config;
    use crate::util::diagnostic::Severity;
    use tempfile::TempDir;

    fn decls(manifest: &Manifest) -> Vec<&TargetDecl> {
        manifest.targets.iter().collect()
    }

    #[test]
    fn test_build_order_libraries_first() {
        let manifest = Manifest::parse(
            r#"
[[target]]
name = "cactusTests"
kind = "test-program"
module = "cactus"
deps = ["cactus", "sonlib", "cutest"]

[[target]]
name = "cactus"
kind = "static-lib"
module = "cactus"
deps = ["sonlib"]

[[target]]
name = "sonlib"
kind = "static-lib"
module = "sonlib"

[[target]]
name = "cutest"
kind = "static-lib"
module = "cutest"
"#,
        )
        .unwrap();

        let order = build_order(&decls(&manifest)).unwrap();
        assert_eq!(order, vec!["sonlib", "cactus", "cutest", "cactusTests"]);
    }

    #[test]
    fn test_build_order_cycle() {
        let manifest = Manifest::parse(
            r#"
[[target]]
name = "cactus"
kind = "static-lib"
module = "cactus"
deps = ["cpecan"]

[[target]]
name = "cpecan"
kind = "static-lib"
module = "cpecan"
deps = ["cactus"]
"#,
        )
        .unwrap();

        match build_order(&decls(&manifest)).unwrap_err() {
            ConfigError::DependencyCycle { targets } => {
                assert_eq!(targets, vec!["cactus", "cpecan"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_plan_sample_workspace() {
        let tmp = TempDir::new().unwrap();
        write_sample_tree(tmp.path());
        std::fs::write(tmp.path().join(MANIFEST_NAME), sample_manifest()).unwrap();

        let ws = Workspace::new(tmp.path(), Config::default()).unwrap();
        let root = ws.root().to_path_buf();
        let fs = MockFileSystem::new();
        let registry = ModuleRegistry::new(ws.layout(), Vec::new(), &fs);

        let plan = BuildPlan::new(&ws, &registry).unwrap();
        assert_eq!(plan.build_order, vec!["sonlib", "cactus", "cactusTests"]);

        let cactus = plan.target("cactus").unwrap();
        assert_eq!(cactus.artifact, root.join("build/cactus/lib/libcactus.a"));
        assert_eq!(
            cactus.install.destination,
            root.join("output/lib/libcactus.a")
        );
        assert_eq!(
            cactus.sources,
            vec![
                root.join("cactus/impl/cactusGraph.c"),
                root.join("cactus/impl/cactusMisc.c"),
            ]
        );
        assert_eq!(cactus.env.lib_names(), ["sonlib"]);
        assert!(cactus.headers.contains(&InstallStep {
            source: root.join("cactus/inc/cactus.h"),
            destination: root.join("output/include/cactus.h"),
        }));
        assert!(cactus.headers.contains(&InstallStep {
            source: root.join("cactus/inc/cactus.h"),
            destination: root.join("build/cactus/include/cactus.h"),
        }));

        let tests = plan.target("cactusTests").unwrap();
        assert_eq!(
            tests.install.destination,
            root.join("output/testbin/cactusTests")
        );
        assert_eq!(
            tests.env.lib_names(),
            ["cactus", "sonlib", "sonlib", "cutest"]
        );
    }

    #[test]
    fn test_plan_root_with_glob_characters() {
        let tmp = TempDir::new().unwrap();
        let ws_dir = tmp.path().join("ws[1]");
        write_sample_tree(&ws_dir);
        std::fs::write(ws_dir.join(MANIFEST_NAME), sample_manifest()).unwrap();

        let ws = Workspace::new(&ws_dir, Config::default()).unwrap();
        let fs = MockFileSystem::new();
        let registry = ModuleRegistry::new(ws.layout(), Vec::new(), &fs);

        let plan = BuildPlan::new(&ws, &registry).unwrap();
        let cactus = plan.target("cactus").unwrap();
        assert_eq!(cactus.sources.len(), 2);
        assert_eq!(cactus.headers.len(), 2);
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn test_plan_warns_on_unmatched_sources() {
        let tmp = TempDir::new().unwrap();
        write_sample_tree(tmp.path());
        std::fs::write(
            tmp.path().join(MANIFEST_NAME),
            r#"
[[target]]
name = "cpecan"
kind = "static-lib"
module = "cpecan"
sources = ["impl/*.c"]
"#,
        )
        .unwrap();

        let ws = Workspace::new(tmp.path(), Config::default()).unwrap();
        let fs = MockFileSystem::new();
        let registry = ModuleRegistry::new(ws.layout(), Vec::new(), &fs);

        let plan = BuildPlan::new(&ws, &registry).unwrap();
        assert!(plan.target("cpecan").unwrap().sources.is_empty());
        assert_eq!(plan.warnings.len(), 1);

        let warning = &plan.warnings[0];
        assert_eq!(warning.severity, Severity::Warning);
        assert_eq!(warning.location, Some(ws.root().join("cPecan")));
        assert!(warning.to_string().contains("pattern: impl/*.c"));
    }

    #[test]
    fn test_plan_fails_on_missing_external_library() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(MANIFEST_NAME),
            r#"
[[target]]
name = "cactus"
kind = "static-lib"
module = "cactus"
deps = ["sonlib", "kyoto"]
"#,
        )
        .unwrap();

        let ws = Workspace::new(tmp.path(), Config::default()).unwrap();
        let fs = MockFileSystem::new();
        let registry = ModuleRegistry::new(ws.layout(), vec![PathBuf::from("/nowhere")], &fs);

        let err = BuildPlan::new(&ws, &registry).unwrap_err();
        assert!(matches!(
            err.root_cause().downcast_ref::<ConfigError>(),
            Some(ConfigError::LibraryNotFound { .. })
        ));
    }

    #[test]
    fn test_for_targets_unknown_target() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::new(tmp.path(), Config::default()).unwrap();
        let fs = MockFileSystem::new();
        let registry = ModuleRegistry::new(ws.layout(), Vec::new(), &fs);

        let err = BuildPlan::for_targets(&ws, &registry, &["nope".to_string()]).unwrap_err();
        assert!(err.to_string().contains("CgtBuild.toml (missing)"));
    }

    #[test]
    fn test_external_module_cannot_hold_targets() {
        let manifest = Manifest::parse(
            r#"
[[target]]
name = "tool"
kind = "program"
module = "kyoto"
"#,
        )
        .unwrap();

        let err = target_module(&manifest.targets[0]).unwrap_err();
        assert_eq!(err.kind(), crate::core::errors::ErrorKind::InvalidArgument);
    }
}
