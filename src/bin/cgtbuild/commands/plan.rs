//! `cgtbuild plan` command

use anyhow::{bail, Result};

use crate::cli::PlanArgs;
use cgtbuild::builder::{BuildPlan, ModuleRegistry, RealFileSystem};
use cgtbuild::core::MANIFEST_NAME;
use cgtbuild::util::diagnostic;
use cgtbuild::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: PlanArgs, color: bool) -> Result<()> {
    let ws = ctx.workspace()?;
    if ws.manifest_path().is_none() {
        bail!(
            "no {} found at workspace root {}",
            MANIFEST_NAME,
            ws.root().display()
        );
    }

    let fs = RealFileSystem;
    let registry = ModuleRegistry::new(ws.layout(), ws.external_prefixes(), &fs);

    let plan = if args.target.is_empty() {
        BuildPlan::new(&ws, &registry)?
    } else {
        BuildPlan::for_targets(&ws, &registry, &args.target)?
    };

    for warning in &plan.warnings {
        diagnostic::emit(warning, color);
    }

    println!("{}", serde_json::to_string_pretty(&plan)?);

    Ok(())
}
