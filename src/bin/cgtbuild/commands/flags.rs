//! `cgtbuild flags` command

use anyhow::Result;

use crate::cli::FlagsArgs;
use cgtbuild::builder::{BuildEnvironment, KnownModule, ModuleRegistry, RealFileSystem};
use cgtbuild::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: FlagsArgs) -> Result<()> {
    let ws = ctx.workspace()?;
    let fs = RealFileSystem;
    let registry = ModuleRegistry::new(ws.layout(), ws.external_prefixes(), &fs);

    let mut env = BuildEnvironment::new();
    for name in &args.modules {
        let module: KnownModule = name.parse()?;
        registry.add_to(&mut env, module)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&env)?);
        return Ok(());
    }

    if !args.link {
        println!("# Compile flags:");
        for flag in env.compile_flags() {
            println!("  {}", flag);
        }
    }

    if !args.compile && !args.link {
        println!();
    }

    if !args.compile {
        println!("# Link flags:");
        for flag in env.link_flags() {
            println!("  {}", flag);
        }
    }

    Ok(())
}
