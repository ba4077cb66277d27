//! `cgtbuild probe` command

use anyhow::Result;

use crate::cli::ProbeArgs;
use cgtbuild::builder::{ExternalLibrary, RealFileSystem};
use cgtbuild::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: ProbeArgs) -> Result<()> {
    let root = ctx.workspace_root();
    let prefixes = ctx.config(&root).external_prefixes();

    let lib = ExternalLibrary::probe(&RealFileSystem, &args.header, &prefixes)?;

    println!("prefix:  {}", lib.prefix().display());
    println!("include: {}", lib.include_dir().display());
    println!("lib:     {}", lib.lib_dir().display());

    Ok(())
}
