//! `cgtbuild path` command

use anyhow::Result;

use crate::cli::PathArgs;
use cgtbuild::builder::KnownModule;
use cgtbuild::core::OutputCategory;
use cgtbuild::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: PathArgs) -> Result<()> {
    let ws = ctx.workspace()?;
    let category: OutputCategory = args.category.parse()?;

    let path = match args.module {
        Some(ref name) => {
            let known: KnownModule = name.parse()?;
            let module = known.module()?;
            let subdir = args
                .subdir
                .clone()
                .unwrap_or_else(|| category.dir_name().to_string());
            ws.layout().build_path(&module, &subdir, &args.file)?
        }
        None => ws.layout().output_path(category, &args.file)?,
    };

    println!("{}", path.display());

    Ok(())
}
