//! cgtbuild CLI - module layout and dependency flags for multi-module C projects

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cgtbuild::core::ConfigError;
use cgtbuild::util::diagnostic;
use cgtbuild::util::GlobalContext;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    if let Err(e) = run(cli, color) {
        match e.downcast_ref::<ConfigError>() {
            Some(config_err) => diagnostic::emit(&config_err.to_diagnostic(), color),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, color: bool) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("cgtbuild=debug")
    } else {
        EnvFilter::new("cgtbuild=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let ctx = GlobalContext::new()?
        .with_root(cli.root)
        .with_prefixes(cli.prefixes);

    match cli.command {
        Commands::Flags(args) => commands::flags::execute(&ctx, args),
        Commands::Probe(args) => commands::probe::execute(&ctx, args),
        Commands::Path(args) => commands::path::execute(&ctx, args),
        Commands::Modules => commands::modules::execute(),
        Commands::Plan(args) => commands::plan::execute(&ctx, args, color),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
