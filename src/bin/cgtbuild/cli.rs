//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// cgtbuild - module layout and dependency flags for multi-module C projects
#[derive(Parser)]
#[command(name = "cgtbuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Workspace root (defaults to the nearest directory containing CgtBuild.toml)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// External library prefix to probe, in order (replaces configured prefixes)
    #[arg(long = "prefix", global = true)]
    pub prefixes: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show compile/link flags for a list of modules
    Flags(FlagsArgs),

    /// Find the installation prefix of an external library
    Probe(ProbeArgs),

    /// Show where an artifact is placed in the build or output tree
    Path(PathArgs),

    /// List known modules
    Modules,

    /// Emit the build plan as JSON
    Plan(PlanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct FlagsArgs {
    /// Modules to merge, in link order
    #[arg(required = true)]
    pub modules: Vec<String>,

    /// Show compile flags only
    #[arg(long, conflicts_with = "link")]
    pub compile: bool,

    /// Show link flags only
    #[arg(long)]
    pub link: bool,

    /// Print the merged environment as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ProbeArgs {
    /// Marker header, relative to <prefix>/include
    pub header: String,
}

#[derive(Args)]
pub struct PathArgs {
    /// Output category (bin, testbin, lib, include)
    pub category: String,

    /// Artifact file; only its file name is used
    pub file: PathBuf,

    /// Show the location in this module's build tree instead
    #[arg(long)]
    pub module: Option<String>,

    /// Build tree subdirectory used with --module (defaults to the category name)
    #[arg(long, requires = "module")]
    pub subdir: Option<String>,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Specific targets to plan (defaults to all)
    #[arg(long)]
    pub target: Vec<String>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
