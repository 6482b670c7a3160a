//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Slipway - A declarative build-matrix expander and IDE project generator
#[derive(Parser)]
#[command(name = "slipway")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a starter Slipway.toml
    Init(InitArgs),

    /// Plan every project and solution and emit the descriptors
    Generate(GenerateArgs),

    /// List the expanded targets of the manifest or of one project
    Targets(TargetsArgs),

    /// Show the resolved configuration of a project for one target
    Show(ShowArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Directory to initialize (defaults to current directory)
    pub path: Option<PathBuf>,

    /// Project and solution name (defaults to directory name)
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Path to Slipway.toml (searched upward from the current directory by default)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Directory descriptors are written to
    #[arg(long, short = 'o')]
    pub out_dir: Option<PathBuf>,

    /// Emitter to use
    #[arg(long)]
    pub emitter: Option<String>,

    /// Print the planned descriptors as JSON instead of writing them
    #[arg(long)]
    pub plan: bool,
}

#[derive(Args)]
pub struct TargetsArgs {
    /// Only list the targets of this project
    #[arg(long, short)]
    pub project: Option<String>,

    /// Path to Slipway.toml
    #[arg(long)]
    pub manifest: Option<PathBuf>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Project name
    pub project: String,

    /// Target name (`win64_vs2017_debug`) or `axis=value,...` filter
    pub target: String,

    /// Path to Slipway.toml
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Print the configuration as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
