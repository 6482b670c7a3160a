//! Slipway CLI - A declarative build-matrix expander and IDE project generator

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use slipway::util::diagnostic::render_error;
use slipway::util::GlobalContext;

fn main() {
    let cli = Cli::parse();

    let mut color = !cli.no_color && std::io::stderr().is_terminal();
    let ctx = GlobalContext::new().map(|mut ctx| {
        color = color && ctx.discovered_config().color(cli.no_color);
        ctx.set_verbose(cli.verbose);
        ctx.set_color(color);
        ctx
    });

    if let Err(e) = ctx.and_then(|ctx| run(cli, &ctx)) {
        eprint!("{}", render_error(&e, color));
        std::process::exit(1);
    }
}

fn run(cli: Cli, ctx: &GlobalContext) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("slipway=debug")
    } else {
        EnvFilter::new("slipway=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(ctx.color())
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match cli.command {
        Commands::Init(args) => commands::init::execute(args, ctx),
        Commands::Generate(args) => commands::generate::execute(args, ctx),
        Commands::Targets(args) => commands::targets::execute(args, ctx),
        Commands::Show(args) => commands::show::execute(args, ctx),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
