//! `slipway generate` command

use anyhow::{Context, Result};

use crate::cli::GenerateArgs;
use crate::commands::manifest_path;
use slipway::builder::EmitStatus;
use slipway::ops::slipway_generate::{generate, GenerateOptions};
use slipway::util::GlobalContext;

/// Build generate options from the command line, falling back to
/// `.slipway/config.toml` for anything not given.
///
/// A command-line `--out-dir` is taken relative to the working directory;
/// a configured one relative to the manifest.
pub fn generate_options(args: &GenerateArgs, ctx: &GlobalContext) -> Result<GenerateOptions> {
    let path = manifest_path(ctx, args.manifest.as_deref())?;
    let manifest_dir = path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| ctx.cwd().to_path_buf());
    let config = ctx.config(&manifest_dir);

    Ok(GenerateOptions {
        manifest_path: path,
        out_dir: args
            .out_dir
            .as_ref()
            .map(|dir| ctx.absolute(dir))
            .or(config.generate.out_dir),
        emitter: args.emitter.clone().or(config.generate.emitter),
        plan_only: args.plan,
    })
}

pub fn execute(args: GenerateArgs, ctx: &GlobalContext) -> Result<()> {
    let opts = generate_options(&args, ctx)?;
    let result = generate(&opts)?;

    if opts.plan_only {
        let json = serde_json::to_string_pretty(&result.descriptors)
            .context("failed to serialize plan")?;
        println!("{}", json);
        return Ok(());
    }

    for report in &result.reports {
        let status = match report.status {
            EmitStatus::Written => "   Generated",
            EmitStatus::UpToDate => "  Up to date",
        };
        eprintln!("{} {}", status, report.path.display());
    }

    eprintln!(
        "    Finished {} solution(s), {} configuration(s)",
        result.descriptors.len(),
        result
            .descriptors
            .iter()
            .map(|d| d.associations().len())
            .sum::<usize>()
    );

    Ok(())
}
