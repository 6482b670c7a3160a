//! `slipway targets` command

use anyhow::Result;

use crate::cli::TargetsArgs;
use crate::commands::load_manifest;
use slipway::core::Target;
use slipway::ops::slipway_inspect::list_targets;
use slipway::util::GlobalContext;

/// One line per target: the derived name, then `axis=value` pairs.
pub fn format_target(target: &Target) -> String {
    let pairs = target
        .values()
        .iter()
        .map(|v| format!("{}={}", v.axis, v.value))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{:<24} {}", target.name(), pairs)
}

pub fn execute(args: TargetsArgs, ctx: &GlobalContext) -> Result<()> {
    let manifest = load_manifest(ctx, args.manifest.as_deref())?;
    let targets = list_targets(&manifest, args.project.as_deref())?;

    for target in &targets {
        println!("{}", format_target(target));
    }

    if ctx.is_verbose() {
        eprintln!("    {} target(s)", targets.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse_targets_args(args: &[&str]) -> TargetsArgs {
        #[derive(Parser)]
        struct TestCli {
            #[command(flatten)]
            targets: TargetsArgs,
        }
        TestCli::parse_from(args).targets
    }

    #[test]
    fn test_targets_args() {
        let args = parse_targets_args(&["test"]);
        assert!(args.project.is_none());

        let args = parse_targets_args(&["test", "-p", "BirdGame"]);
        assert_eq!(args.project.as_deref(), Some("BirdGame"));
    }

    #[test]
    fn test_format_target() {
        let target = Target::from_pairs([("platform", "win64"), ("devenv", "vs2017")]);
        assert_eq!(
            format_target(&target),
            "win64_vs2017             platform=win64, devenv=vs2017"
        );
    }
}
