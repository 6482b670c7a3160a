//! `slipway show` command

use anyhow::{Context, Result};

use crate::cli::ShowArgs;
use crate::commands::load_manifest;
use slipway::ops::slipway_inspect::{show_configuration, ConfigurationReport};
use slipway::util::GlobalContext;

pub fn execute(args: ShowArgs, ctx: &GlobalContext) -> Result<()> {
    let manifest = load_manifest(ctx, args.manifest.as_deref())?;
    let configuration = show_configuration(&manifest, &args.project, &args.target)?;

    if args.json {
        let json = serde_json::to_string_pretty(&configuration)
            .context("failed to serialize configuration")?;
        println!("{}", json);
    } else {
        print!("{}", ConfigurationReport(&configuration));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    fn parse_show_args(args: &[&str]) -> ShowArgs {
        #[derive(Parser)]
        struct TestCli {
            #[command(flatten)]
            show: ShowArgs,
        }
        TestCli::parse_from(args).show
    }

    #[test]
    fn test_show_args_positional() {
        let args = parse_show_args(&["test", "BirdGame", "win64_vs2017_debug"]);
        assert_eq!(args.project, "BirdGame");
        assert_eq!(args.target, "win64_vs2017_debug");
        assert!(!args.json);
        assert!(args.manifest.is_none());
    }

    #[test]
    fn test_show_args_filter_and_json() {
        let args = parse_show_args(&[
            "test",
            "BirdGame",
            "devenv=vs2022,optimization=release",
            "--json",
            "--manifest",
            "bird/Slipway.toml",
        ]);
        assert_eq!(args.target, "devenv=vs2022,optimization=release");
        assert!(args.json);
        assert_eq!(args.manifest, Some(PathBuf::from("bird/Slipway.toml")));
    }
}
