//! `slipway init` command

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::cli::InitArgs;
use slipway::core::MANIFEST_NAME;
use slipway::ops::slipway_init::{init_project, InitOptions};
use slipway::util::GlobalContext;

/// Determines the project name from the arguments or directory.
pub fn determine_name(name: &Option<String>, path: &Path) -> String {
    name.clone().unwrap_or_else(|| {
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unnamed")
            .to_string()
    })
}

/// Validates a project name.
///
/// Names end up in generated file names and in `[project.name]`, so only
/// alphanumerics, `-` and `_` are accepted.
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("project name cannot be empty");
    }

    if name.starts_with('-') || name.starts_with('.') {
        return Err("project name cannot start with a hyphen or dot");
    }

    if !name.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
        return Err("project name contains invalid characters");
    }

    Ok(())
}

pub fn execute(args: InitArgs, ctx: &GlobalContext) -> Result<()> {
    let path = ctx.absolute(&args.path.unwrap_or_else(|| PathBuf::from(".")));
    if path.join(MANIFEST_NAME).exists() {
        bail!("`{}` already exists in `{}`", MANIFEST_NAME, path.display());
    }

    let name = determine_name(&args.name, &path);
    if let Err(reason) = validate_name(&name) {
        bail!("invalid name `{}`: {}", name, reason);
    }

    init_project(&path, &InitOptions { name: name.clone() })?;

    eprintln!("     Initialized `{}` in {}", name, path.display());

    Ok(())
}
