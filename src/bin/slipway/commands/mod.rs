//! Command implementations

pub mod completions;
pub mod generate;
pub mod init;
pub mod show;
pub mod targets;

use std::path::{Path, PathBuf};

use anyhow::Result;
use slipway::core::Manifest;
use slipway::util::diagnostic::suggestions;
use slipway::util::GlobalContext;

/// `explicit`, or the nearest `Slipway.toml` above the working directory.
pub fn manifest_path(ctx: &GlobalContext, explicit: Option<&Path>) -> Result<PathBuf> {
    ctx.manifest_path(explicit)
        .map_err(|e| anyhow::anyhow!("{}\n\n{}", e, suggestions::NO_MANIFEST))
}

pub fn load_manifest(ctx: &GlobalContext, explicit: Option<&Path>) -> Result<Manifest> {
    Manifest::load(&manifest_path(ctx, explicit)?)
}
