//! Global context for Slipway operations.
//!
//! Provides centralized access to the working directory, manifest discovery
//! and layered configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::{find_manifest, ManifestError};
use crate::util::config::{global_config_path, load_config, project_config_path, Config};

/// Global context for Slipway operations.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    cwd: PathBuf,
    verbose: bool,
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext rooted at the current directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            verbose: false,
            color: true,
        }
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// Resolve `path` against the working directory.
    pub fn absolute(&self, path: &Path) -> PathBuf {
        crate::util::fs::absolutize(&self.cwd, path)
    }

    /// Use `explicit` if given, otherwise search upward from the working
    /// directory for `Slipway.toml`.
    pub fn manifest_path(&self, explicit: Option<&Path>) -> Result<PathBuf, ManifestError> {
        match explicit {
            Some(path) => Ok(self.absolute(path)),
            None => find_manifest(&self.cwd),
        }
    }

    /// Configuration for a manifest in `manifest_dir`: the project file
    /// layered over the global one.
    pub fn config(&self, manifest_dir: &Path) -> Config {
        let project = project_config_path(manifest_dir);
        match global_config_path() {
            Some(global) => load_config(&global, &project),
            None => Config::load_or_default(&project),
        }
    }

    /// Configuration for the manifest found from the working directory,
    /// or for the working directory itself when there is none.
    pub fn discovered_config(&self) -> Config {
        let dir = find_manifest(&self.cwd)
            .ok()
            .and_then(|path| path.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| self.cwd.clone());
        self.config(&dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_manifest_path_explicit_is_absolutized() {
        let ctx = GlobalContext::with_cwd(PathBuf::from("/work/bird"));
        assert_eq!(
            ctx.manifest_path(Some(Path::new("sub/Slipway.toml"))).unwrap(),
            PathBuf::from("/work/bird/sub/Slipway.toml")
        );
    }

    #[test]
    fn test_manifest_path_searches_upward() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("Slipway.toml"), "").unwrap();
        let nested = tmp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let ctx = GlobalContext::with_cwd(nested);
        assert_eq!(
            ctx.manifest_path(None).unwrap(),
            tmp.path().join("Slipway.toml")
        );
    }

    #[test]
    fn test_project_config_is_read() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(".slipway");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), "[generate]\nout_dir = \"ide\"\n").unwrap();

        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf());
        let config = ctx.config(tmp.path());
        assert_eq!(config.generate.out_dir, Some(PathBuf::from("ide")));
    }

    #[test]
    fn test_discovered_config_uses_manifest_dir() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("Slipway.toml"), "").unwrap();
        let dir = tmp.path().join(".slipway");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), "[term]\ncolor = false\n").unwrap();
        let nested = tmp.path().join("src").join("game");
        std::fs::create_dir_all(&nested).unwrap();

        let ctx = GlobalContext::with_cwd(nested);
        assert!(!ctx.discovered_config().color(false));
    }
}
