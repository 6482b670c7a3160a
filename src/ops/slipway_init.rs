//! Implementation of `slipway init`.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::core::manifest::{generate_manifest, MANIFEST_NAME};

/// Options for initializing a manifest.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Name used for the starter project and solution.
    pub name: String,
}

/// Write a starter `Slipway.toml` into `path`, creating the directory if
/// needed.
pub fn init_project(path: &Path, opts: &InitOptions) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }

    let manifest_path = path.join(MANIFEST_NAME);
    if manifest_path.exists() {
        bail!("`{}` already exists in `{}`", MANIFEST_NAME, path.display());
    }

    fs::write(&manifest_path, generate_manifest(&opts.name))
        .with_context(|| format!("failed to write {}", MANIFEST_NAME))?;

    let gitignore = path.join(".gitignore");
    if !gitignore.exists() {
        fs::write(&gitignore, "# Slipway output\ngenerated/\n*.slipway.json\n")
            .context("failed to write .gitignore")?;
    }

    tracing::debug!("initialized `{}` in {}", opts.name, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Manifest;
    use tempfile::TempDir;

    #[test]
    fn test_init_new_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("bird");

        let opts = InitOptions {
            name: "BirdGame".to_string(),
        };
        init_project(&dir, &opts).unwrap();

        let manifest = Manifest::load(&dir.join(MANIFEST_NAME)).unwrap();
        assert!(manifest.project("BirdGame").is_some());
        assert!(manifest.solution("BirdGame").is_some());
        assert!(dir.join(".gitignore").exists());
    }

    #[test]
    fn test_init_refuses_existing_manifest() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(MANIFEST_NAME), "").unwrap();

        let opts = InitOptions {
            name: "BirdGame".to_string(),
        };
        let err = init_project(tmp.path(), &opts).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_init_keeps_existing_gitignore() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".gitignore"), "target/\n").unwrap();

        let opts = InitOptions {
            name: "App".to_string(),
        };
        init_project(tmp.path(), &opts).unwrap();

        let content = fs::read_to_string(tmp.path().join(".gitignore")).unwrap();
        assert_eq!(content, "target/\n");
    }
}
