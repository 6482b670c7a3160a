//! Emitters - turn solution descriptors into files on disk.
//!
//! Emitters only consume [`SolutionDescriptor`]s; they never see rules or
//! templates. The built-in [`JsonEmitter`] writes the descriptor itself,
//! which doubles as the interchange format for external IDE-file writers.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::SolutionDescriptor;
use crate::util::fs::write_if_changed;
use crate::util::hash::sha256_str;

/// Output writer for one solution.
pub trait Emitter: Send + Sync {
    /// Name used in config files and on the command line.
    fn name(&self) -> &str;

    /// Write `solution` below `out_dir`.
    fn emit(&self, solution: &SolutionDescriptor, out_dir: &Path) -> Result<EmitReport>;
}

/// What happened to an emitted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitStatus {
    Written,
    /// The file already had this content and was left untouched.
    UpToDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitReport {
    pub path: PathBuf,
    pub status: EmitStatus,
    /// SHA-256 of the emitted content.
    pub sha256: String,
}

/// Writes `<out_dir>/<solution>.slipway.json`.
#[derive(Debug, Clone, Default)]
pub struct JsonEmitter;

impl JsonEmitter {
    pub const EXTENSION: &'static str = "slipway.json";

    pub fn new() -> Self {
        JsonEmitter
    }

    pub fn file_name(solution: &str) -> String {
        format!("{}.{}", solution, Self::EXTENSION)
    }

    /// Render a descriptor exactly as [`Emitter::emit`] would write it.
    pub fn render(&self, solution: &SolutionDescriptor) -> Result<String> {
        let mut json = serde_json::to_string_pretty(solution)
            .with_context(|| format!("failed to serialize solution `{}`", solution.name))?;
        json.push('\n');
        Ok(json)
    }

    /// Read back a descriptor written by this emitter.
    pub fn load(path: &Path) -> Result<SolutionDescriptor> {
        let content = crate::util::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse solution descriptor: {}", path.display()))
    }
}

impl Emitter for JsonEmitter {
    fn name(&self) -> &str {
        "json"
    }

    fn emit(&self, solution: &SolutionDescriptor, out_dir: &Path) -> Result<EmitReport> {
        let content = self.render(solution)?;
        let path = out_dir.join(Self::file_name(&solution.name));

        let status = if write_if_changed(&path, &content)? {
            tracing::debug!("wrote {}", path.display());
            EmitStatus::Written
        } else {
            tracing::debug!("{} is up to date", path.display());
            EmitStatus::UpToDate
        };

        Ok(EmitReport {
            path,
            status,
            sha256: sha256_str(&content),
        })
    }
}

/// Registry of available emitters, keyed by name.
pub struct EmitterRegistry {
    emitters: BTreeMap<String, Box<dyn Emitter>>,
}

impl EmitterRegistry {
    /// Create a registry with all built-in emitters.
    pub fn new() -> Self {
        let mut registry = EmitterRegistry {
            emitters: BTreeMap::new(),
        };
        registry.register(Box::new(JsonEmitter::new()));
        registry
    }

    pub fn register(&mut self, emitter: Box<dyn Emitter>) {
        self.emitters.insert(emitter.name().to_string(), emitter);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Emitter> {
        self.emitters.get(name).map(|e| e.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.emitters.keys().map(String::as_str)
    }
}

impl Default for EmitterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::builder::compose::compose;
    use crate::builder::configure::build_project;
    use crate::core::Target;
    use crate::test_support::fixtures;
    use tempfile::TempDir;

    fn bird_descriptor() -> SolutionDescriptor {
        let root = Path::new("/work/bird");
        let projects = vec![build_project(&fixtures::bird_game_project(root)).unwrap()];
        compose(&fixtures::bird_game_solution(root), &projects)
            .unwrap()
            .to_descriptor()
    }

    #[test]
    fn test_json_round_trip_preserves_associations() {
        let descriptor = bird_descriptor();
        let json = JsonEmitter::new().render(&descriptor).unwrap();
        let back: SolutionDescriptor = serde_json::from_str(&json).unwrap();

        assert_eq!(back, descriptor);
        assert_eq!(back.associations(), descriptor.associations());
        assert_eq!(back.associations().len(), 4);

        let target = Target::from_pairs([
            ("platform", "win64"),
            ("devenv", "vs2022"),
            ("optimization", "debug"),
        ]);
        let conf = back.project("BirdGame").unwrap().configuration(&target).unwrap();
        assert_eq!(conf.name(), "win64_vs2022_debug");
        assert_eq!(conf.post_build_copies().count(), 1);
    }

    #[test]
    fn test_emit_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let descriptor = bird_descriptor();
        let emitter = JsonEmitter::new();

        let first = emitter.emit(&descriptor, tmp.path()).unwrap();
        assert_eq!(first.status, EmitStatus::Written);
        assert_eq!(first.path, tmp.path().join("BirdGame.slipway.json"));

        let second = emitter.emit(&descriptor, tmp.path()).unwrap();
        assert_eq!(second.status, EmitStatus::UpToDate);
        assert_eq!(first.sha256, second.sha256);

        assert_eq!(JsonEmitter::load(&first.path).unwrap(), descriptor);
    }

    #[test]
    fn test_registry_lookup() {
        let registry = EmitterRegistry::new();
        assert!(registry.get("json").is_some());
        assert!(registry.get("vcxproj").is_none());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["json"]);
    }
}
