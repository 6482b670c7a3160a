//! Implementation of `slipway generate`.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::builder::{build_project, compose, EmitReport, EmitterRegistry, PlanErrors};
use crate::core::{Manifest, Project, SolutionDescriptor};
use crate::util::fs::absolutize;

/// Options for the generate command.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Manifest to load.
    pub manifest_path: PathBuf,

    /// Output directory; relative paths are taken from the manifest root.
    /// Defaults to the manifest root.
    pub out_dir: Option<PathBuf>,

    /// Emitter name (defaults to `json`).
    pub emitter: Option<String>,

    /// Stop after planning; nothing is written.
    pub plan_only: bool,
}

/// Outcome of a generate run.
#[derive(Debug, Clone)]
pub struct GenerateResult {
    pub descriptors: Vec<SolutionDescriptor>,
    /// One report per emitted solution; empty for plan-only runs.
    pub reports: Vec<EmitReport>,
}

/// Build every project and compose every solution of `manifest`.
///
/// Projects that fail are reported and the solutions referencing them are
/// skipped; everything else is still planned so all failures surface in one
/// run.
pub fn plan(manifest: &Manifest) -> Result<Vec<SolutionDescriptor>, PlanErrors> {
    let mut errors = PlanErrors::new();
    let mut projects: Vec<Project> = Vec::with_capacity(manifest.projects.len());
    let mut failed = BTreeSet::new();

    for spec in &manifest.projects {
        match build_project(spec) {
            Ok(project) => projects.push(project),
            Err(e) => {
                failed.insert(spec.name.as_str());
                errors.extend(e);
            }
        }
    }

    let mut descriptors = Vec::with_capacity(manifest.solutions.len());
    for spec in &manifest.solutions {
        let blocked: Vec<_> = spec
            .referenced_projects()
            .into_iter()
            .filter(|name| failed.contains(name))
            .collect();
        if !blocked.is_empty() {
            tracing::warn!(
                "skipping {}: depends on failed project(s) {}",
                spec.owner(),
                blocked.join(", ")
            );
            continue;
        }

        match compose(spec, &projects) {
            Ok(solution) => descriptors.push(solution.to_descriptor()),
            Err(e) => errors.extend(e),
        }
    }

    if manifest.solutions.is_empty() {
        tracing::warn!("manifest declares no solutions; nothing to emit");
    }

    errors.into_result(descriptors)
}

/// Load, plan and (unless `plan_only`) emit.
pub fn generate(opts: &GenerateOptions) -> Result<GenerateResult> {
    let manifest = Manifest::load(&opts.manifest_path)?;
    let descriptors = plan(&manifest)?;

    if opts.plan_only {
        return Ok(GenerateResult {
            descriptors,
            reports: Vec::new(),
        });
    }

    let registry = EmitterRegistry::new();
    let name = opts.emitter.as_deref().unwrap_or("json");
    let emitter = registry.get(name).ok_or_else(|| {
        anyhow!(
            "unknown emitter `{}` (available: {})",
            name,
            registry.names().collect::<Vec<_>>().join(", ")
        )
    })?;

    let out_dir = match opts.out_dir {
        Some(ref dir) => absolutize(&manifest.root, dir),
        None => manifest.root.clone(),
    };

    let reports = descriptors
        .iter()
        .map(|d| emitter.emit(d, &out_dir))
        .collect::<Result<Vec<_>>>()?;

    Ok(GenerateResult {
        descriptors,
        reports,
    })
}
