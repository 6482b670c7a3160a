//! Implementation of `slipway targets` and `slipway show`.

use std::fmt;

use anyhow::{bail, Result};

use crate::builder::rules::Scope;
use crate::builder::{build, expand, PlanErrors};
use crate::core::{Configuration, Manifest, ProjectSpec, Target};
use crate::util::diagnostic::suggestions;

/// Expanded targets of `project`, or of the manifest's top-level axes when no
/// project is named.
pub fn list_targets(manifest: &Manifest, project: Option<&str>) -> Result<Vec<Target>> {
    let axes = match project {
        Some(name) => &find_project(manifest, name)?.axes,
        None => &manifest.axes,
    };
    expand(axes).map_err(|e| PlanErrors::from(e).into())
}

/// Build the configuration of `project` for the single target matching
/// `query`.
///
/// `query` is either a derived name (`win64_vs2017_debug`) or an
/// `axis=value,...` filter; it must select exactly one target.
pub fn show_configuration(manifest: &Manifest, project: &str, query: &str) -> Result<Configuration> {
    let spec = find_project(manifest, project)?;
    let targets = expand(&spec.axes).map_err(PlanErrors::from)?;
    spec.rules
        .validate(Scope::Project, &spec.axes, &spec.owner())
        .map_err(PlanErrors::from)?;

    let matching: Vec<&Target> = targets.iter().filter(|t| t.matches_query(query)).collect();
    let target = match matching.as_slice() {
        [single] => *single,
        [] => bail!(
            "no target of project `{}` matches `{}`\n\n{}",
            project,
            query,
            suggestions::TARGET_NOT_FOUND
        ),
        many => bail!(
            "`{}` matches {} targets of project `{}`: {}",
            query,
            many.len(),
            project,
            many.iter().map(|t| t.name()).collect::<Vec<_>>().join(", ")
        ),
    };

    Ok(build(spec, target, &spec.rules).map_err(PlanErrors::from)?)
}

fn find_project<'a>(manifest: &'a Manifest, name: &str) -> Result<&'a ProjectSpec> {
    match manifest.project(name) {
        Some(spec) => Ok(spec),
        None => bail!(
            "project `{}` is not declared in {}\n\n{}",
            name,
            manifest.root.join(crate::core::MANIFEST_NAME).display(),
            suggestions::PROJECT_NOT_FOUND
        ),
    }
}

/// Human-readable rendering of a configuration for `slipway show`.
pub struct ConfigurationReport<'a>(pub &'a Configuration);

impl fmt::Display for ConfigurationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let conf = self.0;
        writeln!(f, "{} [{}]", conf.project_name(), conf.name())?;
        writeln!(f, "  project path:      {}", conf.project_path().display())?;
        writeln!(f, "  target path:       {}", conf.target_path().display())?;
        writeln!(f, "  intermediate path: {}", conf.intermediate_path().display())?;
        if let (Some(header), Some(source)) = (conf.precomp_header(), conf.precomp_source()) {
            writeln!(f, "  precompiled:       {} / {}", header, source)?;
        }

        if !conf.options().is_empty() {
            writeln!(f, "\nOptions:")?;
            for (key, value) in conf.options() {
                writeln!(f, "  {} = {}", key, value)?;
            }
        }

        if !conf.steps().is_empty() {
            writeln!(f, "\nSteps:")?;
            for step in conf.steps() {
                writeln!(f, "  {:<10} {}", step.label(), step)?;
            }
        }
        Ok(())
    }
}
