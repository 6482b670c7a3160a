//! Solution composition.
//!
//! For every target of the solution's axis set, fold the solution rules to
//! find the solution path and the projects to include, then pick each
//! project's configuration for that exact target.

use std::collections::HashSet;

use crate::builder::errors::{PlanError, PlanErrors};
use crate::builder::expand::expand;
use crate::builder::path::{keys, resolve, Bindings, PathTemplate};
use crate::builder::rules::{Field, Scope};
use crate::core::solution::{SolutionConfiguration, SolutionEntry};
use crate::core::{Project, Solution, SolutionSpec, Target};

/// Compose `spec` over the already built `projects`.
///
/// Every solution target must be covered by every project it references;
/// gaps are reported as [`PlanError::MissingConfiguration`]. All failing
/// targets are collected before returning.
pub fn compose<'a>(spec: &SolutionSpec, projects: &'a [Project]) -> Result<Solution<'a>, PlanErrors> {
    let owner = spec.owner();
    let targets = expand(&spec.axes)?;
    spec.rules.validate(Scope::Solution, &spec.axes, &owner)?;

    let mut base = Bindings::new();
    base.bind_path(keys::SOLUTION_ROOT, &spec.root)
        .bind(keys::SOLUTION_NAME, spec.name.clone());

    let mut errors = PlanErrors::new();
    let mut configurations = Vec::with_capacity(targets.len());
    let mut referenced: Vec<&'a Project> = Vec::new();

    for target in &targets {
        match compose_target(spec, &owner, target, projects, &base) {
            Ok(configuration) => {
                for entry in &configuration.entries {
                    if !referenced.iter().any(|p| std::ptr::eq(*p, entry.project)) {
                        referenced.push(entry.project);
                    }
                }
                configurations.push(configuration);
            }
            Err(e) => errors.extend(e),
        }
    }

    tracing::debug!(
        "{}: composed {} targets over {} projects",
        owner,
        configurations.len(),
        referenced.len()
    );

    errors.into_result(Solution {
        name: spec.name.clone(),
        targets,
        projects: referenced,
        configurations,
    })
}

fn compose_target<'a>(
    spec: &SolutionSpec,
    owner: &str,
    target: &Target,
    projects: &'a [Project],
    base: &Bindings,
) -> Result<SolutionConfiguration<'a>, PlanErrors> {
    let draft = spec.rules.fold(target, owner)?;

    let mut bindings = base.clone();
    bindings.bind_target(target);

    let template = draft
        .scalar(Field::SolutionPath)
        .ok_or_else(|| PlanError::UnhandledTarget {
            owner: owner.to_string(),
            target: target.to_string(),
            field: Field::SolutionPath.to_string(),
        })?;
    let solution_path = resolve(&PathTemplate::new(template), &bindings)?;

    let mut errors = PlanErrors::new();
    let mut entries = Vec::new();
    let mut seen = HashSet::new();

    for name in &draft.projects {
        if !seen.insert(name.as_str()) {
            continue;
        }
        let Some(project) = projects.iter().find(|p| p.name() == name) else {
            errors.push(PlanError::config(format!(
                "{} references unknown project `{}`",
                owner, name
            )));
            continue;
        };
        match project.configuration(target) {
            Some(configuration) => entries.push(SolutionEntry {
                project,
                configuration,
            }),
            None => errors.push(PlanError::MissingConfiguration {
                project: project.name().to_string(),
                target: target.to_string(),
            }),
        }
    }

    if entries.is_empty() && errors.is_empty() {
        tracing::warn!("{}: no projects selected for target `{}`", owner, target);
    }

    errors.into_result(SolutionConfiguration {
        target: target.clone(),
        solution_path,
        entries,
    })
}
