//! Configuration building.
//!
//! Turns a project spec plus one target into an immutable [`Configuration`]:
//! fold the rule set, then resolve paths in dependency order
//! (`project_path`, `target_path`, `intermediate_path`, step paths), each
//! resolved path becoming a binding for the ones after it.

use std::path::PathBuf;

use rayon::prelude::*;

use crate::builder::errors::{PlanError, PlanErrors};
use crate::builder::expand::expand;
use crate::builder::path::{keys, resolve, Bindings, PathTemplate};
use crate::builder::rules::{Field, RuleSet, Scope, StepTemplate};
use crate::core::axis::names;
use crate::core::step::BuildStep;
use crate::core::{Configuration, Project, ProjectSpec, Target};
use crate::util::hash::stable_guid;

/// Build the configuration of `project` for `target` using `rules`.
///
/// Pure: the same inputs always produce an equal configuration.
pub fn build(
    project: &ProjectSpec,
    target: &Target,
    rules: &RuleSet,
) -> Result<Configuration, PlanError> {
    let owner = project.owner();
    let draft = rules.fold(target, &owner)?;

    let mut bindings = base_bindings(project)?;
    bindings.bind_target(target);

    let project_path = {
        let template = draft.scalar(Field::ProjectPath).ok_or_else(|| {
            PlanError::UnhandledTarget {
                owner: owner.clone(),
                target: target.to_string(),
                field: Field::ProjectPath.to_string(),
            }
        })?;
        resolve(&PathTemplate::new(template), &bindings)?
    };
    bindings.bind_path(keys::CONF_PROJECT_PATH, &project_path);

    let target_path = resolve_or_default(
        draft.scalar(Field::TargetPath),
        default_layout("output", target),
        &bindings,
    )?;
    bindings.bind_path(keys::CONF_TARGET_PATH, &target_path);

    let intermediate_path = resolve_or_default(
        draft.scalar(Field::IntermediatePath),
        default_layout("obj", target),
        &bindings,
    )?;
    bindings.bind_path(keys::CONF_INTERMEDIATE_PATH, &intermediate_path);

    let steps = draft
        .steps
        .into_iter()
        .map(|step| resolve_step(step, &bindings))
        .collect::<Result<Vec<_>, _>>()?;

    let project_name = draft
        .scalars
        .get(&Field::ProjectName)
        .cloned()
        .unwrap_or_else(|| project.name.clone());

    tracing::debug!(
        "configured {} for {} -> {}",
        owner,
        target,
        project_path.display()
    );

    Ok(Configuration {
        project_name,
        name: target.name(),
        target: target.clone(),
        project_path,
        target_path,
        intermediate_path,
        precomp_header: draft.scalars.get(&Field::PrecompHeader).cloned(),
        precomp_source: draft.scalars.get(&Field::PrecompSource).cloned(),
        steps,
        options: draft.options,
    })
}

/// Expand the project's axes and build every target.
///
/// Targets are built in parallel; results keep expansion order. Every failing
/// target is reported, not just the first.
pub fn build_project(spec: &ProjectSpec) -> Result<Project, PlanErrors> {
    let owner = spec.owner();
    let targets = expand(&spec.axes)?;
    spec.rules.validate(Scope::Project, &spec.axes, &owner)?;

    let bindings = base_bindings(spec)?;
    let additional_source_roots = spec
        .additional_source_roots
        .iter()
        .map(|t| resolve(t, &bindings))
        .collect::<Result<Vec<_>, _>>()?;
    let source_root = bindings
        .get(keys::PROJECT_SOURCE_ROOT)
        .map(PathBuf::from)
        .unwrap_or_else(|| spec.root.clone());

    let results: Vec<Result<Configuration, PlanError>> = targets
        .par_iter()
        .map(|target| build(spec, target, &spec.rules))
        .collect();

    let mut errors = PlanErrors::new();
    let mut configurations = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(configuration) => configurations.push(configuration),
            Err(e) => {
                tracing::warn!("{}", e);
                errors.push(e);
            }
        }
    }

    tracing::debug!(
        "{}: built {} of {} configurations",
        owner,
        configurations.len(),
        targets.len()
    );

    errors.into_result(Project {
        name: spec.name.clone(),
        guid: stable_guid(["project", spec.name.as_str()]),
        root: spec.root.clone(),
        source_root,
        additional_source_roots,
        configurations,
    })
}

/// Target-independent bindings: `project.root`, `project.name` and the
/// resolved `project.source_root`.
fn base_bindings(project: &ProjectSpec) -> Result<Bindings, PlanError> {
    let mut bindings = Bindings::new();
    bindings
        .bind_path(keys::PROJECT_ROOT, &project.root)
        .bind(keys::PROJECT_NAME, project.name.clone());

    let source_root = resolve(&project.source_root, &bindings)?;
    bindings.bind_path(keys::PROJECT_SOURCE_ROOT, &source_root);
    Ok(bindings)
}

/// `[conf.project_path]/<kind>/[target.platform]/[conf.name]`, dropping the
/// platform segment for matrices without a platform axis.
fn default_layout(kind: &str, target: &Target) -> PathTemplate {
    if target.has_axis(names::PLATFORM) {
        PathTemplate::new(format!(
            "[{}]/{}/[{}{}]/[{}]",
            keys::CONF_PROJECT_PATH,
            kind,
            keys::TARGET_PREFIX,
            names::PLATFORM,
            keys::CONF_NAME
        ))
    } else {
        PathTemplate::new(format!(
            "[{}]/{}/[{}]",
            keys::CONF_PROJECT_PATH,
            kind,
            keys::CONF_NAME
        ))
    }
}

fn resolve_or_default(
    template: Option<&str>,
    default: PathTemplate,
    bindings: &Bindings,
) -> Result<PathBuf, PlanError> {
    match template {
        Some(t) => resolve(&PathTemplate::new(t), bindings),
        None => resolve(&default, bindings),
    }
}

fn resolve_step(step: StepTemplate, bindings: &Bindings) -> Result<BuildStep, PlanError> {
    if let BuildStep::PostBuildCopy(ref copy) = step {
        glob::Pattern::new(&copy.pattern).map_err(|e| {
            PlanError::config(format!(
                "invalid copy pattern `{}` for `{}`: {}",
                copy.pattern, copy.source, e
            ))
        })?;
    }
    step.try_map_paths(|template| resolve(&template, bindings))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::path::Path;

    use super::*;
    use crate::builder::rules::{Effects, Predicate, Select};
    use crate::core::step::CopyStep;
    use crate::core::AxisSet;
    use crate::test_support::fixtures;

    fn legacy_current_project() -> ProjectSpec {
        let rules = RuleSet::new().select(
            Select::new(Field::ProjectPath)
                .branch(Predicate::axis_eq("devenv", "v1"), "[project.root]/legacy")
                .branch(Predicate::axis_eq("devenv", "v2"), "[project.root]/current"),
        );
        ProjectSpec::new(
            "App",
            "/work/app",
            AxisSet::default()
                .with_axis("platform", ["win64"])
                .with_axis("devenv", ["v1", "v2"])
                .with_axis("optimization", ["Debug", "Release"]),
        )
        .with_rules(rules)
    }

    #[test]
    fn test_two_distinct_output_dirs() {
        let project = build_project(&legacy_current_project()).unwrap();
        assert_eq!(project.configurations().len(), 4);

        let dirs: BTreeSet<&Path> = project
            .configurations()
            .iter()
            .map(Configuration::project_path)
            .collect();
        assert_eq!(dirs.len(), 2);

        for dir in &dirs {
            let covered = project
                .configurations()
                .iter()
                .filter(|c| c.project_path() == *dir)
                .count();
            assert_eq!(covered, 2);
        }
        assert!(dirs.contains(Path::new("/work/app/legacy")));
        assert!(dirs.contains(Path::new("/work/app/current")));
    }

    #[test]
    fn test_default_target_path_layout() {
        let spec = legacy_current_project();
        let target = Target::from_pairs([
            ("platform", "win64"),
            ("devenv", "v1"),
            ("optimization", "Debug"),
        ]);
        let conf = build(&spec, &target, &spec.rules).unwrap();
        assert_eq!(
            conf.target_path(),
            Path::new("/work/app/legacy/output/win64/win64_v1_Debug")
        );
        assert_eq!(
            conf.intermediate_path(),
            Path::new("/work/app/legacy/obj/win64/win64_v1_Debug")
        );
        assert_eq!(conf.project_name(), "App");
        assert_eq!(conf.name(), "win64_v1_Debug");
    }

    #[test]
    fn test_post_build_copy_present_in_every_configuration() {
        let root = Path::new("/work/bird");
        let project = build_project(&fixtures::bird_game_project(root)).unwrap();
        assert_eq!(project.configurations().len(), 4);

        for conf in project.configurations() {
            let copies: Vec<_> = conf.post_build_copies().collect();
            assert_eq!(copies.len(), 1);

            let expected = CopyStep::new(
                root.join("assets"),
                conf.target_path().join("assets"),
            )
            .mirrored();
            assert_eq!(copies[0], &expected);
        }
    }

    #[test]
    fn test_bird_game_configuration() {
        let root = Path::new("/work/bird");
        let project = build_project(&fixtures::bird_game_project(root)).unwrap();
        let target = Target::from_pairs([
            ("platform", "win64"),
            ("devenv", "vs2017"),
            ("optimization", "release"),
        ]);
        let conf = project.configuration(&target).unwrap();

        assert_eq!(conf.project_path(), Path::new("/work/bird/generated/vs2017"));
        assert_eq!(
            conf.option("General.WindowsTargetPlatformVersion"),
            Some("10.0.17763.0")
        );
        assert_eq!(conf.option("Linker.SubSystem"), Some("Windows"));
        assert_eq!(conf.precomp_header(), Some("pch.h"));
        assert_eq!(conf.precomp_source(), Some("pch.cpp"));
        assert_eq!(
            conf.libraries().collect::<Vec<_>>(),
            vec!["d3d12", "dxgi", "d3dcompiler", "dxguid"]
        );
        assert_eq!(
            conf.include_paths().collect::<Vec<_>>(),
            vec![Path::new("/work/bird/include")]
        );
        assert_eq!(
            conf.debugger().unwrap().working_directory,
            conf.target_path().to_path_buf()
        );
        assert_eq!(project.source_root(), Path::new("/work/bird/src"));

        let vs2022 = Target::from_pairs([
            ("platform", "win64"),
            ("devenv", "vs2022"),
            ("optimization", "release"),
        ]);
        let conf = project.configuration(&vs2022).unwrap();
        assert_eq!(conf.option("General.WindowsTargetPlatformVersion"), Some("Latest"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let spec = fixtures::bird_game_project(Path::new("/work/bird"));
        let target = Target::from_pairs([
            ("platform", "win64"),
            ("devenv", "vs2022"),
            ("optimization", "debug"),
        ]);
        let a = build(&spec, &target, &spec.rules).unwrap();
        let b = build(&spec, &target, &spec.rules).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_project_path_is_unhandled() {
        let spec = ProjectSpec::new(
            "App",
            "/work/app",
            AxisSet::default().with_axis("optimization", ["debug"]),
        );
        let errors = build_project(&spec).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors.iter().next(),
            Some(PlanError::UnhandledTarget { field, .. }) if field == "project_path"
        ));
    }

    #[test]
    fn test_errors_are_aggregated_across_targets() {
        // Only v1 is handled: both v2 targets must be reported.
        let rules = RuleSet::new().select(
            Select::new(Field::ProjectPath)
                .branch(Predicate::axis_eq("devenv", "v1"), "[project.root]/legacy"),
        );
        let spec = legacy_current_project().with_rules(rules);

        let errors = build_project(&spec).unwrap_err();
        assert_eq!(errors.len(), 2);
        for error in errors.iter() {
            match error {
                PlanError::UnhandledTarget { target, .. } => assert!(target.contains("_v2_")),
                other => panic!("unexpected error: {}", other),
            }
        }
    }

    #[test]
    fn test_conf_paths_are_bound_for_steps() {
        let rules = RuleSet::new()
            .always(Effects::default().set(Field::ProjectPath, "[project.root]/gen"))
            .always(Effects::default().include_path("[conf.intermediate_path]/generated"));
        let spec = ProjectSpec::new(
            "App",
            "/work/app",
            AxisSet::default().with_axis("optimization", ["debug"]),
        )
        .with_rules(rules);

        let project = build_project(&spec).unwrap();
        let conf = &project.configurations()[0];
        assert_eq!(
            conf.include_paths().collect::<Vec<_>>(),
            vec![Path::new("/work/app/gen/obj/debug/generated")]
        );
    }

    #[test]
    fn test_invalid_copy_pattern() {
        let rules = RuleSet::new()
            .always(Effects::default().set(Field::ProjectPath, "[project.root]/gen"))
            .always(Effects::default().post_build_copy(CopyStep {
                pattern: "[".to_string(),
                ..CopyStep::new("assets".into(), "[conf.target_path]/assets".into())
            }));
        let spec = ProjectSpec::new(
            "App",
            "/work/app",
            AxisSet::default().with_axis("optimization", ["debug"]),
        )
        .with_rules(rules);

        let errors = build_project(&spec).unwrap_err();
        assert!(errors.to_string().contains("invalid copy pattern"));
    }

    #[test]
    fn test_source_root_cannot_use_target_bindings() {
        let spec = legacy_current_project().with_source_root("[project.root]/[target.devenv]");
        let errors = build_project(&spec).unwrap_err();
        assert!(matches!(
            errors.iter().next(),
            Some(PlanError::UnresolvedPlaceholder { placeholder, .. }) if placeholder == "target.devenv"
        ));
    }
}
